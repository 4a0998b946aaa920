//! Key material the proof is about.
//!
//! The public key is the module-LWE statement `t = A·s + e (mod q)` together
//! with the matrix seed `rho`; the secret key is the short witness pair
//! `(s, e)`. Key generation here mirrors the key-encapsulation scheme's own
//! sampling (uniform matrix from `rho`, centered-binomial noise from a PRF)
//! so that honestly generated pairs satisfy the relation the proof engine
//! checks.
//!
//! # Security Note
//! - `Clone` is intentionally NOT implemented for [`SecretKey`] to prevent
//!   copies of secret key material
//! - Secret key data is automatically zeroized on drop
//! - `Debug` output redacts the witness vectors

use rand::{CryptoRng, RngCore};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;
use tracing::instrument;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::algebra::poly::{Poly, N};
use crate::algebra::{PolyVec, PublicMatrix};
use crate::error::{Result, ZkpopError};
use crate::params::SecurityLevel;

/// Public key of a module-LWE key-encapsulation key pair.
///
/// Input-only for this crate: the proof engine reads it, never mutates it.
#[derive(Debug, Clone)]
pub struct PublicKey {
    level: SecurityLevel,
    rho: [u8; 32],
    t: PolyVec,
}

impl PublicKey {
    /// Assembles a public key from its seed and canonical vector `t`.
    ///
    /// # Errors
    /// Returns [`ZkpopError::ParameterMismatch`] if the rank of `t` does not
    /// match the security level.
    pub fn new(level: SecurityLevel, rho: [u8; 32], t: PolyVec) -> Result<Self> {
        if t.rank() != level.params().k {
            return Err(ZkpopError::ParameterMismatch {
                expected: level.name(),
                actual: "vector of foreign rank",
            });
        }
        Ok(Self { level, rho, t: t.reduced() })
    }

    /// Deserializes a public key (`rho ‖ packed t`) for the given level.
    ///
    /// # Errors
    /// Returns a format error if the length is wrong or `t` carries a
    /// non-canonical coefficient.
    pub fn from_bytes(bytes: &[u8], level: SecurityLevel) -> Result<Self> {
        let params = level.params();
        if bytes.len() != params.public_key_bytes() {
            return Err(ZkpopError::InvalidLength {
                expected: params.public_key_bytes(),
                actual: bytes.len(),
            });
        }
        let mut rho = [0u8; 32];
        rho.copy_from_slice(&bytes[..32]);
        let t = PolyVec::unpack_modq(&bytes[32..], params.k, "public key")?;
        Ok(Self { level, rho, t })
    }

    /// Serializes the public key for storage, transmission, or hashing.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let params = self.level.params();
        let mut out = vec![0u8; params.public_key_bytes()];
        out[..32].copy_from_slice(&self.rho);
        self.t.pack_modq(&mut out[32..]);
        out
    }

    /// Returns the security level.
    #[must_use]
    pub const fn security_level(&self) -> SecurityLevel {
        self.level
    }

    /// The matrix seed `rho`.
    #[must_use]
    pub const fn rho(&self) -> &[u8; 32] {
        &self.rho
    }

    /// The public vector `t`, in canonical form.
    #[must_use]
    pub fn t(&self) -> &PolyVec {
        &self.t
    }
}

/// Secret key: the short witness pair `(s, e)` with `‖s‖∞, ‖e‖∞ ≤ eta`.
///
/// Exclusively owned by the prover for the lifetime of a proof-generation
/// call; the backing storage is overwritten with zeros when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    #[zeroize(skip)]
    level: SecurityLevel,
    s: PolyVec,
    e: PolyVec,
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("level", &self.level)
            .field("s", &"[REDACTED]")
            .field("e", &"[REDACTED]")
            .finish()
    }
}

impl SecretKey {
    /// Deserializes a secret key (one byte `coeff + eta` per coefficient,
    /// `s` then `e`) as produced by the key-generation collaborator.
    ///
    /// # Errors
    /// Returns a format error if the length is wrong or any coefficient
    /// falls outside `[-eta, eta]`.
    pub fn from_bytes(bytes: &[u8], level: SecurityLevel) -> Result<Self> {
        let params = level.params();
        if bytes.len() != params.secret_key_bytes() {
            return Err(ZkpopError::InvalidLength {
                expected: params.secret_key_bytes(),
                actual: bytes.len(),
            });
        }
        let half = bytes.len() / 2;
        let s = Self::unpack_short(&bytes[..half], params.k, params.eta)?;
        let e = Self::unpack_short(&bytes[half..], params.k, params.eta)?;
        Ok(Self { level, s, e })
    }

    fn unpack_short(bytes: &[u8], k: usize, eta: i32) -> Result<PolyVec> {
        let polys = bytes
            .chunks_exact(N)
            .map(|chunk| {
                let mut p = Poly::zero();
                for (c, byte) in p.coeffs.iter_mut().zip(chunk) {
                    let v = i32::from(*byte);
                    if v > 2 * eta {
                        return Err(ZkpopError::CoefficientOutOfRange { field: "secret key" });
                    }
                    *c = v - eta;
                }
                Ok(p)
            })
            .collect::<Result<Vec<_>>>()?;
        debug_assert_eq!(polys.len(), k);
        Ok(PolyVec::from_polys(polys))
    }

    /// Serializes the secret key; the buffer zeroizes itself on drop.
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let params = self.level.params();
        let eta = params.eta;
        let mut out = Zeroizing::new(Vec::with_capacity(params.secret_key_bytes()));
        for vec in [&self.s, &self.e] {
            for p in vec.polys() {
                for c in &p.coeffs {
                    out.push((c + eta) as u8);
                }
            }
        }
        out
    }

    /// Returns the security level.
    #[must_use]
    pub const fn security_level(&self) -> SecurityLevel {
        self.level
    }

    pub(crate) fn s(&self) -> &PolyVec {
        &self.s
    }

    pub(crate) fn e(&self) -> &PolyVec {
        &self.e
    }
}

/// Generates a module-LWE key pair satisfying the proof relation.
///
/// Samples `rho` and a noise seed from the injected RNG, expands `A` from
/// `rho`, draws `s` and `e` from the centered binomial distribution
/// `CBD_eta`, and sets `t = A·s + e (mod q)`.
///
/// # Errors
/// Currently infallible; the `Result` keeps the signature stable should a
/// randomness source ever report failure.
#[instrument(level = "debug", skip(rng), fields(security_level = ?level))]
pub fn generate_keypair<R: RngCore + CryptoRng>(
    rng: &mut R,
    level: SecurityLevel,
) -> Result<(PublicKey, SecretKey)> {
    let params = level.params();

    let mut rho = [0u8; 32];
    rng.fill_bytes(&mut rho);
    let mut sigma = Zeroizing::new([0u8; 32]);
    rng.fill_bytes(&mut *sigma);

    let s = sample_noise_vector(&sigma, 0, params.k, params.eta);
    let e = sample_noise_vector(&sigma, params.k as u8, params.k, params.eta);

    let a = PublicMatrix::expand(&rho, params);
    let t = a.mul_vec(&s).add(&e).reduced();

    let public_key = PublicKey::new(level, rho, t)?;
    let secret_key = SecretKey { level, s, e };
    Ok((public_key, secret_key))
}

fn sample_noise_vector(seed: &[u8; 32], base_nonce: u8, k: usize, eta: i32) -> PolyVec {
    let polys = (0..k)
        .map(|i| sample_cbd(seed, base_nonce + i as u8, eta))
        .collect();
    PolyVec::from_polys(polys)
}

/// Samples one polynomial from the centered binomial distribution
/// `CBD_eta` over `SHAKE-256(seed ‖ nonce)`.
///
/// Each coefficient is the difference of two `eta`-bit popcounts, so it
/// lies in `[-eta, eta]`; the extraction has a fixed access pattern.
fn sample_cbd(seed: &[u8; 32], nonce: u8, eta: i32) -> Poly {
    let eta = eta as usize;
    let mut xof = Shake256::default();
    xof.update(seed);
    xof.update(&[nonce]);
    let mut reader = xof.finalize_xof();
    let mut stream = Zeroizing::new(vec![0u8; 64 * eta]);
    reader.read(&mut stream[..]);

    let mut poly = Poly::zero();
    for (i, c) in poly.coeffs.iter_mut().enumerate() {
        let mut a = 0i32;
        let mut b = 0i32;
        for j in 0..eta {
            let bit = 2 * i * eta + j;
            a += i32::from((stream[bit / 8] >> (bit % 8)) & 1);
            let bit = 2 * i * eta + eta + j;
            b += i32::from((stream[bit / 8] >> (bit % 8)) & 1);
        }
        *c = a - b;
    }
    poly
}
