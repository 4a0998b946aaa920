//! Per-repetition masking randomness and commitments.
//!
//! Each repetition draws a fresh masking pair `(y, y')` with coefficients
//! uniform in `(-gamma_mask, gamma_mask]` and commits to
//! `w = A·y + y' (mod q)`. Masking vectors must never be reused across
//! repetitions, retries, or proof instances: reuse collapses the
//! zero-knowledge property and exposes the secret to linear-algebra
//! recovery. The types here therefore hand out masking state by move only
//! and zeroize it on drop.

use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::algebra::poly::{Poly, N};
use crate::algebra::{PolyVec, PublicMatrix};
use crate::params::ParameterSet;

/// Masking randomness for one repetition: the pair `(y, y')`.
///
/// Secret-derived; zeroized on drop so abandoned repetitions leave nothing
/// behind.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct Masking {
    y: PolyVec,
    y_err: PolyVec,
}

impl Masking {
    /// Draws a fresh masking pair from the injected random source.
    ///
    /// Each coefficient consumes 18 bits of randomness and is mapped to
    /// `gamma_mask - v`, giving the uniform range `(-gamma_mask, gamma_mask]`
    /// with no rejection step.
    pub(crate) fn sample<R: RngCore + CryptoRng>(rng: &mut R, params: &ParameterSet) -> Self {
        Self {
            y: sample_masking_vector(rng, params),
            y_err: sample_masking_vector(rng, params),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(y: PolyVec, y_err: PolyVec) -> Self {
        Self { y, y_err }
    }

    pub(crate) fn y(&self) -> &PolyVec {
        &self.y
    }

    pub(crate) fn y_err(&self) -> &PolyVec {
        &self.y_err
    }

    /// The commitment `w = A·y + y' (mod q)` for this masking pair.
    pub(crate) fn commitment(&self, matrix: &PublicMatrix) -> PolyVec {
        matrix.mul_vec(&self.y).add(&self.y_err).reduced()
    }
}

fn sample_masking_vector<R: RngCore + CryptoRng>(rng: &mut R, params: &ParameterSet) -> PolyVec {
    let polys = (0..params.k)
        .map(|_| {
            let mut buf = Zeroizing::new([0u8; 4 * N]);
            rng.fill_bytes(&mut *buf);
            let mut p = Poly::zero();
            for (c, chunk) in p.coeffs.iter_mut().zip(buf.chunks_exact(4)) {
                let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                let v = (raw & 0x3FFFF) as i32;
                *c = params.gamma_mask - v;
            }
            p
        })
        .collect();
    PolyVec::from_polys(polys)
}
