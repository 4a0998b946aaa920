//! Single ring elements: negacyclic polynomials with `i32` coefficients.
//!
//! Coefficients are kept in one of two conventions depending on context:
//! canonical residues in `[0, q)` for anything that lives mod q (matrix
//! entries, commitments, the public vector `t`), and plain integers for
//! masking vectors and responses, whose infinity norm is what the protocol
//! bounds. Reduction is always explicit.

use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater};
use zeroize::Zeroize;

use crate::error::{Result, ZkpopError};

/// Polynomial degree of the ring, `X^256 + 1`.
pub const N: usize = 256;

/// The modulus `q` of the key-encapsulation scheme's ring.
pub const Q: i32 = 3329;

/// Packed size of one canonical mod-q polynomial: 12 bits per coefficient.
pub const PACKED_MODQ_BYTES: usize = N * 12 / 8;

/// Packed size of one response polynomial: 18 bits per coefficient.
pub const PACKED_RESPONSE_BYTES: usize = N * 18 / 8;

/// One element of `Z_q[X]/(X^N + 1)`.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct Poly {
    /// Coefficients, lowest degree first.
    pub coeffs: [i32; N],
}

impl std::fmt::Debug for Poly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Full 256-coefficient dumps drown logs; show the shape only.
        f.debug_struct("Poly").field("degree", &N).finish_non_exhaustive()
    }
}

impl Default for Poly {
    fn default() -> Self {
        Self::zero()
    }
}

impl Poly {
    /// The zero polynomial.
    #[must_use]
    pub const fn zero() -> Self {
        Self { coeffs: [0i32; N] }
    }

    /// Coefficient-wise sum. Coefficients are not reduced.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut out = Self::zero();
        for i in 0..N {
            out.coeffs[i] = self.coeffs[i] + other.coeffs[i];
        }
        out
    }

    /// Coefficient-wise difference. Coefficients are not reduced.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let mut out = Self::zero();
        for i in 0..N {
            out.coeffs[i] = self.coeffs[i] - other.coeffs[i];
        }
        out
    }

    /// Multiplies every coefficient by the scalar `c`. Not reduced.
    #[must_use]
    pub fn scaled(&self, c: i32) -> Self {
        let mut out = Self::zero();
        for i in 0..N {
            out.coeffs[i] = self.coeffs[i] * c;
        }
        out
    }

    /// Reduces every coefficient to the canonical range `[0, q)`.
    ///
    /// The divisor is a compile-time constant, so the compiler lowers the
    /// remainder to a multiply-shift sequence with no data-dependent timing.
    pub fn reduce(&mut self) {
        for c in &mut self.coeffs {
            *c = (*c % Q + Q) % Q;
        }
    }

    /// Returns a copy reduced to the canonical range `[0, q)`.
    #[must_use]
    pub fn reduced(&self) -> Self {
        let mut out = self.clone();
        out.reduce();
        out
    }

    /// Negacyclic product `self * other mod (X^N + 1)`, reduced to `[0, q)`.
    ///
    /// Schoolbook multiplication with a fixed access pattern: the loop
    /// structure is independent of the operand values, so secret operands do
    /// not influence timing. Accumulation in `i64` cannot overflow for any
    /// operands this crate produces (|coeff| < 2^18, 256 terms).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut acc = [0i64; N];
        for i in 0..N {
            let a = i64::from(self.coeffs[i]);
            for j in 0..N {
                let prod = a * i64::from(other.coeffs[j]);
                let d = i + j;
                if d < N {
                    acc[d] += prod;
                } else {
                    acc[d - N] -= prod;
                }
            }
        }
        let mut out = Self::zero();
        let q = i64::from(Q);
        for i in 0..N {
            out.coeffs[i] = ((acc[i] % q + q) % q) as i32;
        }
        out
    }

    /// Constant-time check whether any coefficient magnitude exceeds `bound`.
    ///
    /// Every coefficient is inspected; there is no early exit, so the timing
    /// of a rejection-sampling decision does not depend on where the first
    /// violation occurs.
    #[must_use]
    pub fn exceeds_bound(&self, bound: i32) -> Choice {
        let limit = bound.unsigned_abs();
        let mut exceeded = Choice::from(0u8);
        for c in &self.coeffs {
            exceeded |= c.unsigned_abs().ct_gt(&limit);
        }
        exceeded
    }

    /// Largest coefficient magnitude. Only for use on public values.
    #[must_use]
    pub fn infinity_norm(&self) -> u32 {
        self.coeffs.iter().map(|c| c.unsigned_abs()).max().unwrap_or(0)
    }

    /// Packs a canonical polynomial at 12 bits per coefficient.
    ///
    /// Callers must have reduced the polynomial to `[0, q)` first.
    pub fn pack_modq(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), PACKED_MODQ_BYTES);
        for (pair, chunk) in self.coeffs.chunks_exact(2).zip(out.chunks_exact_mut(3)) {
            let c0 = pair[0] as u16;
            let c1 = pair[1] as u16;
            chunk[0] = (c0 & 0xFF) as u8;
            chunk[1] = ((c0 >> 8) | ((c1 & 0x0F) << 4)) as u8;
            chunk[2] = (c1 >> 4) as u8;
        }
    }

    /// Unpacks a 12-bit-packed polynomial, rejecting non-canonical residues.
    pub fn unpack_modq(bytes: &[u8], field: &'static str) -> Result<Self> {
        if bytes.len() != PACKED_MODQ_BYTES {
            return Err(ZkpopError::InvalidLength {
                expected: PACKED_MODQ_BYTES,
                actual: bytes.len(),
            });
        }
        let mut out = Self::zero();
        for (pair, chunk) in out.coeffs.chunks_exact_mut(2).zip(bytes.chunks_exact(3)) {
            let b0 = u16::from(chunk[0]);
            let b1 = u16::from(chunk[1]);
            let b2 = u16::from(chunk[2]);
            let c0 = b0 | ((b1 & 0x0F) << 8);
            let c1 = (b1 >> 4) | (b2 << 4);
            if c0 >= Q as u16 || c1 >= Q as u16 {
                return Err(ZkpopError::CoefficientOutOfRange { field });
            }
            pair[0] = i32::from(c0);
            pair[1] = i32::from(c1);
        }
        Ok(out)
    }

    /// Packs a response polynomial at 18 bits per coefficient.
    ///
    /// Each coefficient `z` with `|z| ≤ gamma` is stored as `gamma - z`,
    /// an unsigned value in `[0, 2·gamma]`.
    pub fn pack_response(&self, gamma: i32, out: &mut [u8]) {
        debug_assert_eq!(out.len(), PACKED_RESPONSE_BYTES);
        for (quad, chunk) in self.coeffs.chunks_exact(4).zip(out.chunks_exact_mut(9)) {
            let mut acc: u128 = 0;
            for (slot, z) in quad.iter().enumerate() {
                debug_assert!(z.unsigned_abs() <= gamma.unsigned_abs());
                let u = (gamma - z) as u128 & 0x3FFFF;
                acc |= u << (18 * slot);
            }
            for (slot, byte) in chunk.iter_mut().enumerate() {
                *byte = (acc >> (8 * slot)) as u8;
            }
        }
    }

    /// Unpacks an 18-bit-packed response polynomial, rejecting any encoded
    /// value above `2·gamma` (a response outside the norm bound).
    pub fn unpack_response(bytes: &[u8], gamma: i32, field: &'static str) -> Result<Self> {
        if bytes.len() != PACKED_RESPONSE_BYTES {
            return Err(ZkpopError::InvalidLength {
                expected: PACKED_RESPONSE_BYTES,
                actual: bytes.len(),
            });
        }
        let limit = (2 * gamma) as u128;
        let mut out = Self::zero();
        for (quad, chunk) in out.coeffs.chunks_exact_mut(4).zip(bytes.chunks_exact(9)) {
            let mut acc: u128 = 0;
            for (slot, byte) in chunk.iter().enumerate() {
                acc |= u128::from(*byte) << (8 * slot);
            }
            for (slot, z) in quad.iter_mut().enumerate() {
                let u = (acc >> (18 * slot)) & 0x3FFFF;
                if u > limit {
                    return Err(ZkpopError::CoefficientOutOfRange { field });
                }
                *z = gamma - u as i32;
            }
        }
        Ok(out)
    }
}

impl ConstantTimeEq for Poly {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut eq = Choice::from(1u8);
        for i in 0..N {
            eq &= self.coeffs[i].ct_eq(&other.coeffs[i]);
        }
        eq
    }
}
