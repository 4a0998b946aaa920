//! Rank-`k` vectors of ring elements.
//!
//! The rank is a runtime property taken from the parameter set; operations
//! on vectors of differing rank are programming errors.

use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::error::{Result, ZkpopError};

use super::poly::{Poly, PACKED_MODQ_BYTES, PACKED_RESPONSE_BYTES};

/// A vector of [`Poly`] ring elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Zeroize)]
pub struct PolyVec {
    polys: Vec<Poly>,
}

impl PolyVec {
    /// The zero vector of rank `k`.
    #[must_use]
    pub fn zero(k: usize) -> Self {
        Self { polys: vec![Poly::zero(); k] }
    }

    /// Builds a vector from its components.
    #[must_use]
    pub fn from_polys(polys: Vec<Poly>) -> Self {
        Self { polys }
    }

    /// The rank `k` of this vector.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.polys.len()
    }

    /// Read access to the component polynomials.
    #[must_use]
    pub fn polys(&self) -> &[Poly] {
        &self.polys
    }

    /// Component-wise sum. Coefficients are not reduced.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.rank(), other.rank());
        Self {
            polys: self.polys.iter().zip(&other.polys).map(|(a, b)| a.add(b)).collect(),
        }
    }

    /// Multiplies every coefficient by the scalar `c`. Not reduced.
    #[must_use]
    pub fn scaled(&self, c: i32) -> Self {
        Self { polys: self.polys.iter().map(|p| p.scaled(c)).collect() }
    }

    /// Reduces every coefficient to the canonical range `[0, q)`.
    pub fn reduce(&mut self) {
        for p in &mut self.polys {
            p.reduce();
        }
    }

    /// Returns a copy reduced to the canonical range `[0, q)`.
    #[must_use]
    pub fn reduced(&self) -> Self {
        let mut out = self.clone();
        out.reduce();
        out
    }

    /// Constant-time check whether any coefficient magnitude exceeds `bound`.
    ///
    /// Inspects every component with no early exit.
    #[must_use]
    pub fn exceeds_bound(&self, bound: i32) -> Choice {
        let mut exceeded = Choice::from(0u8);
        for p in &self.polys {
            exceeded |= p.exceeds_bound(bound);
        }
        exceeded
    }

    /// Largest coefficient magnitude. Only for use on public values.
    #[must_use]
    pub fn infinity_norm(&self) -> u32 {
        self.polys.iter().map(Poly::infinity_norm).max().unwrap_or(0)
    }

    /// Packed size of this vector at 12 bits per coefficient.
    #[must_use]
    pub fn packed_modq_len(&self) -> usize {
        self.rank() * PACKED_MODQ_BYTES
    }

    /// Packs a canonical vector at 12 bits per coefficient.
    pub fn pack_modq(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.packed_modq_len());
        for (p, chunk) in self.polys.iter().zip(out.chunks_exact_mut(PACKED_MODQ_BYTES)) {
            p.pack_modq(chunk);
        }
    }

    /// Unpacks a rank-`k` vector packed at 12 bits per coefficient.
    pub fn unpack_modq(bytes: &[u8], k: usize, field: &'static str) -> Result<Self> {
        let expected = k * PACKED_MODQ_BYTES;
        if bytes.len() != expected {
            return Err(ZkpopError::InvalidLength { expected, actual: bytes.len() });
        }
        let polys = bytes
            .chunks_exact(PACKED_MODQ_BYTES)
            .map(|chunk| Poly::unpack_modq(chunk, field))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { polys })
    }

    /// Packs a response vector at 18 bits per coefficient.
    pub fn pack_response(&self, gamma: i32, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.rank() * PACKED_RESPONSE_BYTES);
        for (p, chunk) in self.polys.iter().zip(out.chunks_exact_mut(PACKED_RESPONSE_BYTES)) {
            p.pack_response(gamma, chunk);
        }
    }

    /// Unpacks a rank-`k` response vector, range-checking against `gamma`.
    pub fn unpack_response(bytes: &[u8], k: usize, gamma: i32, field: &'static str) -> Result<Self> {
        let expected = k * PACKED_RESPONSE_BYTES;
        if bytes.len() != expected {
            return Err(ZkpopError::InvalidLength { expected, actual: bytes.len() });
        }
        let polys = bytes
            .chunks_exact(PACKED_RESPONSE_BYTES)
            .map(|chunk| Poly::unpack_response(chunk, gamma, field))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { polys })
    }
}

impl ConstantTimeEq for PolyVec {
    fn ct_eq(&self, other: &Self) -> Choice {
        debug_assert_eq!(self.rank(), other.rank());
        let mut eq = Choice::from(1u8);
        for (a, b) in self.polys.iter().zip(&other.polys) {
            eq &= a.ct_eq(b);
        }
        eq
    }
}
