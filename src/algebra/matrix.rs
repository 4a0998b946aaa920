//! The public matrix `A`, expanded deterministically from the seed `rho`.
//!
//! Prover and verifier run the identical expansion, so the matrix never
//! travels on the wire. It is derived purely from public data and may be
//! cached and shared read-only across repetitions and across prover and
//! verifier calls for the same public key; the `*_with_matrix` entry points
//! accept such a cached instance.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake128;

use crate::params::ParameterSet;

use super::poly::{Poly, N, Q};
use super::polyvec::PolyVec;

/// SHAKE-128 output is consumed in rate-sized blocks during rejection
/// sampling.
const EXPAND_BLOCK_BYTES: usize = 168;

/// The expanded `k x k` public matrix.
#[derive(Debug, Clone)]
pub struct PublicMatrix {
    rows: Vec<PolyVec>,
}

impl PublicMatrix {
    /// Expands `rho` into the full matrix for the given parameter set.
    ///
    /// Entry `(i, j)` is rejection-sampled from `SHAKE-128(rho ‖ i ‖ j)`:
    /// 12-bit candidates are drawn from the stream and kept when below `q`,
    /// so every coefficient is uniform over `[0, q)` and identical on the
    /// prover and verifier sides.
    #[must_use]
    pub fn expand(rho: &[u8; 32], params: &ParameterSet) -> Self {
        let rows = (0..params.k)
            .map(|i| {
                let polys = (0..params.k)
                    .map(|j| Self::sample_uniform(rho, i as u8, j as u8))
                    .collect();
                PolyVec::from_polys(polys)
            })
            .collect();
        Self { rows }
    }

    fn sample_uniform(rho: &[u8; 32], i: u8, j: u8) -> Poly {
        let mut xof = Shake128::default();
        xof.update(rho);
        xof.update(&[i, j]);
        let mut reader = xof.finalize_xof();

        let mut poly = Poly::zero();
        let mut filled = 0usize;
        let mut block = [0u8; EXPAND_BLOCK_BYTES];
        while filled < N {
            reader.read(&mut block);
            let mut pos = 0;
            while filled < N && pos + 3 <= block.len() {
                let d1 = (u16::from(block[pos]) | (u16::from(block[pos + 1]) << 8)) & 0x0FFF;
                let d2 = (u16::from(block[pos + 1]) >> 4) | (u16::from(block[pos + 2]) << 4);
                if d1 < Q as u16 {
                    poly.coeffs[filled] = i32::from(d1);
                    filled += 1;
                }
                if filled < N && d2 < Q as u16 {
                    poly.coeffs[filled] = i32::from(d2);
                    filled += 1;
                }
                pos += 3;
            }
        }
        poly
    }

    /// The module rank `k` this matrix was expanded for.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rows.len()
    }

    /// Matrix-vector product `A·v`, reduced to the canonical range.
    #[must_use]
    pub fn mul_vec(&self, v: &PolyVec) -> PolyVec {
        debug_assert_eq!(self.rank(), v.rank());
        let polys = self
            .rows
            .iter()
            .map(|row| {
                let mut acc = Poly::zero();
                for (a, b) in row.polys().iter().zip(v.polys()) {
                    acc = acc.add(&a.mul(b));
                }
                acc.reduce();
                acc
            })
            .collect();
        PolyVec::from_polys(polys)
    }
}
