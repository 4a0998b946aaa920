//! Fiat-Shamir challenge derivation.
//!
//! All `t` challenges come from a single SHAKE-256 transcript over the
//! public key, the application context, and every commitment — in that
//! order, with the full commitment list absorbed before the first challenge
//! byte is squeezed. A prover therefore cannot pick later commitments in
//! reaction to earlier challenges, which is what makes the non-interactive
//! transform sound against adaptive provers. The verifier runs this exact
//! derivation on the decoded proof.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

use crate::algebra::PolyVec;
use crate::params::ParameterSet;

/// Domain separator binding challenges to this protocol and wire version.
const DOMAIN_SEPARATOR: &[u8] = b"arc-zkpop/fiat-shamir/v1";

/// Derives the `t` challenges for an ordered commitment list.
///
/// Variable-length inputs (public key, context) are length-prefixed so that
/// no two distinct transcripts collide by boundary shifting; commitments are
/// fixed-width for the parameter set and absorbed as packed bytes.
///
/// Each challenge is squeezed from the stream one byte at a time, discarding
/// bytes that would bias the distribution, so every challenge is uniform
/// over `[-c_max, c_max]`.
pub(crate) fn derive_challenges(
    public_key_bytes: &[u8],
    context: &[u8],
    commitments: &[PolyVec],
    params: &ParameterSet,
) -> Vec<i32> {
    debug_assert_eq!(commitments.len(), params.reps);

    let mut xof = Shake256::default();
    xof.update(DOMAIN_SEPARATOR);
    xof.update(&(public_key_bytes.len() as u32).to_le_bytes());
    xof.update(public_key_bytes);
    xof.update(&(context.len() as u32).to_le_bytes());
    xof.update(context);
    let mut packed = vec![0u8; params.commitment_bytes()];
    for w in commitments {
        w.pack_modq(&mut packed);
        xof.update(&packed);
    }
    let mut reader = xof.finalize_xof();

    let space = params.challenge_space_size();
    // Largest multiple of the space size that fits in a byte; higher draws
    // are redrawn to keep the challenge distribution uniform.
    let limit = 256 / space * space;
    (0..params.reps)
        .map(|_| {
            loop {
                let mut byte = [0u8; 1];
                reader.read(&mut byte);
                let draw = u32::from(byte[0]);
                if draw < limit {
                    return (draw % space) as i32 - params.c_max;
                }
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::algebra::poly::Poly;
    use crate::params::{LEVEL1, LEVEL3};

    fn commitments_for(params: &ParameterSet, fill: i32) -> Vec<PolyVec> {
        (0..params.reps)
            .map(|i| {
                let polys = (0..params.k)
                    .map(|j| {
                        let mut p = Poly::zero();
                        p.coeffs[0] = (fill + i as i32 + j as i32) % crate::algebra::poly::Q;
                        p
                    })
                    .collect();
                PolyVec::from_polys(polys)
            })
            .collect()
    }

    #[test]
    fn derivation_is_deterministic() {
        let ws = commitments_for(&LEVEL1, 5);
        let a = derive_challenges(b"pk", b"ctx", &ws, &LEVEL1);
        let b = derive_challenges(b"pk", b"ctx", &ws, &LEVEL1);
        assert_eq!(a, b);
        assert_eq!(a.len(), LEVEL1.reps);
    }

    #[test]
    fn challenges_stay_in_range() {
        let ws = commitments_for(&LEVEL3, 1);
        for c in derive_challenges(b"pk", b"ctx", &ws, &LEVEL3) {
            assert!(c.abs() <= LEVEL3.c_max);
        }
    }

    #[test]
    fn any_input_change_perturbs_the_sequence() {
        let ws = commitments_for(&LEVEL1, 5);
        let base = derive_challenges(b"pk", b"ctx", &ws, &LEVEL1);
        assert_ne!(base, derive_challenges(b"pk2", b"ctx", &ws, &LEVEL1));
        assert_ne!(base, derive_challenges(b"pk", b"ctx2", &ws, &LEVEL1));
        let ws2 = commitments_for(&LEVEL1, 6);
        assert_ne!(base, derive_challenges(b"pk", b"ctx", &ws2, &LEVEL1));
    }

    #[test]
    fn length_prefixing_prevents_boundary_shifts() {
        let ws = commitments_for(&LEVEL1, 5);
        // "pkc" + "tx" and "pk" + "ctx" concatenate identically.
        let a = derive_challenges(b"pkc", b"tx", &ws, &LEVEL1);
        let b = derive_challenges(b"pk", b"ctx", &ws, &LEVEL1);
        assert_ne!(a, b);
    }
}
