//! Proof verification.
//!
//! Verification replays the prover's public computation: decode the proof,
//! expand (or accept a cached copy of) the public matrix, re-derive the
//! challenges from the decoded commitments, and check every repetition's
//! algebraic relation `A·z + z' ≡ w + c·t (mod q)` together with the norm
//! bound on both responses. A decoded proof never errors out of the
//! cryptographic phase; it produces a [`Verdict`]. Per-repetition outcomes
//! are folded together in constant time and only the combined verdict is
//! branched on, so a forger learns nothing about which repetition tripped.

use rayon::prelude::*;
use subtle::{Choice, ConstantTimeEq};
use tracing::instrument;

use crate::algebra::{PolyVec, PublicMatrix};
use crate::challenge::derive_challenges;
use crate::codec::Proof;
use crate::error::{Result, Verdict, ZkpopError};
use crate::keys::PublicKey;

/// Verifies an encoded proof of possession, expanding the public matrix
/// internally.
///
/// Convenience wrapper over [`verify_proof_with_matrix`] for callers without
/// a cached matrix.
///
/// # Errors
/// See [`verify_proof_with_matrix`].
pub fn verify_proof(public_key: &PublicKey, context: &[u8], proof_bytes: &[u8]) -> Result<Verdict> {
    let matrix = PublicMatrix::expand(public_key.rho(), public_key.security_level().params());
    verify_proof_with_matrix(public_key, context, proof_bytes, &matrix)
}

/// Verifies an encoded proof of possession using a caller-cached matrix.
///
/// The matrix must be the expansion of the public key's own seed.
///
/// # Errors
/// - A format error ([`ZkpopError::is_format_error`]) if the proof bytes are
///   malformed; malformed proofs never reach the cryptographic checks.
/// - [`ZkpopError::ParameterMismatch`] if the proof declares a valid
///   parameter set different from the public key's, or the matrix rank
///   disagrees with the public key.
///
/// A well-formed proof that fails its cryptographic checks is *not* an
/// error; it yields [`Verdict::Reject`].
#[instrument(level = "debug", skip_all, fields(security_level = ?public_key.security_level()))]
pub fn verify_proof_with_matrix(
    public_key: &PublicKey,
    context: &[u8],
    proof_bytes: &[u8],
    matrix: &PublicMatrix,
) -> Result<Verdict> {
    let level = public_key.security_level();
    let params = level.params();

    let proof = Proof::from_bytes(proof_bytes)?;
    if proof.security_level() != level {
        return Err(ZkpopError::ParameterMismatch {
            expected: level.name(),
            actual: proof.security_level().name(),
        });
    }
    if matrix.rank() != params.k {
        return Err(ZkpopError::ParameterMismatch {
            expected: level.name(),
            actual: "matrix of foreign rank",
        });
    }

    let public_key_bytes = public_key.to_bytes();
    let challenges = derive_challenges(&public_key_bytes, context, proof.commitments(), params);

    let round_results: Vec<Choice> = proof
        .commitments()
        .par_iter()
        .zip(proof.responses().par_iter())
        .zip(challenges.par_iter())
        .map(|((w, (z, z_err)), &c)| check_round(matrix, public_key.t(), w, z, z_err, c, params))
        .collect();

    // Fold every repetition before branching; the verdict is the only
    // data-dependent branch in the cryptographic phase.
    let accepted = round_results.into_iter().fold(Choice::from(1u8), |acc, r| acc & r);
    if bool::from(accepted) {
        Ok(Verdict::Accept)
    } else {
        Ok(Verdict::Reject)
    }
}

/// Checks one repetition: norm bounds on both responses and the linear
/// relation `A·z + z' ≡ w + c·t (mod q)`.
fn check_round(
    matrix: &PublicMatrix,
    t: &PolyVec,
    w: &PolyVec,
    z: &PolyVec,
    z_err: &PolyVec,
    challenge: i32,
    params: &crate::params::ParameterSet,
) -> Choice {
    // The codec already range-checked the decoded responses; rechecking here
    // keeps the verifier sound against any other construction path.
    let norms_ok = !(z.exceeds_bound(params.gamma()) | z_err.exceeds_bound(params.gamma()));
    let lhs = matrix.mul_vec(&z.reduced()).add(z_err).reduced();
    let rhs = w.add(&t.scaled(challenge)).reduced();
    norms_ok & lhs.ct_eq(&rhs)
}
