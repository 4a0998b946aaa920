//! Proof generation: commit, derive challenges, respond, retry on abort.
//!
//! Every iteration of the sampling loop commits to all `t` repetitions
//! before a single challenge is derived, so the transcript the challenges
//! bind is always complete. When any repetition fails its rejection test,
//! the *entire attempt* is discarded: all `t` repetitions draw fresh masking
//! randomness and the challenges are derived anew from the fresh commitment
//! list. A masking pair is therefore only ever evaluated against the one
//! challenge sequence derived from its own commitment batch; carrying an
//! accepted pair into a later attempt would condition its published response
//! on acceptance under earlier, different challenges, and that conditioning
//! depends on the secret.
//!
//! Which iterations aborted is public protocol information; which
//! coefficient caused an abort is not, and the acceptance test is evaluated
//! without data-dependent branching on coefficient values.

use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use subtle::Choice;
use tracing::{debug, instrument};

use crate::algebra::{PolyVec, PublicMatrix};
use crate::challenge::derive_challenges;
use crate::codec::Proof;
use crate::commit::Masking;
use crate::error::{Result, ZkpopError};
use crate::keys::{PublicKey, SecretKey};
use crate::response::Candidate;

/// Default ceiling on sampling-loop iterations.
///
/// Expected iteration counts sit in the tens for every parameter set, so
/// hitting this ceiling with honest inputs indicates a broken random source
/// rather than bad luck.
pub const MAX_RESAMPLE_ITERATIONS: u32 = 2048;

/// Tunables for proof generation.
#[derive(Debug, Clone, Copy)]
pub struct ProverConfig {
    /// Sampling-loop iteration ceiling before giving up with
    /// [`ZkpopError::ProofGenerationFailure`].
    pub max_resample_iterations: u32,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self { max_resample_iterations: MAX_RESAMPLE_ITERATIONS }
    }
}

/// One repetition's in-flight state: its masking pair and commitment.
struct PendingRound {
    masking: Masking,
    w: PolyVec,
}

impl PendingRound {
    fn sample<R: RngCore + CryptoRng>(
        rng: &mut R,
        matrix: &PublicMatrix,
        params: &crate::params::ParameterSet,
    ) -> Self {
        let masking = Masking::sample(rng, params);
        let w = masking.commitment(matrix);
        Self { masking, w }
    }
}

/// Generates a proof of possession, expanding the public matrix internally.
///
/// Convenience wrapper over [`generate_proof_with_matrix`] for callers
/// without a cached matrix.
///
/// # Errors
/// See [`generate_proof_with_matrix`].
pub fn generate_proof<R: RngCore + CryptoRng>(
    rng: &mut R,
    public_key: &PublicKey,
    secret_key: &SecretKey,
    context: &[u8],
) -> Result<Proof> {
    let matrix = PublicMatrix::expand(public_key.rho(), public_key.security_level().params());
    generate_proof_with_matrix(rng, public_key, secret_key, context, &matrix)
}

/// Generates a proof of possession using a caller-cached public matrix.
///
/// The matrix must be the expansion of the public key's own seed; it is
/// public data and may be shared freely across calls and threads.
///
/// # Errors
/// - [`ZkpopError::ParameterMismatch`] if the secret key's level or the
///   matrix rank disagrees with the public key.
/// - [`ZkpopError::ProofGenerationFailure`] if the sampling loop exceeds its
///   iteration ceiling.
#[instrument(level = "debug", skip_all, fields(security_level = ?public_key.security_level()))]
pub fn generate_proof_with_matrix<R: RngCore + CryptoRng>(
    rng: &mut R,
    public_key: &PublicKey,
    secret_key: &SecretKey,
    context: &[u8],
    matrix: &PublicMatrix,
) -> Result<Proof> {
    generate_with_config(rng, public_key, secret_key, context, matrix, ProverConfig::default())
}

/// [`generate_proof_with_matrix`] with an explicit configuration.
///
/// # Errors
/// As for [`generate_proof_with_matrix`].
pub fn generate_with_config<R: RngCore + CryptoRng>(
    rng: &mut R,
    public_key: &PublicKey,
    secret_key: &SecretKey,
    context: &[u8],
    matrix: &PublicMatrix,
    config: ProverConfig,
) -> Result<Proof> {
    let level = public_key.security_level();
    let params = level.params();
    if secret_key.security_level() != level {
        return Err(ZkpopError::ParameterMismatch {
            expected: level.name(),
            actual: secret_key.security_level().name(),
        });
    }
    if matrix.rank() != params.k {
        return Err(ZkpopError::ParameterMismatch {
            expected: level.name(),
            actual: "matrix of foreign rank",
        });
    }

    let public_key_bytes = public_key.to_bytes();
    let mut iterations = 0u32;
    loop {
        iterations += 1;
        if iterations > config.max_resample_iterations {
            return Err(ZkpopError::ProofGenerationFailure {
                attempts: config.max_resample_iterations,
            });
        }

        // Fresh masking for every repetition, every attempt. Accepted pairs
        // from a failed attempt must not be carried forward: their responses
        // would be conditioned on acceptance under challenges that no longer
        // appear in the transcript.
        let rounds: Vec<PendingRound> =
            (0..params.reps).map(|_| PendingRound::sample(rng, matrix, params)).collect();
        let commitments: Vec<PolyVec> = rounds.iter().map(|r| r.w.clone()).collect();
        let challenges = derive_challenges(&public_key_bytes, context, &commitments, params);

        let mut candidates: Vec<Candidate> = rounds
            .par_iter()
            .zip(challenges.par_iter())
            .map(|(round, &c)| Candidate::compute(&round.masking, c, secret_key, params))
            .collect();

        let all_accepted =
            candidates.iter().fold(Choice::from(1u8), |acc, cand| acc & cand.accepted());
        if bool::from(all_accepted) {
            debug!(iterations, "proof generation complete");
            let responses = candidates.iter_mut().map(Candidate::take_responses).collect();
            return Ok(Proof::new(level, commitments, responses));
        }
        debug!(iteration = iterations, "attempt aborted, restarting with fresh masking");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;
    use crate::params::SecurityLevel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn generation_succeeds_for_every_level() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        for level in [SecurityLevel::Level1, SecurityLevel::Level3, SecurityLevel::Level5] {
            let (pk, sk) = generate_keypair(&mut rng, level).unwrap();
            let proof = generate_proof(&mut rng, &pk, &sk, b"test context").unwrap();
            assert_eq!(proof.security_level(), level);
            assert_eq!(proof.commitments().len(), level.params().reps);
            assert_eq!(proof.responses().len(), level.params().reps);
        }
    }

    #[test]
    fn responses_stay_within_gamma() {
        let mut rng = ChaCha20Rng::seed_from_u64(32);
        let level = SecurityLevel::Level1;
        let params = level.params();
        let (pk, sk) = generate_keypair(&mut rng, level).unwrap();
        let proof = generate_proof(&mut rng, &pk, &sk, b"").unwrap();
        for (z, z_err) in proof.responses() {
            assert!(z.infinity_norm() <= params.gamma() as u32);
            assert!(z_err.infinity_norm() <= params.gamma() as u32);
        }
    }

    #[test]
    fn mismatched_key_levels_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(33);
        let (pk, _sk1) = generate_keypair(&mut rng, SecurityLevel::Level1).unwrap();
        let (_pk3, sk3) = generate_keypair(&mut rng, SecurityLevel::Level3).unwrap();
        let err = generate_proof(&mut rng, &pk, &sk3, b"ctx").unwrap_err();
        assert!(matches!(err, ZkpopError::ParameterMismatch { .. }));
    }

    #[test]
    fn foreign_rank_matrix_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(34);
        let (pk, sk) = generate_keypair(&mut rng, SecurityLevel::Level1).unwrap();
        let wrong = PublicMatrix::expand(pk.rho(), SecurityLevel::Level3.params());
        let err = generate_proof_with_matrix(&mut rng, &pk, &sk, b"ctx", &wrong).unwrap_err();
        assert!(matches!(err, ZkpopError::ParameterMismatch { .. }));
    }

    #[test]
    fn tiny_iteration_ceiling_reports_generation_failure() {
        let mut rng = ChaCha20Rng::seed_from_u64(35);
        let level = SecurityLevel::Level5;
        let (pk, sk) = generate_keypair(&mut rng, level).unwrap();
        let matrix = PublicMatrix::expand(pk.rho(), level.params());
        let config = ProverConfig { max_resample_iterations: 1 };
        // A single iteration passing all 32 repetitions at once is far less
        // likely than this test flaking for other reasons; retry a few seeds
        // and require at least one observed failure.
        let mut saw_failure = false;
        for seed in 0..4u64 {
            let mut rng2 = ChaCha20Rng::seed_from_u64(seed);
            match generate_with_config(&mut rng2, &pk, &sk, b"ctx", &matrix, config) {
                Err(ZkpopError::ProofGenerationFailure { attempts: 1 }) => saw_failure = true,
                Err(other) => panic!("unexpected error: {other}"),
                Ok(_) => {}
            }
        }
        assert!(saw_failure);
    }

    /// Delegating RNG that counts how many random bytes were consumed.
    struct CountingRng {
        inner: ChaCha20Rng,
        bytes: u64,
    }

    impl rand::RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.bytes += 4;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.bytes += 8;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.bytes += dest.len() as u64;
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            self.bytes += dest.len() as u64;
            self.inner.try_fill_bytes(dest)
        }
    }

    impl rand::CryptoRng for CountingRng {}

    #[test]
    fn every_attempt_draws_a_full_batch_of_fresh_masking() {
        let mut keygen_rng = ChaCha20Rng::seed_from_u64(37);
        let level = SecurityLevel::Level1;
        let params = level.params();
        let (pk, sk) = generate_keypair(&mut keygen_rng, level).unwrap();
        let matrix = PublicMatrix::expand(pk.rho(), params);

        // One attempt draws masking for all t repetitions: 2k polynomials of
        // 4 bytes per coefficient each. No masking survives into the next
        // attempt, so total consumption is an exact multiple of one batch.
        let batch_bytes = (params.reps * 2 * params.k * 4 * 256) as u64;
        let mut max_attempts = 0;
        for seed in [50u64, 51, 52] {
            let mut rng = CountingRng { inner: ChaCha20Rng::seed_from_u64(seed), bytes: 0 };
            generate_proof_with_matrix(&mut rng, &pk, &sk, b"ctx", &matrix).unwrap();
            assert_eq!(
                rng.bytes % batch_bytes,
                0,
                "seed {seed}: partial masking batch drawn ({} bytes)",
                rng.bytes
            );
            max_attempts = max_attempts.max(rng.bytes / batch_bytes);
        }
        // At least one of the seeds must actually have aborted and restarted,
        // otherwise the property was not exercised.
        assert!(max_attempts > 1);
    }

    #[test]
    fn cached_matrix_matches_internal_expansion() {
        let mut rng = ChaCha20Rng::seed_from_u64(36);
        let level = SecurityLevel::Level1;
        let (pk, sk) = generate_keypair(&mut rng, level).unwrap();
        let matrix = PublicMatrix::expand(pk.rho(), level.params());

        let mut rng_a = ChaCha20Rng::seed_from_u64(99);
        let mut rng_b = ChaCha20Rng::seed_from_u64(99);
        let a = generate_proof(&mut rng_a, &pk, &sk, b"ctx").unwrap();
        let b = generate_proof_with_matrix(&mut rng_b, &pk, &sk, b"ctx", &matrix).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }
}
