//! Error taxonomy for proof generation and verification.
//!
//! Three failure classes are distinguished so callers never conflate them:
//! format errors (malformed encodings, recoverable by rejecting the
//! artifact), parameter mismatches (incompatible key/proof parameter sets,
//! rejected before any arithmetic), and proof-generation failure (the
//! rejection-sampling ceiling was exceeded). A cryptographic check that
//! fails is *not* an error; it is the [`Verdict::Reject`] value returned by
//! the verifier.

use thiserror::Error;

/// A specialized Result type for proof-of-possession operations.
pub type Result<T> = std::result::Result<T, ZkpopError>;

/// Errors that can occur while generating, encoding, or verifying a proof.
///
/// No variant ever carries secret material.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZkpopError {
    /// Encoded data has the wrong length.
    #[error("Invalid encoding length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected byte length for the declared parameter set.
        expected: usize,
        /// Byte length actually supplied.
        actual: usize,
    },

    /// The proof declares a wire-format version this build does not speak.
    #[error("Unsupported proof version: {0}")]
    UnsupportedVersion(u8),

    /// The proof declares a parameter identifier no known set uses.
    #[error("Unknown parameter identifier: {0}")]
    UnknownParameterId(u8),

    /// An encoded coefficient lies outside its permitted range.
    #[error("Encoded coefficient out of range in {field}")]
    CoefficientOutOfRange {
        /// Which encoded field carried the offending coefficient.
        field: &'static str,
    },

    /// Key, proof, or matrix declare incompatible parameter sets.
    #[error("Parameter mismatch: expected {expected}, got {actual}")]
    ParameterMismatch {
        /// Parameter set the operation was invoked for.
        expected: &'static str,
        /// Parameter set the offending artifact declares.
        actual: &'static str,
    },

    /// The abort/retry sampling loop exceeded its iteration ceiling.
    ///
    /// Vanishingly rare with correctly chosen parameters; the whole
    /// generation call may simply be retried.
    #[error("Proof generation failed after {attempts} sampling iterations")]
    ProofGenerationFailure {
        /// Number of sampling iterations performed before giving up.
        attempts: u32,
    },
}

impl ZkpopError {
    /// Whether this error is a format error (malformed or wrong-length
    /// encoded data), as opposed to a parameter mismatch or a generation
    /// failure.
    ///
    /// Format errors are always recoverable by the caller: reject the
    /// artifact and request regeneration.
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            ZkpopError::InvalidLength { .. }
                | ZkpopError::UnsupportedVersion(_)
                | ZkpopError::UnknownParameterId(_)
                | ZkpopError::CoefficientOutOfRange { .. }
        )
    }
}

/// Outcome of verifying a well-formed proof.
///
/// `Reject` is a definite negative verdict on a well-formed proof and is
/// deliberately distinct from the error type: a malformed proof never
/// reaches the cryptographic checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// All repetitions verified; the prover possesses the secret key.
    Accept,
    /// At least one repetition failed its algebraic or norm check.
    Reject,
}

impl Verdict {
    /// Whether the verdict is [`Verdict::Accept`].
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}
