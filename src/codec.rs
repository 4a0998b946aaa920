//! Wire format for encoded proofs.
//!
//! An encoded proof is laid out as
//!
//! ```text
//! [ version (1B) ][ param-id (1B) ][ t commitments ][ t response pairs ]
//! ```
//!
//! with every section a fixed width determined by the declared parameter
//! set. Commitments pack 12 bits per coefficient; responses pack 18 bits per
//! coefficient as the shifted value `gamma - z`. Decoding is fail-fast and
//! runs its checks in a fixed order: minimum length, version, parameter
//! identifier, exact total length, then coefficient range checks. A proof
//! that decodes successfully is *well-formed*; whether it verifies is a
//! separate question answered by the verifier.

use crate::algebra::PolyVec;
use crate::error::{Result, ZkpopError};
use crate::params::{SecurityLevel, PROOF_VERSION};

/// Offset of the first commitment byte, after the version and parameter-id
/// header.
const HEADER_BYTES: usize = 2;

/// A decoded, well-formed proof of possession.
///
/// All contents are public protocol messages; nothing here is
/// secret-derived.
#[derive(Debug, Clone)]
pub struct Proof {
    level: SecurityLevel,
    commitments: Vec<PolyVec>,
    responses: Vec<(PolyVec, PolyVec)>,
}

impl Proof {
    pub(crate) fn new(
        level: SecurityLevel,
        commitments: Vec<PolyVec>,
        responses: Vec<(PolyVec, PolyVec)>,
    ) -> Self {
        debug_assert_eq!(commitments.len(), level.params().reps);
        debug_assert_eq!(responses.len(), level.params().reps);
        Self { level, commitments, responses }
    }

    /// The security level this proof declares.
    #[must_use]
    pub fn security_level(&self) -> SecurityLevel {
        self.level
    }

    /// The ordered commitment list, one vector per repetition.
    #[must_use]
    pub fn commitments(&self) -> &[PolyVec] {
        &self.commitments
    }

    /// The response pairs `(z, z')`, one per repetition.
    #[must_use]
    pub fn responses(&self) -> &[(PolyVec, PolyVec)] {
        &self.responses
    }

    /// Serializes the proof into its fixed-width wire encoding.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let params = self.level.params();
        let gamma = params.gamma();
        let mut out = vec![0u8; params.proof_bytes()];
        out[0] = PROOF_VERSION;
        out[1] = params.param_id;

        let mut offset = HEADER_BYTES;
        for w in &self.commitments {
            w.pack_modq(&mut out[offset..offset + params.commitment_bytes()]);
            offset += params.commitment_bytes();
        }
        let half = params.response_bytes() / 2;
        for (z, z_err) in &self.responses {
            z.pack_response(gamma, &mut out[offset..offset + half]);
            offset += half;
            z_err.pack_response(gamma, &mut out[offset..offset + half]);
            offset += half;
        }
        debug_assert_eq!(offset, out.len());
        out
    }

    /// Parses and validates an encoded proof.
    ///
    /// Checks run in order: the two-byte header must be present, the version
    /// must be the one this build emits, the parameter identifier must name
    /// a known set, the total length must match that set exactly, and every
    /// encoded coefficient must lie in its permitted range. The first
    /// violation is reported; later ones are not examined.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_BYTES {
            return Err(ZkpopError::InvalidLength { expected: HEADER_BYTES, actual: bytes.len() });
        }
        if bytes[0] != PROOF_VERSION {
            return Err(ZkpopError::UnsupportedVersion(bytes[0]));
        }
        let level = SecurityLevel::from_param_id(bytes[1])
            .ok_or(ZkpopError::UnknownParameterId(bytes[1]))?;
        let params = level.params();
        if bytes.len() != params.proof_bytes() {
            return Err(ZkpopError::InvalidLength {
                expected: params.proof_bytes(),
                actual: bytes.len(),
            });
        }

        let gamma = params.gamma();
        let mut offset = HEADER_BYTES;
        let commitments = (0..params.reps)
            .map(|_| {
                let chunk = &bytes[offset..offset + params.commitment_bytes()];
                offset += params.commitment_bytes();
                PolyVec::unpack_modq(chunk, params.k, "commitment")
            })
            .collect::<Result<Vec<_>>>()?;
        let half = params.response_bytes() / 2;
        let responses = (0..params.reps)
            .map(|_| {
                let z = PolyVec::unpack_response(
                    &bytes[offset..offset + half],
                    params.k,
                    gamma,
                    "response",
                )?;
                offset += half;
                let z_err = PolyVec::unpack_response(
                    &bytes[offset..offset + half],
                    params.k,
                    gamma,
                    "error response",
                )?;
                offset += half;
                Ok((z, z_err))
            })
            .collect::<Result<Vec<_>>>()?;
        debug_assert_eq!(offset, bytes.len());

        Ok(Self { level, commitments, responses })
    }
}
