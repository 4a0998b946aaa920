//! Parameter sets for the proof of possession.
//!
//! All parameter sets share the ring `Z_q[X]/(X^n + 1)` with `n = 256` and
//! `q = 3329` (the ring of the underlying module-LWE key-encapsulation
//! scheme). A set fixes the module rank `k`, the noise bound `eta`, the
//! repetition count `t`, the challenge magnitude bound `c_max`, and the
//! masking range, which together determine the response bound `gamma` and
//! every wire-format size.
//!
//! # Security Levels
//! - **Level1**: rank 2, 16 repetitions (NIST category 1 key pairs)
//! - **Level3**: rank 3, 24 repetitions (NIST category 3 key pairs)
//! - **Level5**: rank 4, 32 repetitions (NIST category 5 key pairs)
//!
//! Per-repetition soundness is `1 / (2·c_max + 1)`; `t` repetitions amplify
//! it to `(2·c_max + 1)^-t`.

use subtle::{Choice, ConstantTimeEq};

use crate::algebra::poly::{PACKED_MODQ_BYTES, PACKED_RESPONSE_BYTES};

/// Wire-format version emitted and accepted by the proof codec.
pub const PROOF_VERSION: u8 = 1;

/// Security level selecting a fixed parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    /// Rank-2 module, 16 repetitions.
    Level1,
    /// Rank-3 module, 24 repetitions.
    Level3,
    /// Rank-4 module, 32 repetitions.
    Level5,
}

impl ConstantTimeEq for SecurityLevel {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Discriminant-based constant-time comparison for enums.
        let self_disc = *self as u8;
        let other_disc = *other as u8;
        self_disc.ct_eq(&other_disc)
    }
}

impl SecurityLevel {
    /// Returns the fixed parameter set for this level.
    #[must_use]
    pub const fn params(&self) -> &'static ParameterSet {
        match self {
            SecurityLevel::Level1 => &LEVEL1,
            SecurityLevel::Level3 => &LEVEL3,
            SecurityLevel::Level5 => &LEVEL5,
        }
    }

    /// Resolves a wire-format parameter identifier back to a level.
    #[must_use]
    pub const fn from_param_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(SecurityLevel::Level1),
            3 => Some(SecurityLevel::Level3),
            5 => Some(SecurityLevel::Level5),
            _ => None,
        }
    }

    /// Returns the name of the security level.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.params().name
    }
}

/// Immutable constants of one proof-of-possession parameter set.
///
/// Instances are compile-time constants; the engine never constructs or
/// mutates one at runtime.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Human-readable name.
    pub name: &'static str,
    /// Wire-format parameter identifier.
    pub param_id: u8,
    /// Module rank `k` (number of ring elements per vector).
    pub k: usize,
    /// Centered-binomial noise bound `eta` for the secret and error vectors.
    pub eta: i32,
    /// Repetition count `t` (soundness amplification).
    pub reps: usize,
    /// Challenge magnitude bound; challenges are uniform in `[-c_max, c_max]`.
    pub c_max: i32,
    /// Masking coefficients are uniform in `(-gamma_mask, gamma_mask]`.
    pub gamma_mask: i32,
}

impl ParameterSet {
    /// Worst-case growth `c_max · eta` a challenge adds to one coefficient.
    #[must_use]
    pub const fn beta(&self) -> i32 {
        self.c_max * self.eta
    }

    /// Response bound `gamma = gamma_mask - beta - 1`.
    ///
    /// Rejection sampling enforces `‖z‖∞ ≤ gamma`, which makes accepted
    /// responses uniform on `[-gamma, gamma]` independent of the secret.
    /// The bound sits strictly inside the masking range: masking draws come
    /// from the asymmetric `(-gamma_mask, gamma_mask]`, so with the looser
    /// `gamma_mask - beta` the value `-gamma` would be reachable only when
    /// the challenge-secret product falls short of `beta` — a
    /// secret-dependent skew at the boundary. One step of slack makes every
    /// value in `[-gamma, gamma]` reachable for every challenge.
    #[must_use]
    pub const fn gamma(&self) -> i32 {
        self.gamma_mask - self.beta() - 1
    }

    /// Size of the challenge space, `2·c_max + 1`.
    #[must_use]
    pub const fn challenge_space_size(&self) -> u32 {
        (2 * self.c_max + 1) as u32
    }

    /// Encoded size of one commitment vector (`k` mod-q polynomials).
    #[must_use]
    pub const fn commitment_bytes(&self) -> usize {
        self.k * PACKED_MODQ_BYTES
    }

    /// Encoded size of one repetition's response pair (`2k` polynomials).
    #[must_use]
    pub const fn response_bytes(&self) -> usize {
        2 * self.k * PACKED_RESPONSE_BYTES
    }

    /// Total encoded proof size for this parameter set.
    #[must_use]
    pub const fn proof_bytes(&self) -> usize {
        2 + self.reps * (self.commitment_bytes() + self.response_bytes())
    }

    /// Encoded public key size: seed `rho` plus the packed vector `t`.
    #[must_use]
    pub const fn public_key_bytes(&self) -> usize {
        32 + self.k * PACKED_MODQ_BYTES
    }

    /// Encoded secret key size: one byte per coefficient of `s` and `e`.
    #[must_use]
    pub const fn secret_key_bytes(&self) -> usize {
        2 * self.k * crate::algebra::poly::N
    }
}

/// Level1 parameter set: rank 2, `eta = 3`, 16 repetitions.
pub const LEVEL1: ParameterSet = ParameterSet {
    name: "ZKPoP-Level1",
    param_id: 1,
    k: 2,
    eta: 3,
    reps: 16,
    c_max: 8,
    gamma_mask: 1 << 17,
};

/// Level3 parameter set: rank 3, `eta = 2`, 24 repetitions.
pub const LEVEL3: ParameterSet = ParameterSet {
    name: "ZKPoP-Level3",
    param_id: 3,
    k: 3,
    eta: 2,
    reps: 24,
    c_max: 4,
    gamma_mask: 1 << 17,
};

/// Level5 parameter set: rank 4, `eta = 2`, 32 repetitions.
pub const LEVEL5: ParameterSet = ParameterSet {
    name: "ZKPoP-Level5",
    param_id: 5,
    k: 4,
    eta: 2,
    reps: 32,
    c_max: 4,
    gamma_mask: 1 << 17,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamma_stays_below_masking_range() {
        for level in [SecurityLevel::Level1, SecurityLevel::Level3, SecurityLevel::Level5] {
            let p = level.params();
            assert!(p.gamma() > 0);
            assert!(p.gamma() < p.gamma_mask);
            // 18-bit response packing requires the encoded range to fit.
            assert!(2 * p.gamma() < 1 << 18, "{} responses must pack in 18 bits", p.name);
        }
    }

    #[test]
    fn every_accepted_value_is_reachable_from_the_masking_range() {
        for level in [SecurityLevel::Level1, SecurityLevel::Level3, SecurityLevel::Level5] {
            let p = level.params();
            // z = y + c*s with c*s anywhere in [-beta, beta]; the preimage
            // y = z - c*s must lie in the sampling range (-gamma_mask,
            // gamma_mask] for every z in [-gamma, gamma].
            assert!(-p.gamma() - p.beta() >= -p.gamma_mask + 1, "{}", p.name);
            assert!(p.gamma() + p.beta() <= p.gamma_mask, "{}", p.name);
        }
    }

    #[test]
    fn param_id_roundtrip() {
        for level in [SecurityLevel::Level1, SecurityLevel::Level3, SecurityLevel::Level5] {
            let id = level.params().param_id;
            assert_eq!(SecurityLevel::from_param_id(id), Some(level));
        }
        assert_eq!(SecurityLevel::from_param_id(0), None);
        assert_eq!(SecurityLevel::from_param_id(7), None);
    }

    #[test]
    fn level1_concrete_sizes() {
        let p = LEVEL1;
        assert_eq!(p.reps, 16);
        assert_eq!(p.public_key_bytes(), 800);
        assert_eq!(p.commitment_bytes(), 768);
        assert_eq!(p.response_bytes(), 2304);
        assert_eq!(p.proof_bytes(), 2 + 16 * (768 + 2304));
    }

    #[test]
    fn challenge_space_sizes() {
        assert_eq!(LEVEL1.challenge_space_size(), 17);
        assert_eq!(LEVEL3.challenge_space_size(), 9);
        assert_eq!(LEVEL5.challenge_space_size(), 9);
    }
}
