//! Response computation and the rejection-sampling acceptance test.
//!
//! A candidate response pair is `z = y + c·s`, `z' = y' + c·e` over the
//! integers. It is kept only when both infinity norms are at most `gamma`;
//! otherwise the prover discards the whole attempt and restarts from fresh
//! masking randomness. Conditioned on acceptance, each coefficient of an
//! accepted response is uniform on `[-gamma, gamma]` whatever the secret
//! is — this is the zero-knowledge argument, so the bound check must not
//! leak which coefficient tripped it.

use subtle::Choice;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algebra::PolyVec;
use crate::commit::Masking;
use crate::keys::SecretKey;
use crate::params::ParameterSet;

/// One repetition's candidate response pair, with its acceptance flag.
///
/// Secret-derived until accepted into a proof; zeroized on drop so rejected
/// candidates and abandoned generation calls leave no residue.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct Candidate {
    z: PolyVec,
    z_err: PolyVec,
    #[zeroize(skip)]
    accepted: Choice,
}

impl Candidate {
    /// Computes the candidate for one repetition and runs the acceptance
    /// test.
    ///
    /// The norm check inspects every coefficient of both vectors before the
    /// verdict is formed; acceptance itself is public information (the abort
    /// pattern is part of the protocol), but its timing must not depend on
    /// where a violation sits.
    pub(crate) fn compute(
        masking: &Masking,
        challenge: i32,
        secret_key: &SecretKey,
        params: &ParameterSet,
    ) -> Self {
        let z = masking.y().add(&secret_key.s().scaled(challenge));
        let z_err = masking.y_err().add(&secret_key.e().scaled(challenge));
        let gamma = params.gamma();
        let accepted = !(z.exceeds_bound(gamma) | z_err.exceeds_bound(gamma));
        Self { z, z_err, accepted }
    }

    /// Whether the rejection-sampling test passed.
    pub(crate) fn accepted(&self) -> Choice {
        self.accepted
    }

    /// Moves the response pair out, leaving zeroizable empty vectors behind.
    ///
    /// Only called for accepted candidates when the whole proof attempt
    /// succeeded.
    pub(crate) fn take_responses(&mut self) -> (PolyVec, PolyVec) {
        (std::mem::take(&mut self.z), std::mem::take(&mut self.z_err))
    }
}
