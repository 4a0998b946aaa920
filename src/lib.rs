#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

//! Non-interactive zero-knowledge proof of possession for module-LWE key
//! pairs.
//!
//! A holder of a module-LWE secret key `(s, e)` with public key
//! `t = A·s + e (mod q)` can produce a proof that convinces anyone holding
//! the public key that the prover possesses the witness, without revealing
//! anything about it. The construction is a Fiat-Shamir-transformed Sigma
//! protocol with aborts, repeated `t` times for soundness amplification, over
//! the ring `Z_q[X]/(X^256 + 1)` with `q = 3329`.
//!
//! # Protocol Flow
//! 1. **Commit**: for each repetition, draw a masking pair `(y, y')` and
//!    commit to `w = A·y + y' (mod q)`.
//! 2. **Challenge**: derive all scalar challenges from a SHAKE-256
//!    transcript over the public key, an application-chosen context string,
//!    and the complete commitment list.
//! 3. **Respond**: compute `z = y + c·s`, `z' = y' + c·e` and keep the
//!    attempt only if every repetition's norms stay within the rejection
//!    bound; otherwise restart with fresh masking for all repetitions.
//!
//! The verifier re-derives the challenges and checks
//! `A·z + z' ≡ w + c·t (mod q)` plus the norm bounds for every repetition.
//!
//! # Example
//!
//! ```no_run
//! use arc_zkpop::{generate_keypair, generate_proof, verify_proof, SecurityLevel};
//!
//! # fn main() -> arc_zkpop::Result<()> {
//! let mut rng = rand::thread_rng();
//! let (public_key, secret_key) = generate_keypair(&mut rng, SecurityLevel::Level1)?;
//!
//! let context = b"device-enrollment/2026-08";
//! let proof = generate_proof(&mut rng, &public_key, &secret_key, context)?;
//!
//! let verdict = verify_proof(&public_key, context, &proof.to_bytes())?;
//! assert!(verdict.is_accept());
//! # Ok(())
//! # }
//! ```
//!
//! # Sizes (Level1)
//! - Public key: 800 bytes
//! - Proof: 2 + 16 · (768 + 2304) = 49,154 bytes
//!
//! # Security Properties
//! - Proof generation is constant-time with respect to the secret key; the
//!   abort pattern is public by design of the protocol.
//! - All secret intermediates (masking vectors, rejected candidates, noise
//!   seeds) are zeroized on every exit path.
//! - Randomness is injected: every sampling operation takes a caller-chosen
//!   [`rand::RngCore`] + [`rand::CryptoRng`] source.

pub mod algebra;
mod challenge;
pub mod codec;
mod commit;
pub mod error;
pub mod keys;
pub mod params;
pub mod prover;
mod response;
pub mod verifier;

pub use algebra::PublicMatrix;
pub use codec::Proof;
pub use error::{Result, Verdict, ZkpopError};
pub use keys::{generate_keypair, PublicKey, SecretKey};
pub use params::{ParameterSet, SecurityLevel, PROOF_VERSION};
pub use prover::{generate_proof, generate_proof_with_matrix, generate_with_config, ProverConfig};
pub use verifier::{verify_proof, verify_proof_with_matrix};
