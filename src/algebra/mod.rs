//! Modular polynomial arithmetic over the ring of the key-encapsulation
//! scheme, `Z_q[X]/(X^n + 1)` with `n = 256` and `q = 3329`.
//!
//! Everything above this layer consumes it: commitments, responses, the
//! verifier's relation checks, and the wire codec. Operations touching
//! secret-derived values avoid secret-dependent branches and memory access
//! patterns; range violations during decoding are format errors, while
//! arithmetic misuse (rank mismatches between operands) is a programming
//! error and panics via `debug_assert!` in debug builds.

pub mod matrix;
pub mod poly;
pub mod polyvec;

pub use matrix::PublicMatrix;
pub use poly::Poly;
pub use polyvec::PolyVec;
