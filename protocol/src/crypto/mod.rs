//! # Cryptographic Primitives
//!
//! Everything here is a thin, type-safe wrapper around audited
//! implementations:
//!
//! - **X25519** scalar multiplication from `x25519-dalek`.
//! - Scalar clamping from `curve25519-dalek`.
//! - Randomness from the operating system via `rand`'s `OsRng`.
//!
//! Nothing in this module logs key bytes, and nothing ever will.

pub mod keys;

pub use keys::{clamp, GenerationError, PublicKey, SecretKey};
