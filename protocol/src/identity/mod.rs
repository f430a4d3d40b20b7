//! # Identity Module
//!
//! X25519 identities and the text files that hold them.
//!
//! The identity stack is layered:
//!
//! 1. **x25519** — [`Identity`] (secret key + derived public key) and
//!    [`Recipient`] (public key only), with their canonical string forms.
//! 2. **file** — identity files and recipients files: comment-tolerant,
//!    line-oriented, all-or-nothing parsing, plus the matching writers.
//!
//! ## Design Decisions
//!
//! - One identity type, not a trait hierarchy. The only polymorphism in the
//!   format is the prefix, and that is a two-variant [`KeyTag`](crate::encoding::KeyTag).
//! - Identities are not `Clone`. Moving one around is fine; duplicating
//!   secret material should be a visible decision.

pub mod file;
pub mod x25519;

pub use file::{parse_identities, parse_recipients, write_identity, write_recipients, ParseError};
pub use x25519::{Identity, Recipient};
