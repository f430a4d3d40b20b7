// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # sealkey — Core Library
//!
//! Key material for a file-encryption identity scheme: X25519 key pairs,
//! their canonical Bech32 text form, and the identity files that store them.
//! Strings produced here are interchangeable with `age` keys.
//!
//! ## Architecture
//!
//! - **config** — Format constants. Fixed forever.
//! - **encoding** — Bech32 encode/decode with a typed prefix.
//! - **crypto** — Secret/public keys and key generation.
//! - **identity** — Identities, recipients, and identity files.
//!
//! ## Example
//!
//! ```
//! use sealkey_protocol::identity::{parse_identities, Identity};
//!
//! let id = Identity::generate().unwrap();
//! let file = format!("# a comment\n{}\n", id.secret_string());
//!
//! let parsed = parse_identities(file.as_bytes()).unwrap();
//! assert_eq!(parsed[0].recipient_string(), id.recipient_string());
//! ```

pub mod config;
pub mod crypto;
pub mod encoding;
pub mod identity;

pub use crypto::keys::{GenerationError, PublicKey, SecretKey};
pub use encoding::{decode, encode, DecodeError, KeyTag};
pub use identity::{Identity, ParseError, Recipient};
