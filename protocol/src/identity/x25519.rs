//! # X25519 Identities and Recipients
//!
//! An [`Identity`] is what you keep: a secret key plus the public key derived
//! from it. A [`Recipient`] is what you hand out: the public key alone.
//!
//! ```text
//! Identity ── secret_string()    -> AGE-SECRET-KEY-1...
//!    │
//!    └─ recipient() ── to_string() -> age1...
//! ```
//!
//! The public key is derived once, at construction, and never mutated. Both
//! string forms are recomputed from bytes on every call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::keys::{GenerationError, PublicKey, SecretKey};
use crate::encoding::{self, DecodeError, KeyTag};
use rand_core::{CryptoRng, RngCore};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// An X25519 identity: a secret key bound to its derived public key.
///
/// Deliberately not `Clone` and not `Display`. Writing the secret key out is
/// an explicit call to [`secret_string`](Self::secret_string).
///
/// # Examples
///
/// ```
/// use sealkey_protocol::identity::Identity;
///
/// let id = Identity::generate().unwrap();
/// assert!(id.secret_string().starts_with("AGE-SECRET-KEY-1"));
/// assert!(id.recipient_string().starts_with("age1"));
///
/// let parsed: Identity = id.secret_string().parse().unwrap();
/// assert_eq!(parsed.recipient(), id.recipient());
/// ```
pub struct Identity {
    secret: SecretKey,
    recipient: Recipient,
}

impl Identity {
    /// Generate a fresh identity from the OS CSPRNG.
    pub fn generate() -> Result<Self, GenerationError> {
        SecretKey::generate().map(Self::from_secret_key)
    }

    /// Generate an identity from a caller-supplied cryptographic RNG.
    pub fn generate_from<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, GenerationError> {
        SecretKey::generate_from(rng).map(Self::from_secret_key)
    }

    /// Bind a secret key to its public key.
    pub fn from_secret_key(secret: SecretKey) -> Self {
        let recipient = Recipient::from_public_key(secret.public_key());
        Self { secret, recipient }
    }

    /// Build an identity from raw scalar bytes, used as-is.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self::from_secret_key(SecretKey::from_bytes(bytes))
    }

    /// The secret half.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// The derived public key.
    pub fn public_key(&self) -> PublicKey {
        self.recipient.public_key
    }

    /// The shareable half of this identity.
    pub fn recipient(&self) -> Recipient {
        self.recipient
    }

    /// Canonical recipient string, `age1...`.
    pub fn recipient_string(&self) -> String {
        self.recipient.to_string()
    }

    /// Canonical secret key string, `AGE-SECRET-KEY-1...`.
    pub fn secret_string(&self) -> String {
        encoding::encode(KeyTag::Secret, self.secret.as_bytes())
    }
}

impl FromStr for Identity {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        encoding::decode(KeyTag::Secret, s).map(Self::from_secret_bytes)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The recipient is enough to tell identities apart.
        write!(f, "Identity({})", self.recipient)
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// The public side of an [`Identity`]; safe to print, log, and share.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Recipient {
    public_key: PublicKey,
}

impl Recipient {
    /// Wrap a public key.
    pub fn from_public_key(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// The underlying X25519 public key.
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }
}

impl FromStr for Recipient {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = encoding::decode(KeyTag::Recipient, s)?;
        Ok(Self::from_public_key(PublicKey::from_bytes(bytes)))
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encoding::encode(
            KeyTag::Recipient,
            self.public_key.as_bytes(),
        ))
    }
}

impl fmt::Debug for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recipient({})", self)
    }
}

impl Serialize for Recipient {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(self.public_key.as_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Recipient {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                serde::de::Error::custom(format!("expected 32-byte public key, got {}", bytes.len()))
            })?;
            Ok(Self::from_public_key(PublicKey::from_bytes(bytes)))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
