//! # Key Encoding
//!
//! Canonical text form for 32-byte keys: Bech32 (BIP-173, *not* Bech32m)
//! with a human-readable prefix that says what kind of key follows.
//!
//! ```text
//! secret key: AGE-SECRET-KEY-1 <52 data symbols> <6 checksum symbols>
//! recipient : age1 <52 data symbols> <6 checksum symbols>
//! ```
//!
//! Secret keys are written in uppercase and recipients in lowercase.
//! Decoding accepts either case, but never a mixture of both (BIP-173).

use bech32::primitives::decode::UncheckedHrpstring;
use bech32::{Bech32, Hrp};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{BECH32_SEPARATOR, RECIPIENT_HRP, SECRET_KEY_HRP};

/// Length of the Bech32 checksum, in data symbols.
const CHECKSUM_LENGTH: usize = 6;

/// Payload length every key string must decode to.
const PAYLOAD_LENGTH: usize = 32;

/// Longest prefix BIP-173 allows.
const MAX_HRP_LENGTH: usize = 83;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a key string was rejected.
///
/// Messages never echo the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The string carries a different prefix than the one expected.
    #[error("wrong key type: expected prefix '{}', found '{found}'", .expected.hrp())]
    WrongTag {
        /// The tag the caller asked for.
        expected: KeyTag,
        /// The prefix actually present, lowercased.
        found: String,
    },

    /// Not a well-formed Bech32 string.
    #[error("malformed key string: {0}")]
    Malformed(&'static str),

    /// Structurally valid, but the checksum does not match the contents.
    #[error("checksum mismatch")]
    BadChecksum,

    /// Checksum is fine but the payload is not a 32-byte key.
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    WrongLength {
        /// Required payload length.
        expected: usize,
        /// Decoded payload length.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// KeyTag
// ---------------------------------------------------------------------------

/// The two key namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyTag {
    /// X25519 secret scalar, `AGE-SECRET-KEY-1...`.
    Secret,
    /// X25519 public key, `age1...`.
    Recipient,
}

impl KeyTag {
    /// The human-readable prefix in its canonical case.
    pub fn hrp(self) -> &'static str {
        match self {
            KeyTag::Secret => SECRET_KEY_HRP,
            KeyTag::Recipient => RECIPIENT_HRP,
        }
    }

    /// Guess the namespace of an unknown string from its prefix alone.
    ///
    /// This does not validate anything past the prefix; use [`decode`] for
    /// that.
    pub fn classify(s: &str) -> Option<KeyTag> {
        let lower = s.to_ascii_lowercase();
        [KeyTag::Secret, KeyTag::Recipient]
            .into_iter()
            .find(|tag| lower.starts_with(&tag.lowercase_prefix()))
    }

    fn lowercase_prefix(self) -> String {
        format!("{}{}", self.hrp().to_ascii_lowercase(), BECH32_SEPARATOR)
    }

    fn bech32_hrp(self) -> Hrp {
        Hrp::parse(self.hrp()).expect("static HRP is valid")
    }
}

impl fmt::Display for KeyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyTag::Secret => write!(f, "secret key"),
            KeyTag::Recipient => write!(f, "recipient"),
        }
    }
}

// ---------------------------------------------------------------------------
// Encode / Decode
// ---------------------------------------------------------------------------

/// Encode a 32-byte key under `tag`.
///
/// The checksum is recomputed on every call.
pub fn encode(tag: KeyTag, payload: &[u8; 32]) -> String {
    let hrp = tag.bech32_hrp();
    let encoded = match tag {
        KeyTag::Secret => bech32::encode_upper::<Bech32>(hrp, payload),
        KeyTag::Recipient => bech32::encode_lower::<Bech32>(hrp, payload),
    };
    encoded.expect("encoding a 32-byte payload should never fail")
}

/// Decode a key string that must carry `tag`.
///
/// Checks, in order: prefix, case consistency, Bech32 structure, checksum,
/// payload length, and canonical padding. The first failure wins.
pub fn decode(tag: KeyTag, s: &str) -> Result<[u8; 32], DecodeError> {
    if KeyTag::classify(s) != Some(tag) {
        return Err(DecodeError::WrongTag {
            expected: tag,
            found: found_prefix(s),
        });
    }
    if has_mixed_case(s) {
        return Err(DecodeError::Malformed("mixed-case string"));
    }
    let normalized = Zeroizing::new(s.to_ascii_lowercase());

    // Anything shorter than a checksum cannot even be verified.
    match normalized.rsplit_once(BECH32_SEPARATOR) {
        Some((hrp, _)) if hrp != tag.hrp().to_ascii_lowercase() => {
            return Err(DecodeError::Malformed("separator inside data part"));
        }
        Some((_, data)) if data.len() >= CHECKSUM_LENGTH => {}
        _ => return Err(DecodeError::Malformed("data part shorter than checksum")),
    }

    let unchecked = UncheckedHrpstring::new(&normalized)
        .map_err(|_| DecodeError::Malformed("invalid Bech32 structure or symbol"))?;

    let checked = unchecked
        .validate_and_remove_checksum::<Bech32>()
        .map_err(|_| DecodeError::BadChecksum)?;

    let bytes = Zeroizing::new(checked.byte_iter().collect::<Vec<u8>>());
    if bytes.len() != PAYLOAD_LENGTH {
        return Err(DecodeError::WrongLength {
            expected: PAYLOAD_LENGTH,
            got: bytes.len(),
        });
    }
    let mut payload = [0u8; 32];
    payload.copy_from_slice(&bytes);

    // Trailing pad bits must be zero: exactly one string per key.
    let canonical = Zeroizing::new(encode(tag, &payload).to_ascii_lowercase());
    if *canonical != *normalized {
        return Err(DecodeError::Malformed("non-zero padding bits"));
    }

    Ok(payload)
}

/// The lowercased text before the last separator, if it could be a Bech32
/// prefix at all. Anything else reports as empty rather than echo the input.
fn found_prefix(s: &str) -> String {
    match s.rsplit_once(BECH32_SEPARATOR) {
        Some((hrp, _))
            if !hrp.is_empty()
                && hrp.len() <= MAX_HRP_LENGTH
                && hrp.bytes().all(|b| (33..=126).contains(&b)) =>
        {
            hrp.to_ascii_lowercase()
        }
        _ => String::new(),
    }
}

fn has_mixed_case(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_lowercase()) && s.bytes().any(|b| b.is_ascii_uppercase())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
