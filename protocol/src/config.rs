//! # Protocol Configuration & Constants
//!
//! Every fixed value of the key format lives here. These constants are part
//! of the on-disk format: existing identity files and recipient strings
//! depend on them bit for bit, so they never change.

// ---------------------------------------------------------------------------
// Key Encoding Tags
// ---------------------------------------------------------------------------

/// Bech32 human-readable prefix for secret keys. Emitted in uppercase.
pub const SECRET_KEY_HRP: &str = "AGE-SECRET-KEY-";

/// Bech32 human-readable prefix for recipients (public keys). Emitted in
/// lowercase.
pub const RECIPIENT_HRP: &str = "age";

/// The Bech32 separator between the prefix and the data part.
pub const BECH32_SEPARATOR: char = '1';

// ---------------------------------------------------------------------------
// Key Material
// ---------------------------------------------------------------------------

/// X25519 scalar length in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// X25519 Montgomery u-coordinate length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Identity Files
// ---------------------------------------------------------------------------

/// Lines starting with this marker are comments.
pub const COMMENT_MARKER: char = '#';

/// Upper bound on the size of an identity or recipients file (16 MiB).
/// Anything larger is not a key file.
pub const IDENTITY_FILE_SIZE_LIMIT: u64 = 1 << 24;

/// Header comment prefix carrying the creation timestamp.
pub const CREATED_COMMENT: &str = "# created: ";

/// Header comment prefix carrying the recipient, for the reader's benefit
/// only. Never parsed back.
pub const PUBLIC_KEY_COMMENT: &str = "# public key: ";
