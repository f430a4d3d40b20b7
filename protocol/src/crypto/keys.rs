//! # Key Management
//!
//! X25519 secret/public key types and key generation.
//!
//! A secret key is a 32-byte little-endian scalar. The public key is the
//! Montgomery u-coordinate of `scalar * basepoint`, where the scalar is
//! clamped first (RFC 7748 §5). Freshly generated scalars are stored
//! already clamped; scalars decoded from an existing identity are kept
//! exactly as they were written, since the scalar multiplication clamps
//! them anyway and re-encoding must reproduce the original string.
//!
//! ## Security considerations
//!
//! - Secret bytes are zeroized on drop.
//! - Randomness comes from the OS (`OsRng`). If the OS refuses to hand out
//!   entropy we fail; there is no fallback.
//! - `SecretKey` has no `Clone`, no `Display`, and its `Debug` is redacted.
//!   Key bytes are never logged.

use curve25519_dalek::scalar::clamp_integer;
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use x25519_dalek::{x25519, X25519_BASEPOINT_BYTES};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::SECRET_KEY_LENGTH;
use crate::encoding::{self, KeyTag};

/// Errors that can occur while generating key material.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The cryptographically secure random source could not deliver bytes.
    #[error("secure random source unavailable")]
    InsecureRandom(#[source] rand_core::Error),
}

/// Apply X25519 scalar clamping: clear the three low bits, clear the top bit,
/// set the second-highest bit.
pub fn clamp(bytes: [u8; 32]) -> [u8; 32] {
    clamp_integer(bytes)
}

// ---------------------------------------------------------------------------
// SecretKey
// ---------------------------------------------------------------------------

/// A 32-byte X25519 secret scalar.
///
/// Move-only on purpose. If you need a second copy, go through
/// [`as_bytes`](Self::as_bytes) and make it obvious in the diff.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: [u8; SECRET_KEY_LENGTH],
}

impl SecretKey {
    /// Generate a fresh, clamped secret key from the OS CSPRNG.
    pub fn generate() -> Result<Self, GenerationError> {
        Self::generate_from(&mut OsRng)
    }

    /// Generate a secret key from the given cryptographic RNG.
    ///
    /// A failing source yields [`GenerationError::InsecureRandom`], never a
    /// panic or a weak key.
    pub fn generate_from<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, GenerationError> {
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        rng.try_fill_bytes(&mut bytes[..]).map_err(|e| {
            tracing::error!(error = %e, "secure random source failed");
            GenerationError::InsecureRandom(e)
        })?;
        Ok(Self {
            bytes: clamp(*bytes),
        })
    }

    /// Wrap existing scalar bytes, unchanged.
    pub fn from_bytes(bytes: [u8; SECRET_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// The raw scalar bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.bytes
    }

    /// Derive the matching public key by fixed-base scalar multiplication.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            bytes: x25519(self.bytes, X25519_BASEPOINT_BYTES),
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// An X25519 public key (Montgomery u-coordinate).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    bytes: [u8; 32],
}

impl PublicKey {
    /// Wrap raw public key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Copy out the raw bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey({})",
            encoding::encode(KeyTag::Recipient, &self.bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// An entropy source that is always down.
    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            panic!("BrokenRng only supports try_fill_bytes")
        }

        fn next_u64(&mut self) -> u64 {
            panic!("BrokenRng only supports try_fill_bytes")
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("BrokenRng only supports try_fill_bytes")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
            Err(rand_core::Error::new("entropy source offline"))
        }
    }

    impl CryptoRng for BrokenRng {}

    fn is_clamped(bytes: &[u8; 32]) -> bool {
        bytes[0] & 0b0000_0111 == 0 && bytes[31] & 0b1000_0000 == 0 && bytes[31] & 0b0100_0000 != 0
    }

    #[test]
    fn clamp_sets_and_clears_the_right_bits() {
        let clamped = clamp([0xff; 32]);
        assert_eq!(clamped[0], 0xf8);
        assert_eq!(clamped[31], 0x7f);
        assert!(clamped[1..31].iter().all(|&b| b == 0xff));

        let zero = clamp([0u8; 32]);
        assert_eq!(zero[0], 0);
        assert_eq!(zero[31], 0x40);
    }

    #[test]
    fn clamp_is_idempotent() {
        let once = clamp([0xa5; 32]);
        assert_eq!(clamp(once), once);
    }

    #[test]
    fn generated_keys_are_clamped() {
        for _ in 0..32 {
            let sk = SecretKey::generate().unwrap();
            assert!(is_clamped(sk.as_bytes()));
        }
    }

    #[test]
    fn two_generated_keys_are_different() {
        let a = SecretKey::generate().unwrap();
        let b = SecretKey::generate().unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.public_key(), b.public_key());
    }

    #[test]
    fn seeded_rng_gives_reproducible_keys() {
        let a = SecretKey::generate_from(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = SecretKey::generate_from(&mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn broken_rng_is_insecure_random() {
        let err = SecretKey::generate_from(&mut BrokenRng).unwrap_err();
        assert!(matches!(err, GenerationError::InsecureRandom(_)));
        assert_eq!(err.to_string(), "secure random source unavailable");
    }

    #[test]
    fn rfc7748_public_key_vector() {
        // RFC 7748 §6.1, Alice.
        let mut scalar = [0u8; 32];
        scalar.copy_from_slice(
            &hex::decode("77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a")
                .unwrap(),
        );
        let pk = SecretKey::from_bytes(scalar).public_key();
        assert_eq!(
            hex::encode(pk.as_bytes()),
            "8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a"
        );
    }

    #[test]
    fn from_bytes_does_not_clamp() {
        let sk = SecretKey::from_bytes([0xff; 32]);
        assert_eq!(sk.as_bytes(), &[0xff; 32]);
        // Derivation clamps internally.
        assert_eq!(sk.public_key(), SecretKey::from_bytes(clamp([0xff; 32])).public_key());
    }

    #[test]
    fn derivation_is_deterministic() {
        let sk = SecretKey::generate().unwrap();
        let again = SecretKey::from_bytes(*sk.as_bytes());
        assert_eq!(sk.public_key(), again.public_key());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let sk = SecretKey::from_bytes([0x42; 32]);
        let debug_str = format!("{:?}", sk);
        assert_eq!(debug_str, "SecretKey(<redacted>)");
    }

    #[test]
    fn public_key_debug_shows_recipient() {
        let pk = SecretKey::from_bytes(clamp([0u8; 32])).public_key();
        assert_eq!(
            format!("{:?}", pk),
            "PublicKey(age19ljhmg68e43yx9fgm2k9lwefquc0la5y4lzvlshdjzv47kxt8d6qr9vf4p)"
        );
    }

    #[test]
    fn public_key_bytes_roundtrip() {
        let pk = SecretKey::generate().unwrap().public_key();
        assert_eq!(PublicKey::from_bytes(pk.to_bytes()), pk);
    }

    #[test]
    fn public_key_serde_json_roundtrip() {
        let pk = SecretKey::from_bytes(clamp([0u8; 32])).public_key();
        let json = serde_json::to_string(&pk).unwrap();
        assert!(json.starts_with("{\"bytes\":["));
        let recovered: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, pk);
        assert_eq!(recovered.as_bytes(), pk.as_bytes());
    }
}
