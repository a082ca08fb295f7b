//! Password-based key derivation using PBKDF2 with HMAC-SHA256
//!
//! The salt is a fixed, process-wide constant rather than a per-file random
//! value. Two users sharing a password therefore share a key, and one
//! precomputed table covers every installation. This is a known weakness; it
//! stays because every image encoded so far was sealed with keys derived from
//! exactly these parameters, and changing any of them makes those images
//! undecodable.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::common::error::{CypherError, Result};

/// Salt mixed into every derivation.
pub const KDF_SALT: &[u8] = b"ImageCypherSalt";

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Derived key length in bytes (16 signing + 16 encryption).
pub const KEY_LENGTH: usize = 32;

const SIGNING_KEY_LENGTH: usize = 16;

/// A 256-bit key derived from a password.
///
/// The first half authenticates tokens (HMAC-SHA256), the second half
/// encrypts them (AES-128-CBC). Key bytes are wiped on drop and never shown
/// by `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LENGTH]);

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parse the textual (URL-safe base64) key form.
    ///
    /// # Errors
    /// [`CypherError::Validation`] if the text is not base64 or does not
    /// decode to exactly 32 bytes.
    pub fn from_encoded(encoded: &str) -> Result<Self> {
        let decoded = Zeroizing::new(
            URL_SAFE
                .decode(encoded.trim())
                .map_err(|e| CypherError::Validation(format!("malformed key: {}", e)))?,
        );

        if decoded.len() != KEY_LENGTH {
            return Err(CypherError::Validation(format!(
                "malformed key: expected {} bytes, got {}",
                KEY_LENGTH,
                decoded.len()
            )));
        }

        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&decoded);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    /// Textual key form expected by Fernet implementations.
    pub fn encoded(&self) -> String {
        URL_SAFE.encode(self.0)
    }

    pub(crate) fn signing_key(&self) -> &[u8] {
        &self.0[..SIGNING_KEY_LENGTH]
    }

    pub(crate) fn encryption_key(&self) -> &[u8] {
        &self.0[SIGNING_KEY_LENGTH..]
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(<redacted>)")
    }
}

/// Derive the encryption key for `password`.
///
/// Deterministic: the same password always yields the same key.
///
/// # Example
/// ```ignore
/// let key = derive_key("correct horse battery staple");
/// let codec = PayloadCodec::new(key);
/// ```
pub fn derive_key(password: &str) -> DerivedKey {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), KDF_SALT, KDF_ITERATIONS, &mut key);
    let derived = DerivedKey(key);
    key.zeroize();
    derived
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference keys computed with Python `cryptography`'s PBKDF2HMAC using
    // the same salt, iteration count and length.
    const PW1_KEY: &str = "xoVq6JjURqn7CQe4764GysraZh8l3FjCIRisymMCGto=";
    const PW2_KEY: &str = "A2nfzNEwYHd_ACtEjhPIAc7W7qFvqgTprEV_C1jmiqk=";

    #[test]
    fn test_known_answer_vectors() {
        assert_eq!(derive_key("pw1").encoded(), PW1_KEY);
        assert_eq!(derive_key("pw2").encoded(), PW2_KEY);
    }

    #[test]
    fn test_raw_bytes_match_reference() {
        let key = derive_key("hunter2");
        assert_eq!(key.as_bytes()[..4], [0x1b, 0xbb, 0x13, 0xf7]);
        assert_eq!(key.as_bytes()[28..], [0x8d, 0x06, 0x06, 0xce]);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(derive_key("same"), derive_key("same"));
    }

    #[test]
    fn test_different_passwords_differ() {
        assert_ne!(derive_key("alpha"), derive_key("alphb"));
    }

    #[test]
    fn test_encoded_roundtrip() {
        let key = DerivedKey::from_encoded(PW1_KEY).unwrap();
        assert_eq!(key.encoded(), PW1_KEY);
        assert_eq!(key.signing_key().len(), 16);
        assert_eq!(key.encryption_key().len(), 16);
        assert_eq!(key.signing_key(), &key.as_bytes()[..16]);
    }

    #[test]
    fn test_encoded_rejects_wrong_length() {
        let short = URL_SAFE.encode([7u8; 16]);
        assert!(matches!(
            DerivedKey::from_encoded(&short),
            Err(CypherError::Validation(_))
        ));
        assert!(DerivedKey::from_encoded("***not base64***").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = DerivedKey::from_bytes([0xAB; KEY_LENGTH]);
        let shown = format!("{:?}", key);
        assert!(!shown.to_lowercase().contains("ab, "));
        assert!(shown.contains("redacted"));
    }
}
