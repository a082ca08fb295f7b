//! # Payload Codec
//!
//! Authenticated encryption of the hidden message using the Fernet token
//! format:
//!
//! ```text
//! base64url( 0x80 | timestamp (u64 BE) | IV (16) | AES-128-CBC-PKCS7(plaintext) | HMAC-SHA256 (32) )
//! ```
//!
//! The HMAC covers everything before it and is checked before any decryption
//! happens, so a wrong password and a damaged carrier both surface as
//! [`CypherError::Authentication`]. There is no other password check.
//!
//! Tokens are plain ASCII, and their bytes are what gets embedded in the
//! image.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes128;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use log::debug;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::common::error::{CypherError, Result};
use crate::encryption::key_derivation::{derive_key, DerivedKey};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: u8 = 0x80;
const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;
const TAG_LEN: usize = 32;
const BLOCK_LEN: usize = 16;

/// A successfully verified and decrypted token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedPayload {
    /// The recovered message bytes
    pub plaintext: Vec<u8>,
    /// When the token was sealed, if the stored timestamp is representable
    pub issued_at: Option<DateTime<Utc>>,
}

/// Seals and opens payload tokens under one derived key.
#[derive(Debug, Clone)]
pub struct PayloadCodec {
    key: DerivedKey,
}

impl PayloadCodec {
    pub fn new(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Derive the key from `password` and build a codec around it.
    pub fn from_password(password: &str) -> Self {
        Self::new(derive_key(password))
    }

    /// Encrypt and authenticate `plaintext`.
    ///
    /// A fresh random IV and the current time go into every token, so two
    /// calls with the same input never produce the same output.
    ///
    /// # Returns
    /// - `Ok(Vec<u8>)`: The ASCII token bytes
    /// - `Err`: Only if the signing key is rejected by HMAC, which cannot
    ///   happen for a 16-byte key
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        let timestamp = u64::try_from(Utc::now().timestamp()).unwrap_or(0);

        self.encrypt_with_parts(plaintext, timestamp, &iv)
    }

    fn encrypt_with_parts(&self, plaintext: &[u8], timestamp: u64, iv: &[u8; IV_LEN]) -> Result<Vec<u8>> {
        let ciphertext = Aes128CbcEnc::new(
            GenericArray::from_slice(self.key.encryption_key()),
            GenericArray::from_slice(iv),
        )
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + TAG_LEN);
        token.push(TOKEN_VERSION);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(iv);
        token.extend_from_slice(&ciphertext);

        let mut mac = self.mac()?;
        mac.update(&token);
        token.extend_from_slice(&mac.finalize().into_bytes());

        Ok(URL_SAFE.encode(&token).into_bytes())
    }

    /// Verify and decrypt a token.
    ///
    /// # Errors
    /// [`CypherError::Authentication`] for anything that is not a valid
    /// token under this key: bad base64, wrong version byte, truncation, tag
    /// mismatch or broken padding.
    pub fn decrypt(&self, token: &[u8]) -> Result<Vec<u8>> {
        self.open(token).map(|opened| opened.plaintext)
    }

    /// Like [`decrypt`](Self::decrypt), also returning the sealing time.
    pub fn open(&self, token: &[u8]) -> Result<OpenedPayload> {
        let data = URL_SAFE
            .decode(token)
            .map_err(|_| CypherError::Authentication)?;

        if data.len() < HEADER_LEN + TAG_LEN || data[0] != TOKEN_VERSION {
            debug!("Token rejected: malformed header ({} bytes)", data.len());
            return Err(CypherError::Authentication);
        }

        let (signed, tag) = data.split_at(data.len() - TAG_LEN);
        let mut mac = self.mac()?;
        mac.update(signed);
        mac.verify_slice(tag).map_err(|_| {
            debug!("Token rejected: HMAC mismatch");
            CypherError::Authentication
        })?;

        let mut timestamp = [0u8; TIMESTAMP_LEN];
        timestamp.copy_from_slice(&signed[1..1 + TIMESTAMP_LEN]);
        let timestamp = u64::from_be_bytes(timestamp);

        let iv = &signed[1 + TIMESTAMP_LEN..HEADER_LEN];
        let plaintext = Aes128CbcDec::new(
            GenericArray::from_slice(self.key.encryption_key()),
            GenericArray::from_slice(iv),
        )
        .decrypt_padded_vec_mut::<Pkcs7>(&signed[HEADER_LEN..])
        .map_err(|_| CypherError::Authentication)?;

        let issued_at = i64::try_from(timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        Ok(OpenedPayload {
            plaintext,
            issued_at,
        })
    }

    /// Exact token length for a plaintext of `plaintext_len` bytes.
    ///
    /// Lets callers check carrier capacity before paying for key derivation.
    pub fn token_len(plaintext_len: usize) -> usize {
        let padded = (plaintext_len / BLOCK_LEN + 1) * BLOCK_LEN;
        let raw = HEADER_LEN + padded + TAG_LEN;
        (raw + 2) / 3 * 4
    }

    fn mac(&self) -> Result<HmacSha256> {
        <HmacSha256 as Mac>::new_from_slice(self.key.signing_key())
            .map_err(|e| CypherError::Validation(format!("invalid signing key: {}", e)))
    }
}
