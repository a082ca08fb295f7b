//! # Cypher Core
//!
//! The in-memory encode/decode pipeline. It works on pixel buffers (or raw
//! image bytes) and knows nothing about paths or files; that layer lives in
//! [`ImageCypher`](super::files::ImageCypher).
//!
//! ```text
//! encode: message -> validate -> derive key -> seal token -> embed -> pixels
//! decode: pixels -> extract token -> derive key -> open token -> message
//! ```

use log::{debug, info};

use crate::common::config::CypherConfig;
use crate::common::error::{CypherError, Result};
use crate::encryption::PayloadCodec;
use crate::processing::image_io::{self, PixelBuffer};
use crate::processing::steganography::{self, required_bits};

/// Stateless encode/decode pipeline with a message size limit.
#[derive(Debug, Clone)]
pub struct CypherCore {
    /// Largest accepted message in UTF-8 bytes
    max_message_bytes: usize,
}

impl CypherCore {
    pub fn new(max_message_bytes: usize) -> Self {
        Self { max_message_bytes }
    }

    pub fn from_config(config: &CypherConfig) -> Self {
        Self::new(config.limits.max_message_bytes)
    }

    pub fn max_message_bytes(&self) -> usize {
        self.max_message_bytes
    }

    /// Reject empty or oversized messages.
    pub fn validate_message(&self, message: &str) -> Result<()> {
        if message.is_empty() {
            return Err(CypherError::Validation(
                "The message cannot be empty".to_string(),
            ));
        }
        if message.len() > self.max_message_bytes {
            return Err(CypherError::Validation(format!(
                "The message must be at most {} KB (got {} bytes)",
                self.max_message_bytes / 1024,
                message.len()
            )));
        }
        Ok(())
    }

    /// Check that a message of `message_len` bytes fits once sealed.
    ///
    /// The token length is known in advance, so this runs before the
    /// (deliberately slow) key derivation.
    pub fn check_capacity(&self, pixels: &PixelBuffer, message_len: usize) -> Result<()> {
        let required = required_bits(PayloadCodec::token_len(message_len));
        let available = pixels.capacity_bits();
        if required > available {
            return Err(CypherError::CapacityExceeded {
                required,
                available,
            });
        }
        Ok(())
    }

    /// Encrypt `message` under `password` and hide it in `pixels`.
    ///
    /// # Arguments
    /// - `pixels`: Carrier, consumed and returned with the message embedded
    /// - `message`: Non-empty UTF-8 text within the size limit
    /// - `password`: Password the message is sealed with
    ///
    /// # Errors
    /// - [`CypherError::Validation`]: Empty or oversized message
    /// - [`CypherError::CapacityExceeded`]: Carrier too small; `pixels` is
    ///   dropped unmodified
    pub fn hide_message(&self, pixels: PixelBuffer, message: &str, password: &str) -> Result<PixelBuffer> {
        self.validate_message(message)?;
        self.check_capacity(&pixels, message.len())?;

        let codec = PayloadCodec::from_password(password);
        let token = codec.encrypt(message.as_bytes())?;
        info!(
            "🔒 Sealed {}-byte message into {}-byte token",
            message.len(),
            token.len()
        );

        steganography::embed(pixels, &token)
    }

    /// Extract and decrypt the message hidden in `pixels`.
    ///
    /// # Errors
    /// - [`CypherError::NoHiddenMessage`]: No terminator in the carrier
    /// - [`CypherError::Authentication`]: Wrong password or damaged carrier
    /// - [`CypherError::Validation`]: Decrypted bytes are not UTF-8
    pub fn reveal_message(&self, pixels: &PixelBuffer, password: &str) -> Result<String> {
        let token = steganography::extract(pixels)?;
        debug!("Extracted {}-byte token", token.len());

        let opened = PayloadCodec::from_password(password).open(&token)?;
        if let Some(issued_at) = opened.issued_at {
            info!("🔓 Message sealed at {}", issued_at.to_rfc3339());
        }

        String::from_utf8(opened.plaintext).map_err(|_| {
            CypherError::Validation("The decrypted message is not valid UTF-8 text".to_string())
        })
    }

    /// Byte-level variant of [`hide_message`](Self::hide_message).
    ///
    /// Accepts any image format the `image` crate decodes and always returns
    /// PNG bytes, so the payload survives.
    ///
    /// # Example
    /// ```ignore
    /// let image_data = std::fs::read("input.jpg")?;
    /// let stego = core.hide_in_image_bytes(&image_data, "Secret message", "pw")?;
    /// std::fs::write("output.png", stego)?;
    /// ```
    pub fn hide_in_image_bytes(&self, image_bytes: &[u8], message: &str, password: &str) -> Result<Vec<u8>> {
        let pixels = image_io::pixels_from_bytes(image_bytes)?;
        let stego = self.hide_message(pixels, message, password)?;
        image_io::pixels_to_png(&stego)
    }

    /// Byte-level variant of [`reveal_message`](Self::reveal_message).
    pub fn reveal_from_image_bytes(&self, image_bytes: &[u8], password: &str) -> Result<String> {
        let pixels = image_io::pixels_from_bytes(image_bytes)?;
        self.reveal_message(&pixels, password)
    }
}

impl Default for CypherCore {
    fn default() -> Self {
        Self::from_config(&CypherConfig::default())
    }
}
