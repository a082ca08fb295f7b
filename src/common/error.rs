//! # Error Types
//!
//! A single error enum covers every failure the library can report. The CLI
//! prints these messages verbatim, so they are written for the end user.

use thiserror::Error;

/// Errors raised while hiding or revealing a message.
#[derive(Error, Debug)]
pub enum CypherError {
    /// Missing file, unsupported extension or unresolvable path.
    #[error("Invalid file path: {0}")]
    Path(String),

    /// Empty message, oversized message, empty CLI field, malformed key text.
    #[error("{0}")]
    Validation(String),

    /// The bitstream does not fit in the carrier's channel slots.
    #[error(
        "Message too long for this image: need {required} bits but only {available} bits are available"
    )]
    CapacityExceeded { required: u64, available: u64 },

    /// The extractor scanned every channel without meeting the terminator.
    #[error("No hidden message found in the image")]
    NoHiddenMessage,

    /// Token integrity check failed. Wrong password and corrupted carrier
    /// both end up here.
    #[error("Decryption failed: wrong password or corrupted image")]
    Authentication,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CypherError>;
