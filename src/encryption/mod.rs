//! # Message Encryption
//!
//! Turns a password into a key and a plaintext message into an authenticated
//! token (and back).
//!
//! - [`key_derivation`]: PBKDF2-HMAC-SHA256 with fixed parameters
//! - [`codec`]: Fernet token sealing and opening

pub mod codec;
pub mod key_derivation;

pub use codec::{OpenedPayload, PayloadCodec};
pub use key_derivation::{derive_key, DerivedKey};
