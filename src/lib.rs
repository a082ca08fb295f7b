//! # image-cypher
//!
//! Hides password-protected text messages inside images.
//!
//! The message is sealed as a Fernet token (PBKDF2-HMAC-SHA256 key,
//! AES-128-CBC, HMAC-SHA256) and the token is written into the least
//! significant bits of the carrier's red, green and blue channels, followed
//! by a `0xFF` terminator.
//!
//! ## Modules
//!
//! - [`encryption`]: Key derivation and the token codec
//! - [`processing`]: LSB embedding/extraction and image I/O
//! - [`cypher`]: The encode/decode pipeline, in memory and on files
//! - [`cli`]: The interactive menu
//! - [`common`]: Errors, configuration and path validation
//! - [`utils`]: Logger setup

pub mod cli;
pub mod common;
pub mod cypher;
pub mod encryption;
pub mod processing;
pub mod utils;

pub use common::{CypherError, Result};
pub use cypher::{CypherCore, ImageCypher};
