//! # Common Components
//!
//! Shared utilities used by the core pipeline and the CLI.
//!
//! ## Modules
//!
//! - [`error`]: The crate-wide error enum and `Result` alias
//! - [`config`]: Configuration parsing utilities
//! - [`paths`]: Image path normalization and validation

pub mod config;
pub mod error;
pub mod paths;

pub use error::{CypherError, Result};
