//! # Encode/Decode Pipeline
//!
//! The pipeline is split into two components:
//!
//! ## Core ([`core`])
//! Message validation, key derivation, sealing, embedding and the reverse,
//! all on in-memory pixel buffers.
//!
//! ## Files ([`files`])
//! Path validation, loading and saving images, and removal of partially
//! written outputs. Delegates the actual work to the core.

pub mod core;
pub mod files;

// Re-export for convenience
pub use self::core::CypherCore;
pub use self::files::ImageCypher;
