//! # Image Processing and Steganography
//!
//! This module hides byte payloads in carrier images using the LSB (Least
//! Significant Bit) technique, and moves carriers between files, bytes and
//! pixel buffers.

pub mod image_io;
pub mod steganography;

// Re-export main functions for convenience
pub use image_io::{load_pixels, save_pixels, PixelBuffer};
pub use steganography::{embed, extract};
