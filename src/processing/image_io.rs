//! # Image I/O
//!
//! Loading carrier images into an 8-bit [`PixelBuffer`] and writing them back.
//! The output format follows the file extension. PNG and BMP are lossless;
//! JPEG is accepted but re-compresses the pixels, which wipes the hidden
//! bits.

use image::{DynamicImage, RgbImage, RgbaImage};
use log::debug;
use std::io::Cursor;
use std::path::Path;

use crate::common::error::Result;
use crate::processing::steganography;

/// Pixels of a carrier image, 8 bits per channel.
///
/// Layouts without colour channels are widened on load (grey → RGB,
/// grey + alpha → RGBA) and 16-bit images are narrowed to 8 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelBuffer {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl PixelBuffer {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        if image.color().has_alpha() {
            Self::Rgba(image.into_rgba8())
        } else {
            Self::Rgb(image.into_rgb8())
        }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Self::Rgb(image) => DynamicImage::ImageRgb8(image),
            Self::Rgba(image) => DynamicImage::ImageRgba8(image),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Rgb(image) => image.dimensions(),
            Self::Rgba(image) => image.dimensions(),
        }
    }

    /// Number of channel slots available for payload bits.
    pub fn capacity_bits(&self) -> u64 {
        let (width, height) = self.dimensions();
        steganography::capacity_bits(width, height)
    }

    /// Largest payload, in bytes, that still leaves room for the terminator.
    pub fn max_payload_len(&self) -> usize {
        usize::try_from((self.capacity_bits() / 8).saturating_sub(1)).unwrap_or(usize::MAX)
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        Self::Rgb(image)
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self::Rgba(image)
    }
}

/// Read an image file into a pixel buffer.
///
/// The file is read and closed before this returns.
pub fn load_pixels(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path)?;
    debug!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(PixelBuffer::from_dynamic(image))
}

/// Write a pixel buffer to `path`, picking the encoder from its extension.
pub fn save_pixels(pixels: &PixelBuffer, path: &Path) -> Result<()> {
    match pixels {
        PixelBuffer::Rgb(image) => image.save(path)?,
        PixelBuffer::Rgba(image) => image.save(path)?,
    }
    debug!("Saved carrier to {}", path.display());
    Ok(())
}

/// Decode raw image bytes (any format the `image` crate recognizes).
pub fn pixels_from_bytes(image_bytes: &[u8]) -> Result<PixelBuffer> {
    let image = image::load_from_memory(image_bytes)?;
    Ok(PixelBuffer::from_dynamic(image))
}

/// Encode a pixel buffer as PNG bytes.
pub fn pixels_to_png(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    let mut output_bytes = Vec::new();
    let mut cursor = Cursor::new(&mut output_bytes);
    match pixels {
        PixelBuffer::Rgb(image) => image.write_to(&mut cursor, image::ImageFormat::Png)?,
        PixelBuffer::Rgba(image) => image.write_to(&mut cursor, image::ImageFormat::Png)?,
    }
    Ok(output_bytes)
}
