//! # LSB Steganography Implementation
//!
//! Hides a byte payload in the least significant bit of each color channel
//! (R, G, B) of the carrier's pixels, and recovers it.
//!
//! ## Algorithm
//!
//! ### Encoding Process
//! 1. Append the terminator byte `0xFF` to the payload
//! 2. For each bit of that stream, most significant bit of each byte first:
//!    - Take the next channel (R → G → B → next pixel, rows top to bottom)
//!    - Clear its LSB and set it to the data bit
//! 3. Leave every remaining channel untouched
//!
//! Alpha channels are never used.
//!
//! ### Decoding Process
//! 1. Read LSBs in the same order, regrouping them into bytes
//! 2. Stop at the first byte equal to `0xFF` and return everything before it
//! 3. If the carrier ends first, there is no message
//!
//! ### Capacity
//! A carrier holds `width * height * 3` bits, of which 8 go to the
//! terminator. A 100x100 image fits a 3 749 byte payload.
//!
//! ### Terminator ambiguity
//! The terminator is not escaped. A payload byte equal to `0xFF` ends the
//! extraction early. Payloads produced by [`crate::encryption::PayloadCodec`]
//! are base64 text and never contain that byte.

use image::{ImageBuffer, Pixel};
use log::debug;

use crate::common::error::{CypherError, Result};
use crate::processing::image_io::PixelBuffer;

/// End-of-message marker, all bits set.
pub const TERMINATOR: u8 = 0xFF;

/// Channels per pixel that carry payload bits.
pub const CARRIER_CHANNELS: usize = 3;

/// Channel slots in a `width` x `height` carrier.
pub fn capacity_bits(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * CARRIER_CHANNELS as u64
}

/// Bits needed for a payload of `payload_len` bytes plus the terminator.
pub fn required_bits(payload_len: usize) -> u64 {
    (payload_len as u64 + 1) * 8
}

/// Embed `payload` into the carrier and hand the carrier back.
///
/// # Arguments
/// - `pixels`: Carrier pixels, consumed and returned modified
/// - `payload`: Bytes to hide (normally an encrypted token)
///
/// # Returns
/// - `Ok(PixelBuffer)`: The carrier with the payload and terminator embedded
/// - `Err(CypherError::CapacityExceeded)`: Not enough channel slots; the
///   carrier was not modified
///
/// # Example
/// ```ignore
/// let pixels = load_pixels(Path::new("input.png"))?;
/// let stego = embed(pixels, &token)?;
/// save_pixels(&stego, Path::new("output.png"))?;
/// ```
pub fn embed(mut pixels: PixelBuffer, payload: &[u8]) -> Result<PixelBuffer> {
    match &mut pixels {
        PixelBuffer::Rgb(image) => embed_into(image, payload)?,
        PixelBuffer::Rgba(image) => embed_into(image, payload)?,
    }
    Ok(pixels)
}

/// Recover the payload hidden by [`embed`].
///
/// # Returns
/// - `Ok(Vec<u8>)`: Bytes before the first terminator (possibly empty)
/// - `Err(CypherError::NoHiddenMessage)`: No terminator anywhere in the carrier
pub fn extract(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    match pixels {
        PixelBuffer::Rgb(image) => extract_from(image),
        PixelBuffer::Rgba(image) => extract_from(image),
    }
}

/// Embed into any 8-bit image with at least three channels.
pub fn embed_into<P>(image: &mut ImageBuffer<P, Vec<u8>>, payload: &[u8]) -> Result<()>
where
    P: Pixel<Subpixel = u8>,
{
    ensure_color_channels::<P>()?;

    let (width, height) = image.dimensions();
    let available_bits = capacity_bits(width, height);
    let required_bits = required_bits(payload.len());

    if required_bits > available_bits {
        return Err(CypherError::CapacityExceeded {
            required: required_bits,
            available: available_bits,
        });
    }

    // [payload bytes][terminator]
    let mut data_to_embed = Vec::with_capacity(payload.len() + 1);
    data_to_embed.extend_from_slice(payload);
    data_to_embed.push(TERMINATOR);

    let mut data_index = 0; // Current byte being embedded
    let mut bit_index = 0; // Current bit within the byte (0-7)

    'outer: for pixel in image.pixels_mut() {
        for channel in pixel.channels_mut().iter_mut().take(CARRIER_CHANNELS) {
            if data_index >= data_to_embed.len() {
                break 'outer;
            }

            // MSB first
            let bit = (data_to_embed[data_index] >> (7 - bit_index)) & 1;
            *channel = (*channel & 0xFE) | bit;

            bit_index += 1;
            if bit_index == 8 {
                bit_index = 0;
                data_index += 1;
            }
        }
    }

    debug!(
        "Embedded {} bits into {}x{} carrier ({} available)",
        required_bits, width, height, available_bits
    );
    Ok(())
}

/// Extract from any 8-bit image with at least three channels.
pub fn extract_from<P>(image: &ImageBuffer<P, Vec<u8>>) -> Result<Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    ensure_color_channels::<P>()?;

    let mut assembler = ByteAssembler::default();
    let mut payload = Vec::new();

    for pixel in image.pixels() {
        for channel in pixel.channels().iter().take(CARRIER_CHANNELS) {
            if let Some(byte) = assembler.push(channel & 1) {
                if byte == TERMINATOR {
                    debug!("Terminator found after {} payload bytes", payload.len());
                    return Ok(payload);
                }
                payload.push(byte);
            }
        }
    }

    debug!(
        "Scanned {} channel slots without a terminator",
        capacity_bits(image.width(), image.height())
    );
    Err(CypherError::NoHiddenMessage)
}

fn ensure_color_channels<P: Pixel>() -> Result<()> {
    if usize::from(P::CHANNEL_COUNT) < CARRIER_CHANNELS {
        return Err(CypherError::Validation(format!(
            "carrier pixels need at least {} channels, got {}",
            CARRIER_CHANNELS,
            P::CHANNEL_COUNT
        )));
    }
    Ok(())
}

/// Regroups a bit sequence into bytes, MSB first.
#[derive(Debug, Default)]
struct ByteAssembler {
    current: u8,
    filled: u8,
}

impl ByteAssembler {
    /// Feed one bit; yields a byte every eighth call.
    fn push(&mut self, bit: u8) -> Option<u8> {
        self.current = (self.current << 1) | (bit & 1);
        self.filled += 1;
        if self.filled == 8 {
            let byte = self.current;
            self.current = 0;
            self.filled = 0;
            Some(byte)
        } else {
            None
        }
    }
}
