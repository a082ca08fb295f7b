//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Key derived from "pw1", textual form.
pub const PW1_KEY: &str = "xoVq6JjURqn7CQe4764GysraZh8l3FjCIRisymMCGto=";

/// "hi" sealed under the "pw1" key by the Python `cryptography` Fernet
/// implementation.
pub const HI_TOKEN: &str = "gAAAAABq1Hh6YvcWTe8PqSGw4j-fx6ZeUyxcRI9i4BSZOaQtdjUwMqfRyrrADKdoPHx21dyw3rnM57NlzoK75yCXk0_Kq_erdA==";

/// Deterministic photo-like noise.
pub fn noisy_rgb(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| Rgb([rng.gen(), rng.gen(), rng.gen()]))
}

pub fn noisy_rgba(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(width, height, |_, _| {
        Rgba([rng.gen(), rng.gen(), rng.gen(), rng.gen()])
    })
}

pub fn gradient_grey(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x + y) % 256) as u8]))
}

/// Write `image` under `dir` and return the path.
pub fn write_image<I>(dir: &Path, name: &str, image: &I) -> PathBuf
where
    I: SaveableImage,
{
    let path = dir.join(name);
    image.save_to(&path);
    path
}

pub trait SaveableImage {
    fn save_to(&self, path: &Path);
}

impl SaveableImage for RgbImage {
    fn save_to(&self, path: &Path) {
        self.save(path).expect("fixture image should save");
    }
}

impl SaveableImage for RgbaImage {
    fn save_to(&self, path: &Path) {
        self.save(path).expect("fixture image should save");
    }
}

impl SaveableImage for GrayImage {
    fn save_to(&self, path: &Path) {
        self.save(path).expect("fixture image should save");
    }
}

/// Write `payload` and the terminator into the LSBs by hand, the way an
/// image produced by another implementation of the format would look.
pub fn hand_embed(image: &mut RgbImage, payload: &[u8]) {
    let bits: Vec<u8> = payload
        .iter()
        .chain(std::iter::once(&0xFF))
        .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1))
        .collect();

    for (channel, bit) in image.iter_mut().zip(bits) {
        *channel = (*channel & 0xFE) | bit;
    }
}
