#![allow(dead_code)]

use std::sync::OnceLock;

use image::{Rgba, RgbaImage};
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
use swatchify::{sample_pixels, RgbaBuffer, SampleOptions};

/// Edge lengths of the generated benchmark images.
pub const SIZES: [(u32, u32); 3] = [(300, 200), (640, 480), (1920, 1080)];

/// A smooth two-axis gradient with a few solid blocks and some noise.
pub fn synthetic_image(width: u32, height: u32, seed: u64) -> RgbaImage {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);

    RgbaImage::from_fn(width, height, |x, y| {
        let block = (x / 64 + y / 64) % 5;
        if block == 0 {
            return Rgba([220, 60, 40, 255]);
        }

        let r = (x * 255 / width) as u8;
        let g = (y * 255 / height) as u8;
        let b = rng.gen_range(60..=180);
        let a = if rng.gen_ratio(1, 20) { 0 } else { 255 };
        Rgba([r, g, b, a])
    })
}

pub fn load_images() -> Vec<(String, RgbaImage)> {
    SIZES
        .iter()
        .zip(0..)
        .map(|(&(width, height), seed)| (format!("{width}x{height}"), synthetic_image(width, height, seed)))
        .collect()
}

static IMAGES: OnceLock<Vec<(String, RgbaImage)>> = OnceLock::new();

pub fn images() -> &'static [(String, RgbaImage)] {
    IMAGES.get_or_init(load_images)
}

pub fn to_samples(images: &[(String, RgbaImage)], stride: u32) -> Vec<(String, Vec<Srgb<u8>>)> {
    let options = SampleOptions::new().stride(stride);
    images
        .iter()
        .map(|(name, image)| {
            let buffer = RgbaBuffer::try_from(image).unwrap();
            let samples = sample_pixels(&buffer, &options).unwrap().into_inner();
            (name.clone(), samples)
        })
        .collect()
}
