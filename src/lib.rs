//! A library for extracting a small, representative color palette from an image.
//!
//! `swatchify` samples the pixels of an image on a fixed grid, filters out near-transparent,
//! near-black, and near-white pixels, and clusters the remaining colors with k-means++ seeding
//! followed by Lloyd's algorithm. The resulting palette is ordered from the most to the least
//! dominant color.
//!
//! # Features
//! To reduce dependencies and compile times, `swatchify` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes the [`PalettePipeline`] builder struct as a high-level API.
//! - `threads`: exposes parallel versions of most functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate, including image loading,
//!   caching, and a fixed fallback palette for images that cannot provide any colors.
//!
//! # High-Level API
//! To get started with the high-level API, see [`PalettePipeline`]
//! or, if you already have a list of colors, [`extract_palette`].
//! Here is an additional example:
//! ```no_run
//! # use swatchify::{PalettePipeline, PaletteSize, format::ColorFormat};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgba8();
//!
//! let palette = PalettePipeline::try_from(&img)?
//!     .palette_size(PaletteSize::try_from(5u8)?) // set the max number of colors in the palette
//!     .seed(42) // make the result reproducible
//!     .palette_par()?; // run in parallel
//!
//! for color in &palette {
//!     println!("{}", ColorFormat::Hsl.format(*color));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod error;
mod sample;
mod types;

pub mod distance;
pub mod format;
pub mod kmeans;
pub mod rank;

pub use api::*;
pub use error::Error;
pub use sample::*;
pub use types::*;

/// The number of channels per pixel in an RGBA buffer.
pub const CHANNELS: usize = 4;

#[cfg(test)]
pub(crate) mod tests {
    use palette::Srgb;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    /// 1024 pseudo-random colors, the same on every call.
    pub fn test_data_1024() -> Vec<Srgb<u8>> {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
        (0..1024)
            .map(|_| Srgb::new(rng.gen(), rng.gen(), rng.gen()))
            .collect()
    }

    /// An RGBA image of pseudo-random colors as `(width, height, bytes)`.
    ///
    /// Every tenth pixel is made fully transparent.
    pub fn test_rgba_image(width: u32, height: u32) -> (u32, u32, Vec<u8>) {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(1);
        let bytes = (0..(width * height))
            .flat_map(|i| {
                let alpha = if i % 10 == 0 { 0 } else { u8::MAX };
                [rng.gen(), rng.gen(), rng.gen(), alpha]
            })
            .collect();

        (width, height, bytes)
    }
}
