//! Contains the crate's error type.

use crate::CHANNELS;
use palette::rgb::FromHexError;
use thiserror::Error;

/// The error type for invalid configuration or malformed input.
///
/// Empty sample sets and degenerate seeding are not errors;
/// they produce short (or empty) palettes instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A palette size of `0` was requested.
    #[error("the requested number of colors must be at least 1")]
    ZeroPaletteSize,

    /// The requested palette size does not fit into a [`PaletteSize`](crate::PaletteSize).
    #[error("the requested number of colors ({requested}) is above the maximum of {}", u16::MAX)]
    PaletteSizeTooLarge {
        /// The requested number of colors.
        requested: u64,
    },

    /// The pixel buffer length is not a multiple of the RGBA channel count.
    #[error("pixel buffer length {len} is not a multiple of {} channels", CHANNELS)]
    ChannelCount {
        /// The length of the pixel buffer in bytes.
        len: usize,
    },

    /// The pixel buffer length does not match the given dimensions.
    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        /// The length of the pixel buffer in bytes.
        len: usize,
        /// The given image width.
        width: u32,
        /// The given image height.
        height: u32,
    },

    /// A sampling stride of `0` was provided.
    #[error("the sampling stride must be at least 1")]
    ZeroStride,

    /// A hex color string could not be decoded.
    #[error("invalid hex color: {0}")]
    InvalidHex(#[from] FromHexError),
}
