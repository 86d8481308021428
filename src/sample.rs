//! Contains the pixel sampler that turns an RGBA buffer into a [`SampleSet`].

use crate::{Error, SampleSet, CHANNELS};
use palette::{cast::ComponentsAs, Srgb, Srgba};
#[cfg(feature = "threads")]
use rayon::prelude::*;
#[cfg(feature = "image")]
use image::RgbaImage;

/// A decoded 8-bit RGBA pixel buffer with explicit dimensions.
///
/// The invariant `pixels.len() == width * height` is checked on construction.
///
/// # Examples
/// ```
/// # use swatchify::{RgbaBuffer, Error};
/// # fn main() -> Result<(), Error> {
/// let bytes = vec![255, 0, 0, 255, 0, 255, 0, 255];
/// let buffer = RgbaBuffer::new(&bytes, 2, 1)?;
/// assert_eq!(buffer.dimensions(), (2, 1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbaBuffer<'a> {
    /// The pixels in row-major order.
    pixels: &'a [Srgba<u8>],
    /// The width of the image in pixels.
    width: u32,
    /// The height of the image in pixels.
    height: u32,
}

impl<'a> RgbaBuffer<'a> {
    /// Creates a new [`RgbaBuffer`] from raw bytes with 4 channels per pixel.
    ///
    /// # Errors
    /// Returns an error if `bytes` is not a whole number of RGBA pixels
    /// or if it does not contain exactly `width * height` pixels.
    pub fn new(bytes: &'a [u8], width: u32, height: u32) -> Result<Self, Error> {
        let len = bytes.len();
        if len % CHANNELS != 0 {
            return Err(Error::ChannelCount { len });
        }

        if pixel_count(width, height) != Some(len / CHANNELS) {
            return Err(Error::DimensionMismatch { len, width, height });
        }

        Ok(Self {
            pixels: bytes.components_as(),
            width,
            height,
        })
    }

    /// Creates a new [`RgbaBuffer`] from a slice of pixels.
    ///
    /// # Errors
    /// Returns an error if `pixels` does not contain exactly `width * height` pixels.
    pub fn from_pixels(pixels: &'a [Srgba<u8>], width: u32, height: u32) -> Result<Self, Error> {
        if pixel_count(width, height) == Some(pixels.len()) {
            Ok(Self { pixels, width, height })
        } else {
            Err(Error::DimensionMismatch {
                len: pixels.len() * CHANNELS,
                width,
                height,
            })
        }
    }

    /// Returns the pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &'a [Srgba<u8>] {
        self.pixels
    }

    /// Returns the `(width, height)` of the buffer.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The pixels of row `y` at every `stride`-th column.
    fn strided_row(&self, y: usize, stride: usize) -> impl Iterator<Item = Srgba<u8>> + 'a {
        let width = self.width as usize;
        self.pixels[(y * width)..((y + 1) * width)]
            .iter()
            .copied()
            .step_by(stride)
    }
}

/// The number of pixels in a `width` by `height` image, if it fits in a `usize`.
fn pixel_count(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbaImage> for RgbaBuffer<'a> {
    type Error = Error;

    fn try_from(image: &'a RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        Self::new(image.as_raw(), width, height)
    }
}

/// A builder struct to specify how pixels are sampled and filtered.
///
/// # Examples
/// ```
/// # use swatchify::SampleOptions;
/// let options = SampleOptions::new().stride(3).min_alpha(128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    /// The pixel grid spacing in both directions.
    pub(crate) stride: u32,
    /// Pixels with a lower alpha value are skipped.
    pub(crate) min_alpha: u8,
    /// Pixels with all channels below this value are skipped.
    pub(crate) dark_threshold: u8,
    /// Pixels with all channels above this value are skipped.
    pub(crate) light_threshold: u8,
    /// The maximum width or height an image is downscaled to before sampling.
    pub(crate) max_edge: u32,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleOptions {
    /// The default sampling stride.
    pub const DEFAULT_STRIDE: u32 = 5;

    /// The default maximum image edge length.
    pub const DEFAULT_MAX_EDGE: u32 = 300;

    /// Creates a new [`SampleOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stride: Self::DEFAULT_STRIDE,
            min_alpha: 200,
            dark_threshold: 10,
            light_threshold: 245,
            max_edge: Self::DEFAULT_MAX_EDGE,
        }
    }

    /// Sets the stride, so that only pixels at `(x, y)` where
    /// `x % stride == 0` and `y % stride == 0` are sampled.
    ///
    /// The default stride is `5`.
    #[must_use]
    pub const fn stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    /// Sets the minimum alpha value for a pixel to be sampled.
    ///
    /// The default is `200`.
    #[must_use]
    pub const fn min_alpha(mut self, min_alpha: u8) -> Self {
        self.min_alpha = min_alpha;
        self
    }

    /// Sets the near-black threshold. Pixels whose red, green, and blue
    /// are all below it are skipped.
    ///
    /// The default is `10`.
    #[must_use]
    pub const fn dark_threshold(mut self, threshold: u8) -> Self {
        self.dark_threshold = threshold;
        self
    }

    /// Sets the near-white threshold. Pixels whose red, green, and blue
    /// are all above it are skipped.
    ///
    /// The default is `245`.
    #[must_use]
    pub const fn light_threshold(mut self, threshold: u8) -> Self {
        self.light_threshold = threshold;
        self
    }

    /// Sets the maximum edge length that images are downscaled to
    /// (preserving aspect ratio) before they are sampled.
    ///
    /// This is only used when loading images, the sampler itself walks the whole buffer.
    ///
    /// The default is `300`.
    #[must_use]
    pub const fn max_edge(mut self, max_edge: u32) -> Self {
        self.max_edge = max_edge;
        self
    }

    /// Returns the color of `pixel` if it passes the transparency and outlier filters.
    #[inline]
    fn accept(&self, pixel: Srgba<u8>) -> Option<Srgb<u8>> {
        let color = pixel.color;
        let channels = [color.red, color.green, color.blue];

        let transparent = pixel.alpha < self.min_alpha;
        let dark = channels.iter().all(|&c| c < self.dark_threshold);
        let light = channels.iter().all(|&c| c > self.light_threshold);

        (!(transparent || dark || light)).then_some(color)
    }

    /// The stride as a `usize`, rejecting a stride of `0`.
    fn checked_stride(&self) -> Result<usize, Error> {
        if self.stride == 0 {
            Err(Error::ZeroStride)
        } else {
            Ok(self.stride as usize)
        }
    }
}

/// Samples the pixels of `buffer` on a fixed grid, skipping near-transparent,
/// near-black, and near-white pixels.
///
/// Pixels are visited in row-major order. An empty [`SampleSet`] is a valid result.
///
/// # Errors
/// Returns [`Error::ZeroStride`] if the configured stride is `0`.
pub fn sample_pixels(buffer: &RgbaBuffer, options: &SampleOptions) -> Result<SampleSet, Error> {
    let stride = options.checked_stride()?;
    let height = buffer.height as usize;

    let samples = (0..height)
        .step_by(stride)
        .flat_map(|y| buffer.strided_row(y, stride))
        .filter_map(|pixel| options.accept(pixel))
        .collect::<SampleSet>();

    log::debug!(
        "sampled {} of {} pixels with stride {stride}",
        samples.len(),
        buffer.pixels.len()
    );

    Ok(samples)
}

/// Samples the pixels of `buffer` in parallel.
///
/// The result is identical to [`sample_pixels`].
///
/// # Errors
/// Returns [`Error::ZeroStride`] if the configured stride is `0`.
#[cfg(feature = "threads")]
pub fn sample_pixels_par(buffer: &RgbaBuffer, options: &SampleOptions) -> Result<SampleSet, Error> {
    let stride = options.checked_stride()?;
    let height = buffer.height as usize;

    let samples = (0..height)
        .into_par_iter()
        .step_by(stride)
        .flat_map_iter(|y| buffer.strided_row(y, stride).filter_map(|pixel| options.accept(pixel)))
        .collect::<Vec<_>>();

    log::debug!(
        "sampled {} of {} pixels with stride {stride}",
        samples.len(),
        buffer.pixels.len()
    );

    Ok(samples.into())
}
