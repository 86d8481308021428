//! Contains the [`PalettePipeline`] builder struct for the high level API.

use super::{quantize, KmeansOptions};

#[cfg(feature = "threads")]
use super::quantize_par;
#[cfg(feature = "threads")]
use crate::sample_pixels_par;
use crate::{sample_pixels, Error, Palette, PaletteSize, RgbaBuffer, SampleOptions, SampleSet};

#[cfg(feature = "image")]
use image::RgbaImage;

/// A builder struct to sample an RGBA buffer and extract a palette from it.
///
/// # Examples
/// To start, create a [`PalettePipeline`] from an [`RgbaBuffer`]
/// (or from an [`RgbaImage`] if the `image` feature is enabled):
/// ```
/// # use swatchify::{PalettePipeline, RgbaBuffer, Error};
/// # fn main() -> Result<(), Error> {
/// let bytes = [200, 40, 40, 255].repeat(100);
/// let buffer = RgbaBuffer::new(&bytes, 10, 10)?;
/// let pipeline = PalettePipeline::new(buffer);
/// # Ok(())
/// # }
/// ```
///
/// Then, you can change the number of colors, the seed, and the sampling options:
/// ```
/// # use swatchify::{PalettePipeline, PaletteSize, RgbaBuffer, SampleOptions, Error};
/// # fn main() -> Result<(), Error> {
/// # let bytes = [200, 40, 40, 255].repeat(100);
/// # let buffer = RgbaBuffer::new(&bytes, 10, 10)?;
/// let pipeline = PalettePipeline::new(buffer)
///     .palette_size(PaletteSize::try_from(4u8)?)
///     .sample_options(SampleOptions::new().stride(2))
///     .seed(42);
/// # Ok(())
/// # }
/// ```
///
/// Finally, run the pipeline:
/// ```
/// # use swatchify::{PalettePipeline, RgbaBuffer, Error};
/// # use palette::Srgb;
/// # fn main() -> Result<(), Error> {
/// # let bytes = [200, 40, 40, 255].repeat(100);
/// # let buffer = RgbaBuffer::new(&bytes, 10, 10)?;
/// # let pipeline = PalettePipeline::new(buffer);
/// let palette = pipeline.palette()?;
/// assert_eq!(palette.colors[0], Srgb::new(200, 40, 40));
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct PalettePipeline<'a> {
    /// The input image.
    pub(crate) buffer: RgbaBuffer<'a>,
    /// The number of colors to put in the palette.
    pub(crate) k: PaletteSize,
    /// How to sample the pixels of the image.
    pub(crate) sample_options: SampleOptions,
    /// The options for k-means.
    pub(crate) kmeans_options: KmeansOptions,
}

impl<'a> PalettePipeline<'a> {
    /// Creates a new [`PalettePipeline`] with default options.
    pub fn new(buffer: RgbaBuffer<'a>) -> Self {
        Self {
            buffer,
            k: PaletteSize::default(),
            sample_options: SampleOptions::new(),
            kmeans_options: KmeansOptions::new(),
        }
    }

    /// Sets the (maximum) number of colors to have in the palette.
    ///
    /// The default palette size is [`PaletteSize::DEFAULT`].
    pub fn palette_size(mut self, size: PaletteSize) -> Self {
        self.k = size;
        self
    }

    /// Sets the options used to sample the pixels of the image.
    ///
    /// See [`SampleOptions`] for the defaults.
    pub fn sample_options(mut self, options: SampleOptions) -> Self {
        self.sample_options = options;
        self
    }

    /// Sets the options for k-means.
    ///
    /// See [`KmeansOptions`] for the defaults.
    pub fn kmeans_options(mut self, options: KmeansOptions) -> Self {
        self.kmeans_options = options;
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// This is a shorthand for setting the seed in [`KmeansOptions`].
    pub fn seed(mut self, seed: u64) -> Self {
        self.kmeans_options = self.kmeans_options.seed(seed);
        self
    }

    /// Returns the sampled pixels of the image.
    ///
    /// # Errors
    /// Returns [`Error::ZeroStride`] if the configured stride is `0`.
    pub fn samples(&self) -> Result<SampleSet, Error> {
        sample_pixels(&self.buffer, &self.sample_options)
    }

    /// Runs the pipeline and returns the palette.
    ///
    /// # Errors
    /// Returns [`Error::ZeroStride`] if the configured stride is `0`.
    pub fn palette(&self) -> Result<Palette, Error> {
        let samples = self.samples()?;
        Ok(quantize(&samples, self.k, &self.kmeans_options))
    }

    /// Runs the pipeline in parallel and returns the palette.
    ///
    /// The result is identical to [`palette`](PalettePipeline::palette).
    ///
    /// # Errors
    /// Returns [`Error::ZeroStride`] if the configured stride is `0`.
    #[cfg(feature = "threads")]
    pub fn palette_par(&self) -> Result<Palette, Error> {
        let samples = sample_pixels_par(&self.buffer, &self.sample_options)?;
        Ok(quantize_par(&samples, self.k, &self.kmeans_options))
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbaImage> for PalettePipeline<'a> {
    type Error = Error;

    fn try_from(image: &'a RgbaImage) -> Result<Self, Self::Error> {
        Ok(Self::new(image.try_into()?))
    }
}
