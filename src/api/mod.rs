//! Contains the palette extraction entry points and their options.

#[cfg(feature = "pipelines")]
mod palette_pipeline;
#[cfg(feature = "image")]
mod source;

#[cfg(feature = "pipelines")]
pub use palette_pipeline::PalettePipeline;
#[cfg(feature = "image")]
pub use source::*;

use crate::{
    kmeans::{self, mean_color, plus_plus, ClusterOutput, Lloyd},
    rank::rank,
    Error, Palette, PaletteSize,
};

use palette::Srgb;

/// A builder struct to specify the parameters for k-means.
///
/// # Examples
/// ```
/// # use swatchify::KmeansOptions;
/// let options = KmeansOptions::new().seed(42).max_iterations(20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmeansOptions {
    /// The seed value for the random number generator, if any.
    pub(crate) seed: Option<u64>,
    /// The maximum number of assign/update iterations.
    pub(crate) max_iterations: u32,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seed: None,
            max_iterations: Lloyd::DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Sets the seed value for the random number generator,
    /// making the resulting palette reproducible.
    ///
    /// By default, no seed is set and the generator is seeded from the operating system.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the maximum number of iterations for Lloyd's algorithm.
    ///
    /// The default is `10`.
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Extracts a palette of at most `k` colors from `samples`.
///
/// - If there are no samples, the palette is empty.
/// - If there are at most `k` samples, each sample becomes its own palette color, in sample order.
/// - If `k` is `1`, the palette is the rounded mean of all samples.
/// - Otherwise, the samples are clustered with k-means++ seeding and Lloyd's algorithm.
///   The palette may be shorter than `k` if the samples have fewer than `k` distinct colors.
///
/// The colors are ordered by descending cluster population.
///
/// # Errors
/// Returns [`Error::ZeroPaletteSize`] if `k` is `0`. Returns [`Error::PaletteSizeTooLarge`]
/// if clustering is needed (there are more than `k` samples) and `k` is greater than `u16::MAX`.
///
/// # Examples
/// ```
/// # use swatchify::{extract_palette, KmeansOptions};
/// # use palette::Srgb;
/// # fn main() -> Result<(), swatchify::Error> {
/// let samples = [Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
/// let palette = extract_palette(&samples, 1, &KmeansOptions::new())?;
/// assert_eq!(palette.colors, vec![Srgb::new(128, 128, 128)]);
/// # Ok(())
/// # }
/// ```
pub fn extract_palette(
    samples: &[Srgb<u8>],
    k: usize,
    options: &KmeansOptions,
) -> Result<Palette, Error> {
    extract_with(samples, k, options, quantize)
}

/// Extracts a palette of at most `k` colors from `samples` in parallel.
///
/// The result is identical to [`extract_palette`] with the same options.
///
/// # Errors
/// Same as [`extract_palette`].
#[cfg(feature = "threads")]
pub fn extract_palette_par(
    samples: &[Srgb<u8>],
    k: usize,
    options: &KmeansOptions,
) -> Result<Palette, Error> {
    extract_with(samples, k, options, quantize_par)
}

/// Validates an unbounded `k` and runs `run` if clustering is needed.
///
/// Any `k` of at least the number of samples returns the samples as singletons,
/// so only a `k` below the sample count has to fit into a [`PaletteSize`].
fn extract_with(
    samples: &[Srgb<u8>],
    k: usize,
    options: &KmeansOptions,
    run: impl FnOnce(&[Srgb<u8>], PaletteSize, &KmeansOptions) -> Palette,
) -> Result<Palette, Error> {
    if k == 0 {
        return Err(Error::ZeroPaletteSize);
    }

    if samples.len() <= k {
        log::debug!(
            "{} samples for {k} colors, returning the samples as the palette",
            samples.len()
        );
        return Ok(Palette::singletons(samples.to_vec()));
    }

    Ok(run(samples, k.try_into()?, options))
}

/// Extracts a palette of at most `k` colors from `samples`.
///
/// This is the infallible version of [`extract_palette`] for an already validated [`PaletteSize`].
#[must_use]
pub fn quantize(samples: &[Srgb<u8>], k: PaletteSize, options: &KmeansOptions) -> Palette {
    quantize_with(samples, k, options, Lloyd::run)
}

/// Extracts a palette of at most `k` colors from `samples` in parallel.
///
/// The result is identical to [`quantize`] with the same options.
#[cfg(feature = "threads")]
#[must_use]
pub fn quantize_par(samples: &[Srgb<u8>], k: PaletteSize, options: &KmeansOptions) -> Palette {
    quantize_with(samples, k, options, Lloyd::run_par)
}

/// Handles the degenerate cases and otherwise clusters with `run`.
fn quantize_with<'a>(
    samples: &'a [Srgb<u8>],
    k: PaletteSize,
    options: &KmeansOptions,
    run: impl FnOnce(Lloyd<'a>) -> ClusterOutput,
) -> Palette {
    let n = samples.len();

    if n == 0 {
        log::debug!("no samples, returning an empty palette");
        return Palette::default();
    }

    if n <= k.as_usize() {
        log::debug!("{n} samples for {k} colors, returning the samples as the palette");
        return Palette::singletons(samples.to_vec());
    }

    if k == PaletteSize::ONE {
        log::debug!("averaging {n} samples into a single color");
        return Palette {
            colors: mean_color(samples).into_iter().collect(),
            counts: vec![u32::try_from(n).unwrap_or(u32::MAX)],
        };
    }

    log::debug!("clustering {n} samples into {k} colors");

    let mut rng = kmeans::rng(options.seed);
    match plus_plus(samples, k, &mut rng) {
        Some(initial) => rank(run(Lloyd::new(samples, initial, options.max_iterations))),
        None => Palette::default(),
    }
}
