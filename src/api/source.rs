//! Image loading, caching, and the fallback palette used when an image cannot provide colors.

use super::{quantize, KmeansOptions};
use crate::{sample_pixels, Error, Palette, PaletteSize, RgbaBuffer, SampleOptions};

use image::{imageops::FilterType, DynamicImage, RgbaImage};
use palette::Srgb;
use std::path::Path;

/// The error returned when an image could not be read or decoded.
///
/// The palette functions in this module never return it.
/// They fall back to [`fallback_palette`] instead.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The image data could not be decoded.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// The image file could not be read.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// The colors returned when no palette could be extracted:
/// red, green, blue, yellow, magenta, cyan, orange, and purple.
pub const FALLBACK_PALETTE: [Srgb<u8>; 8] = [
    Srgb::new(220, 50, 50),
    Srgb::new(50, 180, 50),
    Srgb::new(50, 50, 220),
    Srgb::new(220, 220, 50),
    Srgb::new(220, 50, 220),
    Srgb::new(50, 220, 220),
    Srgb::new(220, 150, 50),
    Srgb::new(150, 50, 220),
];

/// Returns the first `k` colors of [`FALLBACK_PALETTE`].
///
/// The result is never padded, so it has at most 8 colors. All counts are `0`.
#[must_use]
pub fn fallback_palette(k: PaletteSize) -> Palette {
    let colors = FALLBACK_PALETTE
        .iter()
        .copied()
        .take(k.as_usize())
        .collect::<Vec<_>>();

    Palette {
        counts: vec![0; colors.len()],
        colors,
    }
}

/// Reads and decodes the image at `path`, see [`decode_image`].
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
pub fn load_image(path: impl AsRef<Path>, max_edge: u32) -> Result<RgbaImage, SourceError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes, max_edge)
}

/// Decodes an encoded image and converts it to RGBA.
///
/// Images wider or taller than `max_edge` are downscaled to fit in a `max_edge` by `max_edge`
/// square, preserving the aspect ratio. A `max_edge` of `0` disables downscaling.
///
/// # Errors
/// Returns an error if the format is unsupported or the data is malformed.
pub fn decode_image(bytes: &[u8], max_edge: u32) -> Result<RgbaImage, SourceError> {
    let image = image::load_from_memory(bytes)?;
    Ok(downscale(image, max_edge).into_rgba8())
}

/// Shrinks `image` to fit in `max_edge` by `max_edge`, if needed.
fn downscale(image: DynamicImage, max_edge: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if max_edge == 0 || (width <= max_edge && height <= max_edge) {
        image
    } else {
        log::debug!("downscaling {width}x{height} image to fit in {max_edge}x{max_edge}");
        image.resize(max_edge, max_edge, FilterType::Triangle)
    }
}

/// A single-entry cache of the most recently decoded image.
///
/// Re-extracting a palette from the same image (for example with a different number of colors)
/// reuses the decoded pixels instead of loading the image again.
/// An entry is only returned for the exact key it was stored under.
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    /// The key and decoded image of the cached entry.
    entry: Option<(String, RgbaImage)>,
}

impl ImageCache {
    /// Creates a new, empty [`ImageCache`].
    #[must_use]
    pub const fn new() -> Self {
        Self { entry: None }
    }

    /// Returns the cached image if it was stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RgbaImage> {
        match &self.entry {
            Some((cached, image)) if cached == key => Some(image),
            _ => None,
        }
    }

    /// Returns the key of the cached image, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.entry.as_ref().map(|(key, _)| key.as_str())
    }

    /// Replaces the cached entry.
    pub fn insert(&mut self, key: impl Into<String>, image: RgbaImage) -> &RgbaImage {
        let (_, image) = self.entry.insert((key.into(), image));
        image
    }

    /// Clears the cached entry.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Returns the image cached under `key`, or loads it with `load` and caches it.
    ///
    /// If `load` fails, the previously cached entry is kept.
    ///
    /// # Errors
    /// Returns the error from `load`.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: &str,
        load: impl FnOnce() -> Result<RgbaImage, E>,
    ) -> Result<&RgbaImage, E> {
        let entry = match self.entry.take() {
            Some((cached, image)) if cached == key => {
                log::trace!("image cache hit for {key}");
                (cached, image)
            }
            previous => match load() {
                Ok(image) => (key.to_owned(), image),
                Err(err) => {
                    self.entry = previous;
                    return Err(err);
                }
            },
        };

        let (_, image) = self.entry.insert(entry);
        Ok(image)
    }
}

/// Extracts a palette from the image file at `path`.
///
/// The decoded image is cached in `cache` under the path.
/// If the image cannot be loaded or yields no samples,
/// a warning is logged and [`fallback_palette`] is returned.
///
/// # Errors
/// Returns [`Error::ZeroStride`] if the configured stride is `0`.
pub fn palette_from_path(
    cache: &mut ImageCache,
    path: impl AsRef<Path>,
    k: PaletteSize,
    sample_options: &SampleOptions,
    kmeans_options: &KmeansOptions,
) -> Result<Palette, Error> {
    let path = path.as_ref();
    let key = path.to_string_lossy();
    let max_edge = sample_options.max_edge;

    match cache.get_or_try_insert_with(&key, || load_image(path, max_edge)) {
        Ok(image) => palette_or_fallback(image, k, sample_options, kmeans_options),
        Err(err) => {
            log::warn!("could not load {key}, using the fallback palette: {err}");
            Ok(fallback_palette(k))
        }
    }
}

/// Extracts a palette from an encoded image in memory.
///
/// The decoded image is cached in `cache` under `key`,
/// so the same `key` must not be reused for different image data.
/// If the image cannot be decoded or yields no samples,
/// a warning is logged and [`fallback_palette`] is returned.
///
/// # Errors
/// Returns [`Error::ZeroStride`] if the configured stride is `0`.
pub fn palette_from_memory(
    cache: &mut ImageCache,
    key: &str,
    bytes: &[u8],
    k: PaletteSize,
    sample_options: &SampleOptions,
    kmeans_options: &KmeansOptions,
) -> Result<Palette, Error> {
    let max_edge = sample_options.max_edge;

    match cache.get_or_try_insert_with(key, || decode_image(bytes, max_edge)) {
        Ok(image) => palette_or_fallback(image, k, sample_options, kmeans_options),
        Err(err) => {
            log::warn!("could not decode {key}, using the fallback palette: {err}");
            Ok(fallback_palette(k))
        }
    }
}

/// Samples and clusters `image`, substituting the fallback palette if there are no samples.
fn palette_or_fallback(
    image: &RgbaImage,
    k: PaletteSize,
    sample_options: &SampleOptions,
    kmeans_options: &KmeansOptions,
) -> Result<Palette, Error> {
    let samples = sample_pixels(&RgbaBuffer::try_from(image)?, sample_options)?;

    if samples.is_empty() {
        log::warn!("no pixels passed the sampling filters, using the fallback palette");
        Ok(fallback_palette(k))
    } else {
        Ok(quantize(&samples, k, kmeans_options))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn size(k: u16) -> PaletteSize {
        PaletteSize::try_from(k).unwrap()
    }

    fn encode(image: RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn two_color_png() -> Vec<u8> {
        let image = RgbaImage::from_fn(20, 20, |x, _| {
            if x < 15 {
                Rgba([200, 40, 40, 255])
            } else {
                Rgba([40, 40, 200, 255])
            }
        });
        encode(image)
    }

    fn extract(cache: &mut ImageCache, key: &str, bytes: &[u8], k: u16) -> Palette {
        palette_from_memory(
            cache,
            key,
            bytes,
            size(k),
            &SampleOptions::new().stride(1),
            &KmeansOptions::new().seed(0),
        )
        .unwrap()
    }

    #[test]
    fn fallback_is_truncated_not_padded() {
        assert_eq!(fallback_palette(size(3)).colors, &FALLBACK_PALETTE[..3]);
        assert_eq!(fallback_palette(size(12)).colors, FALLBACK_PALETTE);
        assert_eq!(fallback_palette(size(1)).counts, vec![0]);
    }

    #[test]
    fn undecodable_bytes_give_fallback() {
        let mut cache = ImageCache::new();
        let bytes = b"definitely not an image";

        assert_eq!(extract(&mut cache, "garbage", bytes, 3), fallback_palette(size(3)));
        assert_eq!(extract(&mut cache, "garbage", bytes, 12).len(), 8);
        assert!(cache.key().is_none());
    }

    #[test]
    fn missing_file_gives_fallback() {
        let mut cache = ImageCache::new();
        let palette = palette_from_path(
            &mut cache,
            "this/path/does/not/exist.png",
            size(5),
            &SampleOptions::new(),
            &KmeansOptions::new(),
        )
        .unwrap();
        assert_eq!(palette, fallback_palette(size(5)));
    }

    #[test]
    fn two_color_image() {
        let mut cache = ImageCache::new();
        let palette = extract(&mut cache, "two", &two_color_png(), 2);
        assert_eq!(palette.colors, vec![Srgb::new(200, 40, 40), Srgb::new(40, 40, 200)]);
        assert_eq!(palette.counts, vec![300, 100]);
    }

    #[test]
    fn cached_image_is_reused_for_same_key() {
        let mut cache = ImageCache::new();
        let first = extract(&mut cache, "two", &two_color_png(), 2);
        assert_eq!(cache.key(), Some("two"));

        // the bytes are not decoded again on a cache hit
        let again = extract(&mut cache, "two", b"garbage", 2);
        assert_eq!(again, first);

        let single = extract(&mut cache, "two", b"garbage", 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single.counts, vec![400]);
    }

    #[test]
    fn failed_load_keeps_cached_entry() {
        let mut cache = ImageCache::new();
        extract(&mut cache, "two", &two_color_png(), 2);

        let palette = extract(&mut cache, "other", b"garbage", 2);
        assert_eq!(palette, fallback_palette(size(2)));
        assert_eq!(cache.key(), Some("two"));

        cache.invalidate();
        assert!(cache.get("two").is_none());
    }

    #[test]
    fn cache_lookup_requires_exact_key() {
        let mut cache = ImageCache::new();
        cache.insert("a.png", RgbaImage::new(2, 2));
        assert!(cache.get("a.png").is_some());
        assert!(cache.get("b.png").is_none());

        cache.insert("b.png", RgbaImage::new(3, 1));
        assert!(cache.get("a.png").is_none());
        assert_eq!(cache.get("b.png").unwrap().dimensions(), (3, 1));
    }

    #[test]
    fn large_images_are_downscaled() {
        let bytes = encode(RgbaImage::from_pixel(1000, 500, Rgba([10, 120, 200, 255])));

        let image = decode_image(&bytes, 300).unwrap();
        assert_eq!(image.dimensions(), (300, 150));

        let image = decode_image(&bytes, 0).unwrap();
        assert_eq!(image.dimensions(), (1000, 500));

        let small = encode(RgbaImage::from_pixel(40, 20, Rgba([10, 120, 200, 255])));
        assert_eq!(decode_image(&small, 300).unwrap().dimensions(), (40, 20));
    }

    #[test]
    fn max_edge_option_controls_downscaling() {
        let bytes = encode(RgbaImage::from_pixel(1000, 500, Rgba([10, 120, 200, 255])));
        let mut cache = ImageCache::new();

        palette_from_memory(
            &mut cache,
            "wide",
            &bytes,
            size(2),
            &SampleOptions::new().max_edge(10),
            &KmeansOptions::new(),
        )
        .unwrap();

        assert_eq!(cache.get("wide").unwrap().dimensions(), (10, 5));
    }

    #[test]
    fn filtered_image_gives_fallback() {
        let bytes = encode(RgbaImage::from_pixel(30, 30, Rgba([255, 255, 255, 255])));
        let mut cache = ImageCache::new();
        assert_eq!(extract(&mut cache, "white", &bytes, 4), fallback_palette(size(4)));
    }

    #[test]
    fn zero_stride_is_still_an_error() {
        let mut cache = ImageCache::new();
        let result = palette_from_memory(
            &mut cache,
            "two",
            &two_color_png(),
            size(2),
            &SampleOptions::new().stride(0),
            &KmeansOptions::new(),
        );
        assert!(matches!(result, Err(Error::ZeroStride)));
    }
}
