//! Contains various types needed across the crate.

use crate::{format, Error};
use palette::Srgb;
use std::{fmt::Display, ops::Deref};

/// A set of sampled pixel colors with the alpha channel dropped.
///
/// A [`SampleSet`] is built once per extraction (usually by
/// [`sample_pixels`](crate::sample_pixels)) and is read-only afterwards.
/// It dereferences to a slice of colors.
///
/// # Examples
/// ```
/// # use swatchify::SampleSet;
/// # use palette::Srgb;
/// let samples = SampleSet::from(vec![Srgb::new(12, 200, 40), Srgb::new(90, 90, 90)]);
/// assert_eq!(samples.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct SampleSet(Vec<Srgb<u8>>);

impl SampleSet {
    /// Returns the inner `Vec` of colors.
    #[must_use]
    pub fn into_inner(self) -> Vec<Srgb<u8>> {
        self.0
    }

    /// Returns the samples as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Srgb<u8>] {
        &self.0
    }
}

impl Deref for SampleSet {
    type Target = [Srgb<u8>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[Srgb<u8>]> for SampleSet {
    fn as_ref(&self) -> &[Srgb<u8>] {
        self
    }
}

impl From<Vec<Srgb<u8>>> for SampleSet {
    fn from(colors: Vec<Srgb<u8>>) -> Self {
        Self(colors)
    }
}

impl From<SampleSet> for Vec<Srgb<u8>> {
    fn from(samples: SampleSet) -> Self {
        samples.into_inner()
    }
}

impl FromIterator<Srgb<u8>> for SampleSet {
    fn from_iter<T: IntoIterator<Item = Srgb<u8>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// This type is used to specify the requested number of colors in a palette.
///
/// This is a simple new type wrapper around `u16` with the invariant that it must be at least `1`.
/// Requesting `0` colors is a configuration error and is rejected on construction.
///
/// # Examples
/// ```
/// # use swatchify::{PaletteSize, Error};
/// # fn main() -> Result<(), Error> {
/// let size = PaletteSize::try_from(8u8)?;
/// let size: PaletteSize = 16usize.try_into()?;
/// assert!(PaletteSize::try_from(0u16).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PaletteSize(u16);

impl PaletteSize {
    /// The smallest palette size, a single color.
    pub const ONE: Self = Self(1);

    /// The default palette size used by the pipelines.
    pub const DEFAULT: Self = Self(8);

    /// The largest supported palette size.
    pub const MAX: Self = Self(u16::MAX);

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// Gets the inner value as a `usize` for lengths and indexing.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for PaletteSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<PaletteSize> for u16 {
    fn from(val: PaletteSize) -> Self {
        val.into_inner()
    }
}

impl TryFrom<u16> for PaletteSize {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(Error::ZeroPaletteSize)
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<u8> for PaletteSize {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        u16::from(value).try_into()
    }
}

impl TryFrom<u32> for PaletteSize {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .map_err(|_| Error::PaletteSizeTooLarge { requested: value.into() })?
            .try_into()
    }
}

impl TryFrom<usize> for PaletteSize {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .map_err(|_| Error::PaletteSizeTooLarge { requested: value as u64 })?
            .try_into()
    }
}

impl Display for PaletteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// The output palette returned by the extraction functions.
///
/// `colors` are ordered by descending population, so the most dominant color is `colors[0]`.
/// `counts[i]` is the number of samples that were assigned to `colors[i]`.
///
/// Both fields are empty if there were no samples to extract colors from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    /// The palette colors, most populous first.
    ///
    /// The colors are not guaranteed to be unique.
    pub colors: Vec<Srgb<u8>>,
    /// The number of samples assigned to each color in `colors`.
    pub counts: Vec<u32>,
}

impl Palette {
    /// Creates a palette where each color is its own singleton cluster.
    pub(crate) fn singletons(colors: Vec<Srgb<u8>>) -> Self {
        let counts = vec![1; colors.len()];
        Self { colors, counts }
    }

    /// The number of colors in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns an iterator over the palette colors.
    pub fn iter(&self) -> std::slice::Iter<'_, Srgb<u8>> {
        self.colors.iter()
    }

    /// Returns the palette colors, dropping the counts.
    #[must_use]
    pub fn into_colors(self) -> Vec<Srgb<u8>> {
        self.colors
    }

    /// Returns each palette color as a `#rrggbb` string.
    #[must_use]
    pub fn hex_strings(&self) -> Vec<String> {
        self.colors.iter().copied().map(format::to_hex).collect()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Srgb<u8>;
    type IntoIter = std::slice::Iter<'a, Srgb<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
