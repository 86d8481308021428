//! Color clustering with k-means.
//!
//! Clustering happens in two stages:
//! 1. [`plus_plus`] picks initial centroids from the samples with k-means++ seeding,
//!    spreading them apart by choosing each new centroid with probability proportional
//!    to its squared distance from the nearest centroid already chosen.
//! 2. [`Lloyd`] refines the centroids with Lloyd's algorithm, alternating between
//!    assigning each sample to its nearest centroid and moving each centroid to the
//!    mean of its samples, until the assignments stop changing or the iteration cap is hit.
//!
//! All distances are plain Euclidean distances in sRGB space.

mod lloyd;
mod plus_plus;

pub use lloyd::*;
pub use plus_plus::*;

use crate::{Error, PaletteSize};
use palette::Srgb;
use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;

/// A non-empty list of centroids with at most [`PaletteSize::MAX`] elements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Centroids(Vec<Srgb<u8>>);

impl Centroids {
    /// Creates [`Centroids`] without checking the length invariant.
    pub(crate) fn new_unchecked(centroids: Vec<Srgb<u8>>) -> Self {
        Self(centroids)
    }

    /// Returns the inner `Vec` of centroids.
    #[must_use]
    pub fn into_inner(self) -> Vec<Srgb<u8>> {
        self.0
    }

    /// Returns the centroids as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Srgb<u8>] {
        &self.0
    }

    /// Returns the number of centroids as a `u16`.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn num_colors(&self) -> u16 {
        self.0.len() as u16
    }
}

impl From<Centroids> for Vec<Srgb<u8>> {
    fn from(value: Centroids) -> Self {
        value.into_inner()
    }
}

impl TryFrom<Vec<Srgb<u8>>> for Centroids {
    type Error = Error;

    fn try_from(colors: Vec<Srgb<u8>>) -> Result<Self, Self::Error> {
        PaletteSize::try_from(colors.len())?;
        Ok(Self(colors))
    }
}

/// The final state of a clustering run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterOutput {
    /// The final centroid of each cluster, in cluster index order.
    pub centroids: Vec<Srgb<u8>>,
    /// The cluster index of each sample.
    pub assignments: Vec<u16>,
}

/// Creates the random number generator used for seeding.
///
/// Without a seed, the generator is seeded from the operating system.
pub(crate) fn rng(seed: Option<u64>) -> Xoroshiro128PlusPlus {
    match seed {
        Some(seed) => Xoroshiro128PlusPlus::seed_from_u64(seed),
        None => Xoroshiro128PlusPlus::from_entropy(),
    }
}

/// Divides each summed component by `count`, rounding halves up,
/// and clamps the result into the `u8` range.
///
/// `count` must be nonzero.
#[inline]
pub(crate) fn rounded_mean(sum: [u64; 3], count: u64) -> Srgb<u8> {
    let [r, g, b] = sum.map(|s| u8::try_from((2 * s + count) / (2 * count)).unwrap_or(u8::MAX));
    Srgb::new(r, g, b)
}

/// Adds `color` to the running component sums.
#[inline]
pub(crate) fn accumulate(sum: &mut [u64; 3], color: Srgb<u8>) {
    sum[0] += u64::from(color.red);
    sum[1] += u64::from(color.green);
    sum[2] += u64::from(color.blue);
}

/// Returns the component-wise mean of `colors`, rounded to the nearest integer (halves up).
///
/// This is exactly the centroid that a single cluster over `colors` converges to.
/// Returns `None` if `colors` is empty.
#[must_use]
pub fn mean_color(colors: &[Srgb<u8>]) -> Option<Srgb<u8>> {
    if colors.is_empty() {
        return None;
    }

    let mut sum = [0; 3];
    for &color in colors {
        accumulate(&mut sum, color);
    }

    Some(rounded_mean(sum, colors.len() as u64))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mean_rounds_halves_up() {
        let colors = [Srgb::new(0, 0, 0), Srgb::new(255, 255, 255)];
        assert_eq!(mean_color(&colors), Some(Srgb::new(128, 128, 128)));

        let colors = [Srgb::new(1, 2, 0), Srgb::new(2, 2, 0), Srgb::new(2, 3, 1)];
        // 5/3 = 1.67, 7/3 = 2.33, 1/3 = 0.33
        assert_eq!(mean_color(&colors), Some(Srgb::new(2, 2, 0)));
    }

    #[test]
    fn mean_of_nothing() {
        assert_eq!(mean_color(&[]), None);
    }

    #[test]
    fn mean_stays_in_range() {
        let colors = vec![Srgb::new(255, 255, 255); 1000];
        assert_eq!(mean_color(&colors), Some(Srgb::new(255, 255, 255)));
    }

    #[test]
    fn centroid_count_is_validated() {
        assert!(Centroids::try_from(Vec::new()).is_err());
        let centroids = Centroids::try_from(vec![Srgb::new(1, 2, 3)]).unwrap();
        assert_eq!(centroids.num_colors(), 1);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;

        let a = rng(Some(7)).gen::<u64>();
        let b = rng(Some(7)).gen::<u64>();
        assert_eq!(a, b);
    }
}
