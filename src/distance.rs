//! Euclidean distance between colors in sRGB space.
//!
//! Both the seeder and the clustering loop compare colors with [`squared_distance`],
//! so that they agree exactly on which centroid is nearest.

use palette::Srgb;

/// Returns the squared Euclidean distance between two colors.
///
/// This is exact, since it is computed entirely in integer arithmetic.
/// The maximum possible value is `3 * 255 * 255`.
#[must_use]
#[inline]
pub fn squared_distance(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let dr = i32::from(a.red) - i32::from(b.red);
    let dg = i32::from(a.green) - i32::from(b.green);
    let db = i32::from(a.blue) - i32::from(b.blue);
    dr.unsigned_abs().pow(2) + dg.unsigned_abs().pow(2) + db.unsigned_abs().pow(2)
}

/// Returns the Euclidean distance between two colors.
#[must_use]
#[inline]
pub fn distance(a: Srgb<u8>, b: Srgb<u8>) -> f64 {
    f64::from(squared_distance(a, b)).sqrt()
}

/// Returns the index of the centroid nearest to `color`.
///
/// Ties go to the lowest index. Returns `0` if `centroids` is empty.
#[inline]
pub(crate) fn nearest(centroids: &[Srgb<u8>], color: Srgb<u8>) -> u16 {
    let mut min_index = 0;
    let mut min_distance = u32::MAX;
    for (i, &centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(color, centroid);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    {
        min_index as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_between_extremes() {
        let black = Srgb::new(0, 0, 0);
        let white = Srgb::new(255, 255, 255);
        assert_eq!(squared_distance(black, white), 3 * 255 * 255);
        assert_eq!(squared_distance(white, black), 3 * 255 * 255);
        assert!((distance(black, white) - (3.0f64 * 255.0 * 255.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let color = Srgb::new(17, 99, 240);
        assert_eq!(squared_distance(color, color), 0);
        assert_eq!(distance(color, color), 0.0);
    }

    #[test]
    fn pythagorean_distance() {
        assert_eq!(distance(Srgb::new(0, 0, 0), Srgb::new(3, 4, 0)), 5.0);
    }

    #[test]
    fn nearest_prefers_lowest_index_on_ties() {
        let centroids = [Srgb::new(0, 0, 0), Srgb::new(20, 0, 0), Srgb::new(20, 0, 0)];
        assert_eq!(nearest(&centroids, Srgb::new(10, 0, 0)), 0);
        assert_eq!(nearest(&centroids, Srgb::new(15, 0, 0)), 1);
        assert_eq!(nearest(&centroids, Srgb::new(200, 0, 0)), 1);
    }
}
