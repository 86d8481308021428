use super::Centroids;

use crate::{distance::squared_distance, PaletteSize};

use palette::Srgb;
use rand::{distributions::WeightedIndex, Rng};
use rand_distr::{Distribution, Uniform};

/// Chooses up to `k` initial centroids from `samples` using k-means++ seeding.
///
/// The first centroid is drawn uniformly at random. Each following centroid is drawn with
/// probability proportional to the squared distance between a sample and its nearest
/// already chosen centroid, so already chosen samples (and their duplicates) have weight `0`.
///
/// Fewer than `k` centroids are returned if `samples` has fewer than `k` elements
/// or if every remaining sample coincides with a chosen centroid.
/// The chosen centroids are always distinct colors.
///
/// Returns `None` if `samples` is empty.
#[must_use]
pub fn plus_plus<R: Rng + ?Sized>(
    samples: &[Srgb<u8>],
    k: PaletteSize,
    rng: &mut R,
) -> Option<Centroids> {
    if samples.is_empty() {
        return None;
    }

    let k = k.as_usize().min(samples.len());
    let mut centroids = Vec::with_capacity(k);

    let first = samples[Uniform::new(0, samples.len()).sample(rng)];
    centroids.push(first);

    let mut weights = samples
        .iter()
        .map(|&sample| u64::from(squared_distance(sample, first)))
        .collect::<Vec<_>>();

    while centroids.len() < k {
        // fails only when every weight is zero
        let Ok(distribution) = WeightedIndex::<u64>::new(&weights) else {
            log::debug!(
                "seeded only {} distinct centroids of {k} requested",
                centroids.len()
            );
            break;
        };

        let next = samples[distribution.sample(rng)];
        centroids.push(next);

        for (weight, &sample) in weights.iter_mut().zip(samples) {
            *weight = (*weight).min(u64::from(squared_distance(sample, next)));
        }
    }

    Some(Centroids::new_unchecked(centroids))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{kmeans::rng, tests::*};

    #[test]
    fn empty_samples() {
        assert_eq!(plus_plus(&[], PaletteSize::DEFAULT, &mut rng(Some(0))), None);
    }

    #[test]
    fn identical_samples_seed_one_centroid() {
        let samples = vec![Srgb::new(10, 10, 10); 100];
        let k = PaletteSize::try_from(3u8).unwrap();

        let centroids = plus_plus(&samples, k, &mut rng(Some(0))).unwrap();
        assert_eq!(centroids.into_inner(), vec![Srgb::new(10, 10, 10)]);
    }

    #[test]
    fn centroids_are_distinct_samples() {
        let samples = test_data_1024();
        let k = PaletteSize::try_from(16u8).unwrap();

        for seed in 0..8 {
            let centroids = plus_plus(&samples, k, &mut rng(Some(seed))).unwrap().into_inner();
            assert_eq!(centroids.len(), 16);

            for (i, centroid) in centroids.iter().enumerate() {
                assert!(samples.contains(centroid));
                assert!(!centroids[..i].contains(centroid));
            }
        }
    }

    #[test]
    fn stops_when_distinct_colors_run_out() {
        let mut samples = vec![Srgb::new(200, 0, 0); 50];
        samples.extend(vec![Srgb::new(0, 200, 0); 50]);
        let k = PaletteSize::try_from(5u8).unwrap();

        let mut centroids = plus_plus(&samples, k, &mut rng(Some(3))).unwrap().into_inner();
        centroids.sort_by_key(|c| (c.red, c.green, c.blue));
        assert_eq!(centroids, vec![Srgb::new(0, 200, 0), Srgb::new(200, 0, 0)]);
    }

    #[test]
    fn same_seed_same_centroids() {
        let samples = test_data_1024();
        let k = PaletteSize::try_from(8u8).unwrap();

        let a = plus_plus(&samples, k, &mut rng(Some(42))).unwrap();
        let b = plus_plus(&samples, k, &mut rng(Some(42))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn far_outlier_is_always_picked() {
        let mut samples = vec![Srgb::new(100, 100, 100); 20];
        samples.push(Srgb::new(101, 100, 100));
        samples.push(Srgb::new(250, 10, 250));
        let k = PaletteSize::try_from(3u8).unwrap();

        for seed in 0..16 {
            let centroids = plus_plus(&samples, k, &mut rng(Some(seed))).unwrap();
            assert_eq!(centroids.num_colors(), 3);
            assert!(centroids.as_slice().contains(&Srgb::new(250, 10, 250)));
        }
    }
}
