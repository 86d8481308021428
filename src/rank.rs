//! Orders clusters by population.

use crate::{kmeans::ClusterOutput, Palette};
use std::cmp::Reverse;

/// Counts the samples assigned to each cluster and returns the centroids
/// ordered by descending count.
///
/// The sort is stable, so clusters with equal counts keep their cluster index order.
/// Every assignment must be a valid index into `centroids`.
#[must_use]
pub fn rank(output: ClusterOutput) -> Palette {
    let ClusterOutput { centroids, assignments } = output;

    let mut counts = vec![0u32; centroids.len()];
    for &i in &assignments {
        counts[usize::from(i)] += 1;
    }

    let mut order = (0..centroids.len()).collect::<Vec<_>>();
    order.sort_by_key(|&i| Reverse(counts[i]));

    Palette {
        colors: order.iter().map(|&i| centroids[i]).collect(),
        counts: order.iter().map(|&i| counts[i]).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    fn output() -> ClusterOutput {
        ClusterOutput {
            centroids: vec![
                Srgb::new(1, 1, 1),
                Srgb::new(2, 2, 2),
                Srgb::new(3, 3, 3),
                Srgb::new(4, 4, 4),
            ],
            assignments: vec![1, 3, 3, 1, 0, 3, 2, 2],
        }
    }

    #[test]
    fn most_populous_first_with_stable_ties() {
        let palette = rank(output());
        assert_eq!(
            palette.colors,
            vec![
                Srgb::new(4, 4, 4),
                Srgb::new(2, 2, 2),
                Srgb::new(3, 3, 3),
                Srgb::new(1, 1, 1),
            ]
        );
        assert_eq!(palette.counts, vec![3, 2, 2, 1]);
    }

    #[test]
    fn ranking_is_repeatable() {
        assert_eq!(rank(output()), rank(output()));
    }

    #[test]
    fn empty_clusters_are_kept_last() {
        let palette = rank(ClusterOutput {
            centroids: vec![Srgb::new(9, 9, 9), Srgb::new(8, 8, 8)],
            assignments: vec![1, 1],
        });
        assert_eq!(palette.colors, vec![Srgb::new(8, 8, 8), Srgb::new(9, 9, 9)]);
        assert_eq!(palette.counts, vec![2, 0]);
    }
}
