use super::{accumulate, rounded_mean, Centroids, ClusterOutput};

use crate::distance::nearest;

use palette::Srgb;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The state of a [`Lloyd`] run after a call to [`Lloyd::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More iterations are needed.
    Running,
    /// An assign phase left every sample in the same cluster.
    Converged,
    /// The iteration cap was reached before converging.
    Exhausted,
}

impl Step {
    /// Whether clustering has terminated.
    #[must_use]
    pub const fn is_done(self) -> bool {
        !matches!(self, Step::Running)
    }
}

/// Lloyd's algorithm as a resumable state machine.
///
/// Each call to [`step`](Lloyd::step) runs one iteration: an assign phase, followed by an
/// update phase unless the assignments did not change. Hosts that need to yield control
/// periodically can do so between steps. [`run`](Lloyd::run) steps until termination.
///
/// Assignments are compared against the previous iteration starting with the second
/// assign phase, and clustering stops early once nothing changes.
/// A centroid left without samples keeps its previous value.
///
/// # Examples
/// ```
/// # use swatchify::kmeans::{Lloyd, Centroids};
/// # use palette::Srgb;
/// # fn main() -> Result<(), swatchify::Error> {
/// let samples = [Srgb::new(10, 20, 30), Srgb::new(12, 22, 32), Srgb::new(200, 100, 50)];
/// let initial = Centroids::try_from(vec![samples[0], samples[2]])?;
///
/// let mut lloyd = Lloyd::new(&samples, initial, Lloyd::DEFAULT_MAX_ITERATIONS);
/// while !lloyd.step().is_done() {
///     // yield to the host here
/// }
///
/// let output = lloyd.into_output();
/// assert_eq!(output.centroids, vec![Srgb::new(11, 21, 31), Srgb::new(200, 100, 50)]);
/// assert_eq!(output.assignments, vec![0, 0, 1]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Lloyd<'a> {
    /// The colors to cluster.
    samples: &'a [Srgb<u8>],
    /// The current centroid of each cluster.
    centroids: Vec<Srgb<u8>>,
    /// The current cluster index of each sample.
    assignments: Vec<u16>,
    /// The number of completed assign phases.
    iterations: u32,
    /// The maximum number of assign phases.
    max_iterations: u32,
    /// The current state.
    state: Step,
}

impl<'a> Lloyd<'a> {
    /// The default maximum number of iterations.
    pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

    /// Creates a new [`Lloyd`] over `samples` starting from `initial` centroids.
    ///
    /// At least one iteration is always run, even if `max_iterations` is `0`.
    #[must_use]
    pub fn new(samples: &'a [Srgb<u8>], initial: Centroids, max_iterations: u32) -> Self {
        Self {
            samples,
            centroids: initial.into_inner(),
            assignments: vec![0; samples.len()],
            iterations: 0,
            max_iterations: max_iterations.max(1),
            state: Step::Running,
        }
    }

    /// The current centroids.
    #[must_use]
    pub fn centroids(&self) -> &[Srgb<u8>] {
        &self.centroids
    }

    /// The current cluster index of each sample.
    #[must_use]
    pub fn assignments(&self) -> &[u16] {
        &self.assignments
    }

    /// The number of iterations run so far.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> Step {
        self.state
    }

    /// Runs a single iteration, returning the new state.
    ///
    /// Does nothing once clustering has terminated.
    pub fn step(&mut self) -> Step {
        if self.state.is_done() {
            return self.state;
        }

        let Self { samples, centroids, assignments, .. } = self;

        let mut changed = 0;
        for (assignment, &sample) in assignments.iter_mut().zip(*samples) {
            let i = nearest(centroids, sample);
            if *assignment != i {
                *assignment = i;
                changed += 1;
            }
        }

        self.advance(changed)
    }

    /// Runs a single iteration with the assign phase spread across threads.
    ///
    /// The result is identical to [`step`](Lloyd::step).
    #[cfg(feature = "threads")]
    pub fn step_par(&mut self) -> Step {
        if self.state.is_done() {
            return self.state;
        }

        let Self { samples, centroids, assignments, .. } = self;
        let centroids = centroids.as_slice();

        let changed = assignments
            .par_iter_mut()
            .zip(samples.par_iter())
            .map(|(assignment, &sample)| {
                let i = nearest(centroids, sample);
                let changed = *assignment != i;
                *assignment = i;
                changed
            })
            .filter(|&changed| changed)
            .count();

        self.advance(changed)
    }

    /// Runs iterations until clustering terminates.
    #[must_use]
    pub fn run(mut self) -> ClusterOutput {
        while !self.step().is_done() {}
        self.into_output()
    }

    /// Runs iterations until clustering terminates, using multiple threads.
    ///
    /// The result is identical to [`run`](Lloyd::run).
    #[cfg(feature = "threads")]
    #[must_use]
    pub fn run_par(mut self) -> ClusterOutput {
        while !self.step_par().is_done() {}
        self.into_output()
    }

    /// Returns the current centroids and assignments.
    #[must_use]
    pub fn into_output(self) -> ClusterOutput {
        log::debug!(
            "k-means finished after {} iterations ({:?})",
            self.iterations,
            self.state
        );

        let Self { centroids, assignments, .. } = self;
        ClusterOutput { centroids, assignments }
    }

    /// Finishes an iteration after its assign phase changed `changed` assignments.
    fn advance(&mut self, changed: usize) -> Step {
        let iteration = self.iterations;
        self.iterations += 1;

        log::trace!("iteration {iteration}: {changed} assignments changed");

        if changed == 0 && iteration > 0 {
            self.state = Step::Converged;
        } else {
            self.update();
            if self.iterations >= self.max_iterations {
                self.state = Step::Exhausted;
            }
        }

        self.state
    }

    /// Moves each centroid to the rounded mean of its assigned samples.
    fn update(&mut self) {
        let Self { samples, centroids, assignments, .. } = self;

        let mut sums = vec![[0; 3]; centroids.len()];
        let mut counts = vec![0u64; centroids.len()];

        for (&sample, &i) in samples.iter().zip(&*assignments) {
            let i = usize::from(i);
            accumulate(&mut sums[i], sample);
            counts[i] += 1;
        }

        for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
            if count > 0 {
                *centroid = rounded_mean(sum, count);
            }
        }
    }
}
