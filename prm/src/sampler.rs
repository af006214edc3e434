use log::{trace, warn};
use rand::Rng;

use crate::error::{PlanError, Result};
use crate::spatial::SpatialIndex;
use crate::utils::*;
use crate::{PointN, DEFAULT_MAX_ATTEMPTS_PER_SAMPLE};

/// Rejection sampling of free space inside the bounding box of the start and goal points.
#[derive(Debug, Clone)]
pub struct Sampler {
    n_samples: usize,
    max_attempts: usize,
}

impl Sampler {
    pub fn new(n_samples: usize) -> Self {
        Sampler {
            n_samples,
            max_attempts: n_samples.saturating_mul(DEFAULT_MAX_ATTEMPTS_PER_SAMPLE),
        }
    }

    /// Total number of random draws allowed before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns `n_samples` points that are at least `clearance` away from every obstacle,
    /// followed by `start` and `goal`. The start and goal points are never checked.
    pub fn sample<R, const N: usize>(
        &self,
        start: PointN<N>,
        goal: PointN<N>,
        clearance: f32,
        obstacles: &SpatialIndex<N>,
        rng: &mut R,
    ) -> Result<Vec<PointN<N>>>
    where
        R: Rng + ?Sized,
    {
        let range = bounding_box(&start, &goal);
        let mut samples = Vec::with_capacity(self.n_samples + 2);
        let mut attempts = 0;

        while samples.len() < self.n_samples {
            if attempts >= self.max_attempts {
                warn!(
                    "sampling exhausted: {} of {} samples after {} attempts",
                    samples.len(),
                    self.n_samples,
                    attempts
                );
                return Err(PlanError::SamplingExhausted {
                    requested: self.n_samples,
                    accepted: samples.len(),
                    attempts,
                });
            }
            attempts += 1;

            let p = gen_random_in_range(range.clone(), rng);
            if obstacles.nearest_distance(&p) >= clearance {
                samples.push(p);
            }
        }

        trace!("accepted {} samples in {} attempts", samples.len(), attempts);

        samples.push(start);
        samples.push(goal);

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra as na;
    use rand::prelude::*;

    use super::*;

    fn point3(x: f32, y: f32, z: f32) -> na::Point3<f32> {
        na::Point3::new(x, y, z)
    }

    #[test]
    fn samples_are_free_and_inside_the_box() {
        let mut rng = StdRng::seed_from_u64(11);
        let obstacles = SpatialIndex::build(&[point3(5.0, 5.0, 5.0), point3(2.0, 8.0, 1.0)]).unwrap();
        let start = point3(0.0, 10.0, 0.0);
        let goal = point3(10.0, 0.0, 10.0);

        let samples = Sampler::new(200)
            .sample(start, goal, 2.0, &obstacles, &mut rng)
            .unwrap();

        assert_eq!(samples.len(), 202);
        assert_eq!(samples[200], start);
        assert_eq!(samples[201], goal);
        for p in &samples[..200] {
            assert!(obstacles.nearest_distance(p) >= 2.0);
            assert!(p.iter().all(|c| (0.0..=10.0).contains(c)));
        }
    }

    #[test]
    fn start_and_goal_are_appended_unchecked() {
        let mut rng = StdRng::seed_from_u64(11);
        let start = point3(0.0, 0.0, 0.0);
        let goal = point3(10.0, 10.0, 10.0);
        let obstacles = SpatialIndex::build(&[start]).unwrap();

        let samples = Sampler::new(5)
            .sample(start, goal, 1.0, &obstacles, &mut rng)
            .unwrap();

        assert_eq!(&samples[5..], &[start, goal]);
    }

    #[test]
    fn fully_obstructed_box_is_reported() {
        let mut rng = StdRng::seed_from_u64(11);
        let obstacles = SpatialIndex::build(&[point3(0.5, 0.5, 0.5)]).unwrap();

        let err = Sampler::new(10)
            .with_max_attempts(100)
            .sample(point3(0.0, 0.0, 0.0), point3(1.0, 1.0, 1.0), 5.0, &obstacles, &mut rng)
            .unwrap_err();

        assert_eq!(
            err,
            PlanError::SamplingExhausted { requested: 10, accepted: 0, attempts: 100 }
        );
    }

    #[test]
    fn same_seed_gives_same_samples() {
        let obstacles = SpatialIndex::build(&[point3(5.0, 5.0, 5.0)]).unwrap();
        let sample = |seed| {
            Sampler::new(50)
                .sample(
                    point3(0.0, 0.0, 0.0),
                    point3(10.0, 10.0, 10.0),
                    1.0,
                    &obstacles,
                    &mut StdRng::seed_from_u64(seed),
                )
                .unwrap()
        };

        assert_eq!(sample(1), sample(1));
        assert_ne!(sample(1), sample(2));
    }
}
