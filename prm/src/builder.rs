use log::debug;
use rand::Rng;

use crate::collision::CollisionChecker;
use crate::dijkstra::dijkstra;
use crate::error::{PlanError, Result};
use crate::roadmap::RoadmapBuilder;
use crate::sampler::Sampler;
use crate::spatial::SpatialIndex;
use crate::{PRMResult, PointN};
use crate::{DEFAULT_CLEARANCE, DEFAULT_MAX_ATTEMPTS_PER_SAMPLE, MAX_EDGE_LEN, N_KNN, N_SAMPLE};

/// Configures and runs one planning invocation over a single obstacle snapshot.
///
/// Every parameter left unset falls back to the crate level defaults, the `get_*` functions
/// report the values that `solve` will actually use.
#[derive(Debug, Clone)]
pub struct PRMBuilder<const N: usize> {
    from: PointN<N>,
    to: PointN<N>,
    obstacles: Vec<PointN<N>>,
    clearance: Option<f32>,
    n_samples: Option<usize>,
    n_knn: Option<usize>,
    max_edge_len: Option<f32>,
    max_sample_attempts: Option<usize>,
    symmetric_edges: bool,
    validate_endpoints: bool,
}

impl<const N: usize> PRMBuilder<N> {
    pub fn new(from: PointN<N>, to: PointN<N>) -> PRMBuilder<N> {
        PRMBuilder {
            from,
            to,
            obstacles: Vec::new(),
            clearance: None,
            n_samples: None,
            n_knn: None,
            max_edge_len: None,
            max_sample_attempts: None,
            symmetric_edges: false,
            validate_endpoints: false,
        }
    }

    pub fn add_obstacle(mut self, obstacle: PointN<N>) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn extend_obstacles(mut self, obstacles: impl IntoIterator<Item = PointN<N>>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn with_clearance(mut self, clearance: f32) -> Self {
        self.clearance.replace(clearance);
        self
    }

    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples.replace(n_samples);
        self
    }

    pub fn with_n_knn(mut self, n_knn: usize) -> Self {
        self.n_knn.replace(n_knn);
        self
    }

    pub fn with_max_edge_len(mut self, max_edge_len: f32) -> Self {
        self.max_edge_len.replace(max_edge_len);
        self
    }

    pub fn with_max_sample_attempts(mut self, max_attempts: usize) -> Self {
        self.max_sample_attempts.replace(max_attempts);
        self
    }

    /// Add the reverse of every discovered edge to the roadmap.
    pub fn with_symmetric_edges(mut self, symmetric: bool) -> Self {
        self.symmetric_edges = symmetric;
        self
    }

    /// Reject start or goal points closer than `clearance` to an obstacle instead of letting
    /// them end up isolated in the roadmap.
    pub fn with_validate_endpoints(mut self, validate: bool) -> Self {
        self.validate_endpoints = validate;
        self
    }

    pub fn solve<R: Rng + ?Sized>(self, rng: &mut R) -> Result<PRMResult<N>> {
        let clearance = self.get_clearance();
        if !(clearance.is_finite() && clearance > 0.0) {
            return Err(PlanError::InvalidClearance(clearance));
        }

        let obstacles = SpatialIndex::build(&self.obstacles).map_err(|_| PlanError::EmptyObstacleSet)?;
        let checker = CollisionChecker::new(&obstacles, clearance)
            .with_max_edge_len(self.get_max_edge_len());

        if self.validate_endpoints {
            if checker.obstacle_distance(&self.from) < clearance {
                return Err(PlanError::StartInCollision);
            }
            if checker.obstacle_distance(&self.to) < clearance {
                return Err(PlanError::GoalInCollision);
            }
        }

        let samples = if self.from == self.to {
            debug!("start and goal coincide, skipping free space sampling");
            vec![self.from, self.to]
        } else {
            Sampler::new(self.get_n_samples())
                .with_max_attempts(self.get_max_sample_attempts())
                .sample(self.from, self.to, clearance, &obstacles, rng)?
        };

        let roadmap = RoadmapBuilder::new(self.get_n_knn())
            .with_symmetric_edges(self.symmetric_edges)
            .build(&samples, &checker)?;

        let (source, target) = (samples.len() - 2, samples.len() - 1);
        let search = dijkstra(&samples, &roadmap, source, target);

        match &search.path {
            Some(path) => debug!(
                "found path with {} waypoints and cost {} after {} iterations",
                path.len(),
                path.cost,
                search.iterations()
            ),
            None => debug!("no path after {} iterations", search.iterations()),
        }

        Ok(PRMResult { samples, roadmap, search })
    }

    pub fn get_from(&self) -> PointN<N> {
        self.from
    }

    pub fn get_to(&self) -> PointN<N> {
        self.to
    }

    pub fn get_obstacles(&self) -> &[PointN<N>] {
        self.obstacles.as_slice()
    }

    pub fn get_clearance(&self) -> f32 {
        self.clearance.unwrap_or(DEFAULT_CLEARANCE)
    }

    pub fn get_n_samples(&self) -> usize {
        self.n_samples.unwrap_or(N_SAMPLE)
    }

    pub fn get_n_knn(&self) -> usize {
        self.n_knn.unwrap_or(N_KNN)
    }

    pub fn get_max_edge_len(&self) -> f32 {
        self.max_edge_len.unwrap_or(MAX_EDGE_LEN)
    }

    pub fn get_max_sample_attempts(&self) -> usize {
        self.max_sample_attempts
            .unwrap_or_else(|| self.get_n_samples().saturating_mul(DEFAULT_MAX_ATTEMPTS_PER_SAMPLE))
    }
}
