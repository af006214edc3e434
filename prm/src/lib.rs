//! Probabilistic roadmap (PRM) path planning among point obstacles with a clearance radius.
//!
//! Every call plans from scratch for one obstacle snapshot: free space is sampled inside the
//! bounding box of the start and goal, each sample is connected to its nearest collision free
//! neighbors, and the resulting roadmap is searched with Dijkstra.

pub mod builder;
pub mod collision;
pub mod dijkstra;
pub mod error;
pub mod roadmap;
pub mod sampler;
pub mod spatial;

mod utils;

pub use builder::PRMBuilder;
pub use collision::CollisionChecker;
pub use dijkstra::{dijkstra, SearchNode, SearchResult};
pub use error::PlanError;
pub use roadmap::{Roadmap, RoadmapBuilder};
pub use sampler::Sampler;
pub use spatial::{EmptyPointSet, SpatialIndex};

use itertools::Itertools;
use nalgebra as na;
use rand::Rng;

pub type PointN<const N: usize> = na::Point<f32, N>;
pub type Point3 = PointN<3>;

/// Number of random free space samples drawn per invocation.
pub const N_SAMPLE: usize = 500;
/// Maximum number of edges discovered from each sample.
pub const N_KNN: usize = 10;
/// Edges at least this long are never added to the roadmap.
pub const MAX_EDGE_LEN: f32 = 30.0;
pub const DEFAULT_CLEARANCE: f32 = 5.0;
/// Random draws allowed per requested sample before sampling is abandoned.
pub const DEFAULT_MAX_ATTEMPTS_PER_SAMPLE: usize = 1000;

/// A path through the roadmap, from the start to the goal.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<const N: usize> {
    pub waypoints: Vec<PointN<N>>,
    /// Sample index of each waypoint.
    pub indices: Vec<usize>,
    pub cost: f32,
}

impl<const N: usize> Path<N> {
    pub fn new(waypoints: Vec<PointN<N>>, indices: Vec<usize>, cost: f32) -> Self {
        Self { waypoints, indices, cost }
    }

    /// Sum of the distances between consecutive waypoints.
    pub fn length(&self) -> f32 {
        self.waypoints
            .iter()
            .tuple_windows()
            .map(|(a, b)| na::distance(a, b))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn start(&self) -> Option<&PointN<N>> {
        self.waypoints.first()
    }

    pub fn goal(&self) -> Option<&PointN<N>> {
        self.waypoints.last()
    }

    /// The same path, from the goal to the start.
    pub fn reversed(&self) -> Self {
        let mut path = self.clone();
        path.waypoints.reverse();
        path.indices.reverse();
        path
    }
}

/// Everything produced by one planning invocation. The samples and the roadmap are kept so they
/// can be inspected or drawn, the path itself is in `search`.
#[derive(Debug, Clone, PartialEq)]
pub struct PRMResult<const N: usize> {
    /// Free space samples followed by the start and the goal. Only `[start, goal]` when the two
    /// coincide, so don't assume `n_samples + 2` points.
    pub samples: Vec<PointN<N>>,
    pub roadmap: Roadmap,
    pub search: SearchResult<N>,
}

impl<const N: usize> PRMResult<N> {
    pub fn path(&self) -> Option<&Path<N>> {
        self.search.path.as_ref()
    }

    /// Sample index of the start point.
    pub fn source(&self) -> usize {
        self.samples.len() - 2
    }

    /// Sample index of the goal point.
    pub fn target(&self) -> usize {
        self.samples.len() - 1
    }
}

/// Plans a path for one obstacle snapshot with the default parameters. Use `PRMBuilder` to tune
/// the sampling density, the neighbor count or the edge length limit.
pub fn plan_path<R, const N: usize>(
    start: PointN<N>,
    goal: PointN<N>,
    obstacles: &[PointN<N>],
    clearance: f32,
    rng: &mut R,
) -> Result<PRMResult<N>, PlanError>
where
    R: Rng + ?Sized,
{
    PRMBuilder::new(start, goal)
        .extend_obstacles(obstacles.iter().copied())
        .with_clearance(clearance)
        .solve(rng)
}

#[cfg(test)]
mod tests {
    use nalgebra as na;
    use rand::prelude::*;

    use super::*;

    fn point3(x: f32, y: f32, z: f32) -> na::Point3<f32> {
        na::Point3::new(x, y, z)
    }

    fn corner_obstacles() -> Vec<Point3> {
        vec![
            point3(10.0, 50.0, 10.0),
            point3(50.0, 10.0, 50.0),
            point3(10.0, 10.0, 50.0),
            point3(50.0, 50.0, 10.0),
        ]
    }

    // A wall in the x = 10 plane covering the whole bounding box of the query.
    fn wall() -> Vec<Point3> {
        (0..=20)
            .flat_map(|y| (0..=20).map(move |z| point3(10.0, y as f32, z as f32)))
            .collect()
    }

    #[test]
    fn open_space_path_is_close_to_straight() {
        let start = point3(10.0, 10.0, 10.0);
        let goal = point3(50.0, 50.0, 50.0);
        let mut rng = StdRng::seed_from_u64(42);

        let result = plan_path(start, goal, &corner_obstacles(), 1.0, &mut rng).unwrap();
        let path = result.path().expect("open space should be connected");

        let straight = na::distance(&start, &goal);
        assert_eq!(path.start(), Some(&start));
        assert_eq!(path.goal(), Some(&goal));
        assert!(path.cost >= straight);
        assert!(path.cost < 1.5 * straight, "cost {} vs straight {}", path.cost, straight);
    }

    #[test]
    fn wall_blocks_every_path() {
        let mut rng = StdRng::seed_from_u64(42);
        let result = PRMBuilder::new(point3(0.0, 0.0, 0.0), point3(20.0, 20.0, 20.0))
            .extend_obstacles(wall())
            .with_clearance(2.0)
            .with_n_samples(200)
            .solve(&mut rng)
            .unwrap();

        assert!(result.path().is_none());
        assert!(result.roadmap.edge_count() > 0);
        assert!(result.search.iterations() > 1);
    }

    #[test]
    fn start_on_goal_is_trivial() {
        let p = point3(3.0, 4.0, 5.0);
        let mut rng = StdRng::seed_from_u64(42);

        let result = plan_path(p, p, &corner_obstacles(), 1.0, &mut rng).unwrap();
        let path = result.path().unwrap();

        assert_eq!(path.waypoints, vec![p]);
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.length(), 0.0);
        assert_eq!(result.search.iterations(), 0);
        assert_eq!(result.samples, vec![p, p]);
    }

    #[test]
    fn path_follows_roadmap_edges() {
        let start = point3(0.0, 0.0, 0.0);
        let goal = point3(40.0, 30.0, 20.0);
        let obstacles: Vec<_> = {
            let mut rng = StdRng::seed_from_u64(8);
            std::iter::repeat_with(|| rng.gen::<Point3>() * 40.0)
                .filter(|o| na::distance(o, &start) > 3.0 && na::distance(o, &goal) > 3.0)
                .take(30)
                .collect()
        };
        let mut rng = StdRng::seed_from_u64(16);

        let result = plan_path(start, goal, &obstacles, 1.5, &mut rng).unwrap();
        // Edges are directed, so whether the goal is reachable depends on the draw.
        let path = result.path().expect("this draw connects start and goal");

        assert_eq!(path.indices.first(), Some(&result.source()));
        assert_eq!(path.indices.last(), Some(&result.target()));
        for (k, &i) in path.indices.iter().enumerate() {
            assert_eq!(path.waypoints[k], result.samples[i]);
        }
        for (&i, &j) in path.indices.iter().tuple_windows() {
            assert!(result.roadmap.has_edge(i, j));
        }
        assert!((path.cost - path.length()).abs() < 1e-3);

        let reversed = path.reversed();
        assert_eq!(reversed.start(), Some(&goal));
        assert_eq!(reversed.goal(), Some(&start));
    }

    #[test]
    fn same_seed_same_plan() {
        let start = point3(10.0, 10.0, 10.0);
        let goal = point3(50.0, 50.0, 50.0);
        let plan = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            plan_path(start, goal, &corner_obstacles(), 2.0, &mut rng).unwrap()
        };

        let first = plan(5);
        let second = plan(5);

        assert_eq!(first.samples, second.samples);
        assert_eq!(first.roadmap, second.roadmap);
        assert_eq!(first.search, second.search);
        assert_ne!(first.samples, plan(6).samples);
    }

    #[test]
    fn settled_costs_never_decrease() {
        let mut rng = StdRng::seed_from_u64(99);
        let result = PRMBuilder::new(point3(0.0, 0.0, 0.0), point3(20.0, 20.0, 20.0))
            .extend_obstacles(wall())
            .with_clearance(2.0)
            .with_n_samples(200)
            .solve(&mut rng)
            .unwrap();

        assert!(result.search.settled.len() > 1);
        for ((_, a), (_, b)) in result.search.settled.iter().tuple_windows() {
            assert!(a <= b);
        }
    }
}
