use log::debug;

use crate::collision::CollisionChecker;
use crate::error::{PlanError, Result};
use crate::spatial::SpatialIndex;
use crate::PointN;

/// Adjacency lists over sample indices. Edges are directed: `j` being a neighbor of `i` says
/// nothing about `i` being a neighbor of `j`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roadmap {
    adjacency: Vec<Vec<usize>>,
}

impl Roadmap {
    pub fn new(adjacency: Vec<Vec<usize>>) -> Self {
        Roadmap { adjacency }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbors of `i` in the order they were discovered. Empty for unknown nodes.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        self.adjacency.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, neighbors)| neighbors.iter().map(move |&j| (i, j)))
    }

    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.neighbors(i).contains(&j)
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Adds the reverse of every edge that is missing one. Reverse edges are appended after the
    /// discovered ones, so neighbor lists may grow past the builder's `k`.
    pub fn symmetrize(&mut self) {
        let missing: Vec<(usize, usize)> = self
            .edges()
            .filter(|&(i, j)| !self.has_edge(j, i))
            .collect();

        for (i, j) in missing {
            if !self.adjacency[j].contains(&i) {
                self.adjacency[j].push(i);
            }
        }
    }
}

/// Connects every sample to its `k` nearest samples that can be reached by a collision free
/// edge.
#[derive(Debug, Clone)]
pub struct RoadmapBuilder {
    n_knn: usize,
    symmetric: bool,
}

impl RoadmapBuilder {
    pub fn new(n_knn: usize) -> Self {
        RoadmapBuilder {
            n_knn,
            symmetric: false,
        }
    }

    pub fn with_symmetric_edges(mut self, symmetric: bool) -> Self {
        self.symmetric = symmetric;
        self
    }

    pub fn build<const N: usize>(
        &self,
        samples: &[PointN<N>],
        checker: &CollisionChecker<N>,
    ) -> Result<Roadmap> {
        let index = SpatialIndex::build(samples).map_err(|_| PlanError::EmptySampleSet)?;

        let mut roadmap = Roadmap::new(self.connect_all(samples, &index, checker));
        debug!(
            "roadmap over {} samples has {} edges",
            roadmap.len(),
            roadmap.edge_count()
        );

        if self.symmetric {
            roadmap.symmetrize();
        }

        Ok(roadmap)
    }

    #[cfg(not(feature = "multithreaded"))]
    fn connect_all<const N: usize>(
        &self,
        samples: &[PointN<N>],
        index: &SpatialIndex<N>,
        checker: &CollisionChecker<N>,
    ) -> Vec<Vec<usize>> {
        (0..samples.len())
            .map(|i| self.connect(i, samples, index, checker))
            .collect()
    }

    // Each node only reads the samples and the obstacles, so the nodes are split in contiguous
    // chunks and the lists are concatenated back in order.
    #[cfg(feature = "multithreaded")]
    fn connect_all<const N: usize>(
        &self,
        samples: &[PointN<N>],
        index: &SpatialIndex<N>,
        checker: &CollisionChecker<N>,
    ) -> Vec<Vec<usize>> {
        let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
        let chunk_size = ((samples.len() + threads - 1) / threads).max(1);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..samples.len())
                .step_by(chunk_size)
                .map(|lo| {
                    let hi = (lo + chunk_size).min(samples.len());
                    s.spawn(move || {
                        (lo..hi)
                            .map(|i| self.connect(i, samples, index, checker))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    // Candidates are requested in a growing window instead of all at once. Since the queries
    // order ties by index, every window is a prefix of the full ordering and only the new part
    // of it needs to be examined.
    fn connect<const N: usize>(
        &self,
        i: usize,
        samples: &[PointN<N>],
        index: &SpatialIndex<N>,
        checker: &CollisionChecker<N>,
    ) -> Vec<usize> {
        let mut neighbors = Vec::with_capacity(self.n_knn.min(samples.len()));
        if self.n_knn == 0 {
            return neighbors;
        }

        let p = &samples[i];
        let mut examined = 0;
        let mut window = self.n_knn.saturating_mul(2).saturating_add(1).min(samples.len());

        loop {
            let candidates = index.k_nearest(p, window);

            for &(dist, j) in &candidates[examined..] {
                // Sorted by distance, so every remaining candidate is too far as well.
                if dist >= checker.max_edge_len() {
                    return neighbors;
                }
                if j == i {
                    continue;
                }

                if !checker.is_blocked(p, &samples[j]) {
                    neighbors.push(j);
                    if neighbors.len() == self.n_knn {
                        return neighbors;
                    }
                }
            }

            if window >= samples.len() {
                return neighbors;
            }
            examined = candidates.len();
            window = window.saturating_mul(2).min(samples.len());
        }
    }
}
