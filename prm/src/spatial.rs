use log::trace;
use thiserror::Error;

use kd_tree::{KDTree, KNearestVisitor, NearestVisitor};

use crate::PointN;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot build a spatial index over an empty point set")]
pub struct EmptyPointSet;

/// Nearest neighbor queries over one fixed point set (an obstacle snapshot or a sample set).
/// Indices returned by the queries are positions in the slice the index was built from.
#[derive(Debug, Clone)]
pub struct SpatialIndex<const N: usize> {
    tree: KDTree<PointN<N>, N>,
}

impl<const N: usize> SpatialIndex<N> {
    pub fn build(points: &[PointN<N>]) -> Result<SpatialIndex<N>, EmptyPointSet> {
        if points.is_empty() {
            return Err(EmptyPointSet);
        }

        let tree = KDTree::from_vec(points.to_vec());
        trace!("built spatial index over {} points with depth {}", tree.len(), tree.depth());

        Ok(SpatialIndex { tree })
    }

    /// Distance to, and index of, the closest point. Ties go to the lowest index.
    pub fn nearest(&self, query: &PointN<N>) -> (f32, usize) {
        let nearest = self.tree
            .query(query, NearestVisitor::new())
            .expect("spatial index is never empty");
        (nearest.distance(), nearest.index)
    }

    #[inline]
    pub fn nearest_distance(&self, query: &PointN<N>) -> f32 {
        self.nearest(query).0
    }

    /// The `k` closest points as `(distance, index)` pairs, ascending by distance and then by
    /// index. Returns every point when `k` is at least `len()`.
    pub fn k_nearest(&self, query: &PointN<N>, k: usize) -> Vec<(f32, usize)> {
        self.tree
            .query(query, KNearestVisitor::new(k))
            .into_iter()
            .map(|n| (n.distance(), n.index))
            .collect()
    }

    #[inline]
    pub fn point(&self, index: usize) -> Option<&PointN<N>> {
        self.tree.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    // Never true for a built index, kept so `len` has its usual companion.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
