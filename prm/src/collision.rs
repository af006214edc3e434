use std::iter;

use log::trace;
use nalgebra as na;

use crate::spatial::SpatialIndex;
use crate::{PointN, MAX_EDGE_LEN};

/// Decides whether straight edges between two points keep the required clearance from every
/// obstacle center.
///
/// Edges are checked at discrete points spaced roughly `clearance` apart, so the resolution of
/// the check follows the size of the agent. With a small clearance long edges are checked at
/// many points, with a large one the checkpoints can be up to `1.5 * clearance` apart.
#[derive(Debug, Clone, Copy)]
pub struct CollisionChecker<'a, const N: usize> {
    obstacles: &'a SpatialIndex<N>,
    clearance: f32,
    max_edge_len: f32,
}

impl<'a, const N: usize> CollisionChecker<'a, N> {
    pub fn new(obstacles: &'a SpatialIndex<N>, clearance: f32) -> Self {
        CollisionChecker {
            obstacles,
            clearance,
            max_edge_len: MAX_EDGE_LEN,
        }
    }

    /// Edges at least this long are rejected without looking at the obstacles.
    pub fn with_max_edge_len(mut self, max_edge_len: f32) -> Self {
        self.max_edge_len = max_edge_len;
        self
    }

    #[inline]
    pub fn clearance(&self) -> f32 {
        self.clearance
    }

    #[inline]
    pub fn max_edge_len(&self) -> f32 {
        self.max_edge_len
    }

    #[inline]
    pub fn obstacles(&self) -> &'a SpatialIndex<N> {
        self.obstacles
    }

    #[inline]
    pub fn obstacle_distance(&self, p: &PointN<N>) -> f32 {
        self.obstacles.nearest_distance(p)
    }

    /// A point is free when it is strictly farther than `clearance` from every obstacle.
    #[inline]
    pub fn is_free(&self, p: &PointN<N>) -> bool {
        self.obstacle_distance(p) > self.clearance
    }

    /// The points checked along the edge from `p` to `q`: `round(d / clearance)` evenly spaced
    /// points starting at `p`, then `q` itself. Edges shorter than half the clearance are only
    /// checked at `q`, and a zero-length edge is a single check at `p`.
    pub fn checkpoints(&self, p: &PointN<N>, q: &PointN<N>) -> impl Iterator<Item = PointN<N>> {
        let (p, q) = (*p, *q);
        let steps = (na::distance(&p, &q) / self.clearance).round() as usize;
        let dir = q - p;

        (0..steps)
            .map(move |i| p + dir * (i as f32 / steps as f32))
            .chain(iter::once(q))
    }

    /// Returns `true` if the edge is too long or any of its checkpoints is within `clearance` of
    /// an obstacle. Long edges count as blocked so that roadmaps stay sparse.
    pub fn is_blocked(&self, p: &PointN<N>, q: &PointN<N>) -> bool {
        let d = na::distance(p, q);
        if d >= self.max_edge_len {
            trace!("edge of length {} exceeds the maximum of {}", d, self.max_edge_len);
            return true;
        }

        self.checkpoints(p, q).any(|c| !self.is_free(&c))
    }
}
