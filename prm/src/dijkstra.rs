use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace};
use nalgebra as na;

use crate::roadmap::Roadmap;
use crate::{Path, PointN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Unseen,
    Open,
    Closed,
}

/// Best known way of reaching a sample during the search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode<const N: usize> {
    pub position: PointN<N>,
    pub cost: f32,
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<const N: usize> {
    /// `None` when the goal can't be reached through the roadmap.
    pub path: Option<Path<N>>,
    /// Nodes in the order they were settled, with their final cost.
    pub settled: Vec<(usize, f32)>,
}

impl<const N: usize> SearchResult<N> {
    fn not_found(settled: Vec<(usize, f32)>) -> Self {
        SearchResult { path: None, settled }
    }

    /// Number of nodes taken out of the open set.
    pub fn iterations(&self) -> usize {
        self.settled.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    cost: f32,
    index: usize,
}

impl Eq for QueueEntry {}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap, equal costs pop the lowest index first.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra search over `roadmap` from `source` to `target`, both indices into `samples`.
///
/// Nodes are only expanded through their own neighbor lists, reverse edges are never assumed.
/// Returns a path ordered from `source` to `target`, or no path when either index is not part
/// of the roadmap or the target can't be reached.
pub fn dijkstra<const N: usize>(
    samples: &[PointN<N>],
    roadmap: &Roadmap,
    source: usize,
    target: usize,
) -> SearchResult<N> {
    let domain = samples.len().min(roadmap.len());
    if source >= domain || target >= domain {
        debug!(
            "source {} or target {} outside of a roadmap with {} nodes",
            source, target, domain
        );
        return SearchResult::not_found(Vec::new());
    }

    if samples[source] == samples[target] {
        return SearchResult {
            path: Some(Path::new(vec![samples[source]], vec![source], 0.0)),
            settled: Vec::new(),
        };
    }

    let mut nodes: Vec<SearchNode<N>> = samples[..domain]
        .iter()
        .map(|&position| SearchNode { position, cost: f32::INFINITY, parent: None })
        .collect();
    let mut state = vec![NodeState::Unseen; domain];
    let mut open = BinaryHeap::new();
    let mut settled = Vec::new();

    nodes[source].cost = 0.0;
    state[source] = NodeState::Open;
    open.push(QueueEntry { cost: 0.0, index: source });

    while let Some(QueueEntry { cost, index }) = open.pop() {
        // Entries left behind by a later relaxation.
        if state[index] == NodeState::Closed || cost > nodes[index].cost {
            continue;
        }

        state[index] = NodeState::Closed;
        settled.push((index, cost));

        if index == target {
            trace!("reached target after settling {} nodes", settled.len());
            let path = reconstruct_path(&nodes, source, target);
            return SearchResult { path: Some(path), settled };
        }

        for &neighbor in roadmap.neighbors(index) {
            if neighbor >= domain || state[neighbor] == NodeState::Closed {
                continue;
            }

            let candidate = cost + na::distance(&nodes[index].position, &nodes[neighbor].position);
            if state[neighbor] == NodeState::Open && candidate >= nodes[neighbor].cost {
                continue;
            }

            let node = &mut nodes[neighbor];
            node.cost = candidate;
            node.parent = Some(index);
            state[neighbor] = NodeState::Open;
            open.push(QueueEntry { cost: candidate, index: neighbor });
        }
    }

    debug!("no path found after settling {} nodes", settled.len());
    SearchResult::not_found(settled)
}

fn reconstruct_path<const N: usize>(nodes: &[SearchNode<N>], source: usize, target: usize) -> Path<N> {
    let mut indices = vec![target];
    let mut curr = target;

    while let Some(parent) = nodes[curr].parent {
        indices.push(parent);
        curr = parent;
    }
    debug_assert_eq!(curr, source);
    indices.reverse();

    let waypoints = indices.iter().map(|&i| nodes[i].position).collect();
    Path::new(waypoints, indices, nodes[target].cost)
}
