#[cfg(feature = "display")]
pub mod display;

pub mod visitor;

use nalgebra as na;

pub use visitor::{KNearestVisitor, Neighbor, NearestVisitor, Visitor};

pub trait HasCoords<const N: usize> {
    fn coords(&self) -> [f32; N];

    fn point(&self) -> na::Point<f32, N> {
        self.coords().into()
    }

    fn get_coord(&self, axis: usize) -> f32 {
        self.coords()[axis]
    }
}

impl<const N: usize> HasCoords<N> for na::Point<f32, N> {
    #[inline]
    fn coords(&self) -> [f32; N] {
        let mut array = [0.0; N];
        array.copy_from_slice(self.coords.data.as_slice());
        array
    }

    #[inline]
    fn point(&self) -> na::Point<f32, N> {
        *self
    }

    #[inline]
    fn get_coord(&self, axis: usize) -> f32 {
        self[axis]
    }
}

///
/// A static, balanced K-D Tree. Nodes are stored in a vector in the same order as the points
/// they were built from, so the index of a point in the input is also its index in the tree.
/// The tree can't be modified after it's built, a new point set needs a new tree.
///
#[derive(Debug, Clone)]
pub struct KDTree<P, const N: usize> {
    nodes: Vec<Node<P>>,
    root: Option<usize>,
}

#[derive(Debug, Clone)]
struct Node<P> {
    data: P,
    left: Option<usize>,
    right: Option<usize>,
}

impl<P, const N: usize> KDTree<P, N>
where
    P: HasCoords<N>,
{
    pub fn from_vec(points: Vec<P>) -> KDTree<P, N> {
        let mut nodes: Vec<Node<P>> = points
            .into_iter()
            .map(|data| Node { data, left: None, right: None })
            .collect();

        let mut order: Vec<usize> = (0..nodes.len()).collect();
        let root = build_rec(&mut nodes, &mut order, 0);

        KDTree { nodes, root }
    }

    pub fn query<'a, V, Q>(&'a self, p: &Q, mut vis: V) -> V::Result
    where
        Q: HasCoords<N> + ?Sized,
        V: Visitor<'a, P, N>,
    {
        if let Some(root) = self.root {
            self.query_node(root, &mut vis, &p.coords(), 0);
        }
        vis.result()
    }

    fn query_node<'a, V>(&'a self, idx: usize, visitor: &mut V, p: &[f32; N], depth: usize)
    where
        V: Visitor<'a, P, N>,
    {
        let node = &self.nodes[idx];
        let axis = depth % N;

        let p_ax = p[axis];
        let m_ax = node.data.get_coord(axis);

        // We first follow the axis comparison to get a first candidate of nearest point.
        let (fst, snd) = if p_ax <= m_ax {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = fst {
            self.query_node(child, visitor, p, depth + 1);
        }

        let dist_sq = distance_squared(&node.data.coords(), p);
        if dist_sq <= visitor.radius_sq() {
            visitor.accept(&node.data, idx, dist_sq);
        }

        // Inclusive on purpose: a point exactly on the search radius may still win a tie.
        if (p_ax - m_ax).powi(2) <= visitor.radius_sq() {
            if let Some(child) = snd {
                self.query_node(child, visitor, p, depth + 1);
            }
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&P> {
        self.nodes.get(index).map(|node| &node.data)
    }

    /// Iterates the points in their original order.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.nodes.iter().map(|node| &node.data)
    }

    pub fn depth(&self) -> usize {
        self.root
            .map(|root| self.depth_rec(root, 1))
            .unwrap_or(0)
    }

    fn depth_rec(&self, idx: usize, depth: usize) -> usize {
        let node = &self.nodes[idx];
        node.left
            .into_iter()
            .chain(node.right)
            .map(|child| self.depth_rec(child, depth + 1))
            .max()
            .unwrap_or(depth)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<P: HasCoords<N>, const N: usize> FromIterator<P> for KDTree<P, N> {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        KDTree::from_vec(iter.into_iter().collect())
    }
}

// Sorts `order` along the current axis, makes the median the subtree root and recurses on both
// halves. Everything left of the median has a coordinate `<=` to it and everything right `>=`,
// which is all that the pruning in `query_node` relies on.
fn build_rec<P, const N: usize>(
    nodes: &mut [Node<P>],
    order: &mut [usize],
    depth: usize,
) -> Option<usize>
where
    P: HasCoords<N>,
{
    if order.is_empty() {
        return None;
    }

    let axis = depth % N;
    order.sort_unstable_by(|&a, &b| {
        let a = nodes[a].data.get_coord(axis);
        let b = nodes[b].data.get_coord(axis);
        a.total_cmp(&b)
    });

    let mid = order.len() / 2;
    let median = order[mid];
    let (left, right) = order.split_at_mut(mid);

    let left = build_rec(nodes, left, depth + 1);
    let right = build_rec(nodes, &mut right[1..], depth + 1);

    nodes[median].left = left;
    nodes[median].right = right;

    Some(median)
}

#[inline]
fn distance_squared<const N: usize>(a: &[f32; N], b: &[f32; N]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum()
}
