macro_rules! impl_default_with_new {
    (impl$(<$($generics:tt),*>)? Default for $($type:tt)*) => {
        impl$(<$($generics),*>)? Default for $($type)* {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// This trait defines an interface for any algorithm query in the KD-Tree. In a
/// KD-Tree, the `query` function takes a visitor that implements this trait as
/// well as a reference point that is used to navigate the tree.
///
/// The `accept` function may modify the visitor in some way. The only way to
/// get nodes out of the tree is through the accept function. Every accepted
/// point comes with its index in the tree and its squared distance to the
/// reference point.
///
/// The radius function should return a radius around the reference point that
/// still needs to be searched through. If one wanted to get all of the points in
/// the tree, it would suffice to always return `f32::INFINITY` from `radius_sq`.
/// Points exactly on the radius are still offered to the visitor.
///
/// The lifetime `'a` is the lifetime of the KD-Tree.
pub trait Visitor<'a, P, const N: usize> {
    /// The final result of the visitor.
    type Result;

    /// Return the squared radius around the reference point that still has to be
    /// searched through. This function is assumed to be decreasing. If its value
    /// increases between two calls, it is a logic error.
    fn radius_sq(&self) -> f32;

    /// Accept the point with index `index` of the KD-Tree, at squared distance
    /// `dist_sq` from the reference point.
    fn accept(&mut self, point: &'a P, index: usize, dist_sq: f32);

    /// Consume the visitor into the final result.
    fn result(self) -> Self::Result;

    fn radius(&self) -> f32 {
        self.radius_sq().sqrt()
    }
}

/// A point found by a query, together with its index in the tree.
#[derive(Debug, PartialEq)]
pub struct Neighbor<'a, P> {
    pub point: &'a P,
    pub index: usize,
    pub dist_sq: f32,
}

// Derived impls would require `P: Copy`, but only the reference is copied.
impl<'a, P> Clone for Neighbor<'a, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P> Copy for Neighbor<'a, P> {}

impl<'a, P> Neighbor<'a, P> {
    #[inline]
    pub fn distance(&self) -> f32 {
        self.dist_sq.sqrt()
    }

    // Orders by distance first and by index when the distances are equal.
    #[inline]
    fn precedes(&self, dist_sq: f32, index: usize) -> bool {
        (self.dist_sq, self.index) < (dist_sq, index)
    }
}

/// A visitor that returns the nearest point to the reference point. When more than one point is
/// at the minimal distance, the one with the lowest index wins.
pub struct NearestVisitor<'a, P> {
    min: Option<Neighbor<'a, P>>,
}

impl<'a, P> NearestVisitor<'a, P> {
    pub fn new() -> Self {
        NearestVisitor { min: None }
    }
}

impl<'a, P, const N: usize> Visitor<'a, P, N> for NearestVisitor<'a, P> {
    type Result = Option<Neighbor<'a, P>>;

    fn radius_sq(&self) -> f32 {
        self.min.map_or(f32::INFINITY, |min| min.dist_sq)
    }

    fn accept(&mut self, point: &'a P, index: usize, dist_sq: f32) {
        match self.min {
            Some(min) if min.precedes(dist_sq, index) => {}
            _ => self.min = Some(Neighbor { point, index, dist_sq }),
        }
    }

    fn result(self) -> Option<Neighbor<'a, P>> {
        self.min
    }
}

impl_default_with_new! { impl<'a, P> Default for NearestVisitor<'a, P> }

/// A visitor that returns the `k` nearest points to the reference point, ordered by ascending
/// distance, with ties broken by the lowest index.
pub struct KNearestVisitor<'a, P> {
    k: usize,
    found: Vec<Neighbor<'a, P>>,
}

impl<'a, P> KNearestVisitor<'a, P> {
    pub fn new(k: usize) -> Self {
        KNearestVisitor {
            k,
            // Asking for every point of a huge tree shouldn't reserve more than it can hold.
            found: Vec::with_capacity(k.min(1024)),
        }
    }
}

impl<'a, P, const N: usize> Visitor<'a, P, N> for KNearestVisitor<'a, P> {
    type Result = Vec<Neighbor<'a, P>>;

    fn radius_sq(&self) -> f32 {
        if self.found.len() < self.k {
            f32::INFINITY
        } else {
            // With `k == 0` nothing is ever worth visiting.
            self.found.last().map_or(f32::NEG_INFINITY, |last| last.dist_sq)
        }
    }

    fn accept(&mut self, point: &'a P, index: usize, dist_sq: f32) {
        let pos = self.found.partition_point(|n| n.precedes(dist_sq, index));
        if pos >= self.k {
            return;
        }

        self.found.insert(pos, Neighbor { point, index, dist_sq });
        self.found.truncate(self.k);
    }

    fn result(self) -> Vec<Neighbor<'a, P>> {
        self.found
    }
}
