use std::borrow::Cow;
use std::io;

use crate::{HasCoords, KDTree};

/// A view into one branch of a `KDTree` that can be printed with `ptree`.
pub struct TreeBranch<'a, P, const N: usize> {
    tree: &'a KDTree<P, N>,
    node: Option<usize>,
    depth: usize,
}

impl<'a, P, const N: usize> Clone for TreeBranch<'a, P, N> {
    fn clone(&self) -> Self {
        TreeBranch { tree: self.tree, node: self.node, depth: self.depth }
    }
}

impl<P: HasCoords<N>, const N: usize> KDTree<P, N> {
    pub fn display(&self) -> TreeBranch<'_, P, N> {
        TreeBranch { tree: self, node: self.root, depth: 0 }
    }
}

impl<'a, P, const N: usize> ptree::TreeItem for TreeBranch<'a, P, N>
where
    P: HasCoords<N>,
{
    type Child = TreeBranch<'a, P, N>;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &ptree::Style) -> io::Result<()> {
        if let Some(idx) = self.node {
            let point = self.tree.nodes[idx].data.point();
            let to_paint = format!("#{} {} at axis {}", idx, point, self.depth % N);
            write!(f, "{}", style.paint(to_paint))
        } else {
            write!(f, "Empty branch")
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let node = match self.node {
            Some(idx) => &self.tree.nodes[idx],
            None => return Cow::Owned(Vec::new()),
        };

        if node.left.is_none() && node.right.is_none() {
            return Cow::Owned(Vec::new());
        }

        let branch = |child| TreeBranch { tree: self.tree, node: child, depth: self.depth + 1 };
        Cow::Owned(vec![branch(node.left), branch(node.right)])
    }
}

#[cfg(test)]
mod test {
    use nalgebra as na;

    use crate::KDTree;

    #[test]
    fn test_write_tree() {
        let tree = KDTree::from_vec(vec![
            na::Point2::new(0.0, 0.0),
            na::Point2::new(1.0, 2.0),
            na::Point2::new(3.0, 4.0),
        ]);

        let mut out = Vec::new();
        ptree::write_tree(&tree.display(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("#1"));
        assert!(out.contains("at axis 1"));
    }
}
