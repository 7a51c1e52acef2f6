use super::{Dir, NodeId, Sides, Tree};

/// A gap between two adjacent children of a block.
///
/// `sides[Left]` is the child immediately left of the gap, `None` at the
/// block's left end; likewise for the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub parent: NodeId,
    pub sides: Sides<Option<NodeId>>,
}

impl Point {
    pub fn new(parent: NodeId, left: Option<NodeId>, right: Option<NodeId>) -> Self {
        Self {
            parent,
            sides: Sides::new(left, right),
        }
    }

    pub fn side(&self, dir: Dir) -> Option<NodeId> {
        self.sides[dir]
    }

    /// The gap at the `dir` end of `block`.
    pub fn at_end(tree: &Tree, block: NodeId, dir: Dir) -> Self {
        let mut sides = Sides::default();
        sides[dir.opposite()] = tree.end(block, dir);
        Self {
            parent: block,
            sides,
        }
    }

    /// The gap on the `dir` side of an attached node.
    pub fn beside(tree: &Tree, node: NodeId, dir: Dir) -> Option<Self> {
        let parent = tree.parent(node)?;
        let mut sides = Sides::default();
        sides[dir] = tree.sibling(node, dir);
        sides[dir.opposite()] = Some(node);
        Some(Self { parent, sides })
    }

    /// Whether the point still names an existing gap, e.g. after edits have
    /// invalidated a remembered position.
    pub fn is_valid(&self, tree: &Tree) -> bool {
        if !tree.contains(self.parent) || !tree.is_block(self.parent) {
            return false;
        }
        let attached = |side: Option<NodeId>| {
            side.is_none_or(|id| tree.contains(id) && tree.parent(id) == Some(self.parent))
        };
        if !attached(self.sides.left) || !attached(self.sides.right) {
            return false;
        }
        match (self.sides.left, self.sides.right) {
            (Some(l), r) => tree.sibling(l, Dir::Right) == r,
            (None, r) => tree.end(self.parent, Dir::Left) == r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{NodeKind, Symbol};
    use crate::tree::Fragment;

    #[test]
    fn validity_tracks_edits() {
        let mut tree = Tree::new();
        let root = tree.root();
        assert!(Point::at_end(&tree, root, Dir::Left).is_valid(&tree));

        let a = tree.alloc(NodeKind::Symbol(Symbol::variable('a')));
        Fragment::detached(Some(Sides::new(a, a))).adopt(&mut tree, root, None, None);

        let stale = Point::new(root, None, None);
        assert!(!stale.is_valid(&tree));
        let right_of_a = Point::beside(&tree, a, Dir::Right).unwrap();
        assert_eq!(right_of_a, Point::new(root, Some(a), None));
        assert!(right_of_a.is_valid(&tree));

        Fragment::attached(a, a).remove(&mut tree);
        assert!(!right_of_a.is_valid(&tree));
    }
}
