//! Contiguous sibling runs and the two splice primitives.
//!
//! Every structural edit in the editor is a [`Fragment::disown`] followed by
//! a [`Fragment::adopt`] somewhere else (or a removal). Both rewrite only the
//! boundary links, so moving a run costs the same as moving one node, apart
//! from updating the parent pointers of the moved nodes.

use super::{Dir, NodeId, Sides, Tree, TreeError};

/// A run of adjacent siblings, or nothing.
///
/// A fragment is either adopted (its nodes are linked into a parent) or
/// detached (its nodes form a free-standing sibling chain).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    ends: Option<Sides<NodeId>>,
    adopted: bool,
}

impl Fragment {
    pub fn empty() -> Self {
        Self {
            ends: None,
            adopted: false,
        }
    }

    /// A run of siblings that are currently linked under a parent.
    pub fn attached(left: NodeId, right: NodeId) -> Self {
        Self {
            ends: Some(Sides::new(left, right)),
            adopted: true,
        }
    }

    /// A free-standing chain, as produced by [`Tree::instantiate`].
    pub(crate) fn detached(ends: Option<Sides<NodeId>>) -> Self {
        Self {
            ends,
            adopted: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_none()
    }

    pub fn is_adopted(&self) -> bool {
        self.adopted
    }

    pub fn ends(&self) -> Option<Sides<NodeId>> {
        self.ends
    }

    pub fn end(&self, dir: Dir) -> Option<NodeId> {
        self.ends.map(|ends| ends[dir])
    }

    /// The nodes of the run, left to right.
    pub fn nodes(&self, tree: &Tree) -> Vec<NodeId> {
        self.chain(tree).unwrap_or_default()
    }

    fn chain(&self, tree: &Tree) -> Result<Vec<NodeId>, TreeError> {
        let Some(ends) = self.ends else {
            return Ok(Vec::new());
        };
        let mut nodes = Vec::new();
        let mut next = Some(ends.left);
        while let Some(id) = next {
            if !tree.contains(id) {
                return Err(TreeError::Dead(id));
            }
            nodes.push(id);
            if id == ends.right {
                return Ok(nodes);
            }
            if nodes.len() > tree.len() {
                break;
            }
            next = tree.sibling(id, Dir::Right);
        }
        Err(TreeError::BrokenChain {
            left: ends.left,
            right: ends.right,
        })
    }

    /// Link this detached run under `parent` between `left` and `right`.
    ///
    /// Every precondition is checked before any link is touched, so on error
    /// the tree is unchanged. An empty fragment is a no-op.
    pub fn try_adopt(
        &mut self,
        tree: &mut Tree,
        parent: NodeId,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) -> Result<(), TreeError> {
        let Some(ends) = self.ends else {
            return Ok(());
        };
        if self.adopted {
            return Err(TreeError::AlreadyAdopted);
        }
        if !tree.contains(parent) {
            return Err(TreeError::Dead(parent));
        }
        match (left, right) {
            (Some(l), Some(r)) => {
                child_of(tree, l, parent)?;
                child_of(tree, r, parent)?;
                if tree.sibling(l, Dir::Right) != Some(r) {
                    return Err(TreeError::NotAdjacent { left: l, right: r });
                }
            }
            (Some(l), None) => {
                child_of(tree, l, parent)?;
                if tree.end(parent, Dir::Right) != Some(l) {
                    return Err(TreeError::NotAtEnd {
                        node: l,
                        parent,
                        dir: Dir::Right,
                    });
                }
            }
            (None, Some(r)) => {
                child_of(tree, r, parent)?;
                if tree.end(parent, Dir::Left) != Some(r) {
                    return Err(TreeError::NotAtEnd {
                        node: r,
                        parent,
                        dir: Dir::Left,
                    });
                }
            }
            (None, None) => {
                if tree.end(parent, Dir::Left).is_some() {
                    return Err(TreeError::ParentNotEmpty(parent));
                }
            }
        }

        let nodes = self.chain(tree)?;
        for neighbour in [left, right].into_iter().flatten() {
            if nodes.contains(&neighbour) {
                return Err(TreeError::Overlap(neighbour));
            }
        }
        let lineage: Vec<NodeId> = std::iter::once(parent)
            .chain(tree.ancestors(parent))
            .collect();
        if let Some(&node) = nodes.iter().find(|n| lineage.contains(n)) {
            return Err(TreeError::Cycle { node, parent });
        }

        match left {
            Some(l) => tree.node_mut(l).siblings.right = Some(ends.left),
            None => tree.node_mut(parent).ends.left = Some(ends.left),
        }
        match right {
            Some(r) => tree.node_mut(r).siblings.left = Some(ends.right),
            None => tree.node_mut(parent).ends.right = Some(ends.right),
        }
        tree.node_mut(ends.left).siblings.left = left;
        tree.node_mut(ends.right).siblings.right = right;
        for id in nodes {
            tree.node_mut(id).parent = Some(parent);
        }
        self.adopted = true;
        Ok(())
    }

    /// [`Fragment::try_adopt`] for callers that have already established the
    /// preconditions.
    ///
    /// # Panics
    ///
    /// On any violated precondition; that is always an editing bug.
    pub fn adopt(
        &mut self,
        tree: &mut Tree,
        parent: NodeId,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) {
        if let Err(e) = self.try_adopt(tree, parent, left, right) {
            panic!("invalid splice under {parent}: {e}");
        }
    }

    /// Unlink the run from its parent, leaving a detached chain. Does nothing
    /// for an empty or already detached fragment.
    pub fn disown(&mut self, tree: &mut Tree) {
        let Some(ends) = self.ends else {
            return;
        };
        if !self.adopted {
            return;
        }
        let nodes = self.nodes(tree);
        let left = tree.sibling(ends.left, Dir::Left);
        let right = tree.sibling(ends.right, Dir::Right);
        if let Some(parent) = tree.parent(ends.left) {
            match left {
                Some(l) => tree.node_mut(l).siblings.right = right,
                None => tree.node_mut(parent).ends.left = right,
            }
            match right {
                Some(r) => tree.node_mut(r).siblings.left = left,
                None => tree.node_mut(parent).ends.right = left,
            }
        }
        tree.node_mut(ends.left).siblings.left = None;
        tree.node_mut(ends.right).siblings.right = None;
        for id in nodes {
            tree.node_mut(id).parent = None;
        }
        self.adopted = false;
    }

    /// Disown the run and free every node in it.
    pub fn remove(mut self, tree: &mut Tree) {
        self.disown(tree);
        for id in self.nodes(tree) {
            tree.dispose(id);
        }
    }

    /// Iterate the run left to right.
    pub fn iter<'t>(&self, tree: &'t Tree) -> impl Iterator<Item = NodeId> + 't {
        let last = self.ends.map(|e| e.right);
        let mut next = self.ends.map(|e| e.left);
        std::iter::from_fn(move || {
            let id = next?;
            next = if Some(id) == last {
                None
            } else {
                tree.sibling(id, Dir::Right)
            };
            Some(id)
        })
    }
}

fn child_of(tree: &Tree, node: NodeId, parent: NodeId) -> Result<(), TreeError> {
    if tree.contains(node) && tree.parent(node) == Some(parent) {
        Ok(())
    } else {
        Err(TreeError::NotAChild { node, parent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{BlockRole, NodeKind, Symbol};
    use pretty_assertions::assert_eq;

    fn symbols(tree: &mut Tree, letters: &str) -> Vec<NodeId> {
        letters
            .chars()
            .map(|c| tree.alloc(NodeKind::Symbol(Symbol::variable(c))))
            .collect()
    }

    fn adopt_each(tree: &mut Tree, parent: NodeId, ids: &[NodeId]) {
        for &id in ids {
            let left = tree.end(parent, Dir::Right);
            Fragment::detached(Some(Sides::new(id, id))).adopt(tree, parent, left, None);
        }
    }

    fn letters(tree: &Tree, parent: NodeId) -> String {
        tree.latex(parent)
    }

    #[test]
    fn adopt_into_empty_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids = symbols(&mut tree, "a");
        let mut frag = Fragment::detached(Some(Sides::new(ids[0], ids[0])));
        frag.adopt(&mut tree, root, None, None);

        assert!(frag.is_adopted());
        assert_eq!(tree.end(root, Dir::Left), Some(ids[0]));
        assert_eq!(tree.end(root, Dir::Right), Some(ids[0]));
        assert_eq!(tree.parent(ids[0]), Some(root));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn disown_middle_then_adopt_at_end() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids = symbols(&mut tree, "abcd");
        adopt_each(&mut tree, root, &ids);

        let mut middle = Fragment::attached(ids[1], ids[2]);
        middle.disown(&mut tree);
        assert_eq!(letters(&tree, root), "ad");
        assert_eq!(tree.sibling(ids[0], Dir::Right), Some(ids[3]));
        assert_eq!(tree.parent(ids[1]), None);
        tree.check_invariants().unwrap();

        middle.adopt(&mut tree, root, Some(ids[3]), None);
        assert_eq!(letters(&tree, root), "adbc");
        tree.check_invariants().unwrap();
    }

    #[test]
    fn disown_is_noop_when_detached() {
        let mut tree = Tree::new();
        let ids = symbols(&mut tree, "ab");
        tree.node_mut(ids[0]).siblings.right = Some(ids[1]);
        tree.node_mut(ids[1]).siblings.left = Some(ids[0]);
        let mut frag = Fragment::detached(Some(Sides::new(ids[0], ids[1])));
        frag.disown(&mut tree);
        assert_eq!(tree.sibling(ids[0], Dir::Right), Some(ids[1]));
        assert!(!frag.is_adopted());
    }

    #[test]
    fn empty_fragment_is_noop() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut frag = Fragment::empty();
        frag.try_adopt(&mut tree, root, None, None).unwrap();
        frag.disown(&mut tree);
        assert_eq!(frag.iter(&tree).count(), 0);
        assert_eq!(tree.end(root, Dir::Left), None);
    }

    #[test]
    fn rejects_non_adjacent_neighbours() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids = symbols(&mut tree, "abcx");
        adopt_each(&mut tree, root, &ids[..3]);

        let mut frag = Fragment::detached(Some(Sides::new(ids[3], ids[3])));
        let err = frag
            .try_adopt(&mut tree, root, Some(ids[0]), Some(ids[2]))
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::NotAdjacent {
                left: ids[0],
                right: ids[2]
            }
        );
        assert_eq!(letters(&tree, root), "abc");
        tree.check_invariants().unwrap();
    }

    #[test]
    fn rejects_left_neighbour_that_is_not_the_end() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids = symbols(&mut tree, "abx");
        adopt_each(&mut tree, root, &ids[..2]);

        let mut frag = Fragment::detached(Some(Sides::new(ids[2], ids[2])));
        let err = frag
            .try_adopt(&mut tree, root, Some(ids[0]), None)
            .unwrap_err();
        assert!(matches!(err, TreeError::NotAtEnd { dir: Dir::Right, .. }));
    }

    #[test]
    fn rejects_missing_neighbours_for_non_empty_parent() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids = symbols(&mut tree, "ax");
        adopt_each(&mut tree, root, &ids[..1]);

        let mut frag = Fragment::detached(Some(Sides::new(ids[1], ids[1])));
        assert_eq!(
            frag.try_adopt(&mut tree, root, None, None),
            Err(TreeError::ParentNotEmpty(root))
        );
    }

    #[test]
    fn rejects_double_adoption() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids = symbols(&mut tree, "a");
        adopt_each(&mut tree, root, &ids);

        let mut frag = Fragment::attached(ids[0], ids[0]);
        assert_eq!(
            frag.try_adopt(&mut tree, root, Some(ids[0]), None),
            Err(TreeError::AlreadyAdopted)
        );
    }

    #[test]
    fn rejects_adopting_an_ancestor() {
        let mut tree = Tree::new();
        let root = tree.root();
        let frac = tree.alloc(NodeKind::Fraction);
        adopt_each(&mut tree, root, &[frac]);
        let numer = tree.alloc(NodeKind::Block(BlockRole::Numerator));
        adopt_each(&mut tree, frac, &[numer]);

        let mut whole = Fragment::attached(frac, frac);
        whole.disown(&mut tree);
        let err = whole.try_adopt(&mut tree, numer, None, None).unwrap_err();
        assert_eq!(
            err,
            TreeError::Cycle {
                node: frac,
                parent: numer
            }
        );
    }

    #[test]
    #[should_panic(expected = "invalid splice")]
    fn adopt_panics_on_violation() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids = symbols(&mut tree, "ab");
        let mut frag = Fragment::detached(Some(Sides::new(ids[0], ids[0])));
        // `b` is not a child of anything
        frag.adopt(&mut tree, root, Some(ids[1]), None);
    }

    #[test]
    fn remove_frees_subtrees() {
        let mut tree = Tree::new();
        let root = tree.root();
        let frac = tree.alloc(NodeKind::Fraction);
        adopt_each(&mut tree, root, &[frac]);
        let numer = tree.alloc(NodeKind::Block(BlockRole::Numerator));
        adopt_each(&mut tree, frac, &[numer]);
        let before = tree.len();

        Fragment::attached(frac, frac).remove(&mut tree);
        assert!(!tree.contains(frac));
        assert!(!tree.contains(numer));
        assert_eq!(tree.len(), before - 2);
        assert_eq!(tree.end(root, Dir::Left), None);
        tree.check_invariants().unwrap();
    }
}
