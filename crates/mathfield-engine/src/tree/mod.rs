//! The editable math tree.
//!
//! Nodes live in an arena owned by [`Tree`] and refer to each other through
//! [`NodeId`]s: parent, left/right sibling and first/last child. Blocks
//! (sequences of content) and commands (fractions, roots, ...) alternate by
//! level: a block's children are symbols and commands, a command's children
//! are blocks. Only the [`Fragment`] splices rewrite links.

mod error;
mod fragment;
mod node;
mod point;

pub use error::TreeError;
pub use fragment::Fragment;
pub use node::{Dir, Node, NodeId, Sides};
pub use point::Point;

use std::collections::HashMap;

use crate::kinds::{BlockRole, Item, NodeKind};

/// Disposed nodes give their storage back, but their ids are never handed
/// out again, so a stale id stays detectably dead.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: HashMap<NodeId, Node>,
    next_id: usize,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding only an empty root block.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: HashMap::new(),
            next_id: 0,
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::Block(BlockRole::Root));
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.end(self.root, Dir::Left).is_none()
    }

    /// Allocate a detached node.
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(kind));
        id
    }

    /// Free `id` and everything below it. The node must already be detached
    /// from its parent.
    pub(crate) fn dispose(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                let mut child = node.ends.left;
                while let Some(c) = child {
                    child = self.sibling(c, Dir::Right);
                    pending.push(c);
                }
            }
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// # Panics
    ///
    /// If `id` has been disposed; holding a dead id is an editing bug.
    pub fn node(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("node {id} is not live"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(&id) {
            Some(node) => node,
            None => panic!("node {id} is not live"),
        }
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.node_mut(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn sibling(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        self.get(id).and_then(|n| n.siblings[dir])
    }

    pub fn end(&self, id: NodeId, dir: Dir) -> Option<NodeId> {
        self.get(id).and_then(|n| n.ends[dir])
    }

    pub fn is_block(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Block(_))
    }

    /// Symbols are the only childless kind.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Symbol(_))
    }

    /// A block without children, or a command whose blocks are all empty.
    /// Symbols count as empty so deleting towards them removes them.
    pub fn is_empty_node(&self, id: NodeId) -> bool {
        match self.kind(id) {
            NodeKind::Symbol(_) => true,
            NodeKind::Block(_) => self.end(id, Dir::Left).is_none(),
            _ => self.child_ids(id).all(|b| self.end(b, Dir::Left).is_none()),
        }
    }

    /// All children as an attached fragment.
    pub fn children(&self, id: NodeId) -> Fragment {
        match (self.end(id, Dir::Left), self.end(id, Dir::Right)) {
            (Some(l), Some(r)) => Fragment::attached(l, r),
            _ => Fragment::empty(),
        }
    }

    pub fn child_ids(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.end(id, Dir::Left);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.sibling(current, Dir::Right);
            Some(current)
        })
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.parent(id);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.parent(current);
            Some(current)
        })
    }

    /// How many blocks enclose `id`, counting `id` itself when it is a block.
    /// The root block has depth 1.
    pub fn depth(&self, id: NodeId) -> usize {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|&n| self.is_block(n))
            .count()
    }

    /// The child block of `command` playing `role`.
    pub fn block_with_role(&self, command: NodeId, role: BlockRole) -> Option<NodeId> {
        self.child_ids(command)
            .find(|&b| matches!(self.kind(b), NodeKind::Block(r) if *r == role))
    }

    pub fn role(&self, block: NodeId) -> Option<BlockRole> {
        match self.kind(block) {
            NodeKind::Block(role) => Some(*role),
            _ => None,
        }
    }

    /// Build detached nodes for `items`, returned as one detached fragment
    /// ready to be adopted.
    pub fn instantiate(&mut self, items: &[Item]) -> Fragment {
        let mut first = None;
        let mut prev: Option<NodeId> = None;
        for item in items {
            let id = self.build(item);
            if let Some(p) = prev {
                self.node_mut(p).siblings.right = Some(id);
                self.node_mut(id).siblings.left = Some(p);
            }
            first.get_or_insert(id);
            prev = Some(id);
        }
        Fragment::detached(first.zip(prev).map(|(l, r)| Sides::new(l, r)))
    }

    fn build(&mut self, item: &Item) -> NodeId {
        let id = self.alloc(item.kind.clone());
        for block in &item.blocks {
            let block_id = self.alloc(NodeKind::Block(block.role));
            self.instantiate(&block.items)
                .adopt(self, block_id, None, None);
            let last = self.end(id, Dir::Right);
            Fragment::detached(Some(Sides::new(block_id, block_id))).adopt(self, id, last, None);
        }
        id
    }

    /// Check the structural invariants of every node reachable from the
    /// root: sibling links are mutual, first and last children are the ends
    /// of the chain, children point back at their parent, and blocks and
    /// commands alternate by level.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let broken = |node: NodeId, reason: &str| TreeError::BrokenLink {
            node,
            reason: reason.to_string(),
        };
        if self.parent(self.root).is_some() {
            return Err(broken(self.root, "root has a parent"));
        }
        let mut pending = vec![self.root];
        let mut visited = 0usize;
        while let Some(id) = pending.pop() {
            visited += 1;
            if visited > self.nodes.len() {
                return Err(broken(id, "cycle in child links"));
            }
            let node = self.node(id);
            let parent_is_block = self.is_block(id);
            if self.is_leaf(id) && node.ends.left.is_some() {
                return Err(broken(id, "symbol has children"));
            }
            if node.ends.left.is_some() != node.ends.right.is_some() {
                return Err(broken(id, "only one end set"));
            }
            let mut prev = None;
            let mut child = node.ends.left;
            while let Some(c) = child {
                let Some(child_node) = self.get(c) else {
                    return Err(TreeError::Dead(c));
                };
                if child_node.parent != Some(id) {
                    return Err(broken(c, "parent link does not match"));
                }
                if child_node.siblings.left != prev {
                    return Err(broken(c, "left link does not match"));
                }
                if self.is_block(c) == parent_is_block {
                    return Err(broken(c, "blocks and commands do not alternate"));
                }
                pending.push(c);
                prev = Some(c);
                child = child_node.siblings.right;
            }
            if node.ends.right != prev {
                return Err(broken(id, "last child is not the end of the chain"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Item, Symbol};
    use pretty_assertions::assert_eq;

    fn frac_xy() -> Item {
        Item::fraction(
            vec![Item::symbol(Symbol::variable('x'))],
            vec![Item::symbol(Symbol::variable('y'))],
        )
    }

    #[test]
    fn new_tree_is_an_empty_root() {
        let tree = Tree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.depth(tree.root()), 1);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn instantiate_builds_nested_blocks() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut frag = tree.instantiate(&[frac_xy(), Item::symbol(Symbol::digit('2'))]);
        frag.adopt(&mut tree, root, None, None);

        let frac = tree.end(root, Dir::Left).unwrap();
        assert_eq!(tree.kind(frac), &NodeKind::Fraction);
        let numer = tree.block_with_role(frac, BlockRole::Numerator).unwrap();
        let denom = tree.block_with_role(frac, BlockRole::Denominator).unwrap();
        assert_eq!(tree.sibling(numer, Dir::Right), Some(denom));
        assert_eq!(tree.depth(numer), 2);
        assert_eq!(tree.len(), 7);
        assert!(!tree.is_empty_node(frac));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn empty_command_is_empty() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut frag = tree.instantiate(&[Item::fraction(vec![], vec![])]);
        frag.adopt(&mut tree, root, None, None);
        let frac = tree.end(root, Dir::Left).unwrap();
        assert!(tree.is_empty_node(frac));
    }

    #[test]
    fn ancestors_walk_to_the_root() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut frag = tree.instantiate(&[frac_xy()]);
        frag.adopt(&mut tree, root, None, None);
        let frac = tree.end(root, Dir::Left).unwrap();
        let numer = tree.end(frac, Dir::Left).unwrap();
        let x = tree.end(numer, Dir::Left).unwrap();

        let chain: Vec<_> = tree.ancestors(x).collect();
        assert_eq!(chain, vec![numer, frac, root]);
    }

    #[test]
    fn disposed_storage_is_reclaimed_without_reusing_ids() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut last_seen = root;
        for _ in 0..500 {
            tree.children(root).remove(&mut tree);
            let mut frag = tree.instantiate(&[frac_xy()]);
            frag.adopt(&mut tree, root, None, None);
            let frac = tree.end(root, Dir::Left).unwrap();
            assert!(frac > last_seen);
            last_seen = frac;
        }
        assert_eq!(tree.len(), 6);
        assert!(tree.nodes.capacity() < 64);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn invariant_check_catches_broken_links() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut frag = tree.instantiate(&[frac_xy(), frac_xy()]);
        frag.adopt(&mut tree, root, None, None);
        let second = tree.end(root, Dir::Right).unwrap();
        tree.node_mut(second).siblings.left = None;

        assert!(matches!(
            tree.check_invariants(),
            Err(TreeError::BrokenLink { node, .. }) if node == second
        ));
    }
}
