//! Selections between the cursor and an anticursor.
//!
//! The selected run is always a sequence of siblings: both ends are lifted
//! to their lowest common ancestor. If that ancestor is a command (the two
//! ends sit in different blocks of it) the whole command is selected.

use std::collections::HashMap;

use super::{Cursor, Notify};
use crate::serialize::push_latex;
use crate::surface::{Edge, Notice};
use crate::tree::{Dir, Fragment, NodeId, Point, Sides, Tree};

/// How the anticursor is reached from one of its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStep {
    /// The anticursor is a gap directly inside this block.
    Gap,
    /// The anticursor lies inside this child.
    Node(NodeId),
}

/// The fixed end of a selection, with its ancestor path precomputed so the
/// common ancestor is found by walking up from the cursor only.
#[derive(Debug, Clone)]
pub struct Anticursor {
    pub point: Point,
    ancestors: HashMap<NodeId, PathStep>,
}

impl Anticursor {
    pub fn new(tree: &Tree, point: Point) -> Self {
        let mut ancestors = HashMap::new();
        ancestors.insert(point.parent, PathStep::Gap);
        let mut child = point.parent;
        while let Some(parent) = tree.parent(child) {
            ancestors.insert(parent, PathStep::Node(child));
            child = parent;
        }
        Self { point, ancestors }
    }

    pub fn step(&self, ancestor: NodeId) -> Option<PathStep> {
        self.ancestors.get(&ancestor).copied()
    }
}

/// A non-empty run of adjacent siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    ends: Sides<NodeId>,
}

impl Selection {
    pub fn end(&self, dir: Dir) -> NodeId {
        self.ends[dir]
    }

    pub fn fragment(&self) -> Fragment {
        Fragment::attached(self.ends.left, self.ends.right)
    }

    pub fn nodes(&self, tree: &Tree) -> Vec<NodeId> {
        self.fragment().nodes(tree)
    }

    pub fn latex(&self, tree: &Tree) -> String {
        let mut out = String::new();
        for id in self.fragment().iter(tree) {
            push_latex(&mut out, &tree.latex(id));
        }
        out
    }
}

/// One end of a would-be selection, as seen from the common ancestor.
#[derive(Debug, Clone, Copy)]
enum End {
    Gap(Point),
    Node(NodeId),
}

impl End {
    /// The node immediately at or right of this end.
    fn right_ref(self) -> Option<NodeId> {
        match self {
            End::Gap(p) => p.side(Dir::Right),
            End::Node(n) => Some(n),
        }
    }
}

/// Whether `anti` lies to the right of `cursor`, both being children (or
/// gaps) of the same block.
fn anticursor_is_right(tree: &Tree, cursor: End, anti: End) -> bool {
    let target = anti.right_ref();
    let start = cursor.right_ref();
    if target == start {
        // a gap immediately left of a node is left of it
        return matches!(anti, End::Node(_));
    }
    let Some(target) = target else {
        return true;
    };
    let mut scan = start;
    while let Some(n) = scan {
        if n == target {
            return true;
        }
        scan = tree.sibling(n, Dir::Right);
    }
    false
}

impl Cursor {
    /// Fix the anticursor at the current point.
    pub fn start_selection(&mut self, tree: &Tree) {
        self.anticursor = Some(Anticursor::new(tree, self.point));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Recompute the selection from the cursor and anticursor. Returns
    /// whether anything is selected.
    pub fn select(&mut self, tree: &Tree) -> bool {
        self.selection = None;
        let Some(anti) = &self.anticursor else {
            return false;
        };
        if anti.point == self.point {
            return false;
        }

        let mut cursor_step = PathStep::Gap;
        let mut ancestor = self.point.parent;
        let (lca, anti_step) = loop {
            if let Some(step) = anti.step(ancestor) {
                break (ancestor, step);
            }
            cursor_step = PathStep::Node(ancestor);
            match tree.parent(ancestor) {
                Some(parent) => ancestor = parent,
                None => panic!("cursor and anticursor are in different trees"),
            }
        };

        let as_end = |step: PathStep, point: Point| match step {
            PathStep::Gap => End::Gap(point),
            PathStep::Node(n) => End::Node(n),
        };
        let cursor_end = as_end(cursor_step, self.point);
        let anti_end = as_end(anti_step, anti.point);
        let (left, right) = if anticursor_is_right(tree, cursor_end, anti_end) {
            (cursor_end, anti_end)
        } else {
            (anti_end, cursor_end)
        };

        let left = match left {
            End::Node(n) => Some(n),
            End::Gap(p) => p.side(Dir::Right),
        };
        let right = match right {
            End::Node(n) => Some(n),
            End::Gap(p) => p.side(Dir::Left),
        };
        let (Some(left), Some(right)) = (left, right) else {
            return false;
        };

        let ends = if tree.is_block(lca) {
            Sides::new(left, right)
        } else {
            Sides::new(lca, lca)
        };
        self.selection = Some(Selection { ends });
        true
    }

    /// Extend or shrink the selection by one step in `dir`.
    pub fn select_dir(&mut self, tree: &Tree, dir: Dir) {
        self.notify(Notify::Select);
        if self.anticursor.is_none() {
            self.start_selection(tree);
        }
        match self.side(dir) {
            Some(node) => {
                let inside = self
                    .selection
                    .filter(|s| s.end(dir) == node)
                    .and_then(|_| self.anticursor.as_ref())
                    .and_then(|a| a.step(node));
                match inside {
                    // the only selected node holds the anticursor: go back in
                    Some(PathStep::Node(block)) => self.ins_at_dir_end(tree, dir.opposite(), block),
                    _ => self.hop(tree, dir, node),
                }
            }
            None => self.select_out_of(tree, dir),
        }
        self.clear_selection();
        self.select(tree);
    }

    /// Move over `node` without entering it.
    pub(super) fn hop(&mut self, tree: &Tree, dir: Dir, node: NodeId) {
        self.point.sides[dir.opposite()] = Some(node);
        self.point.sides[dir] = tree.sibling(node, dir);
    }

    fn select_out_of(&mut self, tree: &Tree, dir: Dir) {
        match tree.parent(self.parent()) {
            Some(command) => self.ins_dir_of(tree, dir, command),
            None => self.notice(Notice::Edge(Edge::SelectOutOf(dir))),
        }
    }

    /// Select from the cursor to the `dir` end of its block.
    pub fn select_to_block_end(&mut self, tree: &Tree, dir: Dir) {
        self.notify(Notify::Select);
        if self.anticursor.is_none() {
            self.start_selection(tree);
        }
        while let Some(node) = self.side(dir) {
            self.hop(tree, dir, node);
        }
        self.clear_selection();
        self.select(tree);
    }

    /// Select from the cursor to the `dir` end of the whole expression.
    pub fn select_to_root_end(&mut self, tree: &Tree, dir: Dir) {
        self.notify(Notify::Select);
        if self.anticursor.is_none() {
            self.start_selection(tree);
        }
        self.ins_at_dir_end(tree, dir, tree.root());
        self.clear_selection();
        self.select(tree);
    }

    /// Select to the end of the block, or one step further when already
    /// there. Shift-Up and Shift-Down use this.
    pub fn select_vertically(&mut self, tree: &Tree, dir: Dir) {
        if self.side(dir).is_some() {
            self.select_to_block_end(tree, dir);
        } else {
            self.select_dir(tree, dir);
        }
    }

    pub fn select_all(&mut self, tree: &Tree) {
        self.notify(Notify::Move);
        let root = tree.root();
        self.ins_at_right_end(tree, root);
        self.start_selection(tree);
        self.ins_at_left_end(tree, root);
        self.select(tree);
    }

    /// Take the selected nodes out of the tree, leaving the cursor where they
    /// were. The returned fragment is detached.
    pub(crate) fn replace_selection(&mut self, tree: &mut Tree) -> Option<Fragment> {
        let selection = self.selection.take()?;
        self.anticursor = None;
        let left = selection.end(Dir::Left);
        let right = selection.end(Dir::Right);
        let parent = tree.parent(left)?;
        let outer_left = tree.sibling(left, Dir::Left);
        let outer_right = tree.sibling(right, Dir::Right);
        let mut fragment = selection.fragment();
        fragment.disown(tree);
        self.with_dir_insert_at(Dir::Left, parent, outer_left, outer_right);
        Some(fragment)
    }

    /// Remove the selection, if any. Returns whether there was one.
    pub(crate) fn delete_selection(&mut self, tree: &mut Tree) -> bool {
        match self.replace_selection(tree) {
            Some(fragment) => {
                fragment.remove(tree);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::tests::tree_of;
    use pretty_assertions::assert_eq;

    fn selected(cursor: &Cursor, tree: &Tree) -> String {
        cursor
            .selection()
            .map(|s| s.latex(tree))
            .unwrap_or_default()
    }

    #[test]
    fn same_point_selects_nothing() {
        let tree = tree_of("ab");
        let mut cursor = Cursor::new(tree.root());
        cursor.start_selection(&tree);
        assert!(!cursor.select(&tree));
        assert!(cursor.selection().is_none());
    }

    #[test]
    fn select_dir_extends_and_retracts() {
        let tree = tree_of("abc");
        let root = tree.root();
        let mut cursor = Cursor::new(root);
        cursor.ins_at_left_end(&tree, root);

        cursor.select_dir(&tree, Dir::Right);
        cursor.select_dir(&tree, Dir::Right);
        assert_eq!(selected(&cursor, &tree), "ab");

        cursor.select_dir(&tree, Dir::Left);
        assert_eq!(selected(&cursor, &tree), "a");
        cursor.select_dir(&tree, Dir::Left);
        assert!(cursor.selection().is_none());
    }

    #[test]
    fn selection_is_symmetric() {
        let tree = tree_of("abcd");
        let root = tree.root();
        let ids: Vec<_> = tree.child_ids(root).collect();
        let p = Point::new(root, Some(ids[0]), Some(ids[1]));
        let q = Point::new(root, Some(ids[2]), Some(ids[3]));

        let mut forward = Cursor::new(root);
        forward.point = p;
        forward.start_selection(&tree);
        forward.point = q;
        forward.select(&tree);

        let mut backward = Cursor::new(root);
        backward.point = q;
        backward.start_selection(&tree);
        backward.point = p;
        backward.select(&tree);

        assert_eq!(forward.selection(), backward.selection());
        assert_eq!(selected(&forward, &tree), "bc");
    }

    #[test]
    fn different_blocks_select_the_whole_command() {
        let tree = tree_of("x\\frac{a}{b}y");
        let root = tree.root();
        let frac = tree.child_ids(root).nth(1).unwrap();
        let numer = tree.end(frac, Dir::Left).unwrap();
        let denom = tree.end(frac, Dir::Right).unwrap();

        let mut cursor = Cursor::new(root);
        cursor.ins_at_left_end(&tree, numer);
        cursor.start_selection(&tree);
        cursor.ins_at_right_end(&tree, denom);
        assert!(cursor.select(&tree));
        assert_eq!(cursor.selection().unwrap().end(Dir::Left), frac);
        assert_eq!(cursor.selection().unwrap().end(Dir::Right), frac);
    }

    #[test]
    fn anticursor_inside_command_selects_it_from_outside() {
        let tree = tree_of("x\\sqrt{ab}y");
        let root = tree.root();
        let sqrt = tree.child_ids(root).nth(1).unwrap();
        let radicand = tree.end(sqrt, Dir::Left).unwrap();

        let mut cursor = Cursor::new(root);
        cursor.ins_at_right_end(&tree, radicand);
        cursor.start_selection(&tree);
        cursor.ins_at_right_end(&tree, root);
        cursor.select(&tree);
        assert_eq!(selected(&cursor, &tree), "\\sqrt{ab}y");
    }

    #[test]
    fn select_out_of_command_then_back_in() {
        let tree = tree_of("\\sqrt{ab}");
        let root = tree.root();
        let sqrt = tree.end(root, Dir::Left).unwrap();
        let radicand = tree.end(sqrt, Dir::Left).unwrap();

        let mut cursor = Cursor::new(root);
        cursor.ins_at_right_end(&tree, radicand);
        cursor.select_dir(&tree, Dir::Right);
        assert_eq!(cursor.point(), Point::new(root, Some(sqrt), None));
        assert_eq!(selected(&cursor, &tree), "\\sqrt{ab}");

        cursor.select_dir(&tree, Dir::Left);
        assert_eq!(cursor.parent(), radicand);
        assert!(cursor.selection().is_none());
    }

    #[test]
    fn select_all_and_replace() {
        let mut tree = tree_of("a+b");
        let root = tree.root();
        let mut cursor = Cursor::new(root);
        cursor.select_all(&tree);
        assert_eq!(selected(&cursor, &tree), "a+b");

        let fragment = cursor.replace_selection(&mut tree).unwrap();
        assert!(tree.is_empty());
        assert_eq!(cursor.point(), Point::new(root, None, None));
        assert_eq!(fragment.nodes(&tree).len(), 3);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn vertical_selection_goes_to_block_end_first() {
        let tree = tree_of("abc");
        let root = tree.root();
        let b = tree.child_ids(root).nth(1).unwrap();
        let mut cursor = Cursor::new(root);
        cursor.ins_left_of(&tree, b);

        cursor.select_vertically(&tree, Dir::Right);
        assert_eq!(selected(&cursor, &tree), "bc");
        cursor.select_vertically(&tree, Dir::Right);
        assert_eq!(cursor.take_notices(), vec![Notice::Edge(Edge::SelectOutOf(Dir::Right))]);
    }
}
