//! The insertion point and everything that moves it.
//!
//! The cursor is a [`Point`] plus editing state: an optional anticursor
//! (the fixed end of a selection being made), the current selection, and a
//! cache of where the cursor last was in each block so that moving down and
//! back up returns to the same place.
//!
//! ## Module Structure
//!
//! ```text
//! cursor/
//! ├── mod.rs        # Cursor, Notify and primitive positioning
//! ├── movement.rs   # left/right/up/down, Home/End, seek
//! ├── selection.rs  # anticursor, lowest-common-ancestor selection
//! └── edit.rs       # typing, deleting, unwrapping commands
//! ```

mod edit;
mod movement;
mod selection;

pub use selection::{Anticursor, PathStep, Selection};

use std::collections::HashMap;

use crate::surface::Notice;
use crate::tree::{Dir, NodeId, Point, Tree};

/// What kind of action just happened, deciding which transient state to
/// drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notify {
    Move,
    UpDown,
    Select,
    Edit,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    point: Point,
    anticursor: Option<Anticursor>,
    selection: Option<Selection>,
    up_down_cache: HashMap<NodeId, Point>,
    notices: Vec<Notice>,
}

impl Cursor {
    /// A cursor at the left end of the empty block `root`.
    pub fn new(root: NodeId) -> Self {
        Self {
            point: Point::new(root, None, None),
            anticursor: None,
            selection: None,
            up_down_cache: HashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    /// The block the cursor is in.
    pub fn parent(&self) -> NodeId {
        self.point.parent
    }

    pub fn side(&self, dir: Dir) -> Option<NodeId> {
        self.point.side(dir)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn anticursor(&self) -> Option<Point> {
        self.anticursor.as_ref().map(|a| a.point)
    }

    /// Depth of the block holding the cursor; the root block is 1.
    pub fn depth(&self, tree: &Tree) -> usize {
        tree.depth(self.point.parent)
    }

    pub(crate) fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Forget everything transient and sit at the end of `root`.
    pub(crate) fn reset(&mut self, tree: &Tree, root: NodeId) {
        self.anticursor = None;
        self.selection = None;
        self.up_down_cache.clear();
        self.with_dir_insert_at(Dir::Right, root, None, tree.end(root, Dir::Right));
    }

    pub fn notify(&mut self, kind: Notify) {
        match kind {
            Notify::Move | Notify::Edit => {
                self.selection = None;
                self.anticursor = None;
                self.up_down_cache.clear();
            }
            Notify::UpDown => {
                self.selection = None;
                self.anticursor = None;
            }
            Notify::Select => self.up_down_cache.clear(),
        }
    }

    /// Place the cursor in `parent` with `with_dir` on its `dir` side and
    /// `opposite` on the other.
    fn with_dir_insert_at(
        &mut self,
        dir: Dir,
        parent: NodeId,
        with_dir: Option<NodeId>,
        opposite: Option<NodeId>,
    ) {
        let old = self.point.parent;
        self.point.parent = parent;
        self.point.sides[dir] = with_dir;
        self.point.sides[dir.opposite()] = opposite;
        if old != parent {
            self.notices.push(Notice::Blur(old));
            self.notices.push(Notice::Focus(parent));
        }
    }

    /// Put the cursor on the `dir` side of an attached node.
    pub fn ins_dir_of(&mut self, tree: &Tree, dir: Dir, node: NodeId) {
        let Some(parent) = tree.parent(node) else {
            panic!("cannot place the cursor beside detached node {node}");
        };
        self.with_dir_insert_at(dir, parent, tree.sibling(node, dir), Some(node));
    }

    pub fn ins_left_of(&mut self, tree: &Tree, node: NodeId) {
        self.ins_dir_of(tree, Dir::Left, node);
    }

    pub fn ins_right_of(&mut self, tree: &Tree, node: NodeId) {
        self.ins_dir_of(tree, Dir::Right, node);
    }

    /// Put the cursor at the `dir` end of `block`.
    pub fn ins_at_dir_end(&mut self, tree: &Tree, dir: Dir, block: NodeId) {
        self.with_dir_insert_at(dir, block, None, tree.end(block, dir));
    }

    pub fn ins_at_left_end(&mut self, tree: &Tree, block: NodeId) {
        self.ins_at_dir_end(tree, Dir::Left, block);
    }

    pub fn ins_at_right_end(&mut self, tree: &Tree, block: NodeId) {
        self.ins_at_dir_end(tree, Dir::Right, block);
    }

    /// Jump to a previously recorded point.
    pub(crate) fn restore(&mut self, tree: &Tree, point: Point) {
        match point.side(Dir::Right) {
            Some(right) => self.ins_left_of(tree, right),
            None => self.ins_at_right_end(tree, point.parent),
        }
    }
}
