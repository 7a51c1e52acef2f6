use mathfield_config::Vertical;

use super::{Cursor, Notify};
use crate::kinds::{self, VerticalExit};
use crate::layout::{Geometry, point_x};
use crate::surface::{Edge, Notice};
use crate::tree::{Dir, NodeId, Tree};

impl Cursor {
    /// One step left or right. Collapses a selection to its `dir` end.
    ///
    /// `into` names the block to enter when moving into or out of a command
    /// sideways, e.g. always the numerator of a fraction.
    pub fn move_dir(&mut self, tree: &Tree, dir: Dir, into: Option<Vertical>) {
        if let Some(selection) = self.selection {
            self.ins_dir_of(tree, dir, selection.end(dir));
        } else if let Some(node) = self.side(dir) {
            self.move_towards(tree, dir, node, into);
        } else {
            self.move_out_of(tree, dir, into);
        }
        self.notify(Notify::Move);
    }

    /// Hop over a symbol, or enter a command at its near end.
    pub(crate) fn move_towards(
        &mut self,
        tree: &Tree,
        dir: Dir,
        node: NodeId,
        into: Option<Vertical>,
    ) {
        if tree.is_leaf(node) {
            self.hop(tree, dir, node);
            return;
        }
        let block = into
            .and_then(|v| kinds::into_block(tree, node, v))
            .or_else(|| tree.end(node, dir.opposite()));
        match block {
            Some(block) => self.ins_at_dir_end(tree, dir.opposite(), block),
            None => self.hop(tree, dir, node),
        }
    }

    /// Leave the current block: into the next block of the same command, or
    /// out beside the command.
    fn move_out_of(&mut self, tree: &Tree, dir: Dir, into: Option<Vertical>) {
        let block = self.parent();
        let Some(command) = tree.parent(block) else {
            self.notice(Notice::Edge(Edge::MoveOutOf(dir)));
            return;
        };
        let target = into.and_then(|v| kinds::into_block(tree, command, v));
        match (target, tree.sibling(block, dir)) {
            (None, Some(next)) => self.ins_at_dir_end(tree, dir.opposite(), next),
            _ => self.ins_dir_of(tree, dir, command),
        }
    }

    /// Home and End.
    pub fn move_to_block_end(&mut self, tree: &Tree, dir: Dir) {
        self.notify(Notify::Move);
        self.ins_at_dir_end(tree, dir, self.parent());
    }

    /// Ctrl-Home and Ctrl-End.
    pub fn move_to_root_end(&mut self, tree: &Tree, dir: Dir) {
        self.notify(Notify::Move);
        self.ins_at_dir_end(tree, dir, tree.root());
    }

    /// Tab and Shift-Tab: leave the current command, or report the edge.
    pub fn escape_dir(&mut self, tree: &Tree, dir: Dir) {
        self.notify(Notify::Move);
        match tree.parent(self.parent()) {
            Some(command) => self.ins_dir_of(tree, dir, command),
            None => self.notice(Notice::Edge(Edge::MoveOutOf(dir))),
        }
    }

    /// Up or down. Enters an adjacent command's block for that direction,
    /// otherwise asks each enclosing block in turn where to go.
    pub fn move_vertically(&mut self, tree: &Tree, geometry: &dyn Geometry, vertical: Vertical) {
        self.notify(Notify::UpDown);
        if let Some(right) = self.side(Dir::Right)
            && let Some(block) = kinds::into_block(tree, right, vertical)
        {
            self.ins_at_left_end(tree, block);
            return;
        }
        if let Some(left) = self.side(Dir::Left)
            && let Some(block) = kinds::into_block(tree, left, vertical)
        {
            self.ins_at_right_end(tree, block);
            return;
        }
        let mut ancestor = Some(self.parent());
        while let Some(block) = ancestor {
            if let Some(exit) = kinds::out_of_block(tree, block, vertical) {
                match exit {
                    VerticalExit::Jump(to) => self.jump_vertically(tree, geometry, block, to),
                    VerticalExit::BesideCommand => {
                        if let Some(command) = tree.parent(block) {
                            self.beside_command(tree, command);
                        }
                    }
                }
                return;
            }
            ancestor = tree.parent(block);
        }
        let edge = match vertical {
            Vertical::Up => Edge::UpOutOf,
            Vertical::Down => Edge::DownOutOf,
        };
        self.notice(Notice::Edge(edge));
    }

    /// Move from `from` to its sibling block `to`, returning to where the
    /// cursor last left `to` if that point is still valid.
    fn jump_vertically(&mut self, tree: &Tree, geometry: &dyn Geometry, from: NodeId, to: NodeId) {
        self.up_down_cache.insert(from, self.point);
        let cached = self
            .up_down_cache
            .get(&to)
            .copied()
            .filter(|p| p.is_valid(tree));
        match cached {
            Some(point) => self.restore(tree, point),
            None => match point_x(geometry, &self.point) {
                Some(x) => self.seek_in_block(tree, geometry, to, x),
                None => self.ins_at_right_end(tree, to),
            },
        }
    }

    /// Left of `command`, unless the cursor is at the end of its block and of
    /// every block between it and `command`.
    fn beside_command(&mut self, tree: &Tree, command: NodeId) {
        let mut has_right = self.side(Dir::Right).is_some();
        let mut enclosing = tree.parent(self.parent());
        while !has_right {
            match enclosing {
                Some(c) if c != command => {
                    has_right = tree.sibling(c, Dir::Right).is_some();
                    enclosing = tree.parent(c).and_then(|b| tree.parent(b));
                }
                _ => break,
            }
        }
        if has_right {
            self.ins_left_of(tree, command);
        } else {
            self.ins_right_of(tree, command);
        }
    }

    /// Put the cursor at the gap nearest `x` anywhere in the expression.
    pub fn seek(&mut self, tree: &Tree, geometry: &dyn Geometry, x: f64) {
        self.notify(Notify::Move);
        self.seek_in_block(tree, geometry, tree.root(), x);
    }

    pub(crate) fn seek_in_block(
        &mut self,
        tree: &Tree,
        geometry: &dyn Geometry,
        block: NodeId,
        x: f64,
    ) {
        let (Some(first), Some(last)) = (tree.end(block, Dir::Left), tree.end(block, Dir::Right))
        else {
            self.ins_at_left_end(tree, block);
            return;
        };
        let (Some(first_bounds), Some(last_bounds)) =
            (geometry.bounds(first), geometry.bounds(last))
        else {
            self.ins_at_right_end(tree, block);
            return;
        };
        if x >= last_bounds.right {
            self.ins_at_right_end(tree, block);
            return;
        }
        if x <= first_bounds.left {
            self.ins_at_left_end(tree, block);
            return;
        }
        let mut node = last;
        while let Some(bounds) = geometry.bounds(node)
            && x < bounds.left
            && let Some(prev) = tree.sibling(node, Dir::Left)
        {
            node = prev;
        }
        self.seek_node(tree, geometry, node, x);
    }

    fn seek_node(&mut self, tree: &Tree, geometry: &dyn Geometry, node: NodeId, x: f64) {
        let Some(bounds) = geometry.bounds(node) else {
            self.ins_right_of(tree, node);
            return;
        };
        if tree.is_leaf(node) {
            if x - bounds.left < bounds.width() / 2.0 {
                self.ins_left_of(tree, node);
            } else {
                self.ins_right_of(tree, node);
            }
            return;
        }
        if x < bounds.left {
            self.ins_left_of(tree, node);
            return;
        }
        if x > bounds.right {
            self.ins_right_of(tree, node);
            return;
        }

        let mut left_bound = bounds.left;
        let mut block = tree.end(node, Dir::Left);
        while let Some(b) = block {
            let Some(block_bounds) = geometry.bounds(b) else {
                break;
            };
            if x < block_bounds.left {
                if x - left_bound < block_bounds.left - x {
                    match tree.sibling(b, Dir::Left) {
                        Some(prev) => self.ins_at_right_end(tree, prev),
                        None => self.ins_left_of(tree, node),
                    }
                } else {
                    self.ins_at_left_end(tree, b);
                }
                return;
            }
            if x > block_bounds.right {
                match tree.sibling(b, Dir::Right) {
                    Some(next) => {
                        left_bound = block_bounds.right;
                        block = Some(next);
                        continue;
                    }
                    None => {
                        if bounds.right - x < x - block_bounds.right {
                            self.ins_right_of(tree, node);
                        } else {
                            self.ins_at_right_end(tree, b);
                        }
                        return;
                    }
                }
            }
            self.seek_in_block(tree, geometry, b, x);
            return;
        }
        self.ins_right_of(tree, node);
    }
}
