use std::fmt;
use std::ops::{Index, IndexMut};

use crate::kinds::NodeKind;

/// Identifies a node within one [`Tree`](super::Tree). Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Horizontal direction within a sibling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    #[must_use]
    pub fn opposite(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// A left/right pair indexable by [`Dir`], so movement code can be written
/// once for both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides<T> {
    pub left: T,
    pub right: T,
}

impl<T> Sides<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }
}

impl<T> Index<Dir> for Sides<T> {
    type Output = T;

    fn index(&self, dir: Dir) -> &T {
        match dir {
            Dir::Left => &self.left,
            Dir::Right => &self.right,
        }
    }
}

impl<T> IndexMut<Dir> for Sides<T> {
    fn index_mut(&mut self, dir: Dir) -> &mut T {
        match dir {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }
}

/// One slot of the arena.
///
/// Links are only rewritten by [`Fragment`](super::Fragment) splices, which
/// keep `siblings` and `ends` mutually consistent.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    /// Neighbouring siblings.
    pub(crate) siblings: Sides<Option<NodeId>>,
    /// First and last child.
    pub(crate) ends: Sides<Option<NodeId>>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            siblings: Sides::default(),
            ends: Sides::default(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn sibling(&self, dir: Dir) -> Option<NodeId> {
        self.siblings[dir]
    }

    pub fn end(&self, dir: Dir) -> Option<NodeId> {
        self.ends[dir]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        assert_eq!(Dir::Left.opposite(), Dir::Right);
        assert_eq!(Dir::Left.opposite().opposite(), Dir::Left);
    }

    #[test]
    fn sides_index_by_dir() {
        let mut s = Sides::new(1, 2);
        assert_eq!(s[Dir::Left], 1);
        s[Dir::Right] = 5;
        assert_eq!(s.right, 5);
    }
}
