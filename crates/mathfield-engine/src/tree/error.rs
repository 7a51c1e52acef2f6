use thiserror::Error;

use super::{Dir, NodeId};

/// A violated precondition of a tree splice.
///
/// These indicate a bug in the caller, never bad user input, so the
/// panicking wrappers are what editing code uses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} is not live")]
    Dead(NodeId),

    #[error("fragment is already adopted")]
    AlreadyAdopted,

    #[error("node {node} is not a child of {parent}")]
    NotAChild { node: NodeId, parent: NodeId },

    #[error("nodes {left} and {right} are not adjacent")]
    NotAdjacent { left: NodeId, right: NodeId },

    #[error("node {node} is not at the {dir:?} end of {parent}")]
    NotAtEnd {
        node: NodeId,
        parent: NodeId,
        dir: Dir,
    },

    #[error("parent {0} has children but no insertion neighbours were given")]
    ParentNotEmpty(NodeId),

    #[error("adopting {node} under {parent} would make it its own ancestor")]
    Cycle { node: NodeId, parent: NodeId },

    #[error("insertion neighbour {0} is part of the fragment")]
    Overlap(NodeId),

    #[error("fragment chain from {left} does not reach {right}")]
    BrokenChain { left: NodeId, right: NodeId },

    #[error("broken link at node {node}: {reason}")]
    BrokenLink { node: NodeId, reason: String },
}
