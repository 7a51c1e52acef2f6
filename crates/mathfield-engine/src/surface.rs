//! The boundary between the editing core and whatever displays it.

use crate::tree::{Dir, NodeId};

/// A cursor action that ran into the edge of the root block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    MoveOutOf(Dir),
    DeleteOutOf(Dir),
    SelectOutOf(Dir),
    UpOutOf,
    DownOutOf,
}

/// Something the cursor did that the display layer may want to react to.
/// Queued on the cursor and drained by the controller after each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The cursor entered this block.
    Focus(NodeId),
    /// The cursor left this block.
    Blur(NodeId),
    Edge(Edge),
    Enter,
}

/// Rendering callbacks. Every method has a no-op default.
pub trait Surface {
    /// New markup for a subtree that was just inserted.
    fn register(&mut self, _id: NodeId, _html: &str) {}

    fn focus(&mut self, _block: NodeId) {}

    fn blur(&mut self, _block: NodeId) {}

    fn edge(&mut self, _edge: Edge) {}

    fn enter(&mut self) {}

    /// A handled keystroke may have moved the cursor off screen.
    fn scroll_into_view(&mut self) {}
}

/// Ignores everything; used when the editor runs headless.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl Surface for NullSurface {}

/// Everything a [`Recorder`] was told, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Register(NodeId),
    Focus(NodeId),
    Blur(NodeId),
    Edge(Edge),
    Enter,
    ScrollIntoView,
}

/// Keeps a log of callbacks, for tests and the command line tool.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: Vec<SurfaceEvent>,
}

impl Recorder {
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.events.iter().filter_map(|e| match e {
            SurfaceEvent::Edge(edge) => Some(*edge),
            _ => None,
        })
    }
}

impl Surface for Recorder {
    fn register(&mut self, id: NodeId, _html: &str) {
        self.events.push(SurfaceEvent::Register(id));
    }

    fn focus(&mut self, block: NodeId) {
        self.events.push(SurfaceEvent::Focus(block));
    }

    fn blur(&mut self, block: NodeId) {
        self.events.push(SurfaceEvent::Blur(block));
    }

    fn edge(&mut self, edge: Edge) {
        self.events.push(SurfaceEvent::Edge(edge));
    }

    fn enter(&mut self) {
        self.events.push(SurfaceEvent::Enter);
    }

    fn scroll_into_view(&mut self) {
        self.events.push(SurfaceEvent::ScrollIntoView);
    }
}
