//! An editable tree of mathematical notation.
//!
//! A formula is a [`Tree`] of blocks and commands. A [`Cursor`] sits in the
//! gap between two siblings and moves, selects and edits; LaTeX is read
//! through a [`Grammar`] backed by a [`Registry`] of commands and written back
//! by [`Tree::latex`]. [`MathField`] bundles all of it behind a keystroke and
//! typed-text interface.

pub mod controller;
pub mod cursor;
pub mod error;
pub mod keys;
pub mod kinds;
pub mod latex;
pub mod layout;
mod serialize;
pub mod surface;
pub mod tree;

pub use controller::MathField;
pub use cursor::{Cursor, Notify, Selection};
pub use error::EngineError;
pub use keys::{Action, KeyTable};
pub use kinds::{BlockRole, Item, NodeKind, Symbol, SymbolClass};
pub use latex::{Grammar, Registry};
pub use layout::{Bounds, Geometry, MonospaceLayout};
pub use surface::{Edge, Notice, NullSurface, Recorder, Surface, SurfaceEvent};
pub use tree::{Dir, Fragment, NodeId, Point, Tree, TreeError};

pub use mathfield_config::{Options, Vertical};
