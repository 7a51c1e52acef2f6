//! LaTeX input: the command registry and the grammar built from it.
//!
//! Parsing never touches the tree. The grammar produces detached
//! [`Item`](crate::kinds::Item)s, which the caller instantiates and splices
//! in once the whole input has been accepted.

mod grammar;
mod registry;

pub use grammar::Grammar;
pub use registry::{Entry, ParserFactory, Registry, Template};
