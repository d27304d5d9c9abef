//! Graph documents: the generic attribute tree handed over by a markup
//! demarshaler and the typed view extracted from it once it validates.

pub mod tree;
pub mod types;

pub use tree::{Attr, Element, OneOrMany};
pub use types::{Edge, GraphDocument, Node};
