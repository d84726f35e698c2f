pub mod element;
pub mod graph;
pub mod order;
pub mod validate;

pub use element::{ElementId, ElementKind, PathElement, PathStore};
pub use graph::ConnectivityGraph;
pub use order::{OrderedPath, OrientedElement};
pub use validate::{validate_alternation, PathShape};
