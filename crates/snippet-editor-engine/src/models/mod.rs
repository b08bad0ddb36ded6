mod node;
mod path;
pub mod seed;

pub use node::{Element, ElementKind, Leaf, Mark, MarkSet, Node};
pub(crate) use node::byte_index;
pub use path::{Affinity, Edge, Path, Point, Range};
