pub mod editing;
pub mod error;
pub mod lists;
pub mod models;
pub mod session;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, HotkeyMap, InsertionContext, Operation, Patch, Snapshot};
pub use error::EditorError;
pub use lists::{DragItem, DragResult, DraggableLocation, Droppables, ListId, SnippetLists};
pub use models::{Edge, Element, ElementKind, Leaf, Mark, MarkSet, Node, Path, Point, Range};
pub use session::EditorSession;
