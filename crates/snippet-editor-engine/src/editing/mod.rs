/*!
 * # Editing Core
 *
 * The document is a tree of elements and text leaves addressed by [`Path`]s.
 * Nothing outside this module mutates it directly: every change is compiled
 * into primitive [`Operation`]s that run inside a [`Transaction`] on a working
 * copy of the [`Document`].
 *
 * ## Layers
 *
 * - **`operation`**: the nine primitive operations and how paths, points and
 *   ranges move across each of them
 * - **`document`**: tree lookups, flat text positions and primitive op
 *   application
 * - **`transaction`**: atomic commit, live path/range references and
 *   normalization
 * - **`transforms`**: insert, wrap, unwrap, set, collapse and the text entry
 *   primitives, all built from operations
 * - **`marks`** / **`blocks`**: active-state detection and toggles
 * - **`insertion`**: the selection-dependent content insertion policy
 * - **`commands`** / **`patch`** / **`snapshot`**: the command surface and the
 *   read API for front ends
 *
 * ## Usage Pattern
 *
 * ```rust
 * use snippet_editor_engine::editing::*;
 * use snippet_editor_engine::{Element, Mark, Point, Range};
 *
 * let mut doc = Document::new(vec![Element::paragraph("Hello world")]);
 * doc.select(Range::new(Point::new(vec![0, 0], 6), Point::new(vec![0, 0], 11)))
 *     .unwrap();
 *
 * // Toggles compile to operations an external history layer can record.
 * let ops = doc.toggle_mark(Mark::Bold).unwrap();
 * assert!(!ops.is_empty());
 * assert!(doc.is_mark_active(Mark::Bold));
 *
 * // Selected text becomes the content of an inserted inline.
 * doc.insert_content(Element::inline_text("ignored")).unwrap();
 * assert_eq!(doc.text(), "Hello world");
 * ```
 *
 * [`Path`]: crate::models::Path
 */

pub mod blocks;
pub mod commands;
pub mod document;
pub mod insertion;
pub mod marks;
pub mod operation;
pub mod patch;
pub mod snapshot;
pub mod transaction;
pub mod transforms;

pub use commands::{Cmd, HotkeyMap};
pub use document::{Ancestor, Document};
pub use insertion::InsertionContext;
pub use operation::{NodeProperties, Operation, RangeAffinity};
pub use patch::Patch;
pub use snapshot::{RenderNode, Snapshot, Toolbar};
pub use transaction::{PathRef, RangeRef, Transaction};
pub use transforms::{InsertAt, InsertOptions, UnwrapOptions, WrapOptions};
