use serde::Serialize;

use crate::editing::transforms::{InsertAt, InsertOptions, WrapOptions};
use crate::editing::{Document, Operation};
use crate::error::EditorError;
use crate::models::{Edge, Element, Node, Path, Point, Range};

/// The selection state that decides how content is inserted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InsertionContext {
    /// No cursor in the document; content goes after the last block.
    NoSelection,
    /// The focus sits inside an atomic node; content goes right after it.
    InsideVoid { void_path: Path },
    /// A plain cursor; content goes in at the cursor.
    Collapsed { at: Point },
    /// Selected text; it becomes the content of the inserted node.
    Expanded { range: Range },
}

impl InsertionContext {
    pub fn classify(doc: &Document) -> Result<Self, EditorError> {
        let Some(selection) = doc.selection() else {
            return Ok(InsertionContext::NoSelection);
        };
        let (parent, parent_path) = doc.parent(&selection.focus.path)?;
        if parent.is_void() {
            return Ok(InsertionContext::InsideVoid {
                void_path: parent_path,
            });
        }
        if selection.is_collapsed() {
            Ok(InsertionContext::Collapsed {
                at: selection.focus.clone(),
            })
        } else {
            Ok(InsertionContext::Expanded {
                range: selection.clone(),
            })
        }
    }
}

impl Document {
    /// Insert an inline payload according to the current selection.
    ///
    /// | context        | effect                                                 |
    /// |----------------|--------------------------------------------------------|
    /// | no selection   | appended after the last block, selection untouched     |
    /// | inside a void  | inserted as the void's next sibling and selected       |
    /// | collapsed      | inserted at the cursor and selected                    |
    /// | expanded       | selected text wrapped in the payload, cursor at its end|
    ///
    /// "Selected" means the cursor collapses at the end of the new node.
    pub fn insert_content(&mut self, content: Element) -> Result<Vec<Operation>, EditorError> {
        let context = InsertionContext::classify(self)?;
        log::debug!("inserting {} with {context:?}", content.kind);
        let node = Node::Element(content);
        match context {
            InsertionContext::NoSelection => {
                self.transact(|tx| tx.insert_nodes(vec![node], InsertOptions::default()))
            }
            InsertionContext::InsideVoid { void_path } => {
                let after = void_path
                    .next()
                    .ok_or_else(|| EditorError::out_of_range(&void_path))?;
                self.transact(|tx| {
                    tx.insert_nodes(
                        vec![node],
                        InsertOptions {
                            at: Some(InsertAt::Path(after)),
                            select: true,
                        },
                    )
                })
            }
            InsertionContext::Collapsed { at } => self.transact(|tx| {
                tx.insert_nodes(
                    vec![node],
                    InsertOptions {
                        at: Some(InsertAt::Point(at)),
                        select: true,
                    },
                )
            }),
            InsertionContext::Expanded { .. } => {
                let Node::Element(wrapper) = node else {
                    return Ok(Vec::new());
                };
                self.transact(|tx| {
                    tx.wrap_nodes(
                        wrapper,
                        WrapOptions {
                            at: None,
                            split: true,
                        },
                    )?;
                    tx.collapse(Edge::End)
                })
            }
        }
    }
}
