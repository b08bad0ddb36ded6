use crate::editing::operation::RangeAffinity;
use crate::editing::{Document, Operation};
use crate::error::EditorError;
use crate::models::{Affinity, Element, ElementKind, Node, Path, Range};

use super::operation::NodeProperties;

/// Normalization passes before giving up; each pass fixes one defect.
const MAX_NORMALIZE_PASSES: usize = 10_000;

/// Handle to a path that is kept up to date while a transaction runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRef(usize);

/// Handle to a range that is kept up to date while a transaction runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeRef(usize);

/// A working copy of a [`Document`] that collects primitive operations.
///
/// Transforms run against the working copy; [`Document::transact`] commits it
/// only after the transform and normalization both succeed.
pub struct Transaction {
    doc: Document,
    operations: Vec<Operation>,
    path_refs: Vec<Option<Path>>,
    range_refs: Vec<(Option<Range>, RangeAffinity)>,
}

impl Transaction {
    pub(crate) fn new(doc: Document) -> Self {
        Self {
            doc,
            operations: Vec::new(),
            path_refs: Vec::new(),
            range_refs: Vec::new(),
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> Option<Range> {
        self.doc.selection.clone()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Apply one operation to the working copy and carry every live
    /// reference across it.
    pub fn apply(&mut self, op: Operation) -> Result<(), EditorError> {
        self.doc.apply_operation(&op)?;
        for path in self.path_refs.iter_mut() {
            *path = path
                .take()
                .and_then(|current| current.transform(&op, Affinity::Forward));
        }
        for (range, affinity) in self.range_refs.iter_mut() {
            *range = range
                .take()
                .and_then(|current| current.transform(&op, *affinity));
        }
        self.operations.push(op);
        Ok(())
    }

    pub fn path_ref(&mut self, path: Path) -> PathRef {
        self.path_refs.push(Some(path));
        PathRef(self.path_refs.len() - 1)
    }

    /// Current value of a path reference; `None` once its node is gone.
    pub fn path(&self, reference: PathRef) -> Option<Path> {
        self.path_refs.get(reference.0).cloned().flatten()
    }

    pub fn range_ref(&mut self, range: Range, affinity: RangeAffinity) -> RangeRef {
        self.range_refs.push((Some(range), affinity));
        RangeRef(self.range_refs.len() - 1)
    }

    pub fn range(&self, reference: RangeRef) -> Option<Range> {
        self.range_refs
            .get(reference.0)
            .and_then(|(range, _)| range.clone())
    }

    /// Replace the selection, recording the change as an operation.
    pub fn set_selection(&mut self, selection: Option<Range>) -> Result<(), EditorError> {
        if let Some(range) = &selection {
            self.doc.check_point(&range.anchor)?;
            self.doc.check_point(&range.focus)?;
        }
        if selection == self.doc.selection {
            return Ok(());
        }
        let previous = self.doc.selection.clone();
        self.apply(Operation::SetSelection {
            selection,
            previous,
        })
    }

    /// Run structural fixes until the tree is settled.
    pub(crate) fn normalize(&mut self) -> Result<(), EditorError> {
        for _ in 0..MAX_NORMALIZE_PASSES {
            let fixes = self.next_fix()?;
            if fixes.is_empty() {
                return Ok(());
            }
            for op in fixes {
                self.apply(op)?;
            }
        }
        log::warn!("normalization did not settle after {MAX_NORMALIZE_PASSES} passes");
        Ok(())
    }

    /// The operations that fix the first defect found, in document order.
    fn next_fix(&self) -> Result<Vec<Operation>, EditorError> {
        for (index, node) in self.doc.children.iter().enumerate() {
            if node.is_inline_level() {
                let path = Path::new(vec![index]);
                return Ok(vec![
                    Operation::InsertNode {
                        path: path.clone(),
                        node: Node::Element(Element::new(ElementKind::Paragraph, Vec::new())),
                    },
                    Operation::MoveNode {
                        path: Path::new(vec![index + 1]),
                        new_path: path.child(0),
                    },
                ]);
            }
        }

        let mut stack: Vec<Path> = (0..self.doc.children.len())
            .rev()
            .map(|index| Path::new(vec![index]))
            .collect();
        while let Some(path) = stack.pop() {
            let Node::Element(element) = self.doc.node(&path)? else {
                continue;
            };
            if element.children.is_empty() {
                log::debug!("healing empty {} at {path}", element.kind);
                return Ok(vec![Operation::InsertNode {
                    path: path.child(0),
                    node: Node::Text(Default::default()),
                }]);
            }
            if !element.void
                && let Some(fix) = leaf_fix(&path, &element.children)
            {
                return Ok(fix);
            }
            for index in (0..element.children.len()).rev() {
                if element.children[index].as_element().is_some() {
                    stack.push(path.child(index));
                }
            }
        }
        Ok(Vec::new())
    }
}

/// Merge adjacent leaves that render identically, and fold empty leaves into
/// a neighbouring leaf. Empty leaves next to inline elements stay as cursor
/// spacers.
fn leaf_fix(parent: &Path, children: &[Node]) -> Option<Vec<Operation>> {
    for index in 1..children.len() {
        let (Some(previous), Some(current)) = (children[index - 1].as_leaf(), children[index].as_leaf())
        else {
            continue;
        };
        let path = parent.child(index);
        if previous.marks == current.marks || current.is_empty() {
            return Some(vec![Operation::MergeNode {
                path,
                position: previous.len(),
            }]);
        }
        if previous.is_empty() {
            return Some(vec![
                Operation::SetNode {
                    path: parent.child(index - 1),
                    properties: NodeProperties::marks(current.marks.clone()),
                    previous: NodeProperties::marks(previous.marks.clone()),
                },
                Operation::MergeNode { path, position: 0 },
            ]);
        }
    }
    None
}

impl Document {
    /// Run `edit` against a working copy and commit it atomically.
    ///
    /// On error nothing changes. On success the working copy is normalized,
    /// replaces `self`, and the applied operations are returned. Pending marks
    /// are dropped by any committed change.
    pub fn transact<F>(&mut self, edit: F) -> Result<Vec<Operation>, EditorError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), EditorError>,
    {
        let mut tx = Transaction::new(self.clone());
        edit(&mut tx)?;
        tx.normalize()?;
        let Transaction {
            doc: mut next,
            operations,
            ..
        } = tx;
        if operations.is_empty() {
            return Ok(operations);
        }
        next.version = self.version + 1;
        next.pending_marks = None;
        *self = next;
        Ok(operations)
    }

    /// Normalized copy of this document; used when building one from nodes.
    pub(crate) fn normalized(&self) -> Result<Document, EditorError> {
        let mut tx = Transaction::new(self.clone());
        tx.normalize()?;
        Ok(tx.doc)
    }
}
