use crate::models::Path;

/// Failures the engine reports to its caller.
///
/// Conditions that are part of normal editing (a drop outside any target, no
/// selection, a block left without children) are handled by policy and never
/// show up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("path {path} does not address a node")]
    OutOfRange { path: Path },
    #[error("offset {offset} is past the end of the {len} characters at {path}")]
    OffsetOutOfRange {
        path: Path,
        offset: usize,
        len: usize,
    },
    #[error("node at {path} is not a text leaf")]
    NotALeaf { path: Path },
    #[error("node at {path} is not an element")]
    NotAnElement { path: Path },
    #[error("index {index} is outside list `{list}` of length {len}")]
    ListIndexOutOfRange {
        list: String,
        index: usize,
        len: usize,
    },
    #[error("unknown mark `{0}`")]
    UnknownMark(String),
}

impl EditorError {
    pub(crate) fn out_of_range(path: &Path) -> Self {
        EditorError::OutOfRange { path: path.clone() }
    }
}
