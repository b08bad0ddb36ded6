use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Address of a node as the sequence of child indices from the document root.
///
/// Paths never hold a reference into the tree, so they stay meaningful across
/// whole-tree rewrites: every structural operation knows how to transform a
/// path that was computed before it ran (see [`crate::editing::Operation`]).
/// Ordering is plain lexicographic order over the indices.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<usize>);

impl Path {
    /// The empty path, addressing the document root itself.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Index of the addressed node within its parent.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            return None;
        }
        Some(Path(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Path of the following sibling. The root has no siblings.
    pub fn next(&self) -> Option<Path> {
        let last = self.last()?;
        let mut indices = self.0.clone();
        *indices.last_mut()? = last + 1;
        Some(Path(indices))
    }

    /// Path of the preceding sibling, if the node is not the first child.
    pub fn previous(&self) -> Option<Path> {
        let last = self.last()?;
        if last == 0 {
            return None;
        }
        let mut indices = self.0.clone();
        *indices.last_mut()? = last - 1;
        Some(Path(indices))
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    /// Same path with the index at `depth` replaced.
    pub(crate) fn with_index(&self, depth: usize, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices[depth] = index;
        Path(indices)
    }

    /// Proper ancestor test: `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    pub fn is_ancestor_or_equal(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// True when `self` and `other` share a parent.
    pub fn is_sibling(&self, other: &Path) -> bool {
        !self.0.is_empty()
            && self.0.len() == other.0.len()
            && self.0[..self.0.len() - 1] == other.0[..other.0.len() - 1]
            && self.0 != other.0
    }

    /// True when `self` ends before the subtree at the same depth in `other`,
    /// so an edit at `self` shifts the index of `other` (or of its ancestor).
    pub fn ends_before(&self, other: &Path) -> bool {
        let Some(depth) = self.0.len().checked_sub(1) else {
            return false;
        };
        if other.0.len() <= depth {
            return false;
        }
        self.0[..depth] == other.0[..depth] && self.0[depth] < other.0[depth]
    }

    /// Ordering that treats ancestors and descendants as equal; useful for
    /// "does this subtree overlap the range" checks.
    pub fn compare_subtree(&self, other: &Path) -> Ordering {
        let shared = self.0.len().min(other.0.len());
        self.0[..shared].cmp(&other.0[..shared])
    }

    /// Longest shared prefix of two paths.
    pub fn common(&self, other: &Path) -> Path {
        let shared: Vec<usize> = self
            .0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| *a)
            .collect();
        Path(shared)
    }

    /// All proper ancestors, from the root down.
    pub fn ancestors(&self) -> impl Iterator<Item = Path> + '_ {
        (0..self.0.len()).map(|len| Path(self.0[..len].to_vec()))
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// A character position inside the leaf addressed by `path`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<Path>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.offset)
    }
}

/// Which way a point sticks when an edit lands exactly on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affinity {
    Forward,
    Backward,
}

/// Edge of a range, used by `collapse`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Start,
    End,
}

/// Selection between an anchor (where it started) and a focus (where it ends).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    /// Start and end in document order.
    pub fn edges(&self) -> (&Point, &Point) {
        if self.is_backward() {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }

    pub fn start(&self) -> &Point {
        self.edges().0
    }

    pub fn end(&self) -> &Point {
        self.edges().1
    }

    pub fn edge(&self, edge: Edge) -> &Point {
        match edge {
            Edge::Start => self.start(),
            Edge::End => self.end(),
        }
    }

    /// Does the subtree at `path` overlap this range?
    pub fn includes_path(&self, path: &Path) -> bool {
        let (start, end) = self.edges();
        path.compare_subtree(&start.path) != Ordering::Less
            && path.compare_subtree(&end.path) != Ordering::Greater
    }
}
