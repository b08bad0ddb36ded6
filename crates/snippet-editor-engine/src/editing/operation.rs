use serde::Serialize;

use crate::models::{Affinity, ElementKind, MarkSet, Node, Path, Point, Range};

/// Attributes that `SetNode` can change without touching the tree shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ElementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<MarkSet>,
}

impl NodeProperties {
    pub fn kind(kind: ElementKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn marks(marks: MarkSet) -> Self {
        Self {
            marks: Some(marks),
            ..Self::default()
        }
    }
}

/// A primitive, invertible edit to the document.
///
/// Every higher level transform is compiled down to a sequence of these. Each
/// one also defines how a path or point computed *before* it maps to the tree
/// *after* it, which is what keeps the selection and any in-flight references
/// valid across structural edits.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    InsertNode {
        path: Path,
        node: Node,
    },
    RemoveNode {
        path: Path,
        node: Node,
    },
    InsertText {
        path: Path,
        offset: usize,
        text: String,
    },
    RemoveText {
        path: Path,
        offset: usize,
        text: String,
    },
    /// Split the node at `path` into two siblings at `position` (a character
    /// offset for leaves, a child index for elements). The new right half
    /// keeps the node's attributes.
    SplitNode {
        path: Path,
        position: usize,
    },
    /// Merge the node at `path` into its previous sibling, whose length
    /// before the merge was `position`.
    MergeNode {
        path: Path,
        position: usize,
    },
    /// Move a node. `new_path` is where the node ends up, expressed the way
    /// the transform below interprets it.
    MoveNode {
        path: Path,
        new_path: Path,
    },
    SetNode {
        path: Path,
        properties: NodeProperties,
        previous: NodeProperties,
    },
    SetSelection {
        selection: Option<Range>,
        previous: Option<Range>,
    },
}

impl Operation {
    /// The operation that undoes this one.
    pub fn inverse(&self) -> Operation {
        match self {
            Operation::InsertNode { path, node } => Operation::RemoveNode {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::RemoveNode { path, node } => Operation::InsertNode {
                path: path.clone(),
                node: node.clone(),
            },
            Operation::InsertText { path, offset, text } => Operation::RemoveText {
                path: path.clone(),
                offset: *offset,
                text: text.clone(),
            },
            Operation::RemoveText { path, offset, text } => Operation::InsertText {
                path: path.clone(),
                offset: *offset,
                text: text.clone(),
            },
            Operation::SplitNode { path, position } => Operation::MergeNode {
                path: path.next().unwrap_or_else(|| path.clone()),
                position: *position,
            },
            Operation::MergeNode { path, position } => Operation::SplitNode {
                path: path.previous().unwrap_or_else(|| path.clone()),
                position: *position,
            },
            Operation::MoveNode { path, new_path } => {
                if new_path == path || new_path.is_ancestor_of(path) {
                    return self.clone();
                }
                let inverse_path = path.transform(self, Affinity::Forward);
                let inverse_new_path = path
                    .next()
                    .and_then(|next| next.transform(self, Affinity::Forward));
                match (inverse_path, inverse_new_path) {
                    (Some(path), Some(new_path)) => Operation::MoveNode { path, new_path },
                    _ => self.clone(),
                }
            }
            Operation::SetNode {
                path,
                properties,
                previous,
            } => Operation::SetNode {
                path: path.clone(),
                properties: previous.clone(),
                previous: properties.clone(),
            },
            Operation::SetSelection {
                selection,
                previous,
            } => Operation::SetSelection {
                selection: previous.clone(),
                previous: selection.clone(),
            },
        }
    }

    pub fn is_selection_only(&self) -> bool {
        matches!(self, Operation::SetSelection { .. })
    }
}

fn bump(path: &mut Path, depth: usize, delta: isize) {
    let index = path.indices()[depth];
    *path = path.with_index(depth, index.saturating_add_signed(delta));
}

impl Path {
    /// Map this path across `op`. `None` means the addressed node was removed.
    pub fn transform(&self, op: &Operation, affinity: Affinity) -> Option<Path> {
        let mut p = self.clone();
        if p.is_root() {
            return Some(p);
        }

        match op {
            Operation::InsertNode { path: op_path, .. } => {
                if op_path == &p || op_path.ends_before(&p) || op_path.is_ancestor_of(&p) {
                    bump(&mut p, op_path.len() - 1, 1);
                }
            }
            Operation::RemoveNode { path: op_path, .. } => {
                if op_path.is_ancestor_or_equal(&p) {
                    return None;
                }
                if op_path.ends_before(&p) {
                    bump(&mut p, op_path.len() - 1, -1);
                }
            }
            Operation::MergeNode {
                path: op_path,
                position,
            } => {
                if op_path == &p || op_path.ends_before(&p) {
                    bump(&mut p, op_path.len() - 1, -1);
                } else if op_path.is_ancestor_of(&p) {
                    bump(&mut p, op_path.len() - 1, -1);
                    bump(&mut p, op_path.len(), *position as isize);
                }
            }
            Operation::SplitNode {
                path: op_path,
                position,
            } => {
                if op_path == &p {
                    if affinity == Affinity::Forward {
                        let depth = p.len() - 1;
                        bump(&mut p, depth, 1);
                    }
                } else if op_path.ends_before(&p) {
                    bump(&mut p, op_path.len() - 1, 1);
                } else if op_path.is_ancestor_of(&p) && p.indices()[op_path.len()] >= *position {
                    bump(&mut p, op_path.len() - 1, 1);
                    bump(&mut p, op_path.len(), -(*position as isize));
                }
            }
            Operation::MoveNode {
                path: op_path,
                new_path: onp,
            } => {
                if op_path == onp {
                    return Some(p);
                }
                if op_path.is_ancestor_or_equal(&p) {
                    let mut moved = onp.clone();
                    if op_path.ends_before(onp) && op_path.len() < onp.len() {
                        bump(&mut moved, op_path.len() - 1, -1);
                    }
                    let mut indices = moved.indices().to_vec();
                    indices.extend_from_slice(&p.indices()[op_path.len()..]);
                    return Some(Path::new(indices));
                } else if op_path.is_sibling(onp) && onp.is_ancestor_or_equal(&p) {
                    if op_path.ends_before(&p) {
                        bump(&mut p, op_path.len() - 1, -1);
                    } else {
                        bump(&mut p, op_path.len() - 1, 1);
                    }
                } else if onp.ends_before(&p) || onp.is_ancestor_or_equal(&p) {
                    if op_path.ends_before(&p) {
                        bump(&mut p, op_path.len() - 1, -1);
                    }
                    bump(&mut p, onp.len() - 1, 1);
                } else if op_path.ends_before(&p) {
                    bump(&mut p, op_path.len() - 1, -1);
                }
            }
            Operation::InsertText { .. }
            | Operation::RemoveText { .. }
            | Operation::SetNode { .. }
            | Operation::SetSelection { .. } => {}
        }

        Some(p)
    }
}

impl Point {
    /// Map this point across `op`. `None` means its leaf was removed.
    pub fn transform(&self, op: &Operation, affinity: Affinity) -> Option<Point> {
        let mut point = self.clone();
        match op {
            Operation::InsertText { path, offset, text } => {
                if path == &point.path
                    && (*offset < point.offset
                        || (*offset == point.offset && affinity == Affinity::Forward))
                {
                    point.offset += text.chars().count();
                }
            }
            Operation::RemoveText { path, offset, text } => {
                if path == &point.path && *offset <= point.offset {
                    point.offset -= (point.offset - offset).min(text.chars().count());
                }
            }
            Operation::MergeNode { path, position } => {
                if path == &point.path {
                    point.offset += position;
                }
                point.path = point.path.transform(op, affinity)?;
            }
            Operation::SplitNode { path, position } => {
                if path == &point.path {
                    if *position < point.offset
                        || (*position == point.offset && affinity == Affinity::Forward)
                    {
                        point.offset -= position;
                        point.path = point.path.next()?;
                    }
                } else {
                    point.path = point.path.transform(op, affinity)?;
                }
            }
            _ => {
                point.path = point.path.transform(op, affinity)?;
            }
        }
        Some(point)
    }
}

/// How the two ends of a range react to edits landing exactly on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeAffinity {
    /// Both ends stick forward; used for the live selection.
    Forward,
    /// Ends stick towards the inside, so a split at a boundary never pulls
    /// outside content into the range.
    Inward,
}

impl Range {
    pub fn transform(&self, op: &Operation, affinity: RangeAffinity) -> Option<Range> {
        let (anchor_affinity, focus_affinity) = match affinity {
            RangeAffinity::Forward => (Affinity::Forward, Affinity::Forward),
            RangeAffinity::Inward => {
                let collapsed = self.is_collapsed();
                if self.is_backward() {
                    let anchor = Affinity::Backward;
                    (anchor, if collapsed { anchor } else { Affinity::Forward })
                } else {
                    let anchor = Affinity::Forward;
                    (anchor, if collapsed { anchor } else { Affinity::Backward })
                }
            }
        };
        let anchor = self.anchor.transform(op, anchor_affinity)?;
        let focus = self.focus.transform(op, focus_affinity)?;
        Some(Range::new(anchor, focus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Leaf;
    use pretty_assertions::assert_eq;

    fn p(indices: &[usize]) -> Path {
        Path::from(indices)
    }

    fn insert(path: &[usize]) -> Operation {
        Operation::InsertNode {
            path: p(path),
            node: Node::Text(Leaf::new("x")),
        }
    }

    #[test]
    fn test_insert_node_shifts_later_siblings_and_descendants() {
        let op = insert(&[1]);
        assert_eq!(p(&[0, 3]).transform(&op, Affinity::Forward), Some(p(&[0, 3])));
        assert_eq!(p(&[1]).transform(&op, Affinity::Forward), Some(p(&[2])));
        assert_eq!(p(&[1, 2]).transform(&op, Affinity::Forward), Some(p(&[2, 2])));
        assert_eq!(p(&[4]).transform(&op, Affinity::Forward), Some(p(&[5])));
    }

    #[test]
    fn test_remove_node_drops_descendants() {
        let op = Operation::RemoveNode {
            path: p(&[1]),
            node: Node::Text(Leaf::empty()),
        };
        assert_eq!(p(&[1, 0]).transform(&op, Affinity::Forward), None);
        assert_eq!(p(&[2, 0]).transform(&op, Affinity::Forward), Some(p(&[1, 0])));
    }

    #[test]
    fn test_split_moves_trailing_children_into_new_sibling() {
        let op = Operation::SplitNode {
            path: p(&[0]),
            position: 2,
        };
        assert_eq!(p(&[0, 1]).transform(&op, Affinity::Forward), Some(p(&[0, 1])));
        assert_eq!(p(&[0, 3]).transform(&op, Affinity::Forward), Some(p(&[1, 1])));
        assert_eq!(p(&[1]).transform(&op, Affinity::Forward), Some(p(&[2])));
    }

    #[test]
    fn test_split_path_itself_follows_affinity() {
        let op = Operation::SplitNode {
            path: p(&[2, 1]),
            position: 4,
        };
        assert_eq!(p(&[2, 1]).transform(&op, Affinity::Forward), Some(p(&[2, 2])));
        assert_eq!(p(&[2, 1]).transform(&op, Affinity::Backward), Some(p(&[2, 1])));
    }

    #[test]
    fn test_split_text_point_affinity() {
        let op = Operation::SplitNode {
            path: p(&[0, 0]),
            position: 3,
        };
        let point = Point::new(vec![0, 0], 3);
        assert_eq!(
            point.transform(&op, Affinity::Forward),
            Some(Point::new(vec![0, 1], 0))
        );
        assert_eq!(point.transform(&op, Affinity::Backward), Some(point.clone()));
        assert_eq!(
            Point::new(vec![0, 0], 5).transform(&op, Affinity::Backward),
            Some(Point::new(vec![0, 1], 2))
        );
    }

    #[test]
    fn test_merge_is_inverse_of_split_for_points() {
        let split = Operation::SplitNode {
            path: p(&[0, 0]),
            position: 3,
        };
        let point = Point::new(vec![0, 0], 5);
        let after_split = point.transform(&split, Affinity::Forward).unwrap();
        let after_merge = after_split
            .transform(&split.inverse(), Affinity::Forward)
            .unwrap();
        assert_eq!(after_merge, point);
    }

    #[test]
    fn test_move_node_into_following_sibling() {
        // Wrap step: a wrapper was inserted at [0]; the old block now at [1]
        // moves to become its first child.
        let op = Operation::MoveNode {
            path: p(&[1]),
            new_path: p(&[0, 0]),
        };
        assert_eq!(p(&[1, 2]).transform(&op, Affinity::Forward), Some(p(&[0, 0, 2])));
        assert_eq!(p(&[2]).transform(&op, Affinity::Forward), Some(p(&[1])));
    }

    #[test]
    fn test_move_node_out_before_parent() {
        // Lift step: first child of [3] moves to [3], pushing its old parent on.
        let op = Operation::MoveNode {
            path: p(&[3, 0]),
            new_path: p(&[3]),
        };
        assert_eq!(p(&[3, 0, 1]).transform(&op, Affinity::Forward), Some(p(&[3, 1])));
        assert_eq!(p(&[3, 1]).transform(&op, Affinity::Forward), Some(p(&[4, 0])));
        assert_eq!(p(&[4]).transform(&op, Affinity::Forward), Some(p(&[5])));
    }

    #[test]
    fn test_text_edits_shift_points_after_them() {
        let op = Operation::InsertText {
            path: p(&[0, 0]),
            offset: 2,
            text: "ab".to_string(),
        };
        assert_eq!(
            Point::new(vec![0, 0], 4).transform(&op, Affinity::Forward),
            Some(Point::new(vec![0, 0], 6))
        );
        let remove = op.inverse();
        assert_eq!(
            Point::new(vec![0, 0], 3).transform(&remove, Affinity::Forward),
            Some(Point::new(vec![0, 0], 2))
        );
    }

    #[test]
    fn test_inward_range_stays_inside_split_boundaries() {
        let range = Range::new(Point::new(vec![0, 0], 2), Point::new(vec![0, 0], 5));
        let split_end = Operation::SplitNode {
            path: p(&[0, 0]),
            position: 5,
        };
        let range = range.transform(&split_end, RangeAffinity::Inward).unwrap();
        assert_eq!(range.focus, Point::new(vec![0, 0], 5));
        let split_start = Operation::SplitNode {
            path: p(&[0, 0]),
            position: 2,
        };
        let range = range.transform(&split_start, RangeAffinity::Inward).unwrap();
        assert_eq!(range.anchor, Point::new(vec![0, 1], 0));
        assert_eq!(range.focus, Point::new(vec![0, 1], 3));
    }
}
