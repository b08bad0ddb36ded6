use crate::editing::Operation;
use crate::editing::operation::RangeAffinity;
use crate::error::EditorError;
use crate::models::{
    Affinity, Element, ElementKind, Leaf, MarkSet, Node, Path, Point, Range, byte_index,
};

/// Parent of a node: either the document root or an element.
#[derive(Clone, Copy, Debug)]
pub enum Ancestor<'a> {
    Root(&'a [Node]),
    Element(&'a Element),
}

impl<'a> Ancestor<'a> {
    pub fn children(&self) -> &'a [Node] {
        match self {
            Ancestor::Root(children) => children,
            Ancestor::Element(element) => &element.children,
        }
    }

    pub fn as_element(&self) -> Option<&'a Element> {
        match self {
            Ancestor::Root(_) => None,
            Ancestor::Element(element) => Some(element),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Ancestor::Element(element) if element.void)
    }
}

/// One leaf in document order, with enough context to map between points
/// and flat character positions.
#[derive(Clone, Debug)]
pub(crate) struct TextPosition {
    pub path: Path,
    pub len: usize,
    /// Flat position of the leaf's first character.
    pub start: usize,
    pub in_void: bool,
}

/// The editable document: a tree of nodes plus the selection that lives on it.
///
/// A `Document` is a value. Every edit runs as a transaction on a working copy
/// (see [`Document::transact`]) and only replaces `self` once the edit and the
/// normalization that follows it have both succeeded, so a failed edit leaves
/// the previous tree and selection untouched. The `version` counter increases
/// by one for each committed change.
///
/// ```rust
/// use snippet_editor_engine::{Document, Element, Point, Range};
///
/// let mut doc = Document::new(vec![Element::paragraph("Hello world")]);
/// doc.select(Range::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 5)))
///     .unwrap();
/// assert_eq!(doc.version(), 1);
/// assert_eq!(doc.text(), "Hello world");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub(crate) children: Vec<Node>,
    pub(crate) selection: Option<Range>,
    /// Marks for the next typed text, set by toggling a mark at a collapsed
    /// cursor.
    pub(crate) pending_marks: Option<MarkSet>,
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Document {
    /// Build a document from top-level blocks and normalize it.
    pub fn new(blocks: Vec<Element>) -> Self {
        Self::from_nodes(blocks.into_iter().map(Node::Element).collect())
    }

    pub fn from_nodes(children: Vec<Node>) -> Self {
        let mut children: Vec<Node> = children.into_iter().map(Node::healed).collect();
        if children.is_empty() {
            children.push(Node::Element(Element::paragraph("")));
        }
        let mut doc = Self {
            children,
            selection: None,
            pending_marks: None,
            version: 0,
        };
        // A freshly built tree only needs structural cleanup; nothing in it
        // can address a missing node.
        if let Ok(normalized) = doc.normalized() {
            doc = normalized;
        }
        doc
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn selection(&self) -> Option<&Range> {
        self.selection.as_ref()
    }

    pub fn pending_marks(&self) -> Option<&MarkSet> {
        self.pending_marks.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn node(&self, path: &Path) -> Result<&Node, EditorError> {
        let (first, rest) = path
            .indices()
            .split_first()
            .ok_or_else(|| EditorError::out_of_range(path))?;
        let mut node = self
            .children
            .get(*first)
            .ok_or_else(|| EditorError::out_of_range(path))?;
        for index in rest {
            node = node
                .children()
                .get(*index)
                .ok_or_else(|| EditorError::out_of_range(path))?;
        }
        Ok(node)
    }

    pub(crate) fn node_mut(&mut self, path: &Path) -> Result<&mut Node, EditorError> {
        let (last, parent) = path
            .indices()
            .split_last()
            .ok_or_else(|| EditorError::out_of_range(path))?;
        let siblings = self.children_at_mut(&Path::from(parent))?;
        siblings
            .get_mut(*last)
            .ok_or_else(|| EditorError::out_of_range(path))
    }

    pub fn leaf(&self, path: &Path) -> Result<&Leaf, EditorError> {
        self.node(path)?
            .as_leaf()
            .ok_or_else(|| EditorError::NotALeaf { path: path.clone() })
    }

    pub fn element(&self, path: &Path) -> Result<&Element, EditorError> {
        self.node(path)?
            .as_element()
            .ok_or_else(|| EditorError::NotAnElement { path: path.clone() })
    }

    /// Children of the root (for the empty path) or of the element at `path`.
    pub fn children_at(&self, path: &Path) -> Result<&[Node], EditorError> {
        if path.is_root() {
            return Ok(&self.children);
        }
        Ok(&self.element(path)?.children)
    }

    pub(crate) fn children_at_mut(&mut self, path: &Path) -> Result<&mut Vec<Node>, EditorError> {
        let mut children = &mut self.children;
        for index in path.indices() {
            children = match children.get_mut(*index) {
                Some(Node::Element(element)) => &mut element.children,
                Some(Node::Text(_)) => return Err(EditorError::NotAnElement { path: path.clone() }),
                None => return Err(EditorError::out_of_range(path)),
            };
        }
        Ok(children)
    }

    /// Parent of the node at `path` together with the parent's path.
    ///
    /// Fails with `OutOfRange` for the root (which has no parent) and for any
    /// path that does not address a node.
    pub fn parent(&self, path: &Path) -> Result<(Ancestor<'_>, Path), EditorError> {
        self.node(path)?;
        let parent_path = path.parent().ok_or_else(|| EditorError::out_of_range(path))?;
        if parent_path.is_root() {
            return Ok((Ancestor::Root(&self.children), parent_path));
        }
        let parent = self.element(&parent_path)?;
        Ok((Ancestor::Element(parent), parent_path))
    }

    pub fn is_void(&self, node: &Node) -> bool {
        node.is_void()
    }

    /// Nearest proper ancestor element matching `predicate`.
    pub fn above(
        &self,
        path: &Path,
        predicate: impl Fn(&Element) -> bool,
    ) -> Option<(Path, &Element)> {
        path.ancestors()
            .skip(1)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find_map(|ancestor| {
                let element = self.element(&ancestor).ok()?;
                predicate(element).then_some((ancestor, element))
            })
    }

    /// Nearest enclosing block of the node at `path`.
    pub fn nearest_block(&self, path: &Path) -> Option<(Path, &Element)> {
        if let Ok(element) = self.element(path)
            && element.is_block()
        {
            return Some((path.clone(), element));
        }
        self.above(path, Element::is_block)
    }

    /// Outermost void at or above `path`, if any.
    pub fn void_ancestor(&self, path: &Path) -> Option<Path> {
        path.ancestors()
            .skip(1)
            .chain(std::iter::once(path.clone()))
            .find(|candidate| self.node(candidate).map(Node::is_void).unwrap_or(false))
    }

    /// Every leaf in document order.
    pub fn leaves(&self) -> Vec<(Path, &Leaf)> {
        fn walk<'a>(nodes: &'a [Node], path: &Path, out: &mut Vec<(Path, &'a Leaf)>) {
            for (index, node) in nodes.iter().enumerate() {
                let child = path.child(index);
                match node {
                    Node::Text(leaf) => out.push((child, leaf)),
                    Node::Element(element) => walk(&element.children, &child, out),
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &Path::root(), &mut out);
        out
    }

    /// Leaves under (or at) `path`, in document order.
    pub fn leaves_under(&self, path: &Path) -> Vec<(Path, &Leaf)> {
        self.leaves()
            .into_iter()
            .filter(|(leaf_path, _)| path.is_ancestor_or_equal(leaf_path))
            .collect()
    }

    pub fn start_of(&self, path: &Path) -> Result<Point, EditorError> {
        let (leaf_path, _) = self
            .leaves_under(path)
            .into_iter()
            .next()
            .ok_or_else(|| EditorError::out_of_range(path))?;
        Ok(Point::new(leaf_path, 0))
    }

    pub fn end_of(&self, path: &Path) -> Result<Point, EditorError> {
        let (leaf_path, leaf) = self
            .leaves_under(path)
            .into_iter()
            .last()
            .ok_or_else(|| EditorError::out_of_range(path))?;
        Ok(Point::new(leaf_path, leaf.len()))
    }

    /// Last position in the document.
    pub fn end(&self) -> Option<Point> {
        self.leaves()
            .into_iter()
            .last()
            .map(|(path, leaf)| Point::new(path, leaf.len()))
    }

    pub fn check_point(&self, point: &Point) -> Result<(), EditorError> {
        let leaf = self.leaf(&point.path)?;
        if point.offset > leaf.len() {
            return Err(EditorError::OffsetOutOfRange {
                path: point.path.clone(),
                offset: point.offset,
                len: leaf.len(),
            });
        }
        Ok(())
    }

    /// Text of every top-level block, one per line.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .map(Node::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total number of characters across all leaves.
    pub fn text_len(&self) -> usize {
        self.leaves().iter().map(|(_, leaf)| leaf.len()).sum()
    }

    /// Text between two points, across leaves.
    pub fn string_in(&self, range: &Range) -> String {
        let (start, end) = range.edges();
        let mut out = String::new();
        for (path, leaf) in self.leaves() {
            if path < start.path || path > end.path {
                continue;
            }
            let from = if path == start.path { start.offset } else { 0 };
            let to = if path == end.path { end.offset } else { leaf.len() };
            if from < to {
                let text = &leaf.text;
                out.push_str(&text[byte_index(text, from)..byte_index(text, to)]);
            }
        }
        out
    }

    /// Element nodes overlapping `range`, in document (pre-)order.
    pub fn elements_in(&self, range: &Range) -> Vec<(Path, &Element)> {
        fn walk<'a>(
            nodes: &'a [Node],
            path: &Path,
            range: &Range,
            out: &mut Vec<(Path, &'a Element)>,
        ) {
            for (index, node) in nodes.iter().enumerate() {
                let child = path.child(index);
                if !range.includes_path(&child) {
                    continue;
                }
                if let Node::Element(element) = node {
                    out.push((child.clone(), element));
                    walk(&element.children, &child, range, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.children, &Path::root(), range, &mut out);
        out
    }

    /// Elements matching `predicate` inside `range`, keeping only the deepest
    /// match on each branch.
    pub fn lowest_matching(
        &self,
        range: &Range,
        predicate: impl Fn(&Element) -> bool,
    ) -> Vec<Path> {
        let matches: Vec<Path> = self
            .elements_in(range)
            .into_iter()
            .filter(|(_, element)| predicate(element))
            .map(|(path, _)| path)
            .collect();
        matches
            .iter()
            .filter(|candidate| !matches.iter().any(|other| candidate.is_ancestor_of(other)))
            .cloned()
            .collect()
    }

    /// Lowest blocks touched by `range`.
    pub fn lowest_blocks(&self, range: &Range) -> Vec<Path> {
        self.lowest_matching(range, Element::is_block)
    }

    pub(crate) fn text_positions(&self) -> Vec<TextPosition> {
        let mut positions = Vec::new();
        let mut cursor = 0;
        let mut current_block: Option<Path> = None;
        for (path, leaf) in self.leaves() {
            let block = self.nearest_block(&path).map(|(block, _)| block);
            if current_block.is_some() && block != current_block {
                // Block boundaries count as one position so the end of one
                // block and the start of the next stay distinct.
                cursor += 1;
            }
            current_block = block;
            let len = leaf.len();
            positions.push(TextPosition {
                in_void: self.void_ancestor(&path).is_some(),
                path,
                len,
                start: cursor,
            });
            cursor += len;
        }
        positions
    }

    /// Flat position of `point`, counting characters plus one per block break.
    pub fn offset_of(&self, point: &Point) -> Result<usize, EditorError> {
        self.check_point(point)?;
        self.text_positions()
            .into_iter()
            .find(|position| position.path == point.path)
            .map(|position| position.start + point.offset)
            .ok_or_else(|| EditorError::out_of_range(&point.path))
    }

    /// Point for a flat position, outside of voids. At a boundary between two
    /// leaves of the same block the later leaf wins.
    pub fn point_at_offset(&self, offset: usize) -> Option<Point> {
        let mut fallback = None;
        for position in self.text_positions() {
            if position.in_void {
                continue;
            }
            let end = position.start + position.len;
            if offset >= position.start && offset <= end {
                let point = Point::new(position.path, offset - position.start);
                if offset < end {
                    return Some(point);
                }
                fallback = Some(point);
            } else if offset < position.start {
                break;
            }
        }
        fallback
    }

    /// Apply one primitive operation in place, carrying the selection along.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<(), EditorError> {
        if let Operation::SetSelection { selection, .. } = op {
            self.selection = selection.clone();
            return Ok(());
        }

        let relocated = match op {
            Operation::RemoveNode { path, .. } => self.relocate_selection_before_removal(path),
            _ => None,
        };

        self.apply_to_tree(op)?;

        if let Some(selection) = self.selection.take() {
            self.selection = match selection.transform(op, RangeAffinity::Forward) {
                Some(selection) => Some(selection),
                None => relocated
                    .and_then(|point| point.transform(op, Affinity::Forward))
                    .map(Range::collapsed),
            };
        }
        Ok(())
    }

    /// Where a selection point inside a subtree about to be removed should go:
    /// the end of the previous leaf, or else the start of the next one.
    fn relocate_selection_before_removal(&self, removed: &Path) -> Option<Point> {
        let selection = self.selection.as_ref()?;
        let affected = removed.is_ancestor_or_equal(&selection.anchor.path)
            || removed.is_ancestor_or_equal(&selection.focus.path);
        if !affected {
            return None;
        }
        let leaves = self.leaves();
        let previous = leaves
            .iter()
            .rev()
            .find(|(path, _)| path < removed && !removed.is_ancestor_or_equal(path))
            .map(|(path, leaf)| Point::new(path.clone(), leaf.len()));
        previous.or_else(|| {
            leaves
                .iter()
                .find(|(path, _)| path > removed && !removed.is_ancestor_or_equal(path))
                .map(|(path, _)| Point::new(path.clone(), 0))
        })
    }

    fn apply_to_tree(&mut self, op: &Operation) -> Result<(), EditorError> {
        match op {
            Operation::InsertNode { path, node } => {
                let (parent, index) = split_path(path)?;
                let siblings = self.children_at_mut(&parent)?;
                if index > siblings.len() {
                    return Err(EditorError::out_of_range(path));
                }
                siblings.insert(index, node.clone());
            }
            Operation::RemoveNode { path, .. } => {
                let (parent, index) = split_path(path)?;
                let siblings = self.children_at_mut(&parent)?;
                if index >= siblings.len() {
                    return Err(EditorError::out_of_range(path));
                }
                siblings.remove(index);
            }
            Operation::InsertText { path, offset, text } => {
                let leaf = self.leaf_mut(path)?;
                check_offset(path, leaf, *offset)?;
                let at = byte_index(&leaf.text, *offset);
                leaf.text.insert_str(at, text);
            }
            Operation::RemoveText { path, offset, text } => {
                let leaf = self.leaf_mut(path)?;
                let end = offset + text.chars().count();
                check_offset(path, leaf, end)?;
                let from = byte_index(&leaf.text, *offset);
                let to = byte_index(&leaf.text, end);
                leaf.text.replace_range(from..to, "");
            }
            Operation::SplitNode { path, position } => {
                let right = match self.node_mut(path)? {
                    Node::Text(leaf) => {
                        check_offset(path, leaf, *position)?;
                        let at = byte_index(&leaf.text, *position);
                        Node::Text(Leaf {
                            text: leaf.text.split_off(at),
                            marks: leaf.marks.clone(),
                        })
                    }
                    Node::Element(element) => {
                        if *position > element.children.len() {
                            return Err(EditorError::out_of_range(&path.child(*position)));
                        }
                        let tail = element.children.split_off(*position);
                        Node::Element(element.with_children(tail))
                    }
                };
                let (parent, index) = split_path(path)?;
                self.children_at_mut(&parent)?.insert(index + 1, right);
            }
            Operation::MergeNode { path, .. } => {
                let previous = path.previous().ok_or_else(|| EditorError::out_of_range(path))?;
                let (parent, index) = split_path(path)?;
                let siblings = self.children_at_mut(&parent)?;
                if index >= siblings.len() {
                    return Err(EditorError::out_of_range(path));
                }
                match (&siblings[index - 1], &siblings[index]) {
                    (Node::Text(_), Node::Text(_)) | (Node::Element(_), Node::Element(_)) => {}
                    (Node::Text(_), Node::Element(_)) => {
                        return Err(EditorError::NotALeaf { path: path.clone() });
                    }
                    (Node::Element(_), Node::Text(_)) => {
                        return Err(EditorError::NotAnElement { path: path.clone() });
                    }
                }
                let node = siblings.remove(index);
                match (&mut siblings[index - 1], node) {
                    (Node::Text(target), Node::Text(leaf)) => target.text.push_str(&leaf.text),
                    (Node::Element(target), Node::Element(element)) => {
                        target.children.extend(element.children)
                    }
                    _ => return Err(EditorError::out_of_range(&previous)),
                }
            }
            Operation::MoveNode { path, new_path } => {
                if path == new_path {
                    return Ok(());
                }
                if path.is_ancestor_of(new_path) {
                    return Err(EditorError::out_of_range(new_path));
                }
                let (parent, index) = split_path(path)?;
                let siblings = self.children_at_mut(&parent)?;
                if index >= siblings.len() {
                    return Err(EditorError::out_of_range(path));
                }
                let node = siblings.remove(index);
                let target = path
                    .transform(op, Affinity::Forward)
                    .ok_or_else(|| EditorError::out_of_range(new_path))?;
                let (target_parent, target_index) = split_path(&target)?;
                let siblings = self.children_at_mut(&target_parent)?;
                if target_index > siblings.len() {
                    return Err(EditorError::out_of_range(&target));
                }
                siblings.insert(target_index, node);
            }
            Operation::SetNode {
                path, properties, ..
            } => match self.node_mut(path)? {
                Node::Element(element) => {
                    if properties.marks.is_some() {
                        return Err(EditorError::NotALeaf { path: path.clone() });
                    }
                    if let Some(kind) = &properties.kind {
                        element.kind = kind.clone();
                    }
                    if let Some(void) = properties.void {
                        element.void = void;
                    }
                }
                Node::Text(leaf) => {
                    if properties.kind.is_some() || properties.void.is_some() {
                        return Err(EditorError::NotAnElement { path: path.clone() });
                    }
                    if let Some(marks) = &properties.marks {
                        leaf.marks = marks.clone();
                    }
                }
            },
            Operation::SetSelection { .. } => {}
        }
        Ok(())
    }

    fn leaf_mut(&mut self, path: &Path) -> Result<&mut Leaf, EditorError> {
        self.node_mut(path)?
            .as_leaf_mut()
            .ok_or_else(|| EditorError::NotALeaf { path: path.clone() })
    }

    /// Kind of the nearest block around the selection focus.
    pub fn focus_block_kind(&self) -> Option<&ElementKind> {
        let focus = &self.selection.as_ref()?.focus;
        self.nearest_block(&focus.path)
            .map(|(_, element)| &element.kind)
    }
}

fn split_path(path: &Path) -> Result<(Path, usize), EditorError> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(EditorError::out_of_range(path)),
    }
}

fn check_offset(path: &Path, leaf: &Leaf, offset: usize) -> Result<(), EditorError> {
    if offset > leaf.len() {
        return Err(EditorError::OffsetOutOfRange {
            path: path.clone(),
            offset,
            len: leaf.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mark;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::new(vec![
            Element::new(
                ElementKind::Paragraph,
                vec![
                    Node::Text(Leaf::new("This is ")),
                    Node::Text(Leaf::new("rich").with_mark(Mark::Bold)),
                    Node::Text(Leaf::new(" text")),
                ],
            ),
            Element::new(ElementKind::BlockQuote, vec![Node::Text(Leaf::new("A quote."))]),
        ])
    }

    #[test]
    fn test_node_lookup_fails_loudly_for_missing_paths() {
        let doc = sample();
        assert_eq!(doc.leaf(&Path::from(vec![0, 1])).unwrap().text, "rich");
        assert_eq!(
            doc.node(&Path::from(vec![0, 7])),
            Err(EditorError::OutOfRange {
                path: Path::from(vec![0, 7])
            })
        );
        assert!(doc.node(&Path::root()).is_err());
    }

    #[test]
    fn test_parent_of_leaf_is_its_block() {
        let doc = sample();
        let (parent, parent_path) = doc.parent(&Path::from(vec![1, 0])).unwrap();
        assert_eq!(parent_path, Path::from(vec![1]));
        assert_eq!(parent.as_element().unwrap().kind, ElementKind::BlockQuote);

        let (root, root_path) = doc.parent(&Path::from(vec![0])).unwrap();
        assert!(root_path.is_root());
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn test_parent_of_root_or_invalid_path_is_out_of_range() {
        let doc = sample();
        assert!(matches!(
            doc.parent(&Path::root()),
            Err(EditorError::OutOfRange { .. })
        ));
        assert!(matches!(
            doc.parent(&Path::from(vec![5, 0])),
            Err(EditorError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_flat_offsets_round_trip_across_blocks() {
        let doc = sample();
        let end_of_first = Point::new(vec![0, 2], 5);
        let start_of_second = Point::new(vec![1, 0], 0);
        assert_eq!(doc.offset_of(&end_of_first).unwrap(), 17);
        assert_eq!(doc.offset_of(&start_of_second).unwrap(), 18);
        assert_eq!(doc.point_at_offset(17), Some(end_of_first));
        assert_eq!(doc.point_at_offset(18), Some(start_of_second));
        // At a leaf boundary inside a block the later leaf wins.
        assert_eq!(doc.point_at_offset(8), Some(Point::new(vec![0, 1], 0)));
    }

    #[test]
    fn test_string_in_range_spans_leaves() {
        let doc = sample();
        let range = Range::new(Point::new(vec![0, 0], 5), Point::new(vec![0, 2], 3));
        assert_eq!(doc.string_in(&range), "is rich te");
    }

    #[test]
    fn test_lowest_blocks_skip_containers() {
        let doc = Document::new(vec![Element::new(
            ElementKind::BulletedList,
            vec![
                Node::Element(Element::new(ElementKind::ListItem, vec![Leaf::new("one").into()])),
                Node::Element(Element::new(ElementKind::ListItem, vec![Leaf::new("two").into()])),
            ],
        )]);
        let range = Range::new(Point::new(vec![0, 0, 0], 1), Point::new(vec![0, 1, 0], 1));
        assert_eq!(
            doc.lowest_blocks(&range),
            vec![Path::from(vec![0, 0]), Path::from(vec![0, 1])]
        );
    }

    #[test]
    fn test_apply_split_and_merge_keep_selection() {
        let mut doc = sample();
        doc.selection = Some(Range::collapsed(Point::new(vec![0, 0], 6)));
        let split = Operation::SplitNode {
            path: Path::from(vec![0, 0]),
            position: 4,
        };
        doc.apply_operation(&split).unwrap();
        assert_eq!(doc.leaf(&Path::from(vec![0, 0])).unwrap().text, "This");
        assert_eq!(doc.leaf(&Path::from(vec![0, 1])).unwrap().text, " is ");
        assert_eq!(
            doc.selection().unwrap().focus,
            Point::new(vec![0, 1], 2)
        );

        doc.apply_operation(&split.inverse()).unwrap();
        assert_eq!(doc.leaf(&Path::from(vec![0, 0])).unwrap().text, "This is ");
        assert_eq!(
            doc.selection().unwrap().focus,
            Point::new(vec![0, 0], 6)
        );
    }

    #[test]
    fn test_removing_selected_leaf_moves_selection_to_previous_leaf() {
        let mut doc = sample();
        doc.selection = Some(Range::collapsed(Point::new(vec![0, 1], 2)));
        let node = doc.node(&Path::from(vec![0, 1])).unwrap().clone();
        doc.apply_operation(&Operation::RemoveNode {
            path: Path::from(vec![0, 1]),
            node,
        })
        .unwrap();
        assert_eq!(
            doc.selection(),
            Some(&Range::collapsed(Point::new(vec![0, 0], 8)))
        );
    }

    #[test]
    fn test_invalid_operation_is_rejected() {
        let mut doc = sample();
        let result = doc.apply_operation(&Operation::InsertText {
            path: Path::from(vec![0, 0]),
            offset: 99,
            text: "x".to_string(),
        });
        assert!(matches!(result, Err(EditorError::OffsetOutOfRange { .. })));
    }
}
