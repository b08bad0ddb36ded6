//! Structural transforms built from primitive operations.
//!
//! Each transform runs inside a [`Transaction`] and records what it does as
//! [`Operation`]s, so the live selection and every path or range reference
//! taken during the transaction are carried across it.

use crate::editing::operation::{NodeProperties, RangeAffinity};
use crate::editing::transaction::PathRef;
use crate::editing::{Document, Operation, Transaction};
use crate::error::EditorError;
use crate::models::{
    Edge, Element, ElementKind, Leaf, MarkSet, Node, Path, Point, Range, byte_index,
};

/// Where [`Transaction::insert_nodes`] puts its nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum InsertAt {
    /// Insert exactly at this path.
    Path(Path),
    /// Split the tree at this point and insert in the gap.
    Point(Point),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsertOptions {
    /// Defaults to the end of the selection, or the end of the document.
    pub at: Option<InsertAt>,
    /// Collapse the selection to the end of the last inserted node.
    pub select: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrapOptions {
    /// Defaults to the selection.
    pub at: Option<Range>,
    /// Split leaves and inlines at the range edges so only the covered
    /// content is wrapped.
    pub split: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnwrapOptions {
    /// Defaults to the selection.
    pub at: Option<Range>,
    /// Only lift the children covered by the range, splitting the matched
    /// element around them.
    pub split: bool,
}

enum Backspace {
    Text(Operation),
    Node(Path),
}

impl Transaction {
    pub fn select(&mut self, range: Range) -> Result<(), EditorError> {
        self.set_selection(Some(range))
    }

    pub fn deselect(&mut self) -> Result<(), EditorError> {
        self.set_selection(None)
    }

    /// Collapse the selection onto one of its edges.
    pub fn collapse(&mut self, edge: Edge) -> Result<(), EditorError> {
        let Some(selection) = self.selection() else {
            return Ok(());
        };
        self.set_selection(Some(Range::collapsed(selection.edge(edge).clone())))
    }

    pub fn insert_nodes(
        &mut self,
        nodes: Vec<Node>,
        options: InsertOptions,
    ) -> Result<(), EditorError> {
        let nodes: Vec<Node> = nodes.into_iter().map(Node::healed).collect();
        let Some(first) = nodes.first() else {
            return Ok(());
        };
        let inline = first.is_inline_level();
        let at = match options.at {
            Some(at) => at,
            None => match self.selection() {
                Some(selection) => InsertAt::Point(selection.end().clone()),
                None => InsertAt::Path(Path::new(vec![self.doc().children().len()])),
            },
        };
        let mut path = match at {
            InsertAt::Path(path) => path,
            InsertAt::Point(point) => self.insertion_path(&point, inline)?,
        };
        let mut last = path.clone();
        for node in nodes {
            self.apply(Operation::InsertNode {
                path: path.clone(),
                node,
            })?;
            last = path.clone();
            path = path.next().ok_or_else(|| EditorError::out_of_range(&path))?;
        }
        if options.select {
            let end = self.doc().end_of(&last)?;
            self.set_selection(Some(Range::collapsed(end)))?;
        }
        Ok(())
    }

    /// Gap path for inserting at `point`. Inline content goes between leaves,
    /// blocks go beside the lowest block, and nothing ever lands inside a void.
    fn insertion_path(&mut self, point: &Point, inline: bool) -> Result<Path, EditorError> {
        self.doc().check_point(point)?;
        if let Some(void) = self.doc().void_ancestor(&point.path) {
            return void.next().ok_or_else(|| EditorError::out_of_range(&void));
        }
        if inline {
            return self.split_to(point, &point.path, Edge::Start);
        }
        let (block, _) = self
            .doc()
            .nearest_block(&point.path)
            .ok_or_else(|| EditorError::out_of_range(&point.path))?;
        self.split_to(point, &block, Edge::Start)
    }

    /// Split the leaf under `point` and each ancestor up to and including
    /// `top`, then return the gap between the halves at `top`'s level.
    ///
    /// Nodes are never split at an edge; the gap simply falls before or after
    /// them. A point inside a void below `top` snaps to the void's `edge`.
    pub(crate) fn split_to(
        &mut self,
        point: &Point,
        top: &Path,
        edge: Edge,
    ) -> Result<Path, EditorError> {
        if !top.is_ancestor_or_equal(&point.path) {
            return Err(EditorError::out_of_range(top));
        }
        let (mut path, mut position) = match self.doc().void_ancestor(&point.path) {
            Some(void) if top.is_ancestor_or_equal(&void) => {
                let len = self.doc().node(&void)?.children().len();
                let position = match edge {
                    Edge::Start => 0,
                    Edge::End => len,
                };
                (void, position)
            }
            _ => (point.path.clone(), point.offset),
        };
        loop {
            let len = match self.doc().node(&path)? {
                Node::Text(leaf) => leaf.len(),
                Node::Element(element) => element.children.len(),
            };
            let index = index_of(&path)?;
            let gap = if position == 0 {
                index
            } else if position >= len {
                index + 1
            } else {
                self.apply(Operation::SplitNode {
                    path: path.clone(),
                    position,
                })?;
                index + 1
            };
            let parent = path
                .parent()
                .ok_or_else(|| EditorError::out_of_range(&path))?;
            if path == *top {
                return Ok(parent.child(gap));
            }
            path = parent;
            position = gap;
        }
    }

    /// Wrap the content in range in copies of `wrapper`.
    ///
    /// Inline wrappers go around the covered run inside each lowest block;
    /// block wrappers go around the covered blocks under their common parent.
    /// The wrapper's own children are dropped. A collapsed range wraps nothing.
    pub fn wrap_nodes(&mut self, wrapper: Element, options: WrapOptions) -> Result<(), EditorError> {
        let reselect = options.at.is_none();
        let Some(range) = options.at.or_else(|| self.selection()) else {
            return Ok(());
        };
        self.doc().check_point(&range.anchor)?;
        self.doc().check_point(&range.focus)?;
        let wrapper = wrapper.with_children(Vec::new());
        if wrapper.is_inline() {
            self.wrap_inline(&wrapper, range, options.split, reselect)
        } else {
            self.wrap_blocks(&wrapper, &range)
        }
    }

    fn wrap_inline(
        &mut self,
        wrapper: &Element,
        range: Range,
        split: bool,
        reselect: bool,
    ) -> Result<(), EditorError> {
        if range.is_collapsed() {
            return Ok(());
        }
        let range_ref = self.range_ref(range.clone(), RangeAffinity::Inward);
        let blocks: Vec<PathRef> = self
            .doc()
            .lowest_blocks(&range)
            .into_iter()
            .map(|block| self.path_ref(block))
            .collect();
        for block in blocks.into_iter().rev() {
            let (Some(block), Some(range)) = (self.path(block), self.range(range_ref)) else {
                continue;
            };
            self.wrap_in_block(wrapper, &block, &range, split)?;
        }
        if reselect && let Some(range) = self.range(range_ref) {
            self.set_selection(Some(range))?;
        }
        Ok(())
    }

    fn wrap_in_block(
        &mut self,
        wrapper: &Element,
        block: &Path,
        range: &Range,
        split: bool,
    ) -> Result<(), EditorError> {
        let depth = block.len();
        let start = range.start().clone().max(self.doc().start_of(block)?);
        let end = range.end().clone().min(self.doc().end_of(block)?);
        if start >= end {
            return Ok(());
        }
        let (from, to) = if split {
            let end_top = block.child(end.path.indices()[depth]);
            let end_gap = self.split_to(&end, &end_top, Edge::End)?;
            let before = self.doc().children_at(block)?.len();
            let start_top = block.child(start.path.indices()[depth]);
            let start_gap = self.split_to(&start, &start_top, Edge::Start)?;
            let after = self.doc().children_at(block)?.len();
            (index_of(&start_gap)?, index_of(&end_gap)? + (after - before))
        } else {
            (start.path.indices()[depth], end.path.indices()[depth] + 1)
        };
        self.wrap_children(wrapper, block, from, to)
    }

    fn wrap_blocks(&mut self, wrapper: &Element, range: &Range) -> Result<(), EditorError> {
        let blocks = self.doc().lowest_blocks(range);
        let (Some(first), Some(last)) = (blocks.first(), blocks.last()) else {
            return Ok(());
        };
        let parent = if first == last {
            first
                .parent()
                .ok_or_else(|| EditorError::out_of_range(first))?
        } else {
            first.common(last)
        };
        let depth = parent.len();
        let from = first.indices()[depth];
        let to = last.indices()[depth] + 1;
        self.wrap_children(wrapper, &parent, from, to)
    }

    /// Move children `from..to` of `parent` into a new copy of `wrapper`
    /// placed where they were.
    fn wrap_children(
        &mut self,
        wrapper: &Element,
        parent: &Path,
        from: usize,
        to: usize,
    ) -> Result<(), EditorError> {
        if from >= to {
            return Ok(());
        }
        let target = parent.child(from);
        self.apply(Operation::InsertNode {
            path: target.clone(),
            node: Node::Element(wrapper.clone()),
        })?;
        for k in 0..(to - from) {
            self.apply(Operation::MoveNode {
                path: parent.child(from + 1),
                new_path: target.child(k),
            })?;
        }
        Ok(())
    }

    /// Lift the children of the lowest elements matching `predicate` into
    /// their grandparent, removing the emptied elements.
    pub fn unwrap_nodes(
        &mut self,
        predicate: impl Fn(&Element) -> bool,
        options: UnwrapOptions,
    ) -> Result<(), EditorError> {
        let Some(range) = options.at.or_else(|| self.selection()) else {
            return Ok(());
        };
        let range_ref = self.range_ref(range.clone(), RangeAffinity::Inward);
        let matches: Vec<PathRef> = self
            .doc()
            .lowest_matching(&range, &predicate)
            .into_iter()
            .map(|path| self.path_ref(path))
            .collect();
        for reference in matches.into_iter().rev() {
            let (Some(path), Some(range)) = (self.path(reference), self.range(range_ref)) else {
                continue;
            };
            let len = self.doc().children_at(&path)?.len();
            let (from, to) = if options.split {
                let covered: Vec<usize> = (0..len)
                    .filter(|index| range.includes_path(&path.child(*index)))
                    .collect();
                match (covered.first(), covered.last()) {
                    (Some(first), Some(last)) => (*first, *last + 1),
                    _ => continue,
                }
            } else {
                (0, len)
            };
            self.lift_children(&path, from, to)?;
        }
        Ok(())
    }

    /// Split `container` so children `from..to` sit alone in it, move them
    /// out one level, and drop the emptied container.
    fn lift_children(&mut self, container: &Path, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.doc().children_at(container)?.len();
        if to < len {
            self.apply(Operation::SplitNode {
                path: container.clone(),
                position: to,
            })?;
        }
        let mut container = container.clone();
        if from > 0 {
            self.apply(Operation::SplitNode {
                path: container.clone(),
                position: from,
            })?;
            container = container
                .next()
                .ok_or_else(|| EditorError::out_of_range(&container))?;
        }
        let index = index_of(&container)?;
        let parent = container
            .parent()
            .ok_or_else(|| EditorError::out_of_range(&container))?;
        for k in 0..(to - from) {
            let current = parent.child(index + k);
            self.apply(Operation::MoveNode {
                path: current.child(0),
                new_path: current,
            })?;
        }
        self.remove_node(&parent.child(index + to - from))
    }

    /// Set element attributes on the lowest matching elements in the
    /// selection.
    pub fn set_nodes(
        &mut self,
        properties: NodeProperties,
        predicate: impl Fn(&Element) -> bool,
    ) -> Result<(), EditorError> {
        let Some(range) = self.selection() else {
            return Ok(());
        };
        for path in self.doc().lowest_matching(&range, predicate) {
            let element = self.doc().element(&path)?;
            let previous = NodeProperties {
                kind: properties.kind.as_ref().map(|_| element.kind.clone()),
                void: properties.void.map(|_| element.void),
                marks: None,
            };
            if previous == properties {
                continue;
            }
            self.apply(Operation::SetNode {
                path,
                properties: properties.clone(),
                previous,
            })?;
        }
        Ok(())
    }

    pub(crate) fn set_marks(&mut self, path: &Path, marks: MarkSet) -> Result<(), EditorError> {
        let leaf = self.doc().leaf(path)?;
        if leaf.marks == marks {
            return Ok(());
        }
        let previous = NodeProperties::marks(leaf.marks.clone());
        self.apply(Operation::SetNode {
            path: path.clone(),
            properties: NodeProperties::marks(marks),
            previous,
        })
    }

    pub(crate) fn remove_node(&mut self, path: &Path) -> Result<(), EditorError> {
        let node = self.doc().node(path)?.clone();
        self.apply(Operation::RemoveNode {
            path: path.clone(),
            node,
        })
    }

    /// Move the focus one position. Without `extend` an expanded selection
    /// first collapses towards the direction of travel.
    pub fn move_selection(&mut self, forward: bool, extend: bool) -> Result<(), EditorError> {
        let Some(selection) = self.selection() else {
            return Ok(());
        };
        if !extend && !selection.is_collapsed() {
            return self.collapse(if forward { Edge::End } else { Edge::Start });
        }
        let offset = self.doc().offset_of(&selection.focus)?;
        let target = if forward {
            offset + 1
        } else {
            match offset.checked_sub(1) {
                Some(target) => target,
                None => return Ok(()),
            }
        };
        let Some(focus) = self.doc().point_at_offset(target) else {
            return Ok(());
        };
        let anchor = if extend {
            selection.anchor
        } else {
            focus.clone()
        };
        self.set_selection(Some(Range::new(anchor, focus)))
    }

    /// Type `text` at the selection, replacing any selected text. Pending
    /// marks that differ from the leaf under the cursor start a new leaf.
    pub fn insert_text(&mut self, text: &str) -> Result<(), EditorError> {
        if text.is_empty() {
            return Ok(());
        }
        let Some(selection) = self.selection() else {
            return Ok(());
        };
        if !selection.is_collapsed() {
            self.delete_range(&selection)?;
        }
        let Some(point) = self.selection().map(|selection| selection.focus) else {
            return Ok(());
        };
        if self.doc().void_ancestor(&point.path).is_some() {
            return Ok(());
        }
        let leaf_marks = self.doc().leaf(&point.path)?.marks.clone();
        match self.doc().pending_marks.clone() {
            Some(marks) if marks != leaf_marks => {
                let path = self.split_to(&point, &point.path, Edge::Start)?;
                let leaf = Leaf {
                    text: text.to_string(),
                    marks,
                };
                let end = Point::new(path.clone(), leaf.len());
                self.apply(Operation::InsertNode {
                    path,
                    node: Node::Text(leaf),
                })?;
                self.set_selection(Some(Range::collapsed(end)))
            }
            _ => self.apply(Operation::InsertText {
                path: point.path,
                offset: point.offset,
                text: text.to_string(),
            }),
        }
    }

    /// Remove the text inside `range` and collapse to its start. Blocks are
    /// emptied but never joined.
    pub(crate) fn delete_range(&mut self, range: &Range) -> Result<(), EditorError> {
        let (start, end) = range.edges();
        let (start, end) = (start.clone(), end.clone());
        let mut removals = Vec::new();
        for (path, leaf) in self.doc().leaves() {
            if path < start.path || path > end.path {
                continue;
            }
            let from = if path == start.path { start.offset } else { 0 };
            let to = if path == end.path { end.offset } else { leaf.len() };
            if from < to {
                let text = &leaf.text[byte_index(&leaf.text, from)..byte_index(&leaf.text, to)];
                removals.push(Operation::RemoveText {
                    path,
                    offset: from,
                    text: text.to_string(),
                });
            }
        }
        for op in removals.into_iter().rev() {
            self.apply(op)?;
        }
        self.set_selection(Some(Range::collapsed(start)))
    }

    /// Delete one character before the cursor, or the selected text.
    ///
    /// At the start of a block the block merges into its previous sibling
    /// block. A void before the cursor, or around it, is removed whole.
    pub fn delete_backward(&mut self) -> Result<(), EditorError> {
        let Some(selection) = self.selection() else {
            return Ok(());
        };
        if !selection.is_collapsed() {
            return self.delete_range(&selection);
        }
        let point = selection.focus;
        if let Some(void) = self.doc().void_ancestor(&point.path) {
            return self.remove_node(&void);
        }
        if point.offset > 0 {
            let leaf = self.doc().leaf(&point.path)?;
            let Some(removed) = leaf.text.chars().nth(point.offset - 1) else {
                return Ok(());
            };
            return self.apply(Operation::RemoveText {
                path: point.path,
                offset: point.offset - 1,
                text: removed.to_string(),
            });
        }
        let Some((block, _)) = self.doc().nearest_block(&point.path) else {
            return Ok(());
        };
        match self.backspace_target(&block, &point.path) {
            Some(Backspace::Text(op)) => self.apply(op),
            Some(Backspace::Node(void)) => self.remove_node(&void),
            None => self.join_with_previous_block(&block),
        }
    }

    fn backspace_target(&self, block: &Path, cursor: &Path) -> Option<Backspace> {
        let doc = self.doc();
        for (path, leaf) in doc.leaves_under(block).into_iter().rev() {
            if path >= *cursor {
                continue;
            }
            if let Some(void) = doc.void_ancestor(&path) {
                return Some(Backspace::Node(void));
            }
            if let Some(last) = leaf.text.chars().last() {
                return Some(Backspace::Text(Operation::RemoveText {
                    offset: leaf.len() - 1,
                    path,
                    text: last.to_string(),
                }));
            }
        }
        None
    }

    fn join_with_previous_block(&mut self, block: &Path) -> Result<(), EditorError> {
        let Some(previous) = block.previous() else {
            return Ok(());
        };
        let doc = self.doc();
        let flat = |path: &Path| {
            doc.element(path)
                .map(|element| element.is_block() && !element.children.iter().any(Node::is_block))
                .unwrap_or(false)
        };
        if !flat(&previous) || !flat(block) {
            return Ok(());
        }
        let position = doc.children_at(&previous)?.len();
        self.apply(Operation::MergeNode {
            path: block.clone(),
            position,
        })
    }

    /// Split the lowest block at the cursor. At the very end of a block a new
    /// empty paragraph (or list item) follows it; at the very start an empty
    /// block of the same kind goes before it.
    pub fn insert_break(&mut self) -> Result<(), EditorError> {
        let Some(selection) = self.selection() else {
            return Ok(());
        };
        if !selection.is_collapsed() {
            self.delete_range(&selection)?;
        }
        let Some(point) = self.selection().map(|selection| selection.focus) else {
            return Ok(());
        };
        if self.doc().void_ancestor(&point.path).is_some() {
            return Ok(());
        }
        let Some((block, kind)) = self
            .doc()
            .nearest_block(&point.path)
            .map(|(path, element)| (path, element.kind.clone()))
        else {
            return Ok(());
        };
        let parent = block
            .parent()
            .ok_or_else(|| EditorError::out_of_range(&block))?;
        let before = self.doc().children_at(&parent)?.len();
        let gap = self.split_to(&point, &block, Edge::Start)?;
        if self.doc().children_at(&parent)?.len() > before {
            let start = self.doc().start_of(&gap)?;
            return self.set_selection(Some(Range::collapsed(start)));
        }
        let fresh_kind = if kind == ElementKind::ListItem || gap == block {
            kind
        } else {
            ElementKind::Paragraph
        };
        self.apply(Operation::InsertNode {
            path: gap.clone(),
            node: Node::Element(Element::new(fresh_kind, vec![Node::Text(Leaf::empty())])),
        })?;
        if gap != block {
            let start = self.doc().start_of(&gap)?;
            self.set_selection(Some(Range::collapsed(start)))?;
        }
        Ok(())
    }
}

fn index_of(path: &Path) -> Result<usize, EditorError> {
    path.last().ok_or_else(|| EditorError::out_of_range(path))
}

impl Document {
    pub fn select(&mut self, range: Range) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.select(range))
    }

    pub fn deselect(&mut self) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.deselect())
    }

    pub fn move_selection(
        &mut self,
        forward: bool,
        extend: bool,
    ) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.move_selection(forward, extend))
    }

    pub fn insert_text(&mut self, text: &str) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.insert_text(text))
    }

    pub fn delete_backward(&mut self) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.delete_backward())
    }

    pub fn insert_break(&mut self) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.insert_break())
    }

    pub fn insert_nodes(
        &mut self,
        nodes: Vec<Node>,
        options: InsertOptions,
    ) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.insert_nodes(nodes, options))
    }

    pub fn wrap_nodes(
        &mut self,
        wrapper: Element,
        options: WrapOptions,
    ) -> Result<Vec<Operation>, EditorError> {
        self.transact(|tx| tx.wrap_nodes(wrapper, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mark;
    use pretty_assertions::assert_eq;

    fn cursor(path: &[usize], offset: usize) -> Range {
        Range::collapsed(Point::new(path.to_vec(), offset))
    }

    fn span(from: (&[usize], usize), to: (&[usize], usize)) -> Range {
        Range::new(Point::new(from.0.to_vec(), from.1), Point::new(to.0.to_vec(), to.1))
    }

    #[test]
    fn test_insert_inline_splits_leaf() {
        let mut doc = Document::new(vec![Element::paragraph("abcd")]);
        doc.select(cursor(&[0, 0], 2)).unwrap();
        doc.insert_nodes(
            vec![Element::inline_text("X").into()],
            InsertOptions {
                at: None,
                select: true,
            },
        )
        .unwrap();
        let block = doc.element(&Path::from(vec![0])).unwrap();
        assert_eq!(block.children.len(), 3);
        assert_eq!(block.text(), "abXcd");
        assert_eq!(doc.selection(), Some(&cursor(&[0, 1, 0], 1)));
    }

    #[test]
    fn test_insert_at_leaf_edge_does_not_split() {
        let mut doc = Document::new(vec![Element::paragraph("abcd")]);
        doc.select(cursor(&[0, 0], 4)).unwrap();
        let ops = doc
            .insert_nodes(vec![Element::inline_text("X").into()], InsertOptions::default())
            .unwrap();
        assert!(!ops.iter().any(|op| matches!(op, Operation::SplitNode { .. })));
        assert_eq!(doc.element(&Path::from(vec![0])).unwrap().text(), "abcdX");
    }

    #[test]
    fn test_wrap_inline_covers_exactly_the_selection() {
        let mut doc = Document::new(vec![Element::paragraph("hello world")]);
        doc.select(span((&[0, 0], 2), (&[0, 0], 5))).unwrap();
        doc.wrap_nodes(
            Element::inline_text("ignored"),
            WrapOptions {
                at: None,
                split: true,
            },
        )
        .unwrap();
        let wrap = doc.element(&Path::from(vec![0, 1])).unwrap();
        assert_eq!(wrap.kind, ElementKind::Inline);
        assert_eq!(wrap.text(), "llo");
        assert_eq!(doc.text(), "hello world");
        assert_eq!(doc.selection().unwrap().end(), &Point::new(vec![0, 1, 0], 3));
    }

    #[test]
    fn test_wrap_inline_across_blocks_wraps_each_block() {
        let mut doc = Document::new(vec![Element::paragraph("first"), Element::paragraph("second")]);
        doc.select(span((&[0, 0], 2), (&[1, 0], 3))).unwrap();
        doc.wrap_nodes(
            Element::inline_text(""),
            WrapOptions {
                at: None,
                split: true,
            },
        )
        .unwrap();
        assert_eq!(doc.element(&Path::from(vec![0, 1])).unwrap().text(), "rst");
        assert_eq!(doc.element(&Path::from(vec![1, 0])).unwrap().text(), "sec");
    }

    #[test]
    fn test_wrap_collapsed_range_is_a_no_op() {
        let mut doc = Document::new(vec![Element::paragraph("abc")]);
        doc.select(cursor(&[0, 0], 1)).unwrap();
        let ops = doc
            .wrap_nodes(
                Element::inline_text(""),
                WrapOptions {
                    at: None,
                    split: true,
                },
            )
            .unwrap();
        assert!(ops.is_empty());
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_wrap_blocks_and_unwrap_with_split() {
        let mut doc = Document::new(vec![
            Element::paragraph("one"),
            Element::paragraph("two"),
            Element::paragraph("three"),
        ]);
        doc.select(span((&[0, 0], 0), (&[2, 0], 1))).unwrap();
        doc.wrap_nodes(
            Element::new(ElementKind::BulletedList, Vec::new()),
            WrapOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.children().len(), 1);
        assert_eq!(doc.children()[0].children().len(), 3);

        doc.select(cursor(&[0, 1, 0], 1)).unwrap();
        doc.transact(|tx| {
            tx.unwrap_nodes(
                |element| element.kind.is_list(),
                UnwrapOptions {
                    at: None,
                    split: true,
                },
            )
        })
        .unwrap();
        let kinds: Vec<ElementKind> = doc
            .children()
            .iter()
            .map(|node| node.as_element().unwrap().kind.clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::BulletedList,
                ElementKind::Paragraph,
                ElementKind::BulletedList
            ]
        );
        assert_eq!(doc.children()[1].text(), "two");
        assert_eq!(doc.selection(), Some(&cursor(&[1, 0], 1)));
    }

    #[test]
    fn test_insert_text_uses_pending_marks() {
        let mut doc = Document::new(vec![Element::paragraph("ab")]);
        doc.select(cursor(&[0, 0], 1)).unwrap();
        doc.pending_marks = Some([Mark::Bold].into_iter().collect());
        doc.insert_text("X").unwrap();
        assert_eq!(
            doc.leaf(&Path::from(vec![0, 1])).unwrap(),
            &Leaf::new("X").with_mark(Mark::Bold)
        );
        assert_eq!(doc.pending_marks(), None);
        doc.insert_text("Y").unwrap();
        assert_eq!(doc.leaf(&Path::from(vec![0, 1])).unwrap().text, "XY");
        assert_eq!(doc.text(), "aXYb");
    }

    #[test]
    fn test_insert_text_replaces_selection() {
        let mut doc = Document::new(vec![Element::paragraph("hello world")]);
        doc.select(span((&[0, 0], 0), (&[0, 0], 5))).unwrap();
        doc.insert_text("howdy").unwrap();
        assert_eq!(doc.text(), "howdy world");
        assert_eq!(doc.selection(), Some(&cursor(&[0, 0], 5)));
    }

    #[test]
    fn test_delete_backward_within_and_across_leaves() {
        let mut doc = Document::new(vec![Element::new(
            ElementKind::Paragraph,
            vec![
                Leaf::new("ab").into(),
                Leaf::new("cd").with_mark(Mark::Italic).into(),
            ],
        )]);
        doc.select(cursor(&[0, 1], 0)).unwrap();
        doc.delete_backward().unwrap();
        assert_eq!(doc.text(), "acd");
        doc.delete_backward().unwrap();
        assert_eq!(doc.text(), "cd");
        assert_eq!(doc.children()[0].children().len(), 1);
    }

    #[test]
    fn test_delete_backward_joins_blocks() {
        let mut doc = Document::new(vec![Element::paragraph("ab"), Element::paragraph("cd")]);
        doc.select(cursor(&[1, 0], 0)).unwrap();
        doc.delete_backward().unwrap();
        assert_eq!(doc.children().len(), 1);
        assert_eq!(doc.text(), "abcd");
        assert_eq!(doc.selection(), Some(&cursor(&[0, 0], 2)));
    }

    #[test]
    fn test_insert_break_splits_block() {
        let mut doc = Document::new(vec![Element::new(
            ElementKind::HeadingOne,
            vec![Leaf::new("title").into()],
        )]);
        doc.select(cursor(&[0, 0], 2)).unwrap();
        doc.insert_break().unwrap();
        assert_eq!(doc.text(), "ti\ntle");
        assert_eq!(doc.selection(), Some(&cursor(&[1, 0], 0)));

        doc.select(cursor(&[1, 0], 3)).unwrap();
        doc.insert_break().unwrap();
        assert_eq!(doc.children().len(), 3);
        assert_eq!(
            doc.element(&Path::from(vec![2])).unwrap().kind,
            ElementKind::Paragraph
        );
        assert_eq!(doc.selection(), Some(&cursor(&[2, 0], 0)));
    }

    #[test]
    fn test_move_selection_crosses_blocks() {
        let mut doc = Document::new(vec![Element::paragraph("ab"), Element::paragraph("cd")]);
        doc.select(cursor(&[0, 0], 2)).unwrap();
        doc.move_selection(true, false).unwrap();
        assert_eq!(doc.selection(), Some(&cursor(&[1, 0], 0)));
        doc.move_selection(true, true).unwrap();
        assert_eq!(doc.selection(), Some(&span((&[1, 0], 0), (&[1, 0], 1))));
        doc.move_selection(false, false).unwrap();
        assert_eq!(doc.selection(), Some(&cursor(&[1, 0], 0)));
    }
}
