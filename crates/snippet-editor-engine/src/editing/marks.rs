use crate::editing::operation::RangeAffinity;
use crate::editing::{Document, Operation};
use crate::error::EditorError;
use crate::models::{Leaf, Mark, MarkSet, Path, Point, Range};

impl Document {
    /// Marks that text typed at the cursor would get.
    ///
    /// Pending marks win. Otherwise a cursor at the start of a leaf takes the
    /// marks of the previous leaf in the same block, so typing continues the
    /// run it follows.
    pub fn marks_at(&self, point: &Point) -> Result<MarkSet, EditorError> {
        if let Some(pending) = &self.pending_marks {
            return Ok(pending.clone());
        }
        let leaf = self.leaf(&point.path)?;
        if point.offset == 0
            && let Some(previous) = self.previous_leaf_in_block(&point.path)
        {
            return Ok(previous.marks.clone());
        }
        Ok(leaf.marks.clone())
    }

    fn previous_leaf_in_block(&self, path: &Path) -> Option<&Leaf> {
        let (block, _) = self.nearest_block(path)?;
        self.leaves_under(&block)
            .into_iter()
            .rev()
            .find(|(candidate, _)| candidate < path && self.void_ancestor(candidate).is_none())
            .map(|(_, leaf)| leaf)
    }

    /// Leaves with at least one selected character, with the selected
    /// character span inside each.
    pub(crate) fn touched_leaves(&self, range: &Range) -> Vec<(Path, usize, usize)> {
        let (start, end) = range.edges();
        self.leaves()
            .into_iter()
            .filter(|(path, _)| *path >= start.path && *path <= end.path)
            .filter_map(|(path, leaf)| {
                let from = if path == start.path { start.offset } else { 0 };
                let to = if path == end.path { end.offset } else { leaf.len() };
                (from < to).then_some((path, from, to))
            })
            .collect()
    }

    /// Is `mark` on everything the selection covers?
    ///
    /// For a collapsed cursor this asks about the marks the next typed text
    /// would carry. Without a selection, or with a range that covers no text,
    /// nothing is active.
    pub fn is_mark_active(&self, mark: Mark) -> bool {
        let Some(selection) = &self.selection else {
            return false;
        };
        if selection.is_collapsed() {
            return self
                .marks_at(&selection.focus)
                .map(|marks| marks.contains(&mark))
                .unwrap_or(false);
        }
        let touched = self.touched_leaves(selection);
        !touched.is_empty()
            && touched.iter().all(|(path, _, _)| {
                self.leaf(path)
                    .map(|leaf| leaf.has_mark(mark))
                    .unwrap_or(false)
            })
    }

    /// Add `mark` to the selection, or remove it when it is already active.
    ///
    /// A collapsed cursor only changes the pending marks for the next typed
    /// text. A range splits the leaves at its edges so only the covered text
    /// changes; the selection keeps covering the same text afterwards.
    pub fn toggle_mark(&mut self, mark: Mark) -> Result<Vec<Operation>, EditorError> {
        let Some(selection) = self.selection.clone() else {
            return Ok(Vec::new());
        };
        let active = self.is_mark_active(mark);
        log::debug!("toggling {mark} (active: {active}) over {selection:?}");

        if selection.is_collapsed() {
            let mut marks = self.marks_at(&selection.focus)?;
            if active {
                marks.remove(&mark);
            } else {
                marks.insert(mark);
            }
            self.pending_marks = Some(marks);
            self.version += 1;
            return Ok(Vec::new());
        }

        self.transact(|tx| {
            let range = tx.range_ref(selection.clone(), RangeAffinity::Inward);
            let (start, end) = selection.edges();
            let (start, end) = (start.clone(), end.clone());
            for point in [end, start] {
                let len = tx.doc().leaf(&point.path)?.len();
                if point.offset > 0 && point.offset < len {
                    tx.apply(Operation::SplitNode {
                        path: point.path.clone(),
                        position: point.offset,
                    })?;
                }
            }
            let Some(covered) = tx.range(range) else {
                return Ok(());
            };
            for (path, _, _) in tx.doc().touched_leaves(&covered) {
                let mut marks = tx.doc().leaf(&path)?.marks.clone();
                if active {
                    marks.remove(&mark);
                } else {
                    marks.insert(mark);
                }
                tx.set_marks(&path, marks)?;
            }
            tx.set_selection(Some(covered))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Element, ElementKind, Node};
    use crate::{Document, Leaf, Mark, Path, Point, Range};
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document::new(vec![Element::new(
            ElementKind::Paragraph,
            vec![
                Leaf::new("plain ").into(),
                Leaf::new("bold").with_mark(Mark::Bold).into(),
                Leaf::new(" tail").into(),
            ],
        )])
    }

    fn select(doc: &mut Document, from: (&[usize], usize), to: (&[usize], usize)) {
        doc.select(Range::new(
            Point::new(from.0.to_vec(), from.1),
            Point::new(to.0.to_vec(), to.1),
        ))
        .unwrap();
    }

    fn all_marks(doc: &Document) -> Vec<(String, Vec<Mark>)> {
        doc.leaves()
            .into_iter()
            .map(|(_, leaf)| (leaf.text.clone(), leaf.marks.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_mark_active_only_when_every_leaf_has_it() {
        let mut doc = sample();
        select(&mut doc, (&[0, 1], 0), (&[0, 1], 4));
        assert!(doc.is_mark_active(Mark::Bold));
        select(&mut doc, (&[0, 0], 2), (&[0, 1], 2));
        assert!(!doc.is_mark_active(Mark::Bold));
    }

    #[test]
    fn test_range_edge_touching_zero_characters_is_ignored() {
        let mut doc = sample();
        // Ends at offset 0 of the trailing plain leaf.
        select(&mut doc, (&[0, 1], 0), (&[0, 2], 0));
        assert!(doc.is_mark_active(Mark::Bold));
    }

    #[test]
    fn test_collapsed_cursor_reads_leaf_before() {
        let mut doc = sample();
        doc.select(Range::collapsed(Point::new(vec![0, 2], 0))).unwrap();
        assert!(doc.is_mark_active(Mark::Bold));
        doc.select(Range::collapsed(Point::new(vec![0, 2], 1))).unwrap();
        assert!(!doc.is_mark_active(Mark::Bold));
    }

    #[test]
    fn test_toggle_partial_range_splits_leaves() {
        let mut doc = Document::new(vec![Element::paragraph("hello world")]);
        select(&mut doc, (&[0, 0], 6), (&[0, 0], 11));
        doc.toggle_mark(Mark::Italic).unwrap();
        assert_eq!(
            doc.children()[0].children(),
            &[
                Node::Text(Leaf::new("hello ")),
                Node::Text(Leaf::new("world").with_mark(Mark::Italic)),
            ]
        );
        assert_eq!(doc.string_in(doc.selection().unwrap()), "world");
        assert!(doc.is_mark_active(Mark::Italic));
    }

    #[test]
    fn test_toggle_twice_restores_marks() {
        let mut doc = sample();
        select(&mut doc, (&[0, 1], 1), (&[0, 1], 3));
        assert!(doc.is_mark_active(Mark::Bold));
        let before = all_marks(&doc);
        doc.toggle_mark(Mark::Bold).unwrap();
        assert!(!doc.is_mark_active(Mark::Bold));
        doc.toggle_mark(Mark::Bold).unwrap();
        assert_eq!(all_marks(&doc), before);
        assert_eq!(doc.text(), "plain bold tail");
    }

    #[test]
    fn test_collapsed_toggle_sets_pending_marks() {
        let mut doc = sample();
        doc.select(Range::collapsed(Point::new(vec![0, 0], 2))).unwrap();
        let version = doc.version();
        let ops = doc.toggle_mark(Mark::Code).unwrap();
        assert!(ops.is_empty());
        assert_eq!(doc.version(), version + 1);
        assert!(doc.is_mark_active(Mark::Code));
        doc.insert_text("x").unwrap();
        assert_eq!(
            doc.leaf(&Path::from(vec![0, 1])).unwrap(),
            &Leaf::new("x").with_mark(Mark::Code)
        );
    }

    #[test]
    fn test_toggle_without_selection_does_nothing() {
        let mut doc = sample();
        assert!(doc.toggle_mark(Mark::Bold).unwrap().is_empty());
        assert_eq!(doc.version(), 0);
    }
}
