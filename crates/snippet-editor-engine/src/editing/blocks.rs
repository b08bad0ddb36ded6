use crate::editing::operation::NodeProperties;
use crate::editing::transforms::{UnwrapOptions, WrapOptions};
use crate::editing::{Document, Operation};
use crate::error::EditorError;
use crate::models::{Element, ElementKind};

/// Unwrap passes allowed per toggle; one per level of list nesting.
const MAX_LIST_DEPTH: usize = 32;

impl Document {
    /// Is the selection focus inside a block of this kind?
    ///
    /// Every block around the focus counts, not just the nearest one, so a
    /// list item reports its list container as active too.
    pub fn is_block_active(&self, kind: &ElementKind) -> bool {
        let Some(selection) = &self.selection else {
            return false;
        };
        selection.focus.path.ancestors().skip(1).any(|path| {
            self.element(&path)
                .map(|element| element.is_block() && element.kind == *kind)
                .unwrap_or(false)
        })
    }

    /// Switch the selected blocks to `kind`, or back to paragraphs when the
    /// focus is already inside a `kind` block.
    ///
    /// Any list around the selection is dissolved first, so toggling never
    /// nests lists and toggling twice leaves no container behind.
    pub fn toggle_block(&mut self, kind: ElementKind) -> Result<Vec<Operation>, EditorError> {
        if self.selection.is_none() {
            return Ok(Vec::new());
        }
        let active = self.is_block_active(&kind);
        let list = kind.is_list();
        log::debug!("toggling block {kind} (active: {active})");

        self.transact(|tx| {
            for _ in 0..MAX_LIST_DEPTH {
                let before = tx.operations().len();
                tx.unwrap_nodes(
                    |element| element.kind.is_list(),
                    UnwrapOptions {
                        at: None,
                        split: true,
                    },
                )?;
                if tx.operations().len() == before {
                    break;
                }
            }

            let target = if active {
                ElementKind::Paragraph
            } else if list {
                ElementKind::ListItem
            } else {
                kind.clone()
            };
            tx.set_nodes(NodeProperties::kind(target), Element::is_block)?;

            if !active && list {
                tx.wrap_nodes(Element::new(kind, Vec::new()), WrapOptions::default())?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Element, ElementKind, Leaf, Node};
    use crate::{Document, Path, Point, Range};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn doc_with_cursor() -> Document {
        let mut doc = Document::new(vec![
            Element::paragraph("first"),
            Element::paragraph("second"),
        ]);
        doc.select(Range::collapsed(Point::new(vec![1, 0], 3))).unwrap();
        doc
    }

    fn kinds(doc: &Document) -> Vec<String> {
        doc.children()
            .iter()
            .filter_map(Node::as_element)
            .map(|element| element.kind.to_string())
            .collect()
    }

    #[rstest]
    #[case(ElementKind::Paragraph)]
    #[case(ElementKind::BlockQuote)]
    #[case(ElementKind::HeadingOne)]
    #[case(ElementKind::HeadingTwo)]
    #[case(ElementKind::ListItem)]
    #[case(ElementKind::NumberedList)]
    #[case(ElementKind::BulletedList)]
    fn test_toggle_twice_returns_to_paragraph(#[case] kind: ElementKind) {
        let mut doc = doc_with_cursor();
        doc.toggle_block(kind.clone()).unwrap();
        assert!(doc.is_block_active(&kind));
        doc.toggle_block(kind).unwrap();
        assert_eq!(kinds(&doc), vec!["paragraph", "paragraph"]);
        assert_eq!(doc.text(), "first\nsecond");
    }

    #[test]
    fn test_list_toggle_wraps_item_in_container() {
        let mut doc = doc_with_cursor();
        doc.toggle_block(ElementKind::BulletedList).unwrap();
        assert_eq!(kinds(&doc), vec!["paragraph", "bulleted-list"]);
        let item = doc.element(&Path::from(vec![1, 0])).unwrap();
        assert_eq!(item.kind, ElementKind::ListItem);
        assert_eq!(doc.selection(), Some(&Range::collapsed(Point::new(vec![1, 0, 0], 3))));
    }

    #[test]
    fn test_switching_list_kind_does_not_nest() {
        let mut doc = doc_with_cursor();
        doc.toggle_block(ElementKind::BulletedList).unwrap();
        doc.toggle_block(ElementKind::NumberedList).unwrap();
        assert_eq!(kinds(&doc), vec!["paragraph", "numbered-list"]);
        let list = doc.element(&Path::from(vec![1])).unwrap();
        assert_eq!(list.children.len(), 1);
        assert_eq!(list.children[0].as_element().unwrap().kind, ElementKind::ListItem);
        assert!(!doc.is_block_active(&ElementKind::BulletedList));
    }

    #[test]
    fn test_list_over_several_blocks_uses_one_container() {
        let mut doc = Document::new(vec![
            Element::paragraph("a"),
            Element::paragraph("b"),
            Element::paragraph("c"),
        ]);
        doc.select(Range::new(
            Point::new(vec![0, 0], 0),
            Point::new(vec![1, 0], 1),
        ))
        .unwrap();
        doc.toggle_block(ElementKind::NumberedList).unwrap();
        assert_eq!(kinds(&doc), vec!["numbered-list", "paragraph"]);
        assert_eq!(doc.children()[0].children().len(), 2);
    }

    #[test]
    fn test_leaving_middle_of_list_splits_it() {
        let item = |text: &str| {
            Node::from(Element::new(ElementKind::ListItem, vec![Leaf::new(text).into()]))
        };
        let mut doc = Document::new(vec![Element::new(
            ElementKind::BulletedList,
            vec![item("one"), item("two"), item("three")],
        )]);
        doc.select(Range::collapsed(Point::new(vec![0, 1, 0], 0))).unwrap();
        doc.toggle_block(ElementKind::BulletedList).unwrap();
        assert_eq!(kinds(&doc), vec!["bulleted-list", "paragraph", "bulleted-list"]);
        assert_eq!(doc.children()[1].text(), "two");
    }

    #[test]
    fn test_heading_replaces_block_quote() {
        let mut doc = doc_with_cursor();
        doc.toggle_block(ElementKind::BlockQuote).unwrap();
        doc.toggle_block(ElementKind::HeadingTwo).unwrap();
        assert_eq!(kinds(&doc), vec!["paragraph", "heading-two"]);
        assert!(!doc.is_block_active(&ElementKind::BlockQuote));
    }
}
