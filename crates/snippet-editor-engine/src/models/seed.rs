//! Starting content for a new editing session.

use crate::models::{Element, ElementKind, Leaf, Mark, Node};

fn text(text: &str) -> Node {
    Node::Text(Leaf::new(text))
}

fn marked(text: &str, mark: Mark) -> Node {
    Node::Text(Leaf::new(text).with_mark(mark))
}

/// The welcome document: two mixed-mark paragraphs, a block quote and a
/// closing line.
pub fn welcome_blocks() -> Vec<Element> {
    vec![
        Element::new(
            ElementKind::Paragraph,
            vec![
                text("This is editable "),
                marked("rich", Mark::Bold),
                text(" text, "),
                marked("much", Mark::Italic),
                text(" better than a "),
                marked("<textarea>", Mark::Code),
                text("!"),
            ],
        ),
        Element::new(
            ElementKind::Paragraph,
            vec![
                text("Since it's rich text, you can do things like turn a selection of text "),
                marked("bold", Mark::Bold),
                text(
                    ", or add a semantically rendered block quote in the middle of the page, like this:",
                ),
            ],
        ),
        Element::new(ElementKind::BlockQuote, vec![text("A wise quote.")]),
        Element::paragraph("Try it out for yourself!"),
    ]
}

/// Seed sizes for the two snippet lists.
pub const AVAILABLE_SNIPPETS: usize = 10;
pub const SELECTED_SNIPPETS: usize = 5;
