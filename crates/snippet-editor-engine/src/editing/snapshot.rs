use serde::Serialize;

use crate::editing::Document;
use crate::lists::{DragItem, SnippetLists};
use crate::models::{ElementKind, Mark, Node, Path, Range};

/// Block formats with a toolbar button, in toolbar order.
pub const TOOLBAR_BLOCKS: [ElementKind; 5] = [
    ElementKind::HeadingOne,
    ElementKind::HeadingTwo,
    ElementKind::BlockQuote,
    ElementKind::NumberedList,
    ElementKind::BulletedList,
];

/// Render-ready node. Element kinds are already resolved, so an unknown
/// custom type arrives here as a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum RenderNode {
    Element {
        kind: ElementKind,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        void: bool,
        path: Path,
        children: Vec<RenderNode>,
    },
    Text {
        path: Path,
        text: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
    },
}

impl RenderNode {
    fn from_node(node: &Node, path: Path) -> Self {
        match node {
            Node::Text(leaf) => RenderNode::Text {
                path,
                text: leaf.text.clone(),
                marks: leaf.marks.iter().copied().collect(),
            },
            Node::Element(element) => RenderNode::Element {
                kind: element.kind.render_kind(),
                void: element.void,
                children: element
                    .children
                    .iter()
                    .enumerate()
                    .map(|(index, child)| RenderNode::from_node(child, path.child(index)))
                    .collect(),
                path,
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            RenderNode::Element { path, .. } | RenderNode::Text { path, .. } => path,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, RenderNode::Element { kind, void, .. } if !void && *kind != ElementKind::Inline)
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element { children, .. } => children,
            RenderNode::Text { .. } => &[],
        }
    }
}

/// Which toolbar buttons light up for the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolbar {
    pub marks: Vec<(Mark, bool)>,
    pub blocks: Vec<(ElementKind, bool)>,
}

impl Toolbar {
    pub fn for_document(doc: &Document) -> Self {
        Self {
            marks: Mark::ALL
                .into_iter()
                .map(|mark| (mark, doc.is_mark_active(mark)))
                .collect(),
            blocks: TOOLBAR_BLOCKS
                .into_iter()
                .map(|kind| {
                    let active = doc.is_block_active(&kind);
                    (kind, active)
                })
                .collect(),
        }
    }

    pub fn active_marks(&self) -> Vec<Mark> {
        self.marks
            .iter()
            .filter(|(_, active)| *active)
            .map(|(mark, _)| *mark)
            .collect()
    }

    pub fn active_blocks(&self) -> Vec<&ElementKind> {
        self.blocks
            .iter()
            .filter(|(_, active)| *active)
            .map(|(kind, _)| kind)
            .collect()
    }
}

/// Immutable view of a session for a front end.
///
/// The render layer draws from snapshots and never touches the document
/// directly; `version` tells it whether anything changed since the last one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub version: u64,
    pub nodes: Vec<RenderNode>,
    pub selection: Option<Range>,
    pub items: Vec<DragItem>,
    pub selected: Vec<DragItem>,
    pub toolbar: Toolbar,
}

impl Snapshot {
    pub fn new(doc: &Document, lists: &SnippetLists) -> Self {
        Self {
            version: doc.version(),
            nodes: doc
                .children()
                .iter()
                .enumerate()
                .map(|(index, node)| RenderNode::from_node(node, Path::new(vec![index])))
                .collect(),
            selection: doc.selection().cloned(),
            items: lists.items().to_vec(),
            selected: lists.selected().to_vec(),
            toolbar: Toolbar::for_document(doc),
        }
    }

    /// One line per block with markdown-like markers: `**bold**`, `_italic_`,
    /// `<u>underline</u>`, `` `code` ``, `[inline]` and `⧉` for a void.
    pub fn outline(&self) -> String {
        let mut lines = Vec::new();
        outline_blocks(&self.nodes, None, 0, &mut lines);
        lines.join("\n")
    }
}

fn outline_blocks(
    nodes: &[RenderNode],
    list: Option<&ElementKind>,
    depth: usize,
    lines: &mut Vec<String>,
) {
    let mut number = 0;
    for node in nodes {
        let RenderNode::Element { kind, children, .. } = node else {
            continue;
        };
        if children.iter().any(RenderNode::is_block) {
            if kind.is_list() {
                outline_blocks(children, Some(kind), depth + 1, lines);
            } else {
                outline_blocks(children, list, depth, lines);
            }
            continue;
        }
        number += 1;
        let marker = match kind {
            ElementKind::HeadingOne => "# ".to_string(),
            ElementKind::HeadingTwo => "## ".to_string(),
            ElementKind::BlockQuote => "> ".to_string(),
            ElementKind::ListItem if list == Some(&ElementKind::NumberedList) => {
                format!("{number}. ")
            }
            ElementKind::ListItem => "• ".to_string(),
            _ => "¶ ".to_string(),
        };
        let mut line = "  ".repeat(depth.saturating_sub(1));
        line.push_str(&marker);
        outline_inline(children, &mut line);
        lines.push(line);
    }
}

fn outline_inline(nodes: &[RenderNode], out: &mut String) {
    for node in nodes {
        match node {
            RenderNode::Text { text, marks, .. } => {
                if text.is_empty() {
                    continue;
                }
                let mut styled = text.clone();
                for mark in [Mark::Code, Mark::Bold, Mark::Italic, Mark::Underline] {
                    if !marks.contains(&mark) {
                        continue;
                    }
                    styled = match mark {
                        Mark::Code => format!("`{styled}`"),
                        Mark::Bold => format!("**{styled}**"),
                        Mark::Italic => format!("_{styled}_"),
                        Mark::Underline => format!("<u>{styled}</u>"),
                    };
                }
                out.push_str(&styled);
            }
            RenderNode::Element { void: true, .. } => out.push('⧉'),
            RenderNode::Element { children, .. } => {
                out.push('[');
                outline_inline(children, out);
                out.push(']');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Element, Leaf, Point};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_custom_kind_renders_as_paragraph() {
        let doc = Document::new(vec![Element::new(
            ElementKind::from_name("callout"),
            vec![Leaf::new("note").into()],
        )]);
        let snapshot = Snapshot::new(&doc, &SnippetLists::seeded(0, 0));
        let RenderNode::Element { kind, .. } = &snapshot.nodes[0] else {
            panic!("expected an element");
        };
        assert_eq!(kind, &ElementKind::Paragraph);
        assert_eq!(snapshot.outline(), "¶ note");
    }

    #[test]
    fn test_outline_numbers_list_items_and_marks_inlines() {
        let item = |text: &str| {
            Node::from(Element::new(ElementKind::ListItem, vec![Leaf::new(text).into()]))
        };
        let doc = Document::new(vec![
            Element::new(ElementKind::NumberedList, vec![item("one"), item("two")]),
            Element::new(
                ElementKind::Paragraph,
                vec![
                    Leaf::new("a ").into(),
                    Element::inline_text("chip").into(),
                    Leaf::new(" b").with_mark(Mark::Bold).with_mark(Mark::Code).into(),
                    Element::void_inline().into(),
                    Leaf::empty().into(),
                ],
            ),
        ]);
        let snapshot = Snapshot::new(&doc, &SnippetLists::seeded(0, 0));
        assert_eq!(snapshot.outline(), "1. one\n2. two\n¶ a [chip]**` b`**⧉");
    }

    #[test]
    fn test_toolbar_reflects_selection() {
        let mut doc = Document::new(vec![Element::new(
            ElementKind::HeadingTwo,
            vec![Leaf::new("title").with_mark(Mark::Italic).into()],
        )]);
        doc.select(Range::new(Point::new(vec![0, 0], 0), Point::new(vec![0, 0], 5)))
            .unwrap();
        let toolbar = Toolbar::for_document(&doc);
        assert_eq!(toolbar.active_marks(), vec![Mark::Italic]);
        assert_eq!(toolbar.active_blocks(), vec![&ElementKind::HeadingTwo]);
    }
}
