use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::EditorError;

/// Character-level style attribute carried by a [`Leaf`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Code,
}

impl Mark {
    pub const ALL: [Mark; 4] = [Mark::Bold, Mark::Italic, Mark::Underline, Mark::Code];

    pub fn name(&self) -> &'static str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underline => "underline",
            Mark::Code => "code",
        }
    }
}

impl FromStr for Mark {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mark::ALL
            .into_iter()
            .find(|mark| mark.name() == s)
            .ok_or_else(|| EditorError::UnknownMark(s.to_string()))
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type MarkSet = BTreeSet<Mark>;

/// Terminal text-bearing node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub marks: MarkSet,
}

impl Leaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: MarkSet::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.insert(mark);
        self
    }

    pub fn has_mark(&self, mark: Mark) -> bool {
        self.marks.contains(&mark)
    }

    /// Length in characters; all offsets into a leaf count characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Element type tag.
///
/// Unknown names are kept as [`ElementKind::Custom`] so they survive a round
/// trip, but they render as a paragraph (see [`ElementKind::render_kind`]).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Paragraph,
    BlockQuote,
    HeadingOne,
    HeadingTwo,
    ListItem,
    NumberedList,
    BulletedList,
    Inline,
    Custom(String),
}

impl ElementKind {
    /// Containers that hold `list-item` children.
    pub const LIST_TYPES: [ElementKind; 2] = [ElementKind::NumberedList, ElementKind::BulletedList];

    pub fn from_name(name: &str) -> Self {
        match name {
            "paragraph" => ElementKind::Paragraph,
            "block-quote" => ElementKind::BlockQuote,
            "heading-one" => ElementKind::HeadingOne,
            "heading-two" => ElementKind::HeadingTwo,
            "list-item" => ElementKind::ListItem,
            "numbered-list" => ElementKind::NumberedList,
            "bulleted-list" => ElementKind::BulletedList,
            "inline" => ElementKind::Inline,
            other => ElementKind::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::BlockQuote => "block-quote",
            ElementKind::HeadingOne => "heading-one",
            ElementKind::HeadingTwo => "heading-two",
            ElementKind::ListItem => "list-item",
            ElementKind::NumberedList => "numbered-list",
            ElementKind::BulletedList => "bulleted-list",
            ElementKind::Inline => "inline",
            ElementKind::Custom(name) => name,
        }
    }

    pub fn is_list(&self) -> bool {
        Self::LIST_TYPES.contains(self)
    }

    /// The kind a renderer should draw; custom types fall back to paragraphs.
    pub fn render_kind(&self) -> ElementKind {
        match self {
            ElementKind::Custom(_) => ElementKind::Paragraph,
            other => other.clone(),
        }
    }
}

impl From<String> for ElementKind {
    fn from(name: String) -> Self {
        ElementKind::from_name(&name)
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Non-leaf node: a block, or an inline embedded in a block's flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub void: bool,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(kind: ElementKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            void: false,
            children,
        }
    }

    /// A paragraph holding a single plain leaf.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Paragraph, vec![Node::Text(Leaf::new(text))])
    }

    /// The drop payload shape: an inline wrapping one plain leaf.
    pub fn inline_text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Inline, vec![Node::Text(Leaf::new(text))])
    }

    /// An atomic inline. Voids keep a single empty leaf as their only child.
    pub fn void_inline() -> Self {
        Self {
            kind: ElementKind::Inline,
            void: true,
            children: vec![Node::Text(Leaf::empty())],
        }
    }

    pub fn is_inline(&self) -> bool {
        self.void || self.kind == ElementKind::Inline
    }

    pub fn is_block(&self) -> bool {
        !self.is_inline()
    }

    /// Copy of this element's attributes with the given children.
    pub(crate) fn with_children(&self, children: Vec<Node>) -> Self {
        Self {
            kind: self.kind.clone(),
            void: self.void,
            children,
        }
    }

    /// Concatenated text of every leaf below this element.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Element(Element),
    Text(Leaf),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Node::Text(leaf) => Some(leaf),
            Node::Element(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut Leaf> {
        match self {
            Node::Text(leaf) => Some(leaf),
            Node::Element(_) => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Node::Element(element) if element.void)
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Node::Element(element) if element.is_block())
    }

    /// Leaves and inline elements flow inside a block.
    pub fn is_inline_level(&self) -> bool {
        !self.is_block()
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Text(_) => &[],
        }
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(leaf) => out.push_str(&leaf.text),
            Node::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Fill any childless element with an empty leaf, recursively.
    pub(crate) fn healed(mut self) -> Self {
        if let Node::Element(element) = &mut self {
            if element.children.is_empty() {
                element.children.push(Node::Text(Leaf::empty()));
            }
            element.children = std::mem::take(&mut element.children)
                .into_iter()
                .map(Node::healed)
                .collect();
        }
        self
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Text(leaf)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// Byte index of the `char_offset`th character, clamped to the string end.
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
