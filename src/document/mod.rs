//! Owned, mutable SVG element tree
//!
//! The converter prunes attributes and removes nodes in place, so the tree is
//! kept as plain owned data rather than borrowed from the parser. Markup goes
//! in through [`Document::parse`] and back out through
//! [`Document::to_svg_string`].

mod parse;
mod serialize;

use crate::number::parse_int_attr;

/// The element kinds the converter knows how to translate.
///
/// Tag names match case-insensitively. Everything else is kept as `Other`
/// with its lower-cased name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Svg,
    Anchor,
    Group,
    Line,
    Rect,
    Ellipse,
    Circle,
    Text,
    Other(String),
}

impl Tag {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "svg" => Tag::Svg,
            "a" => Tag::Anchor,
            "g" => Tag::Group,
            "line" => Tag::Line,
            "rect" => Tag::Rect,
            "ellipse" => Tag::Ellipse,
            "circle" => Tag::Circle,
            "text" => Tag::Text,
            other => Tag::Other(other.to_string()),
        }
    }

    /// Lower-cased element name.
    pub fn name(&self) -> &str {
        match self {
            Tag::Svg => "svg",
            Tag::Anchor => "a",
            Tag::Group => "g",
            Tag::Line => "line",
            Tag::Rect => "rect",
            Tag::Ellipse => "ellipse",
            Tag::Circle => "circle",
            Tag::Text => "text",
            Tag::Other(name) => name,
        }
    }
}

/// A single `name="value"` pair, kept in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element or character data inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(Node),
    Text(String),
}

impl Child {
    pub fn as_element(&self) -> Option<&Node> {
        match self {
            Child::Element(node) => Some(node),
            Child::Text(_) => None,
        }
    }
}

/// An element with its attributes and content.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    tag: Tag,
    attributes: Vec<Attribute>,
    content: Vec<Child>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let tag = Tag::from_name(&name);
        Self {
            name,
            tag,
            attributes: Vec::new(),
            content: Vec::new(),
        }
    }

    /// Builder-style attribute setter, handy for constructing trees in code.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child element append.
    pub fn with_child(mut self, child: Node) -> Self {
        self.content.push(Child::Element(child));
        self
    }

    /// Builder-style character data append.
    pub fn with_text(mut self, text: &str) -> Self {
        self.content.push(Child::Text(text.to_string()));
        self
    }

    /// The element name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute names in document order.
    pub fn attr_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    /// Set or overwrite an attribute. New attributes are appended.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Remove an attribute, returning its value if it was present.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(idx).value)
    }

    /// Keep only the attributes for which `keep` returns true.
    pub fn retain_attrs<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Attribute) -> bool,
    {
        self.attributes.retain(|a| keep(a));
    }

    /// Child elements in document order (character data skipped).
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.content.iter().filter_map(Child::as_element)
    }

    /// Raw content: elements and character data interleaved.
    pub fn content(&self) -> &[Child] {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Vec<Child> {
        &mut self.content
    }

    /// Concatenated character data of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.content {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(node) => node.collect_text(out),
            }
        }
    }
}

/// A parsed SVG document: just the owned root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// `width` / `height` of the root element, parsed loosely (NaN if absent).
    pub fn size(&self) -> (f64, f64) {
        (
            parse_int_attr(self.root.attr("width")),
            parse_int_attr(self.root.attr("height")),
        )
    }
}
