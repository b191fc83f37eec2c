//! SVG markup -> owned `Node` tree, via roxmltree

use super::{Child, Document, Node};
use crate::{Error, Result};

impl Document {
    /// Parse SVG markup into an owned document.
    ///
    /// Comments and processing instructions are dropped. Namespace
    /// declarations in scope at the root are kept on it as `xmlns` attributes
    /// so the tree can be written back out as valid SVG.
    pub fn parse(text: &str) -> Result<Document> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, opts)?;
        let root_elem = xml.root_element();
        if !root_elem.tag_name().name().eq_ignore_ascii_case("svg") {
            return Err(Error::ParseError(format!(
                "expected <svg> root element, found <{}>",
                root_elem.tag_name().name()
            )));
        }

        let mut root = build_node(root_elem);
        let mut decls = Vec::new();
        for ns in root_elem.namespaces() {
            let name = match ns.name() {
                Some(prefix) => format!("xmlns:{}", prefix),
                None => "xmlns".to_string(),
            };
            if prefix_is_builtin(&name) || root.has_attr(&name) {
                continue;
            }
            decls.push(super::Attribute {
                name,
                value: ns.uri().to_string(),
            });
        }
        if !decls.is_empty() {
            decls.append(&mut root.attributes);
            root.attributes = decls;
        }

        log::debug!("parsed SVG document with {} top-level children", root.children().count());
        Ok(Document::new(root))
    }
}

fn prefix_is_builtin(name: &str) -> bool {
    name == "xmlns:xml"
}

fn build_node(elem: roxmltree::Node<'_, '_>) -> Node {
    let mut node = Node::new(elem.tag_name().name());

    for attr in elem.attributes() {
        let name = match attr.namespace().and_then(|uri| elem.lookup_prefix(uri)) {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, attr.name()),
            _ => attr.name().to_string(),
        };
        node.set_attr(&name, attr.value());
    }

    for child in elem.children() {
        if child.is_element() {
            node.content.push(Child::Element(build_node(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                node.content.push(Child::Text(text.to_string()));
            }
        }
    }

    node
}
