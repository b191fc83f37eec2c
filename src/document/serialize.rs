//! `Node` tree -> SVG markup, via quick-xml

use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{Child, Document, Node};
use crate::{Error, Result};

impl Document {
    /// Serialize the (possibly pruned) tree back to SVG markup.
    pub fn to_svg_string(&self) -> Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write_node(&mut writer, &self.root)?;
        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| Error::SerializeError(e.to_string()))
    }
}

fn write_node(writer: &mut Writer<Cursor<Vec<u8>>>, node: &Node) -> Result<()> {
    let mut start = BytesStart::new(node.name());
    for attr in node.attrs() {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    if node.content().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in node.content() {
        match child {
            Child::Element(el) => write_node(writer, el)?,
            Child::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(node.name())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, Node};

    #[test]
    fn writes_empty_and_nested_elements() {
        let root = Node::new("svg")
            .with_attr("width", "10")
            .with_child(Node::new("rect").with_attr("x", "1"))
            .with_child(Node::new("text").with_text("a < b"));
        let out = Document::new(root).to_svg_string().unwrap();
        assert_eq!(
            out,
            r#"<svg width="10"><rect x="1"/><text>a &lt; b</text></svg>"#
        );
    }

    #[test]
    fn parse_then_serialize_keeps_structure() {
        let src = r#"<svg xmlns="http://www.w3.org/2000/svg"><g fill="red"><circle cx="1" cy="2" r="3"/></g></svg>"#;
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.to_svg_string().unwrap(), src);
    }
}
