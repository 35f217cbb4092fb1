use crate::core::errors::ApiDiffError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;

/// Minimal owned element tree. Only what the diff document needs: names,
/// attributes, child elements and text, all in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// First element named `name` below this one, depth-first in document order.
    pub fn first_descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in self.elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.first_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenation of every text node below this element.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &XmlElement, out: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Text(t) => out.push_str(t),
            XmlNode::Element(e) => collect_text(e, out),
        }
    }
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlElement, ApiDiffError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr.unescape_value()?.to_string();
        attributes.push((key, value));
    }
    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<(), ApiDiffError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ApiDiffError::XmlError(format!(
                "unexpected second root element <{}>",
                element.name
            )));
        }
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: String) {
    // Whitespace-only runs between elements are formatting, not content.
    if text.trim().is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Text(text));
    }
}

/// End-of-line handling from XML 1.0 section 2.11: `\r\n` and lone `\r`
/// become `\n` before parsing. Character references such as `&#13;` are
/// untouched.
fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Parse a whole document into its root element.
pub fn parse_document(input: &str) -> Result<XmlElement, ApiDiffError> {
    let input = normalize_line_endings(input);
    let mut reader = Reader::from_str(&input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(ApiDiffError::XmlError(format!(
                    "at byte {}: {}",
                    reader.error_position(),
                    e
                )));
            }
        };
        match event {
            Event::Start(ref e) => stack.push(start_element(e)?),
            Event::Empty(ref e) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ApiDiffError::XmlError("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => push_text(&mut stack, e.unescape()?.to_string()),
            Event::CData(e) => push_text(&mut stack, String::from_utf8_lossy(&e.into_inner()).to_string()),
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ApiDiffError::XmlError(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| ApiDiffError::XmlError("document has no root element".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes_and_children() {
        let doc = parse_document(
            r#"<?xml version="1.0"?>
            <Assembly Name="Game.dll" DiffType="Modified">
                <Module Name="Game.dll"/>
            </Assembly>"#,
        )
        .unwrap();

        assert_eq!(doc.name, "Assembly");
        assert_eq!(doc.attribute("Name"), Some("Game.dll"));
        assert_eq!(doc.attribute("Missing"), None);
        assert_eq!(doc.child("Module").and_then(|m| m.attribute("Name")), Some("Game.dll"));
    }

    #[test]
    fn test_text_is_unescaped_and_concatenated() {
        let doc = parse_document(
            "<Method><DiffItems><DiffItem>changed from List&lt;int&gt; to <![CDATA[int[]]]>.</DiffItem></DiffItems></Method>",
        )
        .unwrap();

        let item = doc.first_descendant("DiffItem").unwrap();
        assert_eq!(item.text_content(), "changed from List<int> to int[].");
    }

    #[test]
    fn test_first_descendant_is_document_order() {
        let doc = parse_document(
            "<T><A><DiffItem>first</DiffItem></A><DiffItem>second</DiffItem></T>",
        )
        .unwrap();
        assert_eq!(doc.first_descendant("DiffItem").unwrap().text_content(), "first");
    }

    #[test]
    fn test_line_endings_are_normalized() {
        let doc = parse_document("<DiffItem>a\r\nb\rc\nd</DiffItem>").unwrap();
        assert_eq!(doc.text_content(), "a\nb\nc\nd");

        let doc = parse_document("<DiffItem><![CDATA[x\r\ny]]>&#13;z</DiffItem>").unwrap();
        assert_eq!(doc.text_content(), "x\ny\rz");
    }

    #[test]
    fn test_child_returns_first_match() {
        let doc = parse_document(r#"<A><B N="1"/><C/><B N="2"/></A>"#).unwrap();
        assert_eq!(doc.child("B").and_then(|b| b.attribute("N")), Some("1"));
        assert!(doc.child("D").is_none());
    }

    #[test]
    fn test_malformed_document() {
        assert!(parse_document("<Assembly><Module></Assembly>").is_err());
        assert!(parse_document("<Assembly>").is_err());
        assert!(parse_document("").is_err());
    }
}
