//! XML element trees
//!
//! The conversion core works on already-parsed element trees, not on raw
//! event streams: one `XmlNode` per element, with ordered attributes and
//! ordered children. This module is the only place quick-xml events are
//! touched; everything downstream walks trees.

use crate::error::{CodecError, CodecResult};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// One parsed XML element: qualified name, ordered attributes, ordered children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    /// Qualified tag name, e.g. "w:p"
    pub name: String,
    /// Attributes in document order (name, value)
    pub attributes: Vec<(String, String)>,
    /// Child elements and text, in document order
    pub children: Vec<XmlChild>,
}

/// A child of an element: either a nested element or a text chunk
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    Element(XmlNode),
    Text(String),
}

impl XmlNode {
    /// Create an empty element with the given qualified name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute append
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Builder-style element child append
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(XmlChild::Element(child));
        self
    }

    /// Builder-style text child append
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(XmlChild::Text(text.to_string()));
        self
    }

    /// Append an attribute in place
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.push((name.to_string(), value.to_string()));
    }

    /// Get an attribute value by exact qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The local part of the qualified name ("p" for "w:p")
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// The namespace prefix, if any ("w" for "w:p")
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Iterate over element children only
    pub fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            XmlChild::Text(_) => None,
        })
    }

    /// First element child with the given qualified name
    pub fn find_child(&self, name: &str) -> Option<&XmlNode> {
        self.elements().find(|e| e.name == name)
    }

    /// Concatenated text of this element and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlChild::Text(t) => out.push_str(t),
                XmlChild::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Serialize this element (without an XML declaration)
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                XmlChild::Element(e) => e.write_into(out),
                XmlChild::Text(t) => out.push_str(&escape(t.as_str())),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// True if the element declares `xml:space="preserve"`
fn preserves_space(node: &XmlNode) -> bool {
    node.attr("xml:space") == Some("preserve")
}

/// Parse an XML document and return its root element.
///
/// Whitespace-only text between elements is dropped unless the enclosing
/// element declares `xml:space="preserve"` (WordprocessingML only makes
/// whitespace significant inside `w:t` runs that opt in).
pub fn parse_document(content: &str) -> CodecResult<XmlNode> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(element_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let node = element_from_start(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack.pop().ok_or_else(|| {
                    CodecError::XmlParse("unbalanced end tag".to_string())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| CodecError::XmlParse(e.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    if !text.trim().is_empty() || preserves_space(parent) {
                        parent.children.push(XmlChild::Text(text.into_owned()));
                    }
                }
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8(e.clone().into_inner().into_owned())?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlChild::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declarations, comments, PIs
            Err(e) => return Err(CodecError::XmlParse(e.to_string())),
        }
    }

    root.ok_or_else(|| CodecError::XmlParse("document has no root element".to_string()))
}

fn element_from_start(e: &quick_xml::events::BytesStart) -> CodecResult<XmlNode> {
    let name = String::from_utf8(e.name().as_ref().to_vec())?;
    let mut node = XmlNode::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let value = attr
            .unescape_value()
            .map_err(|e| CodecError::XmlParse(e.to_string()))?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> CodecResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlChild::Element(node));
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err(CodecError::XmlParse(
            "multiple root elements".to_string(),
        ));
    }
    Ok(())
}

/// Structural equality modulo attribute order, for round-trip checks
pub fn structurally_equal(a: &XmlNode, b: &XmlNode) -> bool {
    if a.name != b.name || a.attributes.len() != b.attributes.len() {
        return false;
    }
    for (name, value) in &a.attributes {
        if b.attr(name) != Some(value.as_str()) {
            return false;
        }
    }
    if a.children.len() != b.children.len() {
        return false;
    }
    a.children.iter().zip(&b.children).all(|(x, y)| match (x, y) {
        (XmlChild::Element(x), XmlChild::Element(y)) => structurally_equal(x, y),
        (XmlChild::Text(x), XmlChild::Text(y)) => x == y,
        _ => false,
    })
}
