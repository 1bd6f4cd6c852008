//! The document node tree
//!
//! Every piece of document content is a `DocNode`: a `type` discriminator,
//! an attribute map, and an ordered list of child nodes. Text carries its
//! payload in a dedicated field so that `{type: "text", text: "..."}` nodes
//! serialize the way the editing surface expects.

use crate::error::{DocModelError, DocModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute map for a document node (name -> JSON value)
pub type AttrMap = Map<String, Value>;

/// One node of the internal rich-document tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    /// Node type discriminator ("paragraph", "run", "text", ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Node attributes
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: AttrMap,

    /// Ordered child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<DocNode>,

    /// Text payload, present only on text nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl DocNode {
    /// Create an empty node of the given type
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attrs: Map::new(),
            content: Vec::new(),
            text: None,
        }
    }

    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        let mut node = Self::new("text");
        node.text = Some(text.into());
        node
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    /// Builder-style content setter
    pub fn with_content(mut self, content: Vec<DocNode>) -> Self {
        self.content = content;
        self
    }

    /// Set an attribute in place
    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    /// Get an attribute as a string, if present and string-valued
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    /// Get an attribute as an unsigned integer, if present and numeric
    pub fn attr_u64(&self, name: &str) -> Option<u64> {
        self.attrs.get(name).and_then(Value::as_u64)
    }

    /// Get an attribute as a boolean, if present and boolean-valued
    pub fn attr_bool(&self, name: &str) -> Option<bool> {
        self.attrs.get(name).and_then(Value::as_bool)
    }

    /// True if this node has the given type
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Serialize the tree to JSON
    pub fn to_json(&self) -> DocModelResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a tree from JSON
    pub fn from_json(json: &str) -> DocModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Concatenated text of this node and all descendants, in document order
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(ref text) = self.text {
            out.push_str(text);
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }
}

/// Validate that an attribute holds a string, for callers that require one
pub fn require_str_attr<'a>(node: &'a DocNode, name: &str) -> DocModelResult<&'a str> {
    node.attr_str(name).ok_or_else(|| DocModelError::InvalidAttribute {
        name: name.to_string(),
        reason: format!("missing or non-string on '{}' node", node.kind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let node = DocNode::new("paragraph")
            .with_attr("styleId", "Heading1")
            .with_content(vec![DocNode::text("Hello")]);

        let json = node.to_json().unwrap();
        assert!(json.contains(r#""type":"paragraph""#));
        assert!(json.contains(r#""styleId":"Heading1""#));
        assert!(json.contains(r#""type":"text""#));

        let back = DocNode::from_json(&json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_text_node_omits_empty_fields() {
        let json = DocNode::text("x").to_json().unwrap();
        assert!(!json.contains("attrs"));
        assert!(!json.contains("content"));
    }

    #[test]
    fn test_text_content_walks_descendants() {
        let node = DocNode::new("paragraph").with_content(vec![
            DocNode::new("run").with_content(vec![DocNode::text("Hello, ")]),
            DocNode::new("run").with_content(vec![DocNode::text("world")]),
        ]);
        assert_eq!(node.text_content(), "Hello, world");
    }

    #[test]
    fn test_require_str_attr() {
        let node = DocNode::new("hyperlink").with_attr("rId", "rId4");
        assert_eq!(require_str_attr(&node, "rId").unwrap(), "rId4");
        assert!(require_str_attr(&node, "anchor").is_err());
    }
}
