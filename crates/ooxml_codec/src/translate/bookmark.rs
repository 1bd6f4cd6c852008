//! `w:bookmarkStart` / `w:bookmarkEnd` <-> bookmark range markers
//!
//! Bookmark ids are numeric in OOXML; the attribute transforms parse them
//! into JSON numbers on the way in and render them back on the way out. A
//! non-numeric id degrades to a string attribute instead of failing.

use super::{AttrMapping, DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::xml::XmlNode;
use doc_model::{AttrMap, DocNode};
use serde_json::Value;

fn parse_numeric(raw: &str) -> Value {
    match raw.parse::<i64>() {
        Ok(n) => Value::Number(n.into()),
        Err(_) => Value::String(raw.to_string()),
    }
}

fn render_numeric(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

const ID_MAPPING: AttrMapping = AttrMapping {
    xml_name: "w:id",
    sd_name: "id",
    encode: Some(parse_numeric),
    decode: Some(render_numeric),
};

pub static START_TRANSLATOR: Translator = Translator {
    tag: "w:bookmarkStart",
    doc_type: "bookmarkStart",
    attributes: &[ID_MAPPING, AttrMapping::plain("w:name", "name")],
    encode: encode_start,
    decode: decode_start,
};

pub static END_TRANSLATOR: Translator = Translator {
    tag: "w:bookmarkEnd",
    doc_type: "bookmarkEnd",
    attributes: &[ID_MAPPING],
    encode: encode_end,
    decode: decode_end,
};

fn encode_start(ctx: &mut EncodeContext, attrs: AttrMap) -> TranslatorOutput {
    if ctx.element().name != "w:bookmarkStart" {
        return TranslatorOutput::none();
    }
    let mut node = DocNode::new("bookmarkStart");
    node.attrs = attrs;
    TranslatorOutput::one(node)
}

fn decode_start(ctx: &mut DecodeContext, attrs: Vec<(String, String)>) -> Option<XmlNode> {
    if !ctx.node.is("bookmarkStart") {
        return None;
    }
    Some(element_with_attrs("w:bookmarkStart", attrs))
}

fn encode_end(ctx: &mut EncodeContext, attrs: AttrMap) -> TranslatorOutput {
    if ctx.element().name != "w:bookmarkEnd" {
        return TranslatorOutput::none();
    }
    let mut node = DocNode::new("bookmarkEnd");
    node.attrs = attrs;
    TranslatorOutput::one(node)
}

fn decode_end(ctx: &mut DecodeContext, attrs: Vec<(String, String)>) -> Option<XmlNode> {
    if !ctx.node.is("bookmarkEnd") {
        return None;
    }
    Some(element_with_attrs("w:bookmarkEnd", attrs))
}

fn element_with_attrs(name: &str, attrs: Vec<(String, String)>) -> XmlNode {
    let mut element = XmlNode::new(name);
    for (attr_name, value) in attrs {
        element.set_attr(&attr_name, &value);
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{resolve_decode_attrs, resolve_encode_attrs};

    #[test]
    fn test_id_transform_parses_numeric() {
        let element = XmlNode::new("w:bookmarkStart")
            .with_attr("w:id", "7")
            .with_attr("w:name", "intro");
        let attrs = resolve_encode_attrs(&START_TRANSLATOR, &element);
        assert_eq!(attrs.get("id"), Some(&Value::Number(7.into())));
        assert_eq!(attrs.get("name").and_then(Value::as_str), Some("intro"));
    }

    #[test]
    fn test_id_transform_degrades_on_malformed_value() {
        let element = XmlNode::new("w:bookmarkStart").with_attr("w:id", "x7");
        let attrs = resolve_encode_attrs(&START_TRANSLATOR, &element);
        assert_eq!(attrs.get("id").and_then(Value::as_str), Some("x7"));
    }

    #[test]
    fn test_id_renders_back_to_string() {
        let node = DocNode::new("bookmarkEnd").with_attr("id", 7);
        let attrs = resolve_decode_attrs(&END_TRANSLATOR, &node);
        assert_eq!(attrs, vec![("w:id".to_string(), "7".to_string())]);
    }
}
