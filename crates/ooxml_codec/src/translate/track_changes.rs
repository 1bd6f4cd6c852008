//! `w:ins` / `w:del` <-> tracked-change range nodes
//!
//! Both containers set the tracked-change region on the pass while their
//! children are dispatched, so nested translators can adjust (deleted text
//! must serialize as `w:delText`).

use super::{AttrMapping, DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::context::TrackedKind;
use crate::dispatcher::{decode_node_list, encode_node_list};
use crate::xml::{XmlChild, XmlNode};
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

const ATTRIBUTES: &[AttrMapping] = &[
    AttrMapping {
        xml_name: "w:id",
        sd_name: "id",
        encode: Some(parse_numeric),
        decode: Some(render_numeric),
    },
    AttrMapping::plain("w:author", "author"),
    AttrMapping::plain("w:date", "date"),
];

pub static INSERTION_TRANSLATOR: Translator = Translator {
    tag: "w:ins",
    doc_type: "insertion",
    attributes: ATTRIBUTES,
    encode: encode_insertion,
    decode: decode_insertion,
};

pub static DELETION_TRANSLATOR: Translator = Translator {
    tag: "w:del",
    doc_type: "deletion",
    attributes: ATTRIBUTES,
    encode: encode_deletion,
    decode: decode_deletion,
};

fn encode_range(
    ctx: &mut EncodeContext,
    attrs: AttrMap,
    tag: &str,
    doc_type: &str,
    kind: TrackedKind,
) -> TranslatorOutput {
    let element = ctx.element();
    if element.name != tag {
        return TranslatorOutput::none();
    }

    let children: Vec<XmlNode> = element.elements().cloned().collect();
    let previous = ctx.pass.tracked;
    ctx.pass.tracked = Some(kind);
    let content = encode_node_list(&children, None, ctx.pass);
    ctx.pass.tracked = previous;

    let mut node = DocNode::new(doc_type).with_content(content);
    node.attrs = attrs;
    TranslatorOutput::one(node)
}

fn decode_range(
    ctx: &mut DecodeContext,
    attrs: Vec<(String, String)>,
    tag: &str,
    doc_type: &str,
    kind: TrackedKind,
) -> Option<XmlNode> {
    if !ctx.node.is(doc_type) {
        return None;
    }

    let mut element = XmlNode::new(tag);
    for (name, value) in attrs {
        element.set_attr(&name, &value);
    }

    let previous = ctx.pass.tracked;
    ctx.pass.tracked = Some(kind);
    let children = decode_node_list(&ctx.node.content, ctx.pass);
    ctx.pass.tracked = previous;

    for child in children {
        element.children.push(XmlChild::Element(child));
    }
    Some(element)
}

fn encode_insertion(ctx: &mut EncodeContext, attrs: AttrMap) -> TranslatorOutput {
    encode_range(ctx, attrs, "w:ins", "insertion", TrackedKind::Inserted)
}

fn decode_insertion(ctx: &mut DecodeContext, attrs: Vec<(String, String)>) -> Option<XmlNode> {
    decode_range(ctx, attrs, "w:ins", "insertion", TrackedKind::Inserted)
}

fn encode_deletion(ctx: &mut EncodeContext, attrs: AttrMap) -> TranslatorOutput {
    encode_range(ctx, attrs, "w:del", "deletion", TrackedKind::Deleted)
}

fn decode_deletion(ctx: &mut DecodeContext, attrs: Vec<(String, String)>) -> Option<XmlNode> {
    decode_range(ctx, attrs, "w:del", "deletion", TrackedKind::Deleted)
}
