//! `w:tab` <-> tab node
//!
//! Decode always wraps the bare tag in a `w:r` parent: the downstream
//! consumer cannot accept a bare `w:tab`, so the wrap is unconditional,
//! whether or not any attributes were decoded. When a tab is exported from
//! inside a run, the run translator splices this wrapper back out.

use super::{AttrMapping, DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::xml::XmlNode;
use doc_model::{AttrMap, DocNode};

pub static TRANSLATOR: Translator = Translator {
    tag: "w:tab",
    doc_type: "tab",
    attributes: &[
        AttrMapping::plain("w:val", "val"),
        AttrMapping::plain("w:pos", "pos"),
    ],
    encode,
    decode,
};

fn encode(ctx: &mut EncodeContext, attrs: AttrMap) -> TranslatorOutput {
    if ctx.element().name != "w:tab" {
        return TranslatorOutput::none();
    }
    let mut node = DocNode::new("tab");
    node.attrs = attrs;
    TranslatorOutput::one(node)
}

fn decode(ctx: &mut DecodeContext, attrs: Vec<(String, String)>) -> Option<XmlNode> {
    if !ctx.node.is("tab") {
        return None;
    }
    let mut inner = XmlNode::new("w:tab");
    for (name, value) in attrs {
        inner.set_attr(&name, &value);
    }
    Some(XmlNode::new("w:r").with_child(inner))
}
