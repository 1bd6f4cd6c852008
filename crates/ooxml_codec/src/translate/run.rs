//! `w:r` <-> run node
//!
//! Adjacent runs with identical formatting are merged into one run node on
//! encode; the translator reports how many siblings it consumed so the
//! dispatcher advances past all of them. Formatting marks come from `w:rPr`.

use super::{DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::dispatcher::{decode_node_list, encode_node_list};
use crate::xml::{XmlChild, XmlNode};
use doc_model::{AttrMap, DocNode};

pub static TRANSLATOR: Translator = Translator {
    tag: "w:r",
    doc_type: "run",
    attributes: &[],
    encode,
    decode,
};

/// Formatting signature used to decide whether two adjacent runs merge:
/// the serialized `w:rPr`, or empty when absent.
fn formatting_signature(run: &XmlNode) -> String {
    run.find_child("w:rPr")
        .map(|rpr| rpr.to_xml_string())
        .unwrap_or_default()
}

fn is_toggle_on(rpr: &XmlNode, tag: &str) -> bool {
    match rpr.find_child(tag) {
        Some(e) => !matches!(e.attr("w:val"), Some("0") | Some("false")),
        None => false,
    }
}

fn encode(ctx: &mut EncodeContext, _attrs: AttrMap) -> TranslatorOutput {
    let first = ctx.element();
    if first.name != "w:r" {
        return TranslatorOutput::none();
    }

    let signature = formatting_signature(first);
    let mut consumed = 1;
    while let Some(next) = ctx.nodes.get(consumed) {
        if next.name == "w:r" && formatting_signature(next) == signature {
            consumed += 1;
        } else {
            break;
        }
    }

    let mut children: Vec<XmlNode> = Vec::new();
    for run in &ctx.nodes[..consumed] {
        children.extend(run.elements().filter(|e| e.name != "w:rPr").cloned());
    }
    let content = encode_node_list(&children, Some("w:CT_R"), ctx.pass);

    let mut node = DocNode::new("run").with_content(content);
    if let Some(rpr) = first.find_child("w:rPr") {
        if is_toggle_on(rpr, "w:b") {
            node.set_attr("bold", true);
        }
        if is_toggle_on(rpr, "w:i") {
            node.set_attr("italic", true);
        }
        if let Some(u) = rpr.find_child("w:u").and_then(|e| e.attr("w:val")) {
            node.set_attr("underline", u);
        }
        if let Some(style) = rpr.find_child("w:rStyle").and_then(|e| e.attr("w:val")) {
            node.set_attr("styleId", style);
        }
    }
    if consumed > 1 {
        // Provenance: how many source runs this node absorbed
        node.set_attr("mergedRuns", consumed as u64);
    }

    TranslatorOutput::many(node, consumed)
}

fn decode(ctx: &mut DecodeContext, _attrs: Vec<(String, String)>) -> Option<XmlNode> {
    if !ctx.node.is("run") {
        return None;
    }

    let mut element = XmlNode::new("w:r");

    let mut rpr = XmlNode::new("w:rPr");
    if let Some(style) = ctx.node.attr_str("styleId") {
        rpr = rpr.with_child(XmlNode::new("w:rStyle").with_attr("w:val", style));
    }
    if ctx.node.attr_bool("bold") == Some(true) {
        rpr = rpr.with_child(XmlNode::new("w:b"));
    }
    if ctx.node.attr_bool("italic") == Some(true) {
        rpr = rpr.with_child(XmlNode::new("w:i"));
    }
    if let Some(u) = ctx.node.attr_str("underline") {
        rpr = rpr.with_child(XmlNode::new("w:u").with_attr("w:val", u));
    }
    if !rpr.children.is_empty() {
        element.children.push(XmlChild::Element(rpr));
    }

    for decoded in decode_node_list(&ctx.node.content, ctx.pass) {
        // The tab translator wraps itself in w:r for the downstream
        // consumer; inside a run that wrapper is spliced back out.
        if decoded.name == "w:r" && decoded.attributes.is_empty() {
            element.children.extend(decoded.children);
        } else {
            element.children.push(XmlChild::Element(decoded));
        }
    }

    Some(element)
}
