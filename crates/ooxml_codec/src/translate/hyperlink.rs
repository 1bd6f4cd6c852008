//! `w:hyperlink` <-> hyperlink node
//!
//! Declared attributes (`rId`, `anchor`, `history`, `tooltip`) are carried
//! through unchanged by the attribute table. The external target itself
//! lives in the relationships part: encode resolves `r:id` to an `href`
//! attribute, and decode allocates a fresh relationship when a node carries
//! an `href` without a relationship id.

use super::{AttrMapping, DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::dispatcher::{decode_node_list, encode_node_list};
use crate::relationships::{relationship_types, TargetMode};
use crate::xml::{XmlChild, XmlNode};
use doc_model::{AttrMap, DocNode};

pub static TRANSLATOR: Translator = Translator {
    tag: "w:hyperlink",
    doc_type: "hyperlink",
    attributes: &[
        AttrMapping::plain("r:id", "rId"),
        AttrMapping::plain("w:anchor", "anchor"),
        AttrMapping::plain("w:history", "history"),
        AttrMapping::plain("w:tooltip", "tooltip"),
    ],
    encode,
    decode,
};

fn encode(ctx: &mut EncodeContext, attrs: AttrMap) -> TranslatorOutput {
    let element = ctx.element();
    if element.name != "w:hyperlink" {
        return TranslatorOutput::none();
    }

    let children: Vec<XmlNode> = element.elements().cloned().collect();
    let content = encode_node_list(&children, Some("w:CT_Hyperlink"), ctx.pass);

    let mut node = DocNode::new("hyperlink").with_content(content);
    node.attrs = attrs;

    // Resolve the external target through the relationships part
    if let Some(rid) = node.attr_str("rId") {
        if let Some(target) = ctx.pass.relationships.get_target(rid) {
            let target = target.to_string();
            node.set_attr("href", target);
        }
    }

    TranslatorOutput::one(node)
}

fn decode(ctx: &mut DecodeContext, attrs: Vec<(String, String)>) -> Option<XmlNode> {
    if !ctx.node.is("hyperlink") {
        return None;
    }

    let mut element = XmlNode::new("w:hyperlink");

    // The rels part is regenerated on every export, so a stored rId is
    // stale whenever we know the target; allocate a fresh relationship
    // from href and keep a bare rId only for externally managed rels.
    let fresh_rid = ctx.node.attr_str("href").map(|href| {
        ctx.pass
            .relationships
            .add(relationship_types::HYPERLINK, href, TargetMode::External)
    });

    for (name, value) in attrs {
        if name == "r:id" && fresh_rid.is_some() {
            continue;
        }
        element.set_attr(&name, &value);
    }
    if let Some(rid) = fresh_rid {
        element.set_attr("r:id", &rid);
    }

    for child in decode_node_list(&ctx.node.content, ctx.pass) {
        element.children.push(XmlChild::Element(child));
    }

    Some(element)
}
