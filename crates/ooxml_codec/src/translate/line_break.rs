//! `w:br` <-> line break node

use super::{AttrMapping, DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::xml::XmlNode;
use doc_model::{AttrMap, DocNode};

pub static TRANSLATOR: Translator = Translator {
    tag: "w:br",
    doc_type: "lineBreak",
    attributes: &[
        AttrMapping::plain("w:type", "breakType"),
        AttrMapping::plain("w:clear", "clear"),
    ],
    encode,
    decode,
};

fn encode(ctx: &mut EncodeContext, attrs: AttrMap) -> TranslatorOutput {
    if ctx.element().name != "w:br" {
        return TranslatorOutput::none();
    }
    let mut node = DocNode::new("lineBreak");
    node.attrs = attrs;
    TranslatorOutput::one(node)
}

fn decode(ctx: &mut DecodeContext, attrs: Vec<(String, String)>) -> Option<XmlNode> {
    if !ctx.node.is("lineBreak") {
        return None;
    }
    let mut element = XmlNode::new("w:br");
    for (name, value) in attrs {
        element.set_attr(&name, &value);
    }
    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConvertPass, ExportPass};
    use crate::numbering::NumberingDefs;
    use crate::relationships::Relationships;

    #[test]
    fn test_break_type_round_trips() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = ConvertPass::new(&numbering, &rels);
        let nodes = [XmlNode::new("w:br").with_attr("w:type", "page")];
        let resolved = crate::dispatcher::resolve_encode_attrs(&TRANSLATOR, &nodes[0]);
        let mut ctx = EncodeContext {
            nodes: &nodes,
            pass: &mut pass,
        };
        let node = encode(&mut ctx, resolved).node.unwrap();
        assert_eq!(node.attr_str("breakType"), Some("page"));

        let mut rels_out = Relationships::new();
        let mut export = ExportPass::new(&numbering, &mut rels_out);
        let resolved = crate::dispatcher::resolve_decode_attrs(&TRANSLATOR, &node);
        let mut ctx = DecodeContext {
            node: &node,
            pass: &mut export,
        };
        let element = decode(&mut ctx, resolved).unwrap();
        assert_eq!(element.attr("w:type"), Some("page"));
    }
}
