//! `w:t` (and `w:delText`) <-> text node

use super::{DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::context::TrackedKind;
use crate::xml::XmlNode;
use doc_model::{AttrMap, DocNode};

pub static TRANSLATOR: Translator = Translator {
    tag: "w:t",
    doc_type: "text",
    attributes: &[],
    encode,
    decode,
};

fn encode(ctx: &mut EncodeContext, _attrs: AttrMap) -> TranslatorOutput {
    let element = ctx.element();
    if element.local_name() != "t" && element.local_name() != "delText" {
        return TranslatorOutput::none();
    }
    TranslatorOutput::one(DocNode::text(element.text_content()))
}

fn decode(ctx: &mut DecodeContext, _attrs: Vec<(String, String)>) -> Option<XmlNode> {
    let text = ctx.node.text.as_deref()?;

    // Inside a deleted region the text element must be w:delText
    let tag = if ctx.pass.tracked == Some(TrackedKind::Deleted) {
        "w:delText"
    } else {
        "w:t"
    };

    let mut element = XmlNode::new(tag);
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        element.set_attr("xml:space", "preserve");
    }
    Some(element.with_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConvertPass, ExportPass};
    use crate::numbering::NumberingDefs;
    use crate::relationships::Relationships;

    #[test]
    fn test_encode_text() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = ConvertPass::new(&numbering, &rels);
        let nodes = [XmlNode::new("w:t").with_text("Hello")];
        let mut ctx = EncodeContext {
            nodes: &nodes,
            pass: &mut pass,
        };
        let out = encode(&mut ctx, AttrMap::new());
        assert_eq!(out.consumed, 1);
        assert_eq!(out.node.unwrap().text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_encode_guard_rejects_other_tags() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = ConvertPass::new(&numbering, &rels);
        let nodes = [XmlNode::new("w:tab")];
        let mut ctx = EncodeContext {
            nodes: &nodes,
            pass: &mut pass,
        };
        assert!(encode(&mut ctx, AttrMap::new()).node.is_none());
    }

    #[test]
    fn test_decode_preserves_significant_whitespace() {
        let numbering = NumberingDefs::default();
        let mut rels = Relationships::new();
        let mut pass = ExportPass::new(&numbering, &mut rels);
        let node = DocNode::text(" padded ");
        let mut ctx = DecodeContext {
            node: &node,
            pass: &mut pass,
        };
        let element = decode(&mut ctx, Vec::new()).unwrap();
        assert_eq!(element.attr("xml:space"), Some("preserve"));
    }

    #[test]
    fn test_decode_in_deleted_region_emits_del_text() {
        let numbering = NumberingDefs::default();
        let mut rels = Relationships::new();
        let mut pass = ExportPass::new(&numbering, &mut rels);
        pass.tracked = Some(TrackedKind::Deleted);
        let node = DocNode::text("gone");
        let mut ctx = DecodeContext {
            node: &node,
            pass: &mut pass,
        };
        assert_eq!(decode(&mut ctx, Vec::new()).unwrap().name, "w:delText");
    }

    #[test]
    fn test_decode_without_text_is_no_op() {
        let numbering = NumberingDefs::default();
        let mut rels = Relationships::new();
        let mut pass = ExportPass::new(&numbering, &mut rels);
        let node = DocNode::new("text"); // no payload
        let mut ctx = DecodeContext {
            node: &node,
            pass: &mut pass,
        };
        assert!(decode(&mut ctx, Vec::new()).is_none());
    }
}
