//! `w:p` <-> paragraph node
//!
//! Paragraph properties (`w:pPr`) are folded into attributes: style id,
//! alignment, and list numbering. For numbered paragraphs the encode side
//! advances the pass counters and precomputes the displayed label from the
//! level's `lvlText` template, so the editing surface never touches
//! numbering.xml.

use super::{DecodeContext, EncodeContext, TranslatorOutput, Translator};
use crate::dispatcher::{decode_node_list, encode_node_list};
use crate::numbering::generate_ordered_list_index;
use crate::xml::{XmlChild, XmlNode};
use doc_model::{AttrMap, DocNode};
use serde_json::Value;

pub static TRANSLATOR: Translator = Translator {
    tag: "w:p",
    doc_type: "paragraph",
    attributes: &[],
    encode,
    decode,
};

fn encode(ctx: &mut EncodeContext, _attrs: AttrMap) -> TranslatorOutput {
    let element = ctx.element();
    if element.name != "w:p" {
        return TranslatorOutput::none();
    }

    let mut node = DocNode::new("paragraph");
    let ppr = element.find_child("w:pPr");

    let style_id = ppr
        .and_then(|p| p.find_child("w:pStyle"))
        .and_then(|s| s.attr("w:val"))
        .map(str::to_string);
    if let Some(ref style) = style_id {
        node.set_attr("styleId", style.clone());
    }
    if let Some(align) = ppr
        .and_then(|p| p.find_child("w:jc"))
        .and_then(|jc| jc.attr("w:val"))
    {
        node.set_attr("align", align);
    }

    apply_numbering(ctx, ppr, &mut node);

    // Children other than properties, converted under the enclosing style id
    let children: Vec<XmlNode> = element
        .elements()
        .filter(|e| e.name != "w:pPr")
        .cloned()
        .collect();
    let previous_style = ctx.pass.style_id.take();
    ctx.pass.style_id = style_id;
    let content = encode_node_list(&children, Some("w:CT_P"), ctx.pass);
    ctx.pass.style_id = previous_style;

    node.content = content;
    TranslatorOutput::one(node)
}

/// Read `w:numPr` and fill the numbering attributes. Malformed numeric
/// values degrade to "not numbered" rather than failing the paragraph.
fn apply_numbering(ctx: &mut EncodeContext, ppr: Option<&XmlNode>, node: &mut DocNode) {
    let num_pr = match ppr.and_then(|p| p.find_child("w:numPr")) {
        Some(np) => np,
        None => return,
    };

    let num_id: u32 = match num_pr
        .find_child("w:numId")
        .and_then(|e| e.attr("w:val"))
        .and_then(|v| v.parse().ok())
    {
        Some(id) if id > 0 => id,
        _ => return, // numId 0 or malformed: not a list paragraph
    };
    let ilvl: u8 = num_pr
        .find_child("w:ilvl")
        .and_then(|e| e.attr("w:val"))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let path = ctx.pass.counters.advance(num_id, ilvl, ctx.pass.numbering);

    node.set_attr("numId", num_id as u64);
    node.set_attr("ilvl", ilvl as u64);
    node.set_attr(
        "listLevel",
        Value::Array(path.iter().map(|&c| Value::from(c as u64)).collect()),
    );

    if let Some(level) = ctx.pass.numbering.level(num_id, ilvl) {
        if let Some(fmt) = level.num_fmt {
            if let Some(label) =
                generate_ordered_list_index(&path, &level.lvl_text, fmt.as_docx_str())
            {
                node.set_attr("listIndex", label);
            }
        }
    }
}

fn decode(ctx: &mut DecodeContext, _attrs: Vec<(String, String)>) -> Option<XmlNode> {
    if !ctx.node.is("paragraph") {
        return None;
    }

    let mut element = XmlNode::new("w:p");

    let mut ppr = XmlNode::new("w:pPr");
    if let Some(style) = ctx.node.attr_str("styleId") {
        ppr = ppr.with_child(XmlNode::new("w:pStyle").with_attr("w:val", style));
    }
    if let Some(num_id) = ctx.node.attr_u64("numId") {
        let ilvl = ctx.node.attr_u64("ilvl").unwrap_or(0);
        ppr = ppr.with_child(
            XmlNode::new("w:numPr")
                .with_child(XmlNode::new("w:ilvl").with_attr("w:val", &ilvl.to_string()))
                .with_child(XmlNode::new("w:numId").with_attr("w:val", &num_id.to_string())),
        );
    }
    if let Some(align) = ctx.node.attr_str("align") {
        ppr = ppr.with_child(XmlNode::new("w:jc").with_attr("w:val", align));
    }
    if !ppr.children.is_empty() {
        element.children.push(XmlChild::Element(ppr));
    }

    for child in decode_node_list(&ctx.node.content, ctx.pass) {
        element.children.push(XmlChild::Element(child));
    }

    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ConvertPass, ExportPass};
    use crate::numbering::NumberingDefs;
    use crate::relationships::Relationships;
    use crate::xml::parse_document;

    const NUMBERING_XML: &str = r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:abstractNum w:abstractNumId="0">
  <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
  <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="upperRoman"/><w:lvlText w:val="%1.%2"/></w:lvl>
</w:abstractNum>
<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#;

    fn encode_paragraph(pass: &mut ConvertPass, xml: &str) -> DocNode {
        let p = parse_document(xml).unwrap();
        let nodes = [p];
        let mut ctx = EncodeContext {
            nodes: &nodes,
            pass,
        };
        encode(&mut ctx, AttrMap::new()).node.unwrap()
    }

    #[test]
    fn test_encode_style_and_alignment() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = ConvertPass::new(&numbering, &rels);
        let node = encode_paragraph(
            &mut pass,
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr><w:r><w:t>T</w:t></w:r></w:p>"#,
        );
        assert_eq!(node.attr_str("styleId"), Some("Heading1"));
        assert_eq!(node.attr_str("align"), Some("center"));
        assert_eq!(node.content.len(), 1);
    }

    #[test]
    fn test_numbered_paragraphs_get_labels_in_document_order() {
        let numbering =
            NumberingDefs::parse(&parse_document(NUMBERING_XML).unwrap());
        let rels = Relationships::new();
        let mut pass = ConvertPass::new(&numbering, &rels);

        let first = encode_paragraph(
            &mut pass,
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr></w:p>"#,
        );
        let second = encode_paragraph(
            &mut pass,
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="1"/><w:numId w:val="1"/></w:numPr></w:pPr></w:p>"#,
        );
        let third = encode_paragraph(
            &mut pass,
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr></w:p>"#,
        );

        assert_eq!(first.attr_str("listIndex"), Some("1."));
        // One formatter applies to every placeholder in the template
        assert_eq!(second.attr_str("listIndex"), Some("I.I"));
        assert_eq!(third.attr_str("listIndex"), Some("2."));
    }

    #[test]
    fn test_dropped_child_diagnostic_carries_paragraph_style() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = ConvertPass::new(&numbering, &rels);
        encode_paragraph(
            &mut pass,
            r#"<w:p><w:pPr><w:pStyle w:val="Quote"/></w:pPr><w:fldSimple w:instr="PAGE"/></w:p>"#,
        );

        let dropped = pass
            .diagnostics
            .iter()
            .find(|d| d.code == "dispatch.dropped-element")
            .unwrap();
        assert!(dropped.message.contains("Quote"));
        // The style scope ends with the paragraph
        assert!(pass.style_id.is_none());
    }

    #[test]
    fn test_malformed_numbering_level_degrades_to_unnumbered() {
        let numbering =
            NumberingDefs::parse(&parse_document(NUMBERING_XML).unwrap());
        let rels = Relationships::new();
        let mut pass = ConvertPass::new(&numbering, &rels);
        let node = encode_paragraph(
            &mut pass,
            r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="abc"/><w:numId w:val="xyz"/></w:numPr></w:pPr></w:p>"#,
        );
        assert!(node.attr_u64("numId").is_none());
        assert!(node.attr_str("listIndex").is_none());
    }

    #[test]
    fn test_decode_rebuilds_ppr() {
        let numbering = NumberingDefs::default();
        let mut rels = Relationships::new();
        let mut pass = ExportPass::new(&numbering, &mut rels);

        let node = DocNode::new("paragraph")
            .with_attr("styleId", "Body")
            .with_attr("numId", 1)
            .with_attr("ilvl", 0)
            .with_content(vec![DocNode::new("run").with_content(vec![DocNode::text("x")])]);
        let mut ctx = DecodeContext {
            node: &node,
            pass: &mut pass,
        };
        let element = decode(&mut ctx, Vec::new()).unwrap();

        let ppr = element.find_child("w:pPr").unwrap();
        assert!(ppr.find_child("w:pStyle").is_some());
        let num_pr = ppr.find_child("w:numPr").unwrap();
        assert_eq!(
            num_pr.find_child("w:numId").and_then(|e| e.attr("w:val")),
            Some("1")
        );
        assert!(element.find_child("w:r").is_some());
    }

    #[test]
    fn test_plain_paragraph_has_no_ppr() {
        let numbering = NumberingDefs::default();
        let mut rels = Relationships::new();
        let mut pass = ExportPass::new(&numbering, &mut rels);
        let node = DocNode::new("paragraph");
        let mut ctx = DecodeContext {
            node: &node,
            pass: &mut pass,
        };
        let element = decode(&mut ctx, Vec::new()).unwrap();
        assert!(element.find_child("w:pPr").is_none());
    }
}
