//! Whole-document encode and decode
//!
//! The assembler orchestrates one full conversion: it wires parsed OOXML
//! parts (document body, numbering, relationships, styles) through the
//! dispatcher on import, and regenerates the per-part XML on export. One
//! fresh namespace map and one fresh set of list counters per call; passes
//! are never shared.

use crate::context::{ConvertPass, ExportPass};
use crate::dispatcher::{decode_node_list, encode_node_list};
use crate::error::{CodecError, CodecResult, Conversion};
use crate::migrate::{migrate_document, CURRENT_DOC_VERSION};
use crate::namespaces;
use crate::numbering::NumberingDefs;
use crate::relationships::{create_document_rels, create_root_rels, Relationships};
use crate::xml::XmlNode;
use doc_model::DocNode;

/// Already-parsed OOXML parts handed to the encode side. Zip handling and
/// XML parsing happen in the package layer before this point.
pub struct ParsedParts {
    /// word/document.xml root element
    pub document: XmlNode,
    /// word/numbering.xml root element, when the part exists
    pub numbering: Option<XmlNode>,
    /// word/styles.xml root element, when the part exists
    pub styles: Option<XmlNode>,
    /// word/_rels/document.xml.rels
    pub relationships: Relationships,
}

/// Per-part XML outputs produced by the decode side
pub struct DocxParts {
    pub document_xml: String,
    pub styles_xml: String,
    /// Absent when the document defines no numbering
    pub numbering_xml: Option<String>,
    pub document_rels_xml: String,
    pub root_rels_xml: String,
}

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Fallback styles part for documents authored from scratch
const DEFAULT_STYLES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style></w:styles>"#,
);

/// Convert parsed OOXML parts into the internal document tree.
///
/// Never fails on content: unmodeled constructs degrade per the dispatcher
/// policy and are reported in the returned diagnostics. The only hard error
/// is a document.xml with no `w:body`.
pub fn encode_document(parts: &ParsedParts) -> CodecResult<Conversion<DocNode>> {
    let body = parts
        .document
        .find_child("w:body")
        .ok_or_else(|| CodecError::InvalidStructure("document.xml has no w:body".into()))?;

    let numbering = parts
        .numbering
        .as_ref()
        .map(NumberingDefs::parse)
        .unwrap_or_default();

    let mut pass = ConvertPass::new(&numbering, &parts.relationships);
    let children: Vec<XmlNode> = body.elements().cloned().collect();
    let content = encode_node_list(&children, Some("w:CT_Body"), &mut pass);
    tracing::debug!(
        nodes = content.len(),
        diagnostics = pass.diagnostics.len(),
        "encoded document body"
    );

    let mut doc = DocNode::new("doc")
        .with_attr("version", CURRENT_DOC_VERSION)
        .with_content(content);
    if !numbering.is_empty() {
        // Definitions travel with the tree so export can regenerate the part
        doc.set_attr(
            "numbering",
            serde_json::to_value(&numbering).map_err(doc_model::DocModelError::from)?,
        );
    }
    if let Some(ref styles) = parts.styles {
        doc.set_attr("stylesXml", styles.to_xml_string());
    }

    Ok(Conversion::new(doc, pass.diagnostics))
}

/// Convert the internal document tree back into per-part OOXML.
///
/// Migrations for older persisted versions run first; the conversion then
/// threads one fresh namespace map and relationships set through the
/// recursive decode.
pub fn decode_document(doc: &DocNode) -> CodecResult<Conversion<DocxParts>> {
    let mut doc = doc.clone();
    let mut diagnostics = Vec::new();
    migrate_document(&mut doc, &mut diagnostics);

    let numbering: NumberingDefs = match doc.attrs.get("numbering") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(doc_model::DocModelError::from)?,
        None => NumberingDefs::default(),
    };

    let mut relationships = create_document_rels(!numbering.is_empty());
    let mut pass = ExportPass::new(&numbering, &mut relationships);
    // Root namespaces are declared through the map so every pass assigns
    // them the same way
    pass.namespaces.auto_prefix(namespaces::W);
    pass.namespaces.auto_prefix(namespaces::R);

    let elements = decode_node_list(&doc.content, &mut pass);
    diagnostics.append(&mut pass.diagnostics);

    let mut document_xml = String::new();
    document_xml.push_str(XML_DECL);
    document_xml.push('\n');
    document_xml.push_str("<w:document");
    for (uri, prefix) in pass.namespaces.iter_in_order() {
        document_xml.push_str(&format!(r#" xmlns:{}="{}""#, prefix, uri));
    }
    document_xml.push('>');
    document_xml.push_str("<w:body>");
    for element in &elements {
        document_xml.push_str(&element.to_xml_string());
    }
    document_xml.push_str("</w:body></w:document>");

    let styles_xml = doc
        .attr_str("stylesXml")
        .map(|s| format!("{}\n{}", XML_DECL, s))
        .unwrap_or_else(|| DEFAULT_STYLES_XML.to_string());

    let numbering_xml = if numbering.is_empty() {
        None
    } else {
        Some(numbering.to_xml())
    };

    let parts = DocxParts {
        document_xml,
        styles_xml,
        numbering_xml,
        document_rels_xml: relationships.to_xml(),
        root_rels_xml: create_root_rels().to_xml(),
    };
    Ok(Conversion::new(parts, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    const DOC_XML: &str = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>
<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>
<w:p><w:r><w:t>Plain </w:t></w:r><w:hyperlink r:id="rId5" w:history="1"><w:r><w:t>link</w:t></w:r></w:hyperlink></w:p>
</w:body>
</w:document>"#;

    const RELS_XML: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

    fn sample_parts() -> ParsedParts {
        ParsedParts {
            document: parse_document(DOC_XML).unwrap(),
            numbering: None,
            styles: None,
            relationships: Relationships::parse(RELS_XML).unwrap(),
        }
    }

    #[test]
    fn test_encode_document_builds_tree() {
        let conv = encode_document(&sample_parts()).unwrap();
        let doc = &conv.value;
        assert_eq!(doc.kind, "doc");
        assert_eq!(doc.attr_u64("version"), Some(CURRENT_DOC_VERSION));
        assert_eq!(doc.content.len(), 2);
        assert_eq!(doc.content[0].attr_str("styleId"), Some("Heading1"));

        let link = &doc.content[1].content[1];
        assert_eq!(link.kind, "hyperlink");
        assert_eq!(link.attr_str("href"), Some("https://example.com"));
    }

    #[test]
    fn test_missing_body_is_invalid_structure() {
        let parts = ParsedParts {
            document: parse_document("<w:document/>").unwrap(),
            numbering: None,
            styles: None,
            relationships: Relationships::new(),
        };
        assert!(matches!(
            encode_document(&parts),
            Err(CodecError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_decode_document_emits_all_parts() {
        let doc = encode_document(&sample_parts()).unwrap().value;
        let parts = decode_document(&doc).unwrap().value;

        assert!(parts.document_xml.contains("<w:body>"));
        assert!(parts.document_xml.contains("Title"));
        assert!(parts.document_xml.contains("xmlns:w="));
        assert!(parts.numbering_xml.is_none());
        // The hyperlink got a relationship in the regenerated rels part
        assert!(parts.document_rels_xml.contains("https://example.com"));
        assert!(parts.root_rels_xml.contains("word/document.xml"));
        assert!(parts.styles_xml.contains("w:styles"));
    }

    #[test]
    fn test_round_trip_preserves_text_and_structure() {
        let doc = encode_document(&sample_parts()).unwrap().value;
        let parts = decode_document(&doc).unwrap().value;

        let reparsed = parse_document(&parts.document_xml).unwrap();
        let body = reparsed.find_child("w:body").unwrap();
        assert_eq!(body.elements().count(), 2);
        assert_eq!(body.text_content(), "TitlePlain link");

        // Second pass over the re-imported parts converges
        let rels = Relationships::parse(&parts.document_rels_xml).unwrap();
        let again = encode_document(&ParsedParts {
            document: reparsed,
            numbering: None,
            styles: None,
            relationships: rels,
        })
        .unwrap()
        .value;
        assert_eq!(again.content.len(), doc.content.len());
        assert_eq!(
            again.content[1].content[1].attr_str("href"),
            Some("https://example.com")
        );
    }
}
