//! Node list handler: walks sibling elements through the translator registry
//!
//! The dispatcher owns the generic half of every translation: registry
//! lookup, declarative attribute resolution, cursor advancement by each
//! translator's reported `consumed` count, and the passthrough/drop policy
//! for unmodeled tags. All cursor state is local to one invocation, so
//! translators are free to recursively dispatch their own children.

use crate::context::{ConvertPass, ExportPass};
use crate::error::{Diagnostic, Severity};
use crate::translate::{
    DecodeContext, EncodeContext, TagKind, Translator, PASSTHROUGH_TYPE,
};
use crate::xml::{parse_document, XmlNode};
use doc_model::{AttrMap, DocNode};
use serde_json::Value;

/// Convert an ordered slice of sibling elements into document nodes.
///
/// `container_type` names the enclosing complex type (e.g. `"w:CT_P"`); when
/// given, children not permitted by the schema oracle are flagged with an
/// informational diagnostic but still converted. Degradation never raises:
/// unmodeled tags are carried through or dropped per the pass policy.
pub fn encode_node_list(
    nodes: &[XmlNode],
    container_type: Option<&str>,
    pass: &mut ConvertPass,
) -> Vec<DocNode> {
    let allowed_children: Option<Vec<String>> = container_type.and_then(|type_name| {
        let mut diags = Vec::new();
        let resolved = pass
            .schema
            .resolve_type(type_name, crate::namespaces::W, &mut diags)
            .map(|se| se.children.clone());
        pass.diagnostics.extend(diags);
        resolved
    });

    let mut out = Vec::new();
    let mut cursor = 0;

    while cursor < nodes.len() {
        let element = &nodes[cursor];

        if let Some(ref allowed) = allowed_children {
            if !allowed.iter().any(|c| c == &element.name) {
                pass.diagnostics.push(
                    Diagnostic::new(
                        "dispatch.unexpected-child",
                        format!(
                            "'{}' is not a schema child of {}",
                            element.name,
                            container_type.unwrap_or("?")
                        ),
                        Severity::Info,
                    )
                    .at(element.name.clone()),
                );
            }
        }

        match TagKind::from_tag(&element.name).translator() {
            Some(translator) => {
                let resolved = resolve_encode_attrs(translator, element);
                let remaining = nodes.len() - cursor;
                let output = {
                    let mut ctx = EncodeContext {
                        nodes: &nodes[cursor..],
                        pass,
                    };
                    (translator.encode)(&mut ctx, resolved)
                };
                if let Some(node) = output.node {
                    out.push(node);
                }
                // A translator always consumes at least its own element and
                // never more than the remaining siblings.
                cursor += output.consumed.clamp(1, remaining);
            }
            None => {
                if pass.passthrough.allows(&element.name) {
                    out.push(passthrough_node(element));
                } else {
                    tracing::warn!(
                        tag = %element.name,
                        style = pass.style_id.as_deref().unwrap_or(""),
                        "dropping element with no translator"
                    );
                    // The enclosing paragraph style helps locate the loss
                    let message = match pass.style_id.as_deref() {
                        Some(style) => format!(
                            "no translator for '{}' in '{}' paragraph",
                            element.name, style
                        ),
                        None => format!("no translator for '{}'", element.name),
                    };
                    pass.diagnostics.push(
                        Diagnostic::new("dispatch.dropped-element", message, Severity::Loss)
                            .at(element.name.clone()),
                    );
                }
                cursor += 1;
            }
        }
    }

    out
}

/// Convert an ordered slice of document nodes back into OOXML elements.
///
/// A translator returning `None` means "nothing to emit" and is skipped
/// silently; an unknown node type is dropped with a diagnostic.
pub fn decode_node_list(nodes: &[DocNode], pass: &mut ExportPass) -> Vec<XmlNode> {
    let mut out = Vec::new();

    for node in nodes {
        if node.kind == PASSTHROUGH_TYPE {
            if let Some(element) = decode_passthrough(node, pass) {
                out.push(element);
            }
            continue;
        }

        match TagKind::from_doc_type(&node.kind).translator() {
            Some(translator) => {
                let resolved = resolve_decode_attrs(translator, node);
                let mut ctx = DecodeContext { node, pass };
                if let Some(element) = (translator.decode)(&mut ctx, resolved) {
                    out.push(element);
                }
            }
            None => {
                tracing::warn!(kind = %node.kind, "dropping node with no translator");
                pass.diagnostics.push(
                    Diagnostic::new(
                        "dispatch.dropped-node",
                        format!("no translator for node type '{}'", node.kind),
                        Severity::Loss,
                    )
                    .at(node.kind.clone()),
                );
            }
        }
    }

    out
}

/// Apply a translator's attribute table in the encode direction
pub fn resolve_encode_attrs(translator: &Translator, element: &XmlNode) -> AttrMap {
    let mut attrs = AttrMap::new();
    for mapping in translator.attributes {
        if let Some(raw) = element.attr(mapping.xml_name) {
            let value = match mapping.encode {
                Some(transform) => transform(raw),
                None => Value::String(raw.to_string()),
            };
            attrs.insert(mapping.sd_name.to_string(), value);
        }
    }
    attrs
}

/// Apply a translator's attribute table in the decode direction
pub fn resolve_decode_attrs(translator: &Translator, node: &DocNode) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    for mapping in translator.attributes {
        if let Some(value) = node.attrs.get(mapping.sd_name) {
            let raw = match mapping.decode {
                Some(transform) => transform(value),
                None => match value {
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                },
            };
            if let Some(raw) = raw {
                attrs.push((mapping.xml_name.to_string(), raw));
            }
        }
    }
    attrs
}

/// Wrap an unmodeled element verbatim so nothing is lost
fn passthrough_node(element: &XmlNode) -> DocNode {
    DocNode::new(PASSTHROUGH_TYPE)
        .with_attr("name", element.name.clone())
        .with_attr("xml", element.to_xml_string())
}

fn decode_passthrough(node: &DocNode, pass: &mut ExportPass) -> Option<XmlNode> {
    let xml = node.attr_str("xml")?;
    match parse_document(xml) {
        Ok(element) => Some(element),
        Err(e) => {
            pass.diagnostics.push(
                Diagnostic::new(
                    "dispatch.bad-passthrough",
                    format!("stored passthrough XML failed to parse: {}", e),
                    Severity::Loss,
                )
                .at(node.attr_str("name").unwrap_or("?").to_string()),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PassthroughPolicy;
    use crate::numbering::NumberingDefs;
    use crate::relationships::Relationships;
    use proptest::prelude::*;

    fn fresh_pass<'d>(
        numbering: &'d NumberingDefs,
        relationships: &'d Relationships,
    ) -> ConvertPass<'d> {
        ConvertPass::new(numbering, relationships)
    }

    #[test]
    fn test_unknown_tag_is_dropped_with_diagnostic() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = fresh_pass(&numbering, &rels);
        pass.passthrough = PassthroughPolicy::drop_all();

        let nodes = vec![XmlNode::new("w:smartTag"), XmlNode::new("w:tab")];
        let out = encode_node_list(&nodes, None, &mut pass);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, "tab");
        assert_eq!(pass.diagnostics.len(), 1);
        assert_eq!(pass.diagnostics[0].code, "dispatch.dropped-element");
    }

    #[test]
    fn test_whitelisted_tag_passes_through_and_round_trips() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = fresh_pass(&numbering, &rels);

        let tbl = crate::xml::parse_document(
            r#"<w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>"#,
        )
        .unwrap();
        let out = encode_node_list(std::slice::from_ref(&tbl), None, &mut pass);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, PASSTHROUGH_TYPE);

        let mut export_rels = Relationships::new();
        let mut export = ExportPass::new(&numbering, &mut export_rels);
        let back = decode_node_list(&out, &mut export);
        assert_eq!(back.len(), 1);
        assert!(crate::xml::structurally_equal(&back[0], &tbl));
    }

    #[test]
    fn test_dropped_element_diagnostic_names_enclosing_style() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = fresh_pass(&numbering, &rels);
        pass.passthrough = PassthroughPolicy::drop_all();
        pass.style_id = Some("Heading1".to_string());

        let nodes = vec![XmlNode::new("w:smartTag")];
        encode_node_list(&nodes, None, &mut pass);

        assert_eq!(pass.diagnostics.len(), 1);
        assert!(pass.diagnostics[0].message.contains("Heading1"));
    }

    #[test]
    fn test_schema_validation_flags_unexpected_child() {
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = fresh_pass(&numbering, &rels);

        // w:tab is not a valid child of w:CT_P
        let nodes = vec![XmlNode::new("w:tab")];
        let out = encode_node_list(&nodes, Some("w:CT_P"), &mut pass);
        assert_eq!(out.len(), 1);
        assert!(pass
            .diagnostics
            .iter()
            .any(|d| d.code == "dispatch.unexpected-child"));
    }

    #[test]
    fn test_reentrancy_no_shared_cursor() {
        // A hyperlink dispatches its own children mid-walk; the outer walk
        // must continue where it left off.
        let numbering = NumberingDefs::default();
        let rels = Relationships::new();
        let mut pass = fresh_pass(&numbering, &rels);

        let xml = r#"<w:p><w:hyperlink w:anchor="top"><w:r><w:t>in</w:t></w:r></w:hyperlink><w:r><w:t>out</w:t></w:r></w:p>"#;
        let p = crate::xml::parse_document(xml).unwrap();
        let children: Vec<XmlNode> = p.elements().cloned().collect();
        let out = encode_node_list(&children, Some("w:CT_P"), &mut pass);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, "hyperlink");
        assert_eq!(out[1].kind, "run");
    }

    // Strategy: sibling sequences mixing translated, passthrough-able, and
    // mergeable-run elements.
    fn arbitrary_sibling() -> impl Strategy<Value = XmlNode> {
        prop_oneof![
            Just(XmlNode::new("w:tab")),
            Just(XmlNode::new("w:br")),
            Just(XmlNode::new("w:tbl")),
            "[a-z]{1,6}".prop_map(|t| {
                XmlNode::new("w:r").with_child(XmlNode::new("w:t").with_text(&t))
            }),
            Just(XmlNode::new("w:bookmarkEnd").with_attr("w:id", "0")),
        ]
    }

    proptest! {
        // The consumed-count protocol must cover the whole input exactly:
        // every sibling is consumed once, none skipped, none double-counted.
        // With a passthrough-everything policy nothing is dropped, so the
        // produced nodes plus merged-run consumption account for the input.
        #[test]
        fn prop_consumed_counts_cover_input(siblings in prop::collection::vec(arbitrary_sibling(), 0..24)) {
            let numbering = NumberingDefs::default();
            let rels = Relationships::new();
            let mut pass = fresh_pass(&numbering, &rels);

            let out = encode_node_list(&siblings, None, &mut pass);

            // No element may be dropped under the default policy for this
            // input set, so every input element is accounted for by exactly
            // one output node's consumption.
            let consumed_total: usize = out
                .iter()
                .map(|n| n.attr_u64("mergedRuns").unwrap_or(1) as usize)
                .sum();
            prop_assert_eq!(consumed_total, siblings.len());
            prop_assert!(pass.diagnostics.iter().all(|d| d.code != "dispatch.dropped-element"));
        }
    }
}
