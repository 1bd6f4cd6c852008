//! Relationships (.rels) part parsing and generation
//!
//! DOCX connects its parts through relationship files; hyperlink targets in
//! particular live here rather than in document.xml. One `Relationships`
//! instance per part, keyed by `rIdN` ids.

use crate::error::{CodecError, CodecResult};
use crate::xml::{parse_document, XmlNode};
use std::collections::HashMap;

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}

/// A single relationship in a .rels file
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Unique ID within the rels file (e.g. "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative to the source part) or external URL
    pub target: String,
    /// Target mode (Internal or External)
    pub target_mode: TargetMode,
}

/// Target mode for relationships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetMode {
    /// Internal target within the package
    #[default]
    Internal,
    /// External target (URL)
    External,
}

/// Collection of relationships from one .rels part
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
    next_id: u32,
}

impl Relationships {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
            next_id: 1,
        }
    }

    /// Parse a .rels part from its XML content
    pub fn parse(content: &str) -> CodecResult<Self> {
        let root = parse_document(content)?;
        let mut result = Self::new();
        let mut max_id = 0u32;

        for rel in root.elements().filter(|e| e.local_name() == "Relationship") {
            let id = rel
                .attr("Id")
                .ok_or_else(|| CodecError::InvalidStructure("Relationship missing Id".into()))?
                .to_string();
            let rel_type = rel
                .attr("Type")
                .ok_or_else(|| CodecError::InvalidStructure("Relationship missing Type".into()))?
                .to_string();
            let target = rel
                .attr("Target")
                .ok_or_else(|| CodecError::InvalidStructure("Relationship missing Target".into()))?
                .to_string();
            let target_mode = match rel.attr("TargetMode") {
                Some("External") => TargetMode::External,
                _ => TargetMode::Internal,
            };

            if let Some(num) = id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()) {
                max_id = max_id.max(num);
            }

            result.by_id.insert(
                id.clone(),
                Relationship {
                    id,
                    rel_type,
                    target,
                    target_mode,
                },
            );
        }

        result.next_id = max_id + 1;
        Ok(result)
    }

    /// Add a relationship and return its generated ID
    pub fn add(&mut self, rel_type: &str, target: &str, target_mode: TargetMode) -> String {
        let id = format!("rId{}", self.next_id);
        self.next_id += 1;
        self.by_id.insert(
            id.clone(),
            Relationship {
                id: id.clone(),
                rel_type: rel_type.to_string(),
                target: target.to_string(),
                target_mode,
            },
        );
        id
    }

    /// Get a relationship by ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Get the target for a relationship ID
    pub fn get_target(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(|r| r.target.as_str())
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All relationships, ordered by numeric id for deterministic output
    pub fn all_ordered(&self) -> Vec<&Relationship> {
        let mut rels: Vec<&Relationship> = self.by_id.values().collect();
        rels.sort_by_key(|r| {
            r.id.strip_prefix("rId")
                .and_then(|n| n.parse::<u32>().ok())
                .unwrap_or(u32::MAX)
        });
        rels
    }

    /// Generate the XML content for this .rels part
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for rel in self.all_ordered() {
            let mut node = XmlNode::new("Relationship")
                .with_attr("Id", &rel.id)
                .with_attr("Type", &rel.rel_type)
                .with_attr("Target", &rel.target);
            if rel.target_mode == TargetMode::External {
                node.set_attr("TargetMode", "External");
            }
            xml.push_str(&node.to_xml_string());
        }

        xml.push_str("</Relationships>");
        xml
    }
}

/// The root _rels/.rels for a new DOCX
pub fn create_root_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(
        relationship_types::DOCUMENT,
        "word/document.xml",
        TargetMode::Internal,
    );
    rels
}

/// The word/_rels/document.xml.rels for a new DOCX. The numbering entry is
/// only added when a numbering part will actually be written.
pub fn create_document_rels(with_numbering: bool) -> Relationships {
    let mut rels = Relationships::new();
    rels.add(relationship_types::STYLES, "styles.xml", TargetMode::Internal);
    if with_numbering {
        rels.add(
            relationship_types::NUMBERING,
            "numbering.xml",
            TargetMode::Internal,
        );
    }
    rels
}
