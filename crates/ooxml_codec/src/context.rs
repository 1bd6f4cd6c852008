//! Shared state threaded through one conversion pass
//!
//! Nothing here is global: every import or export call constructs its own
//! pass object and hands it down the recursive dispatch calls by mutable
//! reference, so concurrent conversions never share state.

use crate::error::Diagnostic;
use crate::namespaces::NamespaceMap;
use crate::numbering::{ListCounters, NumberingDefs};
use crate::relationships::Relationships;
use crate::schema::{wordprocessing_schema, SchemaArtifact};

/// Which tracked-change region the dispatcher is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedKind {
    Inserted,
    Deleted,
}

/// Which unmodeled tags are carried through verbatim instead of dropped
#[derive(Debug, Clone)]
pub struct PassthroughPolicy {
    allowed: Vec<&'static str>,
}

impl Default for PassthroughPolicy {
    fn default() -> Self {
        // Constructs we do not model yet but must not lose
        Self {
            allowed: vec![
                "w:tbl",
                "w:sectPr",
                "w:commentRangeStart",
                "w:commentRangeEnd",
            ],
        }
    }
}

impl PassthroughPolicy {
    /// A policy that drops every unmodeled tag
    pub fn drop_all() -> Self {
        Self { allowed: Vec::new() }
    }

    /// A policy that passes the given tags through verbatim
    pub fn allowing(tags: Vec<&'static str>) -> Self {
        Self { allowed: tags }
    }

    pub fn allows(&self, tag: &str) -> bool {
        self.allowed.iter().any(|t| *t == tag)
    }
}

/// State for one import (OOXML -> document tree) pass
pub struct ConvertPass<'d> {
    /// Read-only schema oracle
    pub schema: &'static SchemaArtifact,
    /// Parsed numbering definitions for the document
    pub numbering: &'d NumberingDefs,
    /// Document-part relationships (hyperlink targets live here)
    pub relationships: &'d Relationships,
    /// Per-instance list counters, advanced in document order
    pub counters: ListCounters,
    /// Tracked-change region currently being converted, if any
    pub tracked: Option<TrackedKind>,
    /// Enclosing paragraph style id, if any
    pub style_id: Option<String>,
    /// Policy for tags without a registered translator
    pub passthrough: PassthroughPolicy,
    /// Collected data-quality signals
    pub diagnostics: Vec<Diagnostic>,
}

impl<'d> ConvertPass<'d> {
    pub fn new(numbering: &'d NumberingDefs, relationships: &'d Relationships) -> Self {
        Self {
            schema: wordprocessing_schema(),
            numbering,
            relationships,
            counters: ListCounters::new(),
            tracked: None,
            style_id: None,
            passthrough: PassthroughPolicy::default(),
            diagnostics: Vec::new(),
        }
    }
}

/// State for one export (document tree -> OOXML) pass
pub struct ExportPass<'d> {
    /// Namespace prefixes assigned during this pass
    pub namespaces: NamespaceMap,
    /// Numbering definitions being regenerated
    pub numbering: &'d NumberingDefs,
    /// Document-part relationships; hyperlink export allocates ids here
    pub relationships: &'d mut Relationships,
    /// Tracked-change region currently being exported, if any
    pub tracked: Option<TrackedKind>,
    /// Collected data-quality signals
    pub diagnostics: Vec<Diagnostic>,
}

impl<'d> ExportPass<'d> {
    pub fn new(numbering: &'d NumberingDefs, relationships: &'d mut Relationships) -> Self {
        Self {
            namespaces: NamespaceMap::with_wordprocessing_defaults(),
            numbering,
            relationships,
            tracked: None,
            diagnostics: Vec::new(),
        }
    }
}
