//! XML namespaces used in DOCX files, and prefix assignment for export
//!
//! During one export pass every namespace URI gets exactly one prefix.
//! Well-known WordprocessingML namespaces keep their conventional prefixes;
//! anything else gets a generated one in first-seen order.

use std::collections::HashMap;

/// Main WordprocessingML namespace
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Relationships namespace
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Package relationships namespace
pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
/// Content types namespace
pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// XML Schema namespace (XSD built-in types)
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema";

/// Sentinel prefix returned for an empty or missing namespace URI
pub const UNKNOWN_PREFIX: &str = "unknown";

/// Bidirectional namespace URI <-> prefix map for one export pass.
///
/// Grows monotonically; never shrinks. Each URI maps to exactly one prefix
/// for the lifetime of the pass, and generated prefixes follow first-seen
/// insertion order (`g0`, `g1`, ...), so output is deterministic for a given
/// traversal order. Construct a fresh map per export; maps must not be
/// shared across concurrent passes.
#[derive(Debug, Clone, Default)]
pub struct NamespaceMap {
    by_uri: HashMap<String, String>,
    by_prefix: HashMap<String, String>,
    insertion_order: Vec<String>,
}

impl NamespaceMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map pre-seeded with the conventional WordprocessingML prefixes
    pub fn with_wordprocessing_defaults() -> Self {
        let mut map = Self::new();
        map.insert(W, "w");
        map.insert(R, "r");
        map
    }

    /// Number of URIs currently mapped
    pub fn len(&self) -> usize {
        self.by_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uri.is_empty()
    }

    /// The prefix assigned to a URI, if any
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.by_uri.get(uri).map(String::as_str)
    }

    /// The URI a prefix resolves to, if any
    pub fn uri_for(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    /// URIs in first-seen order, paired with their prefixes
    pub fn iter_in_order(&self) -> impl Iterator<Item = (&str, &str)> {
        self.insertion_order
            .iter()
            .filter_map(|uri| self.by_uri.get(uri).map(|p| (uri.as_str(), p.as_str())))
    }

    fn insert(&mut self, uri: &str, prefix: &str) {
        self.by_uri.insert(uri.to_string(), prefix.to_string());
        self.by_prefix.insert(prefix.to_string(), uri.to_string());
        self.insertion_order.push(uri.to_string());
    }

    /// Return the prefix for a namespace URI, assigning a new one if needed.
    ///
    /// An empty URI yields the `"unknown"` sentinel and leaves the map
    /// untouched. A URI already present returns its existing prefix without
    /// mutating the map. A new URI is assigned `"g" + current map size`.
    pub fn auto_prefix(&mut self, uri: &str) -> &str {
        if uri.is_empty() {
            return UNKNOWN_PREFIX;
        }
        // Two-phase lookup keeps the borrow checker happy: probe, then insert.
        if !self.by_uri.contains_key(uri) {
            let prefix = format!("g{}", self.by_uri.len());
            self.insert(uri, &prefix);
        }
        self.by_uri.get(uri).map(String::as_str).unwrap_or(UNKNOWN_PREFIX)
    }
}
