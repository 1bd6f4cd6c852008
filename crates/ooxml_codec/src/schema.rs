//! Schema oracle: XSD-derived lookup of valid children and attributes
//!
//! The artifact under `data/wml_schema.json` is generated once from the
//! official OOXML XSD sources and loaded read-only at runtime. The generator
//! emits three keys: `namespaces` (URI -> prefix), `elements` (qualified
//! type name -> element shape) and `simpleTypes` (names that resolve to no
//! structure). Because `elements` is keyed by qualified name, the composite
//! `(target namespace, local name)` is unique by construction.
//!
//! Lookups never fail hard: an unresolvable type is a data-quality signal,
//! logged and recorded as a diagnostic, and resolves to `None`.

use crate::error::{Diagnostic, Severity};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Attribute metadata from the generated schema
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SchemaAttribute {
    /// The attribute's declared simple type, if the XSD named one
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// One schema element: its tag name, valid children, and attributes
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaElement {
    /// Qualified tag name this type renders as (e.g. "w:p" for w:CT_P)
    pub name: String,
    /// Valid child element names, in schema order
    #[serde(default)]
    pub children: Vec<String>,
    /// Attribute name -> metadata
    #[serde(default)]
    pub attributes: HashMap<String, SchemaAttribute>,
}

impl SchemaElement {
    /// True if the given qualified tag is a valid child of this element
    pub fn allows_child(&self, tag: &str) -> bool {
        self.children.iter().any(|c| c == tag)
    }
}

/// The generated schema artifact
#[derive(Debug, Deserialize)]
pub struct SchemaArtifact {
    /// Namespace URI -> conventional prefix
    pub namespaces: HashMap<String, String>,
    /// Qualified complex-type name -> element shape
    pub elements: HashMap<String, SchemaElement>,
    /// Simple-type names: known, but structureless
    #[serde(default, rename = "simpleTypes")]
    pub simple_types: HashSet<String>,
}

impl SchemaArtifact {
    /// Resolve a type name against this artifact. See [`resolve_type`].
    pub fn resolve_type(
        &self,
        type_name: &str,
        context_namespace: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&SchemaElement> {
        resolve_type(
            type_name,
            context_namespace,
            &self.namespaces,
            &self.elements,
            &self.simple_types,
            diagnostics,
        )
    }

    /// Look up the schema element whose rendered tag matches `tag`
    pub fn element_for_tag(&self, tag: &str) -> Option<&SchemaElement> {
        self.elements.values().find(|e| e.name == tag)
    }
}

static WORDPROCESSING_SCHEMA: Lazy<SchemaArtifact> = Lazy::new(|| {
    serde_json::from_str(include_str!("../data/wml_schema.json"))
        .expect("embedded schema artifact is valid JSON")
});

/// The memoized WordprocessingML schema artifact.
///
/// Repeated calls return the identical cached instance, so conversions
/// share one read-only table.
pub fn wordprocessing_schema() -> &'static SchemaArtifact {
    &WORDPROCESSING_SCHEMA
}

/// XSD built-in type prefixes; these always resolve to no structure
const XSD_PREFIXES: [&str; 2] = ["xsd", "xs"];

/// Resolve a (possibly prefixed) XSD type name to its schema element.
///
/// - `"xsd:*"` / `"xs:*"` built-ins resolve to `None` without diagnostic.
/// - A bare name is resolved against `context_namespace`.
/// - A name found in `simple_types` resolves to `None` without diagnostic:
///   simple types are expected to have no structural children.
/// - An unknown prefix, or a name found in neither set, logs a diagnostic
///   and resolves to `None`. Never an error: conversion continues.
///
/// The lookup key is the composite of target namespace and local name,
/// expressed through the namespace's conventional prefix.
pub fn resolve_type<'a>(
    type_name: &str,
    context_namespace: &str,
    namespaces: &HashMap<String, String>,
    complex_types: &'a HashMap<String, SchemaElement>,
    simple_types: &HashSet<String>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a SchemaElement> {
    let (target_namespace, local) = match type_name.split_once(':') {
        Some((prefix, local)) => {
            if XSD_PREFIXES.contains(&prefix) {
                return None;
            }
            match namespaces.iter().find(|(_, p)| p.as_str() == prefix) {
                Some((uri, _)) => (uri.as_str(), local),
                None => {
                    tracing::warn!(type_name, prefix, "unknown namespace prefix in type name");
                    diagnostics.push(
                        Diagnostic::new(
                            "schema.unknown-prefix",
                            format!("unknown namespace prefix '{}' in type '{}'", prefix, type_name),
                            Severity::Warning,
                        )
                        .at(type_name.to_string()),
                    );
                    return None;
                }
            }
        }
        None => (context_namespace, type_name),
    };

    let key = match namespaces.get(target_namespace) {
        Some(prefix) => format!("{}:{}", prefix, local),
        // Namespace has no assigned prefix in the artifact; local name is
        // the best composite we can form.
        None => local.to_string(),
    };

    if let Some(element) = complex_types.get(&key) {
        return Some(element);
    }
    if simple_types.contains(&key) {
        return None;
    }

    tracing::warn!(type_name, key, "type not present in generated schema");
    diagnostics.push(
        Diagnostic::new(
            "schema.unknown-type",
            format!("type '{}' not present in generated schema", type_name),
            Severity::Warning,
        )
        .at(type_name.to_string()),
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces;

    #[test]
    fn test_schema_is_memoized() {
        let a = wordprocessing_schema() as *const SchemaArtifact;
        let b = wordprocessing_schema() as *const SchemaArtifact;
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_resolve_prefixed_complex_type() {
        let schema = wordprocessing_schema();
        let mut diags = Vec::new();
        let p = schema.resolve_type("w:CT_P", namespaces::W, &mut diags).unwrap();
        assert_eq!(p.name, "w:p");
        assert!(p.allows_child("w:r"));
        assert!(p.allows_child("w:hyperlink"));
        assert!(!p.allows_child("w:tbl"));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_resolve_bare_name_uses_context_namespace() {
        let schema = wordprocessing_schema();
        let mut diags = Vec::new();
        let r = schema.resolve_type("CT_R", namespaces::W, &mut diags).unwrap();
        assert_eq!(r.name, "w:r");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_xsd_builtins_resolve_to_none_without_diagnostic() {
        let schema = wordprocessing_schema();
        for name in ["xsd:string", "xs:anyURI", "xsd:unsignedLong", "xs:CT_P"] {
            let mut diags = Vec::new();
            assert!(schema.resolve_type(name, namespaces::W, &mut diags).is_none());
            assert!(diags.is_empty(), "{} should not produce a diagnostic", name);
        }
    }

    #[test]
    fn test_simple_type_resolves_to_none_without_diagnostic() {
        let schema = wordprocessing_schema();
        let mut diags = Vec::new();
        assert!(schema.resolve_type("w:ST_OnOff", namespaces::W, &mut diags).is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unknown_prefix_produces_diagnostic() {
        let schema = wordprocessing_schema();
        let mut diags = Vec::new();
        assert!(schema.resolve_type("zz:CT_P", namespaces::W, &mut diags).is_none());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "schema.unknown-prefix");
    }

    #[test]
    fn test_missing_type_produces_diagnostic() {
        let schema = wordprocessing_schema();
        let mut diags = Vec::new();
        assert!(schema.resolve_type("w:CT_DoesNotExist", namespaces::W, &mut diags).is_none());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "schema.unknown-type");
    }

    #[test]
    fn test_hyperlink_attributes_present() {
        let schema = wordprocessing_schema();
        let mut diags = Vec::new();
        let link = schema
            .resolve_type("w:CT_Hyperlink", namespaces::W, &mut diags)
            .unwrap();
        assert!(link.attributes.contains_key("r:id"));
        assert!(link.attributes.contains_key("w:anchor"));
        assert!(!link.attributes["r:id"].required);
    }
}
