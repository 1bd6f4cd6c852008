//! Persisted-document version migrations
//!
//! Documents saved by older editor versions are upgraded in place before
//! any conversion work happens. The chain is a registered, version-keyed
//! list of transforms applied in order; a document declaring a version
//! newer than the newest known step is accepted as-is rather than
//! rejected, so files from a newer editor still open.

use crate::error::{Diagnostic, Severity};
use doc_model::DocNode;

/// The document version this codec writes
pub const CURRENT_DOC_VERSION: u64 = 3;

type Migration = fn(&mut DocNode);

/// (version introduced, transform). A document older than the keyed
/// version gets the transform; steps run in ascending order.
static MIGRATIONS: &[(u64, Migration)] = &[(2, rename_hard_breaks), (3, rename_style_attr)];

/// Upgrade a document tree to [`CURRENT_DOC_VERSION`] in place.
pub fn migrate_document(doc: &mut DocNode, diagnostics: &mut Vec<Diagnostic>) {
    let version = doc.attr_u64("version").unwrap_or(1);

    if version > CURRENT_DOC_VERSION {
        // Newer than this codec knows; accept as-is
        diagnostics.push(Diagnostic::new(
            "migrate.newer-version",
            format!(
                "document version {} is newer than supported {}; loaded without migration",
                version, CURRENT_DOC_VERSION
            ),
            Severity::Info,
        ));
        return;
    }

    for (target, step) in MIGRATIONS {
        if version < *target {
            step(doc);
            tracing::debug!(from = version, to = target, "applied document migration");
        }
    }
    doc.set_attr("version", CURRENT_DOC_VERSION);
}

/// v1 -> v2: line breaks were stored as "hardBreak" nodes
fn rename_hard_breaks(node: &mut DocNode) {
    if node.kind == "hardBreak" {
        node.kind = "lineBreak".to_string();
    }
    for child in &mut node.content {
        rename_hard_breaks(child);
    }
}

/// v2 -> v3: paragraph style ids were stored under "style"
fn rename_style_attr(node: &mut DocNode) {
    if node.kind == "paragraph" {
        if let Some(value) = node.attrs.remove("style") {
            node.attrs.entry("styleId".to_string()).or_insert(value);
        }
    }
    for child in &mut node.content {
        rename_style_attr(child);
    }
}
