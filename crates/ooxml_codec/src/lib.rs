//! Bidirectional DOCX converter
//!
//! Converts between OOXML WordprocessingML packages and the internal JSON
//! document tree from [`doc_model`]. The conversion core is soft-fail:
//! malformed or unmodeled content degrades per element and is reported as
//! [`Diagnostic`]s on the returned [`Conversion`], while hard errors are
//! reserved for unusable containers.
//!
//! Layering, outermost first:
//! - [`api`] / [`package`]: files, byte buffers, and the ZIP container
//! - [`assembler`]: whole-document orchestration and part regeneration
//! - [`dispatcher`] + [`translate`]: per-element conversion
//! - [`schema`], [`namespaces`], [`numbering`], [`relationships`],
//!   [`migrate`]: the supporting oracles and registries

pub mod api;
pub mod assembler;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod migrate;
pub mod namespaces;
pub mod numbering;
pub mod package;
pub mod relationships;
pub mod schema;
pub mod translate;
pub mod xml;

pub use api::{export_docx, export_docx_bytes, import_docx, import_docx_bytes};
pub use error::{CodecError, CodecResult, Conversion, Diagnostic, Severity};
pub use migrate::CURRENT_DOC_VERSION;
