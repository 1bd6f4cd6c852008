//! Error types and conversion diagnostics
//!
//! The codec distinguishes two failure classes. Hard errors (`CodecError`)
//! only arise at the package boundary: a corrupt zip, a missing required
//! part, an I/O failure. Inside the conversion core there is no aborting
//! error class at all; every failure mode degrades to a best-effort value
//! plus a collected `Diagnostic`, so a document always opens.

use thiserror::Error;

/// Errors that can occur reading or writing a DOCX container
#[derive(Debug, Error)]
pub enum CodecError {
    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Invalid DOCX structure
    #[error("Invalid DOCX structure: {0}")]
    InvalidStructure(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Document model error
    #[error("Document model error: {0}")]
    DocModel(#[from] doc_model::DocModelError),

    /// UTF-8 encoding error
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<quick_xml::Error> for CodecError {
    fn from(err: quick_xml::Error) -> Self {
        CodecError::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for CodecError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        CodecError::XmlParse(format!("Attribute error: {}", err))
    }
}

/// Result type for package-boundary operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Severity of a conversion diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational - no data loss, but behavior may differ
    Info,
    /// Content was approximated or partially converted
    Warning,
    /// Content was dropped
    Loss,
}

/// A single data-quality signal collected during conversion
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Stable diagnostic code (e.g. "schema.unknown-type")
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Element name or path the diagnostic refers to, if known
    pub element: Option<String>,
}

impl Diagnostic {
    pub fn new(code: &'static str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code,
            message: message.into(),
            severity,
            element: None,
        }
    }

    /// Attach the element name this diagnostic refers to
    pub fn at(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

/// A best-effort conversion result: the value is always present, and any
/// degradation along the way is recorded in `diagnostics`.
#[derive(Debug)]
pub struct Conversion<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Conversion<T> {
    /// A conversion that completed without degradation
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn new(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    /// True if nothing was dropped or approximated
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Map the carried value, keeping diagnostics
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Conversion<U> {
        Conversion {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_carries_diagnostics() {
        let conv = Conversion::new(
            42,
            vec![Diagnostic::new("x.dropped", "dropped element", Severity::Loss).at("w:foo")],
        );
        assert!(!conv.is_clean());
        let mapped = conv.map(|v| v + 1);
        assert_eq!(mapped.value, 43);
        assert_eq!(mapped.diagnostics.len(), 1);
        assert_eq!(mapped.diagnostics[0].element.as_deref(), Some("w:foo"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Loss);
    }
}
