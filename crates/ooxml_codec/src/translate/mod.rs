//! Element translators: one bidirectional mapping unit per OOXML tag
//!
//! Every translator pairs an `encode` (OOXML element -> document node) with
//! a `decode` (document node -> OOXML element) and a declarative attribute
//! table. The registry is the compile-time [`TagKind`] enum; an unmatched
//! tag maps to `TagKind::Unknown` and falls to the dispatcher's
//! passthrough/drop policy instead of a missing-key lookup.

mod bookmark;
mod hyperlink;
mod line_break;
mod paragraph;
mod run;
mod tab;
mod text;
mod track_changes;

use crate::context::{ConvertPass, ExportPass};
use crate::xml::XmlNode;
use doc_model::{AttrMap, DocNode};
use serde_json::Value;

/// Document node type used for verbatim-carried unmodeled XML
pub const PASSTHROUGH_TYPE: &str = "xmlPassthrough";

/// One declarative attribute mapping: the OOXML attribute name, the internal
/// attribute name, and optional value transforms for each direction. The
/// dispatcher applies these uniformly before invoking encode/decode, so
/// translators never re-implement generic attribute copying.
pub struct AttrMapping {
    pub xml_name: &'static str,
    pub sd_name: &'static str,
    /// XML attribute string -> internal attribute value
    pub encode: Option<fn(&str) -> Value>,
    /// Internal attribute value -> XML attribute string
    pub decode: Option<fn(&Value) -> Option<String>>,
}

impl AttrMapping {
    /// A mapping that carries the value through as an unchanged string
    pub const fn plain(xml_name: &'static str, sd_name: &'static str) -> Self {
        Self {
            xml_name,
            sd_name,
            encode: None,
            decode: None,
        }
    }
}

/// Result of one encode invocation: at most one produced node, plus how many
/// sibling elements were consumed (at least 1 for a matched element).
pub struct TranslatorOutput {
    pub node: Option<DocNode>,
    pub consumed: usize,
}

impl TranslatorOutput {
    /// One node from one element
    pub fn one(node: DocNode) -> Self {
        Self {
            node: Some(node),
            consumed: 1,
        }
    }

    /// One node that consumed `consumed` sibling elements
    pub fn many(node: DocNode, consumed: usize) -> Self {
        Self {
            node: Some(node),
            consumed,
        }
    }

    /// Guard-condition miss: nothing produced, one element consumed
    pub fn none() -> Self {
        Self {
            node: None,
            consumed: 1,
        }
    }
}

/// Encode-side view: the matched element at `nodes[0]`, its following
/// siblings after it, and the shared pass state.
pub struct EncodeContext<'a, 'p, 'd> {
    pub nodes: &'a [XmlNode],
    pub pass: &'p mut ConvertPass<'d>,
}

impl<'a> EncodeContext<'a, '_, '_> {
    /// The element this translator was dispatched on. The returned borrow
    /// is tied to the sibling slice, not to the context, so translators can
    /// hold it while mutating the pass.
    pub fn element(&self) -> &'a XmlNode {
        &self.nodes[0]
    }
}

/// Decode-side view: the document node and the shared export state
pub struct DecodeContext<'a, 'p, 'd> {
    pub node: &'a DocNode,
    pub pass: &'p mut ExportPass<'d>,
}

/// A bidirectional mapping unit for one OOXML tag
pub struct Translator {
    /// Fully qualified OOXML tag this translator matches
    pub tag: &'static str,
    /// Internal node type this translator produces and accepts
    pub doc_type: &'static str,
    /// Declarative attribute mappings, applied by the dispatcher
    pub attributes: &'static [AttrMapping],
    pub encode: fn(&mut EncodeContext, AttrMap) -> TranslatorOutput,
    pub decode: fn(&mut DecodeContext, Vec<(String, String)>) -> Option<XmlNode>,
}

/// The compile-time translator registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Paragraph,
    Run,
    Text,
    Tab,
    LineBreak,
    Hyperlink,
    BookmarkStart,
    BookmarkEnd,
    Insertion,
    Deletion,
    /// Explicit fallback: handled by the dispatcher's passthrough/drop policy
    Unknown,
}

impl TagKind {
    pub const ALL: [TagKind; 10] = [
        TagKind::Paragraph,
        TagKind::Run,
        TagKind::Text,
        TagKind::Tab,
        TagKind::LineBreak,
        TagKind::Hyperlink,
        TagKind::BookmarkStart,
        TagKind::BookmarkEnd,
        TagKind::Insertion,
        TagKind::Deletion,
    ];

    /// Registry lookup by qualified OOXML tag
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "w:p" => TagKind::Paragraph,
            "w:r" => TagKind::Run,
            "w:t" | "w:delText" => TagKind::Text,
            "w:tab" => TagKind::Tab,
            "w:br" => TagKind::LineBreak,
            "w:hyperlink" => TagKind::Hyperlink,
            "w:bookmarkStart" => TagKind::BookmarkStart,
            "w:bookmarkEnd" => TagKind::BookmarkEnd,
            "w:ins" => TagKind::Insertion,
            "w:del" => TagKind::Deletion,
            _ => TagKind::Unknown,
        }
    }

    /// Registry lookup by internal node type
    pub fn from_doc_type(doc_type: &str) -> Self {
        match doc_type {
            "paragraph" => TagKind::Paragraph,
            "run" => TagKind::Run,
            "text" => TagKind::Text,
            "tab" => TagKind::Tab,
            "lineBreak" => TagKind::LineBreak,
            "hyperlink" => TagKind::Hyperlink,
            "bookmarkStart" => TagKind::BookmarkStart,
            "bookmarkEnd" => TagKind::BookmarkEnd,
            "insertion" => TagKind::Insertion,
            "deletion" => TagKind::Deletion,
            _ => TagKind::Unknown,
        }
    }

    /// The translator for this key; `None` only for `Unknown`
    pub fn translator(self) -> Option<&'static Translator> {
        match self {
            TagKind::Paragraph => Some(&paragraph::TRANSLATOR),
            TagKind::Run => Some(&run::TRANSLATOR),
            TagKind::Text => Some(&text::TRANSLATOR),
            TagKind::Tab => Some(&tab::TRANSLATOR),
            TagKind::LineBreak => Some(&line_break::TRANSLATOR),
            TagKind::Hyperlink => Some(&hyperlink::TRANSLATOR),
            TagKind::BookmarkStart => Some(&bookmark::START_TRANSLATOR),
            TagKind::BookmarkEnd => Some(&bookmark::END_TRANSLATOR),
            TagKind::Insertion => Some(&track_changes::INSERTION_TRANSLATOR),
            TagKind::Deletion => Some(&track_changes::DELETION_TRANSLATOR),
            TagKind::Unknown => None,
        }
    }
}
