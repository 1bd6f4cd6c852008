//! List numbering: definitions, counters, and displayed labels
//!
//! numbering.xml defines abstract numbering templates (`w:abstractNum`) and
//! concrete instances (`w:num`) that paragraphs reference by `w:numId` and
//! `w:ilvl`. During one conversion pass `ListCounters` tracks the per-level
//! counter path for each instance in document order, and
//! [`generate_ordered_list_index`] renders the displayed label from the
//! level's `lvlText` template.

use crate::xml::XmlNode;
use doc_model::list::NumberFormat;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One numbering level within an abstract definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    /// 0-based level index (`w:ilvl`)
    pub ilvl: u8,
    /// Starting counter value (`w:start`), 1 when absent or malformed
    pub start: u32,
    /// Number format; `None` when the `w:numFmt` value is unknown
    pub num_fmt: Option<NumberFormat>,
    /// Display template with `%1`, `%2`, ... placeholders (`w:lvlText`)
    pub lvl_text: String,
}

/// An abstract numbering definition (`w:abstractNum`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbstractNumDef {
    pub id: u32,
    pub levels: Vec<LevelDef>,
}

impl AbstractNumDef {
    pub fn level(&self, ilvl: u8) -> Option<&LevelDef> {
        self.levels.iter().find(|l| l.ilvl == ilvl)
    }
}

/// Parsed numbering.xml: abstract definitions plus numId -> abstractNumId
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NumberingDefs {
    pub abstract_nums: HashMap<u32, AbstractNumDef>,
    pub instances: HashMap<u32, u32>,
}

impl NumberingDefs {
    /// Parse a numbering.xml element tree. Malformed numeric attributes fall
    /// back to safe defaults rather than failing the conversion.
    pub fn parse(root: &XmlNode) -> Self {
        let mut defs = Self::default();

        for abstract_num in root.elements().filter(|e| e.name == "w:abstractNum") {
            let id = parse_u32_attr(abstract_num, "w:abstractNumId").unwrap_or(0);
            let mut levels = Vec::new();
            for lvl in abstract_num.elements().filter(|e| e.name == "w:lvl") {
                let ilvl = parse_u32_attr(lvl, "w:ilvl").unwrap_or(0) as u8;
                let start = lvl
                    .find_child("w:start")
                    .and_then(|e| e.attr("w:val"))
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1);
                let num_fmt = lvl
                    .find_child("w:numFmt")
                    .and_then(|e| e.attr("w:val"))
                    .and_then(NumberFormat::from_docx);
                let lvl_text = lvl
                    .find_child("w:lvlText")
                    .and_then(|e| e.attr("w:val"))
                    .unwrap_or_default()
                    .to_string();
                levels.push(LevelDef {
                    ilvl,
                    start,
                    num_fmt,
                    lvl_text,
                });
            }
            defs.abstract_nums.insert(id, AbstractNumDef { id, levels });
        }

        for num in root.elements().filter(|e| e.name == "w:num") {
            let num_id = match parse_u32_attr(num, "w:numId") {
                Some(id) => id,
                None => continue,
            };
            let abstract_id = num
                .find_child("w:abstractNumId")
                .and_then(|e| e.attr("w:val"))
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            defs.instances.insert(num_id, abstract_id);
        }

        defs
    }

    /// Resolve a (numId, ilvl) pair to its level definition
    pub fn level(&self, num_id: u32, ilvl: u8) -> Option<&LevelDef> {
        let abstract_id = self.instances.get(&num_id)?;
        self.abstract_nums.get(abstract_id)?.level(ilvl)
    }

    pub fn is_empty(&self) -> bool {
        self.abstract_nums.is_empty() && self.instances.is_empty()
    }

    /// Generate numbering.xml content
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:numbering xmlns:w="{}" xmlns:r="{}">"#,
            crate::namespaces::W,
            crate::namespaces::R,
        ));

        let mut abstract_ids: Vec<&u32> = self.abstract_nums.keys().collect();
        abstract_ids.sort();
        for id in abstract_ids {
            let abs = &self.abstract_nums[id];
            let mut node = XmlNode::new("w:abstractNum").with_attr("w:abstractNumId", &abs.id.to_string());
            for lvl in &abs.levels {
                let mut lvl_node = XmlNode::new("w:lvl").with_attr("w:ilvl", &lvl.ilvl.to_string());
                lvl_node = lvl_node
                    .with_child(XmlNode::new("w:start").with_attr("w:val", &lvl.start.to_string()));
                if let Some(fmt) = lvl.num_fmt {
                    lvl_node = lvl_node
                        .with_child(XmlNode::new("w:numFmt").with_attr("w:val", fmt.as_docx_str()));
                }
                lvl_node = lvl_node
                    .with_child(XmlNode::new("w:lvlText").with_attr("w:val", &lvl.lvl_text));
                node = node.with_child(lvl_node);
            }
            xml.push_str(&node.to_xml_string());
        }

        let mut num_ids: Vec<&u32> = self.instances.keys().collect();
        num_ids.sort();
        for num_id in num_ids {
            let node = XmlNode::new("w:num")
                .with_attr("w:numId", &num_id.to_string())
                .with_child(
                    XmlNode::new("w:abstractNumId")
                        .with_attr("w:val", &self.instances[num_id].to_string()),
                );
            xml.push_str(&node.to_xml_string());
        }

        xml.push_str("</w:numbering>");
        xml
    }
}

fn parse_u32_attr(node: &XmlNode, name: &str) -> Option<u32> {
    node.attr(name).and_then(|v| v.parse().ok())
}

/// Per-instance counter paths for one conversion pass.
///
/// Mutated in place as list items are encountered in document order; must
/// not be reused across concurrent passes. Counters reset when a deeper
/// level is left or when [`ListCounters::reset`] is called for a restart.
#[derive(Debug, Clone, Default)]
pub struct ListCounters {
    paths: HashMap<u32, Vec<u32>>,
}

impl ListCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter for (numId, ilvl) and return the current path:
    /// 1-based counters, outermost first, one per depth down to `ilvl`.
    pub fn advance(&mut self, num_id: u32, ilvl: u8, defs: &NumberingDefs) -> Vec<u32> {
        let path = self.paths.entry(num_id).or_default();
        let depth = ilvl as usize;

        if path.len() > depth + 1 {
            // Left a deeper level; discard its counters so the next visit restarts
            path.truncate(depth + 1);
        }

        while path.len() <= depth {
            let level = path.len() as u8;
            let start = defs.level(num_id, level).map(|l| l.start).unwrap_or(1);
            path.push(start);
            if path.len() == depth + 1 {
                return path.clone();
            }
        }

        path[depth] += 1;
        path.clone()
    }

    /// Restart numbering for an instance (numId changed context or the list restarted)
    pub fn reset(&mut self, num_id: u32) {
        self.paths.remove(&num_id);
    }
}

/// Render the displayed label for an ordered list item.
///
/// `list_level` is the 1-based counter path (outermost first); `lvl_text`
/// contains positional `%1`, `%2`, ... placeholders; `list_numbering_type`
/// selects the formatter. Unknown or bullet types yield `None` so the
/// caller can fall back to an unnumbered rendering.
pub fn generate_ordered_list_index(
    list_level: &[u32],
    lvl_text: &str,
    list_numbering_type: &str,
) -> Option<String> {
    let fmt = NumberFormat::from_docx(list_numbering_type)?;
    if fmt.is_bullet() {
        return None;
    }

    let mut result = lvl_text.to_string();
    for (depth, counter) in list_level.iter().enumerate() {
        let placeholder = format!("%{}", depth + 1);
        result = result.replace(&placeholder, &fmt.format(*counter));
    }
    Some(result)
}

static DECIMAL_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").expect("valid regex"));
static LETTER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+").expect("valid regex"));
static ROMAN_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[IVXLCDMivxlcdm]+").expect("valid regex"));

/// Recover a starting integer from literal list-label text, for paste/import
/// helpers that see labels like "3." or "iv)" rather than counter paths.
/// Unrecognized leading text yields `None` (no starting override).
pub fn parse_list_label_start(text: &str, fmt: NumberFormat) -> Option<u32> {
    match fmt {
        NumberFormat::Decimal => DECIMAL_PREFIX
            .find(text)
            .and_then(|m| m.as_str().parse().ok()),
        NumberFormat::LowerLetter | NumberFormat::UpperLetter => {
            LETTER_PREFIX.find(text).map(|m| alpha_to_int(m.as_str()))
        }
        NumberFormat::LowerRoman | NumberFormat::UpperRoman => {
            ROMAN_PREFIX.find(text).and_then(|m| roman_to_int(m.as_str()))
        }
        NumberFormat::Bullet | NumberFormat::None => None,
    }
}

/// Inverse of bijective base-26 letter formatting: "A" -> 1, "Z" -> 26, "AA" -> 27
fn alpha_to_int(text: &str) -> u32 {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .fold(0u32, |acc, c| {
            acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)
        })
}

/// Parse a roman numeral; `None` for glyph runs that are not well-formed
fn roman_to_int(text: &str) -> Option<u32> {
    let values: Vec<u32> = text
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        })
        .collect::<Option<_>>()?;

    // Signed accumulation: a glyph before a larger one subtracts, so a
    // numeral may dip negative mid-sum ("IV" is -1 then +5).
    let mut total = 0i64;
    for (i, &v) in values.iter().enumerate() {
        if values.get(i + 1).is_some_and(|&next| next > v) {
            total -= i64::from(v);
        } else {
            total += i64::from(v);
        }
    }
    let total = u32::try_from(total).ok()?;

    // Reject malformed sequences like "IIX" by checking the canonical form
    let uppercase = doc_model::list::format_roman(total, true);
    if uppercase == text.to_ascii_uppercase() {
        Some(total)
    } else {
        None
    }
}
