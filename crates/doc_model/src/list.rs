//! List numbering model
//!
//! OOXML-compatible numbering formats shared by the editing surface and the
//! codec. A numbered paragraph carries its numbering id, level, and the
//! level's display template; the actual label is computed by the codec's
//! numbering resolver from these types.

use serde::{Deserialize, Serialize};

/// Number format types for list items, mirroring `w:numFmt` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumberFormat {
    /// Decimal numbers: 1, 2, 3, ...
    #[default]
    Decimal,
    /// Lowercase letters: a, b, c, ...
    LowerLetter,
    /// Uppercase letters: A, B, C, ...
    UpperLetter,
    /// Lowercase roman numerals: i, ii, iii, ...
    LowerRoman,
    /// Uppercase roman numerals: I, II, III, ...
    UpperRoman,
    /// Bullet character (uses font glyph)
    Bullet,
    /// No number displayed
    None,
}

impl NumberFormat {
    /// Check if this format is a bullet (non-numbering) format
    pub fn is_bullet(&self) -> bool {
        matches!(self, NumberFormat::Bullet | NumberFormat::None)
    }

    /// Parse a `w:numFmt` attribute value. Unknown values yield `None` so
    /// callers can fall back to an unnumbered rendering.
    pub fn from_docx(value: &str) -> Option<Self> {
        match value {
            "decimal" => Some(NumberFormat::Decimal),
            "lowerLetter" => Some(NumberFormat::LowerLetter),
            "upperLetter" => Some(NumberFormat::UpperLetter),
            "lowerRoman" => Some(NumberFormat::LowerRoman),
            "upperRoman" => Some(NumberFormat::UpperRoman),
            "bullet" => Some(NumberFormat::Bullet),
            "none" => Some(NumberFormat::None),
            _ => None,
        }
    }

    /// The `w:numFmt` attribute value for this format
    pub fn as_docx_str(&self) -> &'static str {
        match self {
            NumberFormat::Decimal => "decimal",
            NumberFormat::LowerLetter => "lowerLetter",
            NumberFormat::UpperLetter => "upperLetter",
            NumberFormat::LowerRoman => "lowerRoman",
            NumberFormat::UpperRoman => "upperRoman",
            NumberFormat::Bullet => "bullet",
            NumberFormat::None => "none",
        }
    }

    /// Format a 1-based counter according to this format. Bullet and none
    /// formats produce an empty string.
    pub fn format(&self, value: u32) -> String {
        match self {
            NumberFormat::Decimal => value.to_string(),
            NumberFormat::LowerLetter => format_letter(value, false),
            NumberFormat::UpperLetter => format_letter(value, true),
            NumberFormat::LowerRoman => format_roman(value, false),
            NumberFormat::UpperRoman => format_roman(value, true),
            NumberFormat::Bullet | NumberFormat::None => String::new(),
        }
    }
}

/// Format a number as a letter sequence (bijective base-26, no zero digit):
/// 1 -> a, 26 -> z, 27 -> aa, 28 -> ab, ...
pub fn format_letter(value: u32, uppercase: bool) -> String {
    if value == 0 {
        return String::new();
    }

    let mut result = String::new();
    let mut n = value;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + if uppercase { b'A' } else { b'a' }) as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Format a number as roman numerals using the subtractive notation table
/// M, CM, D, CD, C, XC, L, XL, X, IX, V, IV, I
pub fn format_roman(value: u32, uppercase: bool) -> String {
    if value == 0 || value > 3999 {
        return value.to_string(); // Fallback for out-of-range
    }

    let numerals = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut result = String::new();
    let mut n = value;

    for (num, roman) in numerals {
        while n >= num {
            result.push_str(roman);
            n -= num;
        }
    }

    if uppercase {
        result.to_uppercase()
    } else {
        result
    }
}
