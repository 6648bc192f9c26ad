//! Base-14 font metrics and text encoding for page layout.
//!
//! The assembler uses the standard Helvetica faces, which every PDF viewer
//! ships, so no font program is embedded. Advance widths below are the AFM
//! values in 1/1000 em for the printable ASCII range; characters outside the
//! table fall back to a representative width.

/// Font faces available to the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    /// Helvetica, used for body text and footers
    Regular,
    /// Helvetica-Bold, used for the title block
    Bold,
}

impl Face {
    /// PDF resource name of this face as registered by the writer.
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            Face::Regular => b"F1",
            Face::Bold => b"F2",
        }
    }

    /// PostScript base font name.
    pub fn base_font(&self) -> &'static [u8] {
        match self {
            Face::Regular => b"Helvetica",
            Face::Bold => b"Helvetica-Bold",
        }
    }
}

/// Fallback advance for characters missing from the width tables.
const DEFAULT_WIDTH: u16 = 556;

/// Helvetica advance widths for code points 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for code points 0x20..=0x7E.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance width of one character in 1/1000 em.
fn char_width(c: char, face: Face) -> u16 {
    let table = match face {
        Face::Regular => &HELVETICA_WIDTHS,
        Face::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// Measure a string's advance width in points at the given font size.
pub fn text_width(text: &str, size_pt: f32, face: Face) -> f32 {
    let units: u32 = text.chars().map(|c| char_width(c, face) as u32).sum();
    units as f32 * size_pt / 1000.0
}

/// Encode text as WinAnsi (CP-1252) bytes for a `Str` content operand.
///
/// Characters with no WinAnsi slot are replaced with `?` rather than
/// corrupting the string.
pub fn to_winansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E => c as u8,
            0xA0..=0xFF => c as u8,
            // Common typographic characters in the WinAnsi high range
            0x2018 => 0x91, // left single quote
            0x2019 => 0x92, // right single quote
            0x201C => 0x93, // left double quote
            0x201D => 0x94, // right double quote
            0x2013 => 0x96, // en dash
            0x2014 => 0x97, // em dash
            0x2022 => 0x95, // bullet
            0x2026 => 0x85, // ellipsis
            _ => b'?',
        })
        .collect()
}
