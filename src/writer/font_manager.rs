//! Font management for PDF generation.
//!
//! Standard (non-embedded) Type 1 fonts with their AFM advance widths, and
//! the WinAnsi encoding used to address their glyphs from a content stream.

use crate::object::Object;
use std::collections::HashMap;

/// Helvetica advance widths for codes 32..=126, in 1/1000 em.
const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

/// A PDF standard font the writer can reference without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StandardFont {
    /// Helvetica (sans-serif, proportional)
    #[default]
    Helvetica,
    /// Courier (monospace)
    Courier,
}

impl StandardFont {
    /// PostScript name used as `/BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::Courier => "Courier",
        }
    }

    /// Advance width of a WinAnsi code in 1/1000 em.
    pub fn code_width(&self, code: u8) -> u16 {
        match self {
            StandardFont::Courier => 600,
            StandardFont::Helvetica => match code {
                32..=126 => HELVETICA_ASCII_WIDTHS[(code - 32) as usize],
                0..=31 | 0xA0 => 278,
                _ => 556,
            },
        }
    }

    /// Width of already encoded text in user-space units at `font_size`.
    pub fn encoded_width(&self, encoded: &[u8], font_size: f32) -> f32 {
        let units: u32 = encoded.iter().map(|&b| u32::from(self.code_width(b))).sum();
        units as f32 * font_size / 1000.0
    }

    /// Width of `text` in user-space units at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.encoded_width(&encode_win_ansi(text), font_size)
    }

    /// Font dictionary for this font.
    pub fn font_dict(&self) -> Object {
        let mut dict = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("Font".to_string()));
        dict.insert("Subtype".to_string(), Object::Name("Type1".to_string()));
        dict.insert("BaseFont".to_string(), Object::Name(self.base_font().to_string()));
        dict.insert("Encoding".to_string(), Object::Name("WinAnsiEncoding".to_string()));
        Object::Dictionary(dict)
    }
}

/// Encode text as WinAnsi (Windows-1252) bytes.
///
/// ASCII and Latin-1 map to themselves, the typographic characters in the
/// 0x80..0x9F block map to their code points, anything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            cp @ (0x00..=0x7F | 0xA0..=0xFF) => cp as u8,
            _ => win_ansi_special(ch).unwrap_or(b'?'),
        })
        .collect()
}

fn win_ansi_special(ch: char) -> Option<u8> {
    Some(match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    })
}

/// Font manager for PDF generation.
///
/// Hands out page resource names (`F1`, `F2`, ...) for the fonts a page uses.
#[derive(Debug, Clone)]
pub struct FontManager {
    /// Registered fonts in registration order with their resource names
    fonts: Vec<(String, StandardFont)>,
    /// Font ID counter for resource naming
    next_font_id: u32,
}

impl FontManager {
    /// Create an empty font manager.
    pub fn new() -> Self {
        Self {
            fonts: Vec::new(),
            next_font_id: 1,
        }
    }

    /// Resource name for `font`, registering it on first use.
    pub fn register(&mut self, font: StandardFont) -> String {
        if let Some((id, _)) = self.fonts.iter().find(|(_, f)| *f == font) {
            return id.clone();
        }
        let id = format!("F{}", self.next_font_id);
        self.next_font_id += 1;
        self.fonts.push((id.clone(), font));
        id
    }

    /// Registered fonts with their resource names.
    pub fn fonts(&self) -> impl Iterator<Item = (&str, StandardFont)> {
        self.fonts.iter().map(|(id, font)| (id.as_str(), *font))
    }
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}
