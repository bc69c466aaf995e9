//! The PDF standard typefaces. Every conforming reader ships these, so they are referenced
//! by name instead of being embedded, and their advance widths come from Adobe's AFM files.

use pdf_writer::{Name, Pdf};
use serde::{Deserialize, Serialize};

use super::TextMetrics;
use crate::refs::{ObjectReferences, RefType};

/// One of the standard Type 1 typefaces a label can be set in without embedding a font
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
}

// advance widths for ' ' (0x20) through '~' (0x7e), in 1/1000 em
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const COURIER_WIDTH: u16 = 600;

impl StandardFont {
    /// The PostScript name readers know this typeface by
    pub fn base_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
        }
    }

    pub fn is_monospaced(&self) -> bool {
        matches!(
            self,
            StandardFont::Courier | StandardFont::CourierBold | StandardFont::CourierOblique
        )
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique
        )
    }

    /// Encode text with WinAnsiEncoding. Characters the encoding cannot represent become `?`
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars().map(win_ansi_code).collect()
    }

    /// Write a Type 1 font dictionary that refers to the typeface by name
    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Font(font_index));
        writer
            .type1_font(id)
            .base_font(Name(self.base_name().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }
}

impl TextMetrics for StandardFont {
    fn units_per_em(&self) -> f32 {
        1000.0
    }

    fn ascender(&self) -> f32 {
        if self.is_monospaced() {
            629.0
        } else {
            718.0
        }
    }

    fn descender(&self) -> f32 {
        if self.is_monospaced() {
            -157.0
        } else {
            -207.0
        }
    }

    fn line_gap(&self) -> f32 {
        // both families end up with a line height of exactly one em
        if self.is_monospaced() {
            214.0
        } else {
            75.0
        }
    }

    fn advance(&self, ch: char) -> f32 {
        if self.is_monospaced() {
            return COURIER_WIDTH as f32;
        }
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        // everything outside ASCII is measured as the glyph it will be encoded to
        let code = win_ansi_code(ch);
        let code = if (0x20..=0x7e).contains(&code) {
            code
        } else if code >= 0xa0 {
            // accented latin letters are as wide as their base letter, near enough
            b'n'
        } else {
            b'?'
        };
        table[(code - 0x20) as usize] as f32
    }
}

fn win_ansi_code(ch: char) -> u8 {
    match ch {
        ' '..='~' => ch as u8,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pt;

    #[test]
    fn helvetica_widths() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.advance(' '), 278.0);
        assert_eq!(f.advance('A'), 667.0);
        assert_eq!(f.advance('i'), 222.0);
        assert_eq!(f.advance('~'), 584.0);
        assert_eq!(StandardFont::HelveticaBold.advance('i'), 278.0);
        assert_eq!(StandardFont::HelveticaOblique.advance('W'), 944.0);
    }

    #[test]
    fn courier_is_fixed_pitch() {
        let f = StandardFont::Courier;
        assert_eq!(f.advance('i'), f.advance('W'));
        assert_eq!(f.advance('é'), 600.0);
    }

    #[test]
    fn line_height_is_one_em() {
        assert_eq!(StandardFont::Helvetica.line_height(Pt(10.0)), Pt(10.0));
        assert_eq!(StandardFont::Courier.line_height(Pt(14.0)), Pt(14.0));
    }

    #[test]
    fn encodes_win_ansi() {
        let f = StandardFont::Helvetica;
        assert_eq!(f.encode("Ab"), b"Ab".to_vec());
        assert_eq!(f.encode("é–"), vec![0xe9, 0x96]);
        assert_eq!(f.encode("日"), b"?".to_vec());
    }
}
