//! Typefaces and the font catalogue the label layout draws from.
//!
//! Text can be set either in one of the PDF standard typefaces ([StandardFont]), which
//! every reader provides and which are never embedded, or in a caller supplied TrueType /
//! OpenType [Font] that is embedded into the label. Both expose their metrics through
//! [TextMetrics], which is all text measurement needs.

mod catalogue;
mod embedded;
mod standard;

pub use catalogue::*;
pub use embedded::*;
pub use standard::*;

use crate::refs::ObjectReferences;
use crate::units::Pt;
use crate::LabelError;
use pdf_writer::Pdf;
use std::sync::Arc;

/// Font-level metrics, in font units, plus per-character advances
pub trait TextMetrics {
    fn units_per_em(&self) -> f32;

    /// Distance from the baseline to the top of the font, positive
    fn ascender(&self) -> f32;

    /// Distance from the baseline to the bottom of the font, usually negative
    fn descender(&self) -> f32;

    /// Extra space between lines
    fn line_gap(&self) -> f32;

    /// Horizontal advance of the glyph drawn for `ch`
    fn advance(&self, ch: char) -> f32;

    /// Calculate the ascent for the given font size
    fn ascent(&self, size: Pt) -> Pt {
        size * (self.ascender() / self.units_per_em())
    }

    /// Calculate the descent for the given font size. Note: this is usually negative
    fn descent(&self, size: Pt) -> Pt {
        size * (self.descender() / self.units_per_em())
    }

    /// How far apart two consecutive baselines are at the given size
    fn line_height(&self, size: Pt) -> Pt {
        size * ((self.ascender() - self.descender() + self.line_gap()) / self.units_per_em())
    }
}

/// The face a piece of text is set in
#[derive(Debug, Clone)]
pub enum Typeface {
    Standard(StandardFont),
    Embedded(Arc<Font>),
}

impl PartialEq for Typeface {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Typeface::Standard(a), Typeface::Standard(b)) => a == b,
            (Typeface::Embedded(a), Typeface::Embedded(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<StandardFont> for Typeface {
    fn from(font: StandardFont) -> Self {
        Typeface::Standard(font)
    }
}

impl From<Font> for Typeface {
    fn from(font: Font) -> Self {
        Typeface::Embedded(Arc::new(font))
    }
}

impl Typeface {
    fn metrics(&self) -> &dyn TextMetrics {
        match self {
            Typeface::Standard(font) => font,
            Typeface::Embedded(font) => font.as_ref(),
        }
    }

    /// Encode text the way this face's font dictionary expects it in a content stream
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, LabelError> {
        match self {
            Typeface::Standard(font) => Ok(font.encode(text)),
            Typeface::Embedded(font) => font.encode(text),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, font_index: usize, writer: &mut Pdf) {
        match self {
            Typeface::Standard(font) => font.write(refs, font_index, writer),
            Typeface::Embedded(font) => font.write(refs, font_index, writer),
        }
    }
}

impl TextMetrics for Typeface {
    fn units_per_em(&self) -> f32 {
        self.metrics().units_per_em()
    }

    fn ascender(&self) -> f32 {
        self.metrics().ascender()
    }

    fn descender(&self) -> f32 {
        self.metrics().descender()
    }

    fn line_gap(&self) -> f32 {
        self.metrics().line_gap()
    }

    fn advance(&self, ch: char) -> f32 {
        self.metrics().advance(ch)
    }
}

/// A typeface at a concrete point size, ready for measuring and drawing
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    pub typeface: Typeface,
    pub size: Pt,
}

impl ResolvedFont {
    pub fn new<T: Into<Typeface>>(typeface: T, size: Pt) -> ResolvedFont {
        ResolvedFont {
            typeface: typeface.into(),
            size,
        }
    }

    pub fn ascent(&self) -> Pt {
        self.typeface.ascent(self.size)
    }

    pub fn line_height(&self) -> Pt {
        self.typeface.line_height(self.size)
    }

    /// Width of a single run of text, ignoring newlines
    pub fn width_of(&self, text: &str) -> Pt {
        let scaling = self.size / self.typeface.units_per_em();
        text.chars()
            .filter(|&ch| ch != '\n')
            .map(|ch| scaling * self.typeface.advance(ch))
            .sum()
    }
}
