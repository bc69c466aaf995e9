use thiserror::Error;

use crate::config::ConfigError;

/// Errors that make a label render fail as a whole. Nothing is written when one of these
/// is returned; problems with the code image never surface here, they leave the code
/// zone blank instead.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("dpi must be a finite number greater than zero, got {0}")]
    /// The drawing surface cannot be sized from the requested resolution
    InvalidDpi(f32),

    #[error("a {width}x{height} point page exceeds the PDF page size limit")]
    /// The page would be larger than PDF viewers are required to support
    PageTooLarge { width: f32, height: f32 },

    #[error("label content needs {needed}pt of height but only {available}pt is available")]
    /// The content does not fit and the overflow policy asks for a failure
    Overflow { needed: f32, available: f32 },

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse an embedded font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("embedded font has no usable glyph for {0:?}")]
    /// An embedded font lacks both the requested glyph and every fallback glyph
    MissingGlyph(char),

    #[error(transparent)]
    /// An I/O error occurred while writing the document out
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// The render configuration could not be loaded
    Config(#[from] ConfigError),
}
