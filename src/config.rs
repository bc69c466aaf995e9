//! Rendering configuration: resolution, layout variant, fonts and overflow handling.
//!
//! A [RenderConfig] is usually built in code with [RenderConfig::simple] or
//! [RenderConfig::rich], but can also be read from TOML:
//!
//! ```toml
//! dpi = 300
//! variant = "rich"
//! caption = false
//! overflow = "clip"
//!
//! [fonts.patient-name]
//! typeface = "courier-bold"
//! cap = 16
//!
//! [info]
//! title = "Amoxicillin label"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::colour::Colour;
use crate::font::{FontCatalogue, FontRole, FontSpec, StandardFont};
use crate::info::Info;
use crate::rect::Rect;
use crate::units::{In, Pt};

/// Output resolution used when nothing else is asked for
pub const DEFAULT_DPI: f32 = 144.0;

/// Physical label width
pub const LABEL_WIDTH: In = In(2.0);
/// Physical label height
pub const LABEL_HEIGHT: In = In(1.0);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error("unknown font role `{0}`")]
    UnknownRole(String),

    #[error("unknown typeface `{0}`")]
    InvalidFont(String),
}

/// Which arrangement of fields the label uses
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutVariant {
    /// A square code beside patient, medication, directions and pharmacy
    #[default]
    Simple,
    /// An optionally captioned code column beside every field the label knows about
    Rich,
}

/// What to do when the text column needs more height than the label has
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Shrink every font in small steps until the text fits, then clip if it still does not
    #[default]
    Shrink,
    /// Draw at full size and clip anything past the content area
    Clip,
    /// Refuse to render
    Fail,
}

/// Everything about how a label is drawn, as opposed to what is on it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Points per physical inch
    pub dpi: f32,
    pub variant: LayoutVariant,
    /// Stack the pharmacy name above the code (rich variant only)
    pub caption: bool,
    pub fonts: FontCatalogue,
    pub overflow: OverflowPolicy,
    pub text_colour: Colour,
    pub info: Option<Info>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig::simple(DEFAULT_DPI)
    }
}

impl RenderConfig {
    pub fn simple(dpi: f32) -> RenderConfig {
        RenderConfig {
            dpi,
            variant: LayoutVariant::Simple,
            caption: false,
            fonts: FontCatalogue::simple(),
            overflow: OverflowPolicy::default(),
            text_colour: Colour::default(),
            info: None,
        }
    }

    pub fn rich(dpi: f32) -> RenderConfig {
        RenderConfig {
            variant: LayoutVariant::Rich,
            caption: true,
            fonts: FontCatalogue::rich(),
            ..RenderConfig::simple(dpi)
        }
    }

    /// Width and height of the page, in points
    pub fn page_size(&self) -> (Pt, Pt) {
        (LABEL_WIDTH.at_dpi(self.dpi), LABEL_HEIGHT.at_dpi(self.dpi))
    }

    /// The whole page in layout space
    pub fn page_rect(&self) -> Rect {
        let (width, height) = self.page_size();
        Rect::from_xywh(Pt(0.0), Pt(0.0), width, height)
    }

    /// Parse a configuration from TOML. Anything left out keeps the value of the stock
    /// configuration for the chosen variant.
    pub fn from_toml_str(source: &str) -> Result<RenderConfig, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;

        let variant = file.variant.unwrap_or_default();
        let dpi = file.dpi.unwrap_or(DEFAULT_DPI);
        let mut config = match variant {
            LayoutVariant::Simple => RenderConfig::simple(dpi),
            LayoutVariant::Rich => RenderConfig::rich(dpi),
        };

        if let Some(caption) = file.caption {
            config.caption = caption;
        }
        if let Some(overflow) = file.overflow {
            config.overflow = overflow;
        }
        config.info = file.info;

        for (key, font) in file.fonts {
            let role: FontRole = toml::Value::String(key.clone())
                .try_into()
                .map_err(|_| ConfigError::UnknownRole(key))?;

            let current = config.fonts.get(role).clone();
            let typeface = match font.typeface {
                Some(name) => toml::Value::String(name.clone())
                    .try_into::<StandardFont>()
                    .map_err(|_| ConfigError::InvalidFont(name))?
                    .into(),
                None => current.typeface,
            };
            config.fonts.set(
                role,
                FontSpec {
                    typeface,
                    cap: font.cap.map(Pt).unwrap_or(current.cap),
                    ratio: font.ratio.unwrap_or(current.ratio),
                },
            );
        }

        tracing::debug!(dpi, ?variant, "loaded render configuration");
        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    dpi: Option<f32>,
    variant: Option<LayoutVariant>,
    caption: Option<bool>,
    overflow: Option<OverflowPolicy>,
    fonts: BTreeMap<String, FontOverride>,
    info: Option<Info>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FontOverride {
    typeface: Option<String>,
    cap: Option<f32>,
    ratio: Option<f32>,
}
