//! Drawing a planned label onto a PDF page.

use image::DynamicImage;

use crate::config::{OverflowPolicy, RenderConfig};
use crate::document::Document;
use crate::image::Image;
use crate::label::LabelContent;
use crate::layout::{self, LabelPlan};
use crate::page::{ImageLayout, Page, PageContents, SpanFont, TextLayout};
use crate::qr;
use crate::rect::aspect_fit;
use crate::LabelError;

/// The largest page dimension PDF readers are required to handle, in default user units
pub const MAX_PAGE_DIMENSION: f32 = 14_400.0;

/// Render a label as a single page PDF.
///
/// The page is exactly `2 * dpi` by `1 * dpi` points. Problems with the code image never
/// fail the render: an image that can't be decoded or generated leaves the code zone
/// blank. The render fails as a whole, without partial output, when the page cannot be
/// sized from `config.dpi` or when the content overflows under [OverflowPolicy::Fail].
pub fn render(content: &LabelContent, config: &RenderConfig) -> Result<Vec<u8>, LabelError> {
    let span = tracing::debug_span!("render", dpi = config.dpi, variant = ?config.variant);
    let _enter = span.enter();

    check_page_size(config)?;

    let plan = layout::plan(content, config);
    if plan.overflows {
        if config.overflow == OverflowPolicy::Fail {
            return Err(LabelError::Overflow {
                needed: *plan.needed_height,
                available: *plan.content.height(),
            });
        }
        tracing::warn!(
            needed = *plan.needed_height,
            available = *plan.content.height(),
            font_scale = plan.font_scale,
            "label content overflows, clipping"
        );
    }

    let code = load_code_image(content, config.dpi);
    let document = compose(&plan, code, config);

    let mut out = Vec::new();
    document.write(&mut out)?;
    tracing::debug!(bytes = out.len(), "rendered label");
    Ok(out)
}

fn check_page_size(config: &RenderConfig) -> Result<(), LabelError> {
    if !config.dpi.is_finite() || config.dpi <= 0.0 {
        return Err(LabelError::InvalidDpi(config.dpi));
    }
    let (width, height) = config.page_size();
    if *width > MAX_PAGE_DIMENSION || *height > MAX_PAGE_DIMENSION {
        return Err(LabelError::PageTooLarge {
            width: *width,
            height: *height,
        });
    }
    Ok(())
}

/// The image to draw in the code zone: the pre-rendered one if it decodes, otherwise one
/// generated from the payload, otherwise nothing
pub fn load_code_image(content: &LabelContent, dpi: f32) -> Option<Image> {
    if let Some(bytes) = &content.code_image {
        match Image::decode(bytes) {
            Ok(image) => return Some(image),
            Err(err) => tracing::warn!(%err, "pre-rendered code image could not be decoded"),
        }
    }

    let payload = content.code_payload.as_deref().filter(|p| !p.is_empty())?;
    match qr::rasterize(payload, qr::scale_for_dpi(dpi)) {
        Ok(raster) => Some(Image::new_raster(DynamicImage::ImageLuma8(raster))),
        Err(err) => {
            tracing::warn!(%err, "code could not be generated from the payload");
            None
        }
    }
}

fn compose(plan: &LabelPlan, code: Option<Image>, config: &RenderConfig) -> Document {
    let mut document = Document::new(Page::new(plan.page, plan.content));
    if let Some(info) = &config.info {
        document.set_info(info.clone());
    }

    if let Some(code) = code {
        let position = aspect_fit((code.width, code.height), plan.code_zone);
        if !position.is_empty() {
            let image_id = document.add_image(code);
            document.page.add_image(ImageLayout { image_id, position });
        }
    }

    let mut text = Vec::with_capacity(plan.placements.len());
    for placement in plan.placements.iter() {
        let block = &placement.block;
        let id = document.add_font(block.font.typeface.clone());
        let lines = block
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line.clone(), block.baseline(i)))
            .collect();
        tracing::trace!(field = ?placement.field, lines = block.lines.len(), "drawing");
        text.push(PageContents::Text(TextLayout {
            frame: placement.rect,
            lines,
            font: SpanFont {
                id,
                size: block.font.size,
            },
            colour: config.text_colour,
        }));
    }

    let clip = config.overflow == OverflowPolicy::Clip || plan.overflows;
    if clip {
        document.page.add_clipped(plan.content, text);
    } else {
        document.page.contents.extend(text);
    }

    document
}
