//! QR code generation for the label's code zone.
//!
//! Codes always use medium (M) error correction: a small printed label gets scuffed, and
//! higher levels would make the modules too small to scan at 1 inch.

use image::{GrayImage, ImageOutputFormat, Luma};
use qrcode::{types::QrError, Color, EcLevel, QrCode};
use std::io::Cursor;
use thiserror::Error;
use url::Url;

/// Magnification used when a caller has no better idea
pub const DEFAULT_SCALE: u32 = 6;

/// Largest magnification [scale_for_dpi] picks. Code images are drawn without
/// interpolation, so the modules stay sharp when a viewer scales them further.
pub const MAX_SCALE: u32 = 25;

/// Light modules around the symbol, so the raster scans without any surrounding page
pub const QUIET_ZONE: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

#[derive(Error, Debug)]
pub enum CodeError {
    #[error("payload could not be encoded as a QR code: {0}")]
    Encode(#[from] QrError),

    #[error("scale must be at least 1")]
    InvalidScale,

    #[error("a {modules} module code at scale {scale} does not fit in a raster image")]
    RasterTooLarge { modules: u32, scale: u32 },

    #[error(transparent)]
    Png(#[from] image::ImageError),

    #[error("there is no payload to encode")]
    MissingPayload,
}

/// Magnification that keeps a module legible at the given output resolution, capped at
/// [MAX_SCALE] so high resolutions don't produce enormous rasters
pub fn scale_for_dpi(dpi: f32) -> u32 {
    (dpi / 24.0).clamp(4.0, MAX_SCALE as f32).round() as u32
}

/// Encode `payload` as a QR code and rasterize it as a greyscale PNG, each module drawn as
/// a `scale` x `scale` square
pub fn generate(payload: &str, scale: u32) -> Result<Vec<u8>, CodeError> {
    let raster = rasterize(payload, scale)?;

    let mut png = Vec::new();
    raster.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    tracing::trace!(
        payload_len = payload.len(),
        width = raster.width(),
        bytes = png.len(),
        "generated QR code"
    );
    Ok(png)
}

/// [generate] for a URL, encoding its absolute string form
pub fn generate_from_url(url: &Url, scale: u32) -> Result<Vec<u8>, CodeError> {
    generate(url.as_str(), scale)
}

/// Encode `payload` and draw it, quiet zone included, without serializing
pub fn rasterize(payload: &str, scale: u32) -> Result<GrayImage, CodeError> {
    if scale == 0 {
        return Err(CodeError::InvalidScale);
    }

    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    let side = (modules + 2 * QUIET_ZONE)
        .checked_mul(scale)
        .filter(|&side| side.checked_mul(side).is_some())
        .ok_or(CodeError::RasterTooLarge { modules, scale })?;

    let mut img = GrayImage::from_pixel(side, side, LIGHT);
    for (y, row) in colors.chunks(modules as usize).enumerate() {
        for (x, &module) in row.iter().enumerate() {
            if module != Color::Dark {
                continue;
            }
            let px = (x as u32 + QUIET_ZONE) * scale;
            let py = (y as u32 + QUIET_ZONE) * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(px + dx, py + dy, DARK);
                }
            }
        }
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(png: &[u8]) -> String {
        let img = image::load_from_memory(png).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn generated_code_decodes_to_payload() {
        let payload = "https://example.com/medications/MED1";
        let png = generate(payload, DEFAULT_SCALE).unwrap();
        assert_eq!(decode(&png), payload);
    }

    #[test]
    fn url_overload_encodes_absolute_form() {
        let url = Url::parse("https://example.com/medications/ABC-123").unwrap();
        let png = generate_from_url(&url, 4).unwrap();
        assert_eq!(decode(&png), "https://example.com/medications/ABC-123");
    }

    #[test]
    fn modules_are_scaled_squares() {
        let small = rasterize("MED1", 1).unwrap();
        let big = rasterize("MED1", 6).unwrap();
        assert_eq!(big.width(), small.width() * 6);
        // the top-left finder pattern starts right after the quiet zone
        assert_eq!(*small.get_pixel(QUIET_ZONE, QUIET_ZONE), DARK);
        assert_eq!(*small.get_pixel(QUIET_ZONE - 1, QUIET_ZONE), LIGHT);
        for d in 0..6 {
            assert_eq!(*big.get_pixel(QUIET_ZONE * 6 + d, QUIET_ZONE * 6 + 5 - d), DARK);
        }
    }

    #[test]
    fn rejects_zero_scale() {
        assert!(matches!(generate("x", 0), Err(CodeError::InvalidScale)));
    }

    #[test]
    fn rejects_oversized_payloads() {
        let payload = "x".repeat(4000);
        assert!(matches!(
            generate(&payload, DEFAULT_SCALE),
            Err(CodeError::Encode(_))
        ));
    }

    #[test]
    fn scale_tracks_dpi() {
        assert_eq!(scale_for_dpi(72.0), 4);
        assert_eq!(scale_for_dpi(144.0), 6);
        assert_eq!(scale_for_dpi(300.0), 13);
        assert_eq!(scale_for_dpi(600.0), MAX_SCALE);
        assert_eq!(scale_for_dpi(7000.0), MAX_SCALE);
    }
}
