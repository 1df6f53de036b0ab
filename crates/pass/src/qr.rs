//! QR code layer.
//!
//! Encodes `SUTD_OH2025_<identifier>` and renders it as a fixed 400x400
//! raster with a quiet-zone margin; symbol encoding is delegated to the
//! `qrcode` crate, only the module grid is rasterized here.

use image::{Rgba, RgbaImage};
use qrcode::{Color, QrCode};

/// Fixed prefix of every QR payload.
pub const QR_PREFIX: &str = "SUTD_OH2025";

/// Side length of the rendered QR raster, in pixels.
pub const QR_SIZE: u32 = 400;

/// Quiet-zone width in modules on each side.
const QUIET_ZONE_MODULES: u32 = 4;

const DARK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LIGHT: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Build the payload encoded for an identifier.
pub fn qr_payload(identifier: &str) -> String {
    format!("{QR_PREFIX}_{identifier}")
}

/// Encode and render the QR layer for an identifier.
///
/// The raster is exactly [`QR_SIZE`] square: the module grid is scaled to
/// the largest integer module size that fits and centered on a white
/// background, which also absorbs any rounding slack into the quiet zone.
pub fn render_qr(identifier: &str) -> Result<RgbaImage, qrcode::types::QrError> {
    let code = QrCode::new(qr_payload(identifier).as_bytes())?;
    let modules = code.width() as u32;
    let total = modules + 2 * QUIET_ZONE_MODULES;

    let module_px = (QR_SIZE / total).max(1);
    let grid_px = modules * module_px;
    let origin = (QR_SIZE.saturating_sub(grid_px)) / 2;

    let mut img = RgbaImage::from_pixel(QR_SIZE, QR_SIZE, LIGHT);
    for y in 0..modules {
        for x in 0..modules {
            if code[(x as usize, y as usize)] != Color::Dark {
                continue;
            }
            let x0 = origin + x * module_px;
            let y0 = origin + y * module_px;
            for py in y0..y0 + module_px {
                for px in x0..x0 + module_px {
                    img.put_pixel(px, py, DARK);
                }
            }
        }
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_prefix_underscore_identifier() {
        assert_eq!(qr_payload("1234"), "SUTD_OH2025_1234");
    }

    #[test]
    fn raster_is_exactly_the_fixed_size() {
        let img = render_qr("1234").unwrap();
        assert_eq!((img.width(), img.height()), (QR_SIZE, QR_SIZE));
    }

    #[test]
    fn quiet_zone_is_light() {
        let img = render_qr("1234").unwrap();
        for p in [(0, 0), (QR_SIZE - 1, 0), (0, QR_SIZE - 1), (5, 5)] {
            assert_eq!(*img.get_pixel(p.0, p.1), LIGHT);
        }
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let code = QrCode::new(qr_payload("1234").as_bytes()).unwrap();
        let modules = code.width() as u32;
        let total = modules + 2 * QUIET_ZONE_MODULES;
        let module_px = (QR_SIZE / total).max(1);
        let origin = (QR_SIZE - modules * module_px) / 2;

        // Module (0,0) is always part of the top-left finder pattern.
        let img = render_qr("1234").unwrap();
        assert_eq!(*img.get_pixel(origin, origin), DARK);
    }

    #[test]
    fn different_identifiers_render_different_symbols() {
        let a = render_qr("1234").unwrap();
        let b = render_qr("5678").unwrap();
        assert_ne!(a.as_raw(), b.as_raw());
    }
}
