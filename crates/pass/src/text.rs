//! Text layer rendering.
//!
//! Each label is rasterized into a transparent RGBA buffer of a fixed box
//! size with the text centered both ways, then overlaid onto the pass.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

/// Offset that centers `content` within `total`, clamped at zero.
pub fn centered_origin(total: f32, content: f32) -> f32 {
    ((total - content) / 2.0).max(0.0)
}

/// Pixel width of `text` at the given size.
pub fn text_width(font: &Font<'_>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent))
        .filter_map(|g| g.pixel_bounding_box())
        .map(|bb| bb.max.x as f32)
        .fold(0.0, f32::max)
}

/// Render `text` centered in a transparent `width` x `height` box.
///
/// Glyph coverage becomes the alpha channel over black ink, so the layer
/// blends cleanly onto any background.
pub fn render_centered(font: &Font<'_>, px: f32, text: &str, width: u32, height: u32) -> RgbaImage {
    let mut layer = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    if text.is_empty() {
        return layer;
    }

    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let glyph_height = v_metrics.ascent - v_metrics.descent;

    let origin_x = centered_origin(width as f32, text_width(font, px, text));
    let baseline_y = centered_origin(height as f32, glyph_height) + v_metrics.ascent;

    for glyph in font.layout(text, scale, point(origin_x, baseline_y)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = gx as i32 + bb.min.x;
            let y = gy as i32 + bb.min.y;
            if x < 0 || y < 0 {
                return;
            }
            let (x, y) = (x as u32, y as u32);
            if x >= layer.width() || y >= layer.height() {
                return;
            }
            let alpha = (coverage * 255.0) as u8;
            if alpha > 0 {
                layer.put_pixel(x, y, Rgba([0, 0, 0, alpha]));
            }
        });
    }

    layer
}
