//! Pass compositing.
//!
//! Flattens template, circular avatar, text layers, and QR code onto an
//! opaque white canvas at fixed offsets, then writes the result as
//! `<OUTPUT_DIR>/<identifier>_event_pass.png`.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{ImageFormat, Rgba, RgbaImage};

use passforge_comfyui::AvatarResult;
use passforge_core::{paths, Config, Pillar};

use crate::font::{load_fonts, FontError};
use crate::qr::{render_qr, QR_SIZE};
use crate::text::render_centered;

/// Avatar side length after resizing, in pixels.
const AVATAR_SIZE: u32 = 420;

/// Vertical offsets of the layers, in pixels from the template top.
const AVATAR_Y: u32 = 666;
const NAME_Y: u32 = 1145;
const AVATAR_NAME_Y: u32 = 1310;
const TAGLINE_Y: u32 = 1380;
const QR_Y: u32 = 1517;

/// Text layer boxes and sizes (full template width each).
const NAME_PX: f32 = 45.0;
const NAME_BOX_H: u32 = 75;
const AVATAR_NAME_PX: f32 = 35.0;
const AVATAR_NAME_BOX_H: u32 = 60;
const TAGLINE_PX: f32 = 30.0;
const TAGLINE_BOX_H: u32 = 60;

/// Errors from pass composition, distinguishing which input failed.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// No template image exists for the pillar.
    #[error("Template not found: {path}")]
    TemplateNotFound { path: PathBuf },

    /// The template file exists but could not be decoded.
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The avatar image is missing or could not be decoded.
    #[error("Failed to read avatar {path}: {source}")]
    AvatarRead {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Font(#[from] FontError),

    #[error("Failed to encode QR code: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    #[error("Failed to write event pass: {0}")]
    Io(#[from] std::io::Error),
}

/// Compose one event pass and write it to the output directory.
///
/// Layers, in z-order: template, circular avatar, display name, avatar
/// name, quoted tagline, QR code. Horizontal placement of the avatar and
/// QR code is centered on the template width; vertical offsets are fixed.
/// Returns the path of the written file.
pub fn compose(
    config: &Config,
    pillar: Pillar,
    identifier: &str,
    display_name: &str,
    avatar: &AvatarResult,
) -> Result<PathBuf, ComposeError> {
    let template_path = paths::template_path(&config.templates_dir, pillar);
    if !template_path.is_file() {
        return Err(ComposeError::TemplateNotFound {
            path: template_path,
        });
    }

    let template = image::open(&template_path)
        .map_err(|source| ComposeError::TemplateRead {
            path: template_path.clone(),
            source,
        })?
        .to_rgba8();

    let avatar_img = image::open(&avatar.file_path)
        .map_err(|source| ComposeError::AvatarRead {
            path: avatar.file_path.clone(),
            source,
        })?
        .to_rgba8();

    let fonts = load_fonts(config)?;

    let (width, height) = template.dimensions();
    let mut pass = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

    overlay(&mut pass, &template, 0, 0);

    let circular = circular_avatar(&avatar_img);
    overlay(&mut pass, &circular, (width.saturating_sub(AVATAR_SIZE)) / 2, AVATAR_Y);

    let name_layer = render_centered(&fonts.bold, NAME_PX, display_name, width, NAME_BOX_H);
    overlay(&mut pass, &name_layer, 0, NAME_Y);

    let avatar_name_layer = render_centered(
        &fonts.bold,
        AVATAR_NAME_PX,
        &avatar.display_name,
        width,
        AVATAR_NAME_BOX_H,
    );
    overlay(&mut pass, &avatar_name_layer, 0, AVATAR_NAME_Y);

    let tagline_layer = render_centered(
        &fonts.regular,
        TAGLINE_PX,
        &format!("\"{}\"", avatar.tagline),
        width,
        TAGLINE_BOX_H,
    );
    overlay(&mut pass, &tagline_layer, 0, TAGLINE_Y);

    let qr = render_qr(identifier)?;
    overlay(&mut pass, &qr, (width.saturating_sub(QR_SIZE)) / 2, QR_Y);

    std::fs::create_dir_all(&config.output_dir)?;
    let output_path = paths::pass_output_path(&config.output_dir, identifier);
    write_png_atomically(&pass, &output_path)?;

    tracing::info!(
        pillar = %pillar,
        identifier,
        path = %output_path.display(),
        "Event pass written",
    );
    Ok(output_path)
}

/// Resize the avatar to [`AVATAR_SIZE`] and clip it to the inscribed
/// circle by zeroing alpha outside it.
fn circular_avatar(avatar: &RgbaImage) -> RgbaImage {
    let mut resized =
        image::imageops::resize(avatar, AVATAR_SIZE, AVATAR_SIZE, FilterType::Lanczos3);

    let radius = AVATAR_SIZE as f32 / 2.0;
    // Half-pixel center keeps the mask symmetric.
    let center = radius - 0.5;
    for (x, y, pixel) in resized.enumerate_pixels_mut() {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        if dx * dx + dy * dy > radius * radius {
            pixel.0[3] = 0;
        }
    }
    resized
}

/// Alpha-blend `layer` onto `base` with its top-left corner at `(x, y)`.
/// Pixels falling outside the base are dropped.
fn overlay(base: &mut RgbaImage, layer: &RgbaImage, x: u32, y: u32) {
    for (lx, ly, pixel) in layer.enumerate_pixels() {
        let alpha = pixel.0[3] as f32 / 255.0;
        if alpha <= 0.0 {
            continue;
        }
        let bx = x + lx;
        let by = y + ly;
        if bx >= base.width() || by >= base.height() {
            continue;
        }
        let dst = base.get_pixel_mut(bx, by);
        let inv = 1.0 - alpha;
        for c in 0..3 {
            dst.0[c] = (pixel.0[c] as f32 * alpha + dst.0[c] as f32 * inv) as u8;
        }
        dst.0[3] = 255;
    }
}

/// Write through a sibling temp file so a torn write never leaves a
/// half-written pass at the final path.
fn write_png_atomically(img: &RgbaImage, path: &Path) -> Result<(), std::io::Error> {
    let tmp = path.with_extension("png.tmp");
    img.save_with_format(&tmp, ImageFormat::Png)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::rename(&tmp, path)
}
