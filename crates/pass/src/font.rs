//! Font resolution and loading.
//!
//! The text layers use a sans-serif family in regular and bold weights.
//! Paths come from the configuration (`FONT_PATH` / `FONT_BOLD_PATH`); when
//! unset, a fixed list of well-known system locations is probed.

use std::path::{Path, PathBuf};

use rusttype::Font;

use passforge_core::Config;

/// Probed locations for the regular weight.
const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Probed locations for the bold weight.
const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
];

/// Errors raised while resolving or loading fonts.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// No configured path and no candidate location exists.
    #[error("No usable {weight} font found; set {var} to a TTF file")]
    NotFound {
        weight: &'static str,
        var: &'static str,
    },

    #[error("Failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but is not a parseable TTF.
    #[error("Failed to parse font {path}")]
    Parse { path: PathBuf },
}

/// The two loaded weights used by the composer.
pub struct Fonts {
    pub regular: Font<'static>,
    pub bold: Font<'static>,
}

/// Load both font weights per the configuration.
pub fn load_fonts(config: &Config) -> Result<Fonts, FontError> {
    let regular_path = resolve(
        config.font_path.as_deref(),
        REGULAR_CANDIDATES,
        "regular",
        "FONT_PATH",
    )?;
    let bold_path = resolve(
        config.font_bold_path.as_deref(),
        BOLD_CANDIDATES,
        "bold",
        "FONT_BOLD_PATH",
    )?;
    Ok(Fonts {
        regular: load_font(&regular_path)?,
        bold: load_font(&bold_path)?,
    })
}

/// Pick the explicit path when set, otherwise the first existing candidate.
fn resolve(
    explicit: Option<&Path>,
    candidates: &[&str],
    weight: &'static str,
    var: &'static str,
) -> Result<PathBuf, FontError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or(FontError::NotFound { weight, var })
}

fn load_font(path: &Path) -> Result<Font<'static>, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(bytes).ok_or_else(|| FontError::Parse {
        path: path.to_path_buf(),
    })
}
