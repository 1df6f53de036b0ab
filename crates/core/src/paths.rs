//! Deterministic filename construction for the fixed on-disk layout.
//!
//! Layout (all relative to the configured directories):
//!   `Templates/<PILLAR>_TEMPLATE.png`
//!   `Samples/<avatar_type>_Sample<1-3>.png`
//!   `Avatars/<avatar_type>_<interest>_avatar.png`
//!   `FinalPass/<identifier>_event_pass.png`

use std::path::{Path, PathBuf};

use crate::pillar::Pillar;

/// Path of the template image for a pillar.
pub fn template_path(templates_dir: &Path, pillar: Pillar) -> PathBuf {
    templates_dir.join(format!("{}_TEMPLATE.png", pillar.as_str()))
}

/// Path of one pre-rendered sample avatar.
pub fn sample_path(samples_dir: &Path, avatar_type: &str, index: u32) -> PathBuf {
    samples_dir.join(format!("{avatar_type}_Sample{index}.png"))
}

/// Cache path for a remotely generated avatar, keyed by its inputs.
pub fn avatar_cache_path(avatars_dir: &Path, avatar_type: &str, interest: &str) -> PathBuf {
    avatars_dir.join(format!("{avatar_type}_{interest}_avatar.png"))
}

/// Output path of the finished event pass for an identifier.
pub fn pass_output_path(output_dir: &Path, identifier: &str) -> PathBuf {
    output_dir.join(format!("{identifier}_event_pass.png"))
}
