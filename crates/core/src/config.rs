//! Environment-backed configuration with compiled-in defaults.
//!
//! Every setting can be overridden through an environment variable; callers
//! load a `.env` file first (via `dotenvy`) if they want file-based config.

use std::path::PathBuf;
use std::time::Duration;

/// Default ComfyUI host:port.
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8188";

/// Default bound on the completion wait, in seconds.
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 120;

/// Default input directory for pillar template images.
pub const DEFAULT_TEMPLATES_DIR: &str = "Templates";

/// Default input directory for pre-rendered sample avatars.
pub const DEFAULT_SAMPLES_DIR: &str = "Samples";

/// Default cache directory for remotely generated avatars.
pub const DEFAULT_AVATARS_DIR: &str = "Avatars";

/// Default output directory for finished event passes.
pub const DEFAULT_OUTPUT_DIR: &str = "FinalPass";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was present but not parseable.
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

/// Resolved process configuration.
///
/// Built once at startup via [`Config::from_env`] and passed down by
/// reference; nothing reads the environment after that point.
#[derive(Debug, Clone)]
pub struct Config {
    /// ComfyUI host:port (no scheme). `SERVER_ADDRESS`.
    pub server_address: String,
    /// Client identifier sent on the push channel. `CLIENT_ID`, or a
    /// freshly generated UUID v4 stable for this `Config` value.
    pub client_id: String,
    /// Bound on the completion wait. `COMPLETION_TIMEOUT_SECS`.
    pub completion_timeout: Duration,
    /// Pillar template images. `TEMPLATES_DIR`.
    pub templates_dir: PathBuf,
    /// Sample avatar pool. `SAMPLES_DIR`.
    pub samples_dir: PathBuf,
    /// Generated avatar cache. `AVATARS_DIR`.
    pub avatars_dir: PathBuf,
    /// Finished passes. `OUTPUT_DIR`.
    pub output_dir: PathBuf,
    /// Regular text font. `FONT_PATH`, or probed from well-known locations.
    pub font_path: Option<PathBuf>,
    /// Bold text font. `FONT_BOLD_PATH`, or probed.
    pub font_bold_path: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let completion_timeout_secs = match std::env::var("COMPLETION_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "COMPLETION_TIMEOUT_SECS",
                value: raw,
            })?,
            Err(_) => DEFAULT_COMPLETION_TIMEOUT_SECS,
        };

        Ok(Self {
            server_address: env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            client_id: std::env::var("CLIENT_ID")
                .unwrap_or_else(|_| uuid::Uuid::new_v4().to_string()),
            completion_timeout: Duration::from_secs(completion_timeout_secs),
            templates_dir: env_or("TEMPLATES_DIR", DEFAULT_TEMPLATES_DIR).into(),
            samples_dir: env_or("SAMPLES_DIR", DEFAULT_SAMPLES_DIR).into(),
            avatars_dir: env_or("AVATARS_DIR", DEFAULT_AVATARS_DIR).into(),
            output_dir: env_or("OUTPUT_DIR", DEFAULT_OUTPUT_DIR).into(),
            font_path: std::env::var("FONT_PATH").ok().map(PathBuf::from),
            font_bold_path: std::env::var("FONT_BOLD_PATH").ok().map(PathBuf::from),
        })
    }

    /// Base HTTP URL for the ComfyUI REST API.
    pub fn api_url(&self) -> String {
        format!("http://{}", self.server_address)
    }

    /// Base WebSocket URL for the ComfyUI push channel.
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.server_address)
    }
}

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}
