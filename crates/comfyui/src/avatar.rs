//! Custom avatar generation end to end.
//!
//! Connect the push channel, submit the avatar workflow, wait for the
//! job-scoped completion event, download the results, and cache the first
//! artifact on disk for the pass composer.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use passforge_core::roster::CUSTOM_AVATAR_TAGLINE;
use passforge_core::{paths, Config};

use crate::api::{ComfyUIApi, ComfyUIApiError};
use crate::client::{ComfyUIClient, ComfyUIClientError};
use crate::outputs::{fetch_results, FetchError};
use crate::waiter::{await_completion, WaitError};
use crate::workflow::avatar_workflow;

/// A chosen avatar, ready for compositing.
#[derive(Debug, Clone)]
pub struct AvatarResult {
    /// Name shown under the avatar on the pass.
    pub display_name: String,
    /// Tagline shown under the name.
    pub tagline: String,
    /// Local path of the avatar image.
    pub file_path: PathBuf,
}

/// Errors from the avatar generation flow.
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error(transparent)]
    Connect(#[from] ComfyUIClientError),

    #[error(transparent)]
    Api(#[from] ComfyUIApiError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The job completed but its history listed no output images.
    #[error("Job {prompt_id} produced no output artifacts")]
    NoArtifacts { prompt_id: String },

    #[error("Failed to write avatar to cache: {0}")]
    Io(#[from] std::io::Error),
}

/// Generate a custom avatar for `(avatar_type, personal_interest)`.
///
/// Submits the fixed workflow template, waits for completion (bounded by
/// the configured timeout), downloads the results, and writes the first
/// artifact to the avatar cache directory. The returned
/// [`AvatarResult::display_name`] is `"<interest> <avatar_type>"`.
pub async fn generate_custom_avatar(
    config: &Config,
    avatar_type: &str,
    personal_interest: &str,
) -> Result<AvatarResult, AvatarError> {
    let api = ComfyUIApi::new(config.api_url());
    let client = ComfyUIClient::new(config.ws_url(), config.client_id.clone());

    // Open the push channel before submitting so no event can be missed.
    let mut conn = client.connect().await?;

    let workflow = avatar_workflow(avatar_type, personal_interest);
    let handle = api.submit_workflow(&workflow, client.client_id()).await?;

    let cancel = CancellationToken::new();
    await_completion(
        &mut conn,
        &handle.prompt_id,
        config.completion_timeout,
        &cancel,
    )
    .await?;

    let results = fetch_results(&api, &handle.prompt_id).await?;
    let first = results
        .values()
        .flat_map(|images| images.iter())
        .next()
        .ok_or_else(|| AvatarError::NoArtifacts {
            prompt_id: handle.prompt_id.clone(),
        })?;

    std::fs::create_dir_all(&config.avatars_dir)?;
    let avatar_path = paths::avatar_cache_path(&config.avatars_dir, avatar_type, personal_interest);
    std::fs::write(&avatar_path, first)?;

    tracing::info!(
        prompt_id = %handle.prompt_id,
        path = %avatar_path.display(),
        "Custom avatar cached",
    );

    Ok(AvatarResult {
        display_name: format!("{personal_interest} {avatar_type}"),
        tagline: CUSTOM_AVATAR_TAGLINE.to_string(),
        file_path: avatar_path,
    })
}
