//! History retrieval and artifact download.
//!
//! After the completion event, the job's outputs are fetched by querying
//! `GET /history/{prompt_id}` and downloading every listed artifact via
//! `GET /view`. On any individual download failure the whole fetch fails
//! and prior downloads for the job are discarded.

use std::collections::BTreeMap;

use crate::api::{ComfyUIApi, ComfyUIApiError};
use crate::messages::ArtifactRef;

/// Downloaded artifacts, keyed by the stage that produced them.
///
/// `BTreeMap` keeps stage iteration deterministic.
pub type StageArtifacts = BTreeMap<String, Vec<Vec<u8>>>;

/// Errors from history retrieval or artifact download.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// A history or artifact request failed (transport, non-2xx).
    #[error(transparent)]
    Api(#[from] ComfyUIApiError),

    /// The history response did not have the expected shape.
    #[error("Malformed history response: {0}")]
    MalformedHistory(String),
}

/// Fetch every output artifact the job produced.
///
/// Queries the history endpoint, extracts the artifact descriptors for
/// each output stage, and downloads each image. Returns the raw bytes
/// grouped per stage, in the order the history listed them.
pub async fn fetch_results(
    api: &ComfyUIApi,
    prompt_id: &str,
) -> Result<StageArtifacts, FetchError> {
    let history = api.get_history(prompt_id).await?;
    let descriptors = extract_artifacts(&history, prompt_id)?;

    let mut results = StageArtifacts::new();
    for (stage_id, artifacts) in descriptors {
        let mut images = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            tracing::debug!(
                prompt_id,
                stage_id = %stage_id,
                filename = %artifact.filename,
                "Downloading artifact",
            );
            let bytes = api
                .get_view(&artifact.filename, &artifact.subfolder, &artifact.kind)
                .await?;
            images.push(bytes);
        }
        results.insert(stage_id, images);
    }
    Ok(results)
}

/// Extract per-stage artifact descriptors from a raw history response.
///
/// The response maps the prompt ID to
/// `{"outputs": {"<stage_id>": {"images": [...]}}}`; stages without an
/// `images` list are skipped.
pub fn extract_artifacts(
    history: &serde_json::Value,
    prompt_id: &str,
) -> Result<BTreeMap<String, Vec<ArtifactRef>>, FetchError> {
    let entry = history
        .get(prompt_id)
        .ok_or_else(|| FetchError::MalformedHistory(format!("no entry for prompt {prompt_id}")))?;
    let outputs = entry
        .get("outputs")
        .and_then(|v| v.as_object())
        .ok_or_else(|| FetchError::MalformedHistory("missing outputs object".into()))?;

    let mut descriptors = BTreeMap::new();
    for (stage_id, stage_output) in outputs {
        let Some(images) = stage_output.get("images") else {
            continue;
        };
        let artifacts: Vec<ArtifactRef> = serde_json::from_value(images.clone())
            .map_err(|e| FetchError::MalformedHistory(format!("stage {stage_id}: {e}")))?;
        descriptors.insert(stage_id.clone(), artifacts);
    }
    Ok(descriptors)
}
