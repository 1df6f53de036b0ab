//! REST API client for the ComfyUI HTTP endpoints.
//!
//! Wraps the three endpoints this project uses -- workflow submission,
//! history retrieval, and artifact download -- using [`reqwest`]. The two
//! GETs are idempotent and retried with bounded backoff; submission is
//! attempted exactly once so a flaky network can never queue a duplicate
//! generation job.

use serde::Deserialize;

use crate::backoff::RetryPolicy;

/// HTTP client for a single ComfyUI instance.
pub struct ComfyUIApi {
    client: reqwest::Client,
    api_url: String,
    retry: RetryPolicy,
}

/// Handle for one accepted generation job.
///
/// Immutable once created; scoped to a single generation request.
#[derive(Debug, Clone)]
pub struct JobHandle {
    /// Server-assigned identifier for the queued prompt.
    pub prompt_id: String,
    /// Client identifier the job was submitted under.
    pub client_id: String,
}

/// Raw response returned by the ComfyUI `/prompt` endpoint.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    /// Absent when the server accepted the request but returned an
    /// unexpected body shape.
    prompt_id: Option<String>,
}

/// Errors from the ComfyUI REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ComfyUIApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ComfyUI returned a non-2xx status code.
    #[error("ComfyUI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The `/prompt` response was 2xx but carried no job identifier.
    #[error("ComfyUI accepted the workflow but returned no prompt_id")]
    MissingPromptId,
}

impl ComfyUIApi {
    /// Create a new API client for a ComfyUI instance.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8188`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy used for the idempotent GET endpoints.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Submit a workflow for execution.
    ///
    /// Sends a `POST /prompt` request with the given workflow JSON and
    /// client ID. Returns a [`JobHandle`] for the queued job. Never
    /// retried: re-POSTing could queue the same generation twice.
    pub async fn submit_workflow(
        &self,
        workflow: &serde_json::Value,
        client_id: &str,
    ) -> Result<JobHandle, ComfyUIApiError> {
        let body = serde_json::json!({
            "prompt": workflow,
            "client_id": client_id,
        });

        let response = self
            .client
            .post(format!("{}/prompt", self.api_url))
            .json(&body)
            .send()
            .await?;

        let submit: SubmitResponse = Self::parse_response(response).await?;
        let prompt_id = submit.prompt_id.ok_or(ComfyUIApiError::MissingPromptId)?;

        tracing::info!(prompt_id = %prompt_id, client_id = %client_id, "Workflow queued");

        Ok(JobHandle {
            prompt_id,
            client_id: client_id.to_string(),
        })
    }

    /// Retrieve execution history for a specific prompt.
    ///
    /// Sends a `GET /history/{prompt_id}` request. The returned JSON maps
    /// the prompt ID to its per-node outputs.
    pub async fn get_history(&self, prompt_id: &str) -> Result<serde_json::Value, ComfyUIApiError> {
        let url = format!("{}/history/{}", self.api_url, prompt_id);
        let response = self.get_with_retry(&url, &[]).await?;
        Self::parse_response(response).await
    }

    /// Download one output artifact from the server's storage.
    ///
    /// Sends a `GET /view?filename&subfolder&type` request and returns the
    /// raw image bytes.
    pub async fn get_view(
        &self,
        filename: &str,
        subfolder: &str,
        kind: &str,
    ) -> Result<Vec<u8>, ComfyUIApiError> {
        let url = format!("{}/view", self.api_url);
        let query = [
            ("filename", filename),
            ("subfolder", subfolder),
            ("type", kind),
        ];
        let response = self.get_with_retry(&url, &query).await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Issue a GET request, retrying transport failures and 5xx responses
    /// under the configured [`RetryPolicy`]. 4xx responses are returned
    /// immediately -- repeating them cannot succeed.
    async fn get_with_retry(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ComfyUIApiError> {
        let mut delays = self.retry.delays();
        let mut attempt = 1u32;

        loop {
            let result = self.client.get(url).query(query).send().await;

            let retry_after = match &result {
                Ok(response) if response.status().is_server_error() => delays.next(),
                Err(_) => delays.next(),
                Ok(_) => return Ok(result?),
            };

            match retry_after {
                Some(delay) => {
                    tracing::warn!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying ComfyUI GET",
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => return Ok(result?),
            }
        }
    }

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`ComfyUIApiError::Api`] containing the
    /// status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ComfyUIApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = status.as_u16(), body = %body, "ComfyUI API error");
            return Err(ComfyUIApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ComfyUIApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
