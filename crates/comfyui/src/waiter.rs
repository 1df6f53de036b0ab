//! Completion wait over the push channel.
//!
//! [`await_completion`] consumes push events from a live connection until
//! the terminating event for one job arrives. The wait is a single
//! event-driven read loop resolved exactly once -- no shared "still
//! waiting" flag, no fixed-interval polling -- raced against a deadline
//! and a [`CancellationToken`]. Whichever way the wait ends, the channel
//! is closed before returning.

use std::time::Duration;

use futures::StreamExt;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_util::sync::CancellationToken;

use crate::client::ComfyUIConnection;
use crate::messages::{parse_event, PushEvent};

/// What the wait observed before the job completed.
///
/// Informational only: artifact retrieval goes through the history
/// endpoint, not through these filenames.
#[derive(Debug, Default)]
pub struct CompletionSummary {
    /// Filenames reported by `executed` events for this job, in arrival
    /// order.
    pub executed_files: Vec<String>,
}

/// Errors from the completion wait.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// The deadline elapsed before the completion event arrived.
    #[error("Job did not complete within {}s", waited.as_secs())]
    CompletionTimeout {
        /// How long the wait was allowed to run.
        waited: Duration,
    },

    /// The caller's cancellation token fired.
    #[error("Completion wait cancelled")]
    Cancelled,

    /// The push channel closed before the completion event arrived.
    #[error("Push channel closed before job completion")]
    ChannelClosed,

    /// The service reported an execution error for this job.
    #[error("Job failed at stage {node_id}: {message}")]
    Execution {
        /// Stage that raised the error.
        node_id: String,
        /// Server-side exception message.
        message: String,
    },

    /// A protocol-level receive error on the WebSocket.
    #[error("WebSocket receive error: {0}")]
    Receive(#[from] WsError),
}

/// Wait until the job identified by `prompt_id` has finished all stages.
///
/// Consumes events from the connection: matching `executed` events have
/// their artifact filenames recorded; the matching
/// `executing { node: None }` event resolves the wait. Events for other
/// jobs and unknown frame types are logged and skipped. Fails with
/// [`WaitError::CompletionTimeout`] once `timeout` elapses, with
/// [`WaitError::Cancelled`] if `cancel` fires first, and with
/// [`WaitError::Execution`] if the service reports a failure for this job.
pub async fn await_completion(
    conn: &mut ComfyUIConnection,
    prompt_id: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<CompletionSummary, WaitError> {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let mut summary = CompletionSummary::default();

    let outcome = loop {
        tokio::select! {
            _ = &mut deadline => {
                break Err(WaitError::CompletionTimeout { waited: timeout });
            }
            _ = cancel.cancelled() => {
                break Err(WaitError::Cancelled);
            }
            frame = conn.ws_stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(done) = handle_text_frame(&text, prompt_id, &mut summary) {
                            break done;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        // Preview image frames; not needed for completion tracking.
                        tracing::trace!(prompt_id, "Ignoring binary push frame");
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        // Handled automatically by tungstenite.
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::warn!(prompt_id, ?frame, "Push channel closed by server");
                        break Err(WaitError::ChannelClosed);
                    }
                    Some(Ok(Message::Frame(_))) => {}
                    Some(Err(e)) => {
                        tracing::error!(prompt_id, error = %e, "WebSocket receive error");
                        break Err(WaitError::Receive(e));
                    }
                    None => break Err(WaitError::ChannelClosed),
                }
            }
        }
    };

    // Close exactly once per handle, whichever way the wait ended.
    if let Err(e) = conn.ws_stream.close(None).await {
        tracing::debug!(prompt_id, error = %e, "Push channel close after wait");
    }

    outcome.map(|()| summary)
}

/// Interpret one text frame. Returns `Some(outcome)` when the frame
/// terminates the wait, `None` to keep reading.
fn handle_text_frame(
    text: &str,
    prompt_id: &str,
    summary: &mut CompletionSummary,
) -> Option<Result<(), WaitError>> {
    let event = match parse_event(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(prompt_id, error = %e, raw_message = %text, "Unparseable push frame");
            return None;
        }
    };

    match event {
        PushEvent::Executed(data) if data.prompt_id == prompt_id => {
            for artifact in &data.output.images {
                tracing::info!(prompt_id, node = %data.node, filename = %artifact.filename, "Stage produced artifact");
                summary.executed_files.push(artifact.filename.clone());
            }
            None
        }
        PushEvent::Executing(data) if data.prompt_id == prompt_id => {
            match data.node {
                Some(node) => {
                    tracing::debug!(prompt_id, node = %node, "Executing stage");
                    None
                }
                // node == None: every stage of this job has finished.
                None => {
                    tracing::info!(prompt_id, "Job completed (all stages done)");
                    Some(Ok(()))
                }
            }
        }
        PushEvent::ExecutionError(data) if data.prompt_id == prompt_id => {
            tracing::error!(
                prompt_id,
                node_id = %data.node_id,
                error_type = %data.exception_type,
                error_message = %data.exception_message,
                "Job execution error",
            );
            Some(Err(WaitError::Execution {
                node_id: data.node_id,
                message: data.exception_message,
            }))
        }
        PushEvent::Progress(data) => {
            tracing::debug!(prompt_id, value = data.value, max = data.max, "Generation progress");
            None
        }
        PushEvent::Status(data) => {
            tracing::debug!(
                queue_remaining = data.status.exec_info.queue_remaining,
                "Queue status",
            );
            None
        }
        // Events scoped to other jobs, cache notices, start notices.
        _ => None,
    }
}
