//! Push-channel event types and parser.
//!
//! ComfyUI broadcasts JSON messages over WebSocket with the shape
//! `{"type": "<kind>", "data": {...}}`. This module deserializes them into
//! a strongly-typed [`PushEvent`] enum. The completion signal for a job is
//! an `executing` event whose `node` is `null` and whose `prompt_id`
//! matches the job.

use serde::Deserialize;

/// All known push-channel event types.
///
/// Deserialized via the internally-tagged `"type"` field with associated
/// `"data"` content.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PushEvent {
    /// Server status broadcast (queue depth, etc.).
    #[serde(rename = "status")]
    Status(StatusData),

    /// A prompt has started executing.
    #[serde(rename = "execution_start")]
    ExecutionStart(ExecutionStartData),

    /// Some nodes were skipped because their outputs are cached.
    #[serde(rename = "execution_cached")]
    ExecutionCached(ExecutionCachedData),

    /// A stage is currently executing; `node == None` plus a matching
    /// `prompt_id` means the whole job has finished.
    #[serde(rename = "executing")]
    Executing(ExecutingData),

    /// Progress update from a long-running stage (e.g. the sampler).
    #[serde(rename = "progress")]
    Progress(ProgressData),

    /// A stage has finished and produced output artifacts.
    #[serde(rename = "executed")]
    Executed(ExecutedData),

    /// Execution failed with an error.
    #[serde(rename = "execution_error")]
    ExecutionError(ErrorData),
}

/// Queue status information.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusData {
    pub status: QueueStatus,
}

/// Current queue state.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueStatus {
    pub exec_info: ExecInfo,
}

/// Execution queue statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecInfo {
    pub queue_remaining: i32,
}

/// Payload for `execution_start` events.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionStartData {
    pub prompt_id: String,
}

/// Payload for `execution_cached` events.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionCachedData {
    pub prompt_id: String,
    /// Stage IDs whose outputs were served from cache.
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// Payload for `executing` events.
///
/// When `node` is `None`, execution of the prompt has completed.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutingData {
    pub node: Option<String>,
    pub prompt_id: String,
}

/// Payload for `progress` events (step-level progress within a stage).
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressData {
    /// Current step number.
    pub value: i32,
    /// Total number of steps.
    pub max: i32,
}

/// Payload for `executed` events (stage output).
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutedData {
    /// The stage that produced this output.
    pub node: String,
    /// Artifacts the stage wrote to server-side storage.
    #[serde(default)]
    pub output: StageOutput,
    pub prompt_id: String,
}

/// Artifacts listed in an `executed` event or a history entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StageOutput {
    #[serde(default)]
    pub images: Vec<ArtifactRef>,
}

/// Identifies one result image retrievable from server-side storage via
/// `GET /view?filename&subfolder&type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtifactRef {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Payload for `execution_error` events.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorData {
    pub prompt_id: String,
    pub node_id: String,
    pub exception_message: String,
    pub exception_type: String,
}

/// Parse a push-channel text frame into a typed event.
///
/// Returns `Err` for malformed JSON or unknown `type` values. Callers
/// should log unknown types and continue.
pub fn parse_event(text: &str) -> Result<PushEvent, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_executing_with_node() {
        let json = r#"{"type":"executing","data":{"node":"42","prompt_id":"xyz"}}"#;
        match parse_event(json).unwrap() {
            PushEvent::Executing(data) => {
                assert_eq!(data.node.as_deref(), Some("42"));
                assert_eq!(data.prompt_id, "xyz");
            }
            other => panic!("Expected Executing, got {other:?}"),
        }
    }

    #[test]
    fn parse_executing_null_node_is_the_completion_signal() {
        let json = r#"{"type":"executing","data":{"node":null,"prompt_id":"xyz"}}"#;
        match parse_event(json).unwrap() {
            PushEvent::Executing(data) => assert!(data.node.is_none()),
            other => panic!("Expected Executing, got {other:?}"),
        }
    }

    #[test]
    fn parse_executed_with_artifacts() {
        let json = r#"{"type":"executed","data":{"node":"38","output":{"images":[{"filename":"out_00001_.png","subfolder":"","type":"output"}]},"prompt_id":"abc"}}"#;
        match parse_event(json).unwrap() {
            PushEvent::Executed(data) => {
                assert_eq!(data.node, "38");
                assert_eq!(data.prompt_id, "abc");
                assert_eq!(
                    data.output.images,
                    vec![ArtifactRef {
                        filename: "out_00001_.png".into(),
                        subfolder: String::new(),
                        kind: "output".into(),
                    }]
                );
            }
            other => panic!("Expected Executed, got {other:?}"),
        }
    }

    #[test]
    fn parse_executed_without_images() {
        let json = r#"{"type":"executed","data":{"node":"9","output":{},"prompt_id":"abc"}}"#;
        match parse_event(json).unwrap() {
            PushEvent::Executed(data) => assert!(data.output.images.is_empty()),
            other => panic!("Expected Executed, got {other:?}"),
        }
    }

    #[test]
    fn parse_status_message() {
        let json = r#"{"type":"status","data":{"status":{"exec_info":{"queue_remaining":3}}}}"#;
        match parse_event(json).unwrap() {
            PushEvent::Status(data) => {
                assert_eq!(data.status.exec_info.queue_remaining, 3);
            }
            other => panic!("Expected Status, got {other:?}"),
        }
    }

    #[test]
    fn parse_progress_message() {
        let json = r#"{"type":"progress","data":{"value":5,"max":30}}"#;
        match parse_event(json).unwrap() {
            PushEvent::Progress(data) => {
                assert_eq!(data.value, 5);
                assert_eq!(data.max, 30);
            }
            other => panic!("Expected Progress, got {other:?}"),
        }
    }

    #[test]
    fn parse_execution_error_message() {
        let json = r#"{"type":"execution_error","data":{"prompt_id":"abc","node_id":"3","exception_message":"out of memory","exception_type":"RuntimeError"}}"#;
        match parse_event(json).unwrap() {
            PushEvent::ExecutionError(data) => {
                assert_eq!(data.prompt_id, "abc");
                assert_eq!(data.node_id, "3");
                assert_eq!(data.exception_message, "out of memory");
            }
            other => panic!("Expected ExecutionError, got {other:?}"),
        }
    }

    #[test]
    fn parse_execution_cached_without_nodes() {
        let json = r#"{"type":"execution_cached","data":{"prompt_id":"abc"}}"#;
        match parse_event(json).unwrap() {
            PushEvent::ExecutionCached(data) => assert!(data.nodes.is_empty()),
            other => panic!("Expected ExecutionCached, got {other:?}"),
        }
    }

    #[test]
    fn parse_unknown_type_returns_error() {
        assert!(parse_event(r#"{"type":"unknown_thing","data":{}}"#).is_err());
    }

    #[test]
    fn parse_invalid_json_returns_error() {
        assert!(parse_event("not json at all").is_err());
    }
}
