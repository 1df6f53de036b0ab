//! Integration tests for the completion wait against a mocked push
//! channel (a tokio-tungstenite server on an ephemeral port).

use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use passforge_comfyui::client::ComfyUIClient;
use passforge_comfyui::waiter::{await_completion, WaitError};

/// Spawn a one-shot WebSocket server that runs `script` against the first
/// accepted connection. Returns the server address.
async fn spawn_push_server<F, Fut>(script: F) -> std::net::SocketAddr
where
    F: FnOnce(
            tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
        ) -> Fut
        + Send
        + 'static,
    Fut: std::future::Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        script(ws).await;
    });
    addr
}

async fn connect(addr: std::net::SocketAddr) -> passforge_comfyui::ComfyUIConnection {
    ComfyUIClient::new(format!("ws://{addr}"), "test-client".into())
        .connect()
        .await
        .unwrap()
}

fn text(json: &str) -> Message {
    Message::Text(json.to_string())
}

#[tokio::test]
async fn resolves_on_the_job_scoped_completion_event() {
    let addr = spawn_push_server(|mut ws| async move {
        // Completion of a different job must not resolve the wait.
        ws.send(text(
            r#"{"type":"executing","data":{"node":null,"prompt_id":"other-job"}}"#,
        ))
        .await
        .unwrap();
        ws.send(text(
            r#"{"type":"executed","data":{"node":"38","output":{"images":[{"filename":"out_00001_.png","subfolder":"","type":"output"}]},"prompt_id":"job-x"}}"#,
        ))
        .await
        .unwrap();
        ws.send(text(
            r#"{"type":"executing","data":{"node":null,"prompt_id":"job-x"}}"#,
        ))
        .await
        .unwrap();
        // Keep the stream open; the client closes it.
        let _ = ws.next().await;
    })
    .await;

    let mut conn = connect(addr).await;
    let cancel = CancellationToken::new();
    let summary = await_completion(&mut conn, "job-x", Duration::from_secs(5), &cancel)
        .await
        .unwrap();
    assert_eq!(summary.executed_files, vec!["out_00001_.png"]);
}

#[tokio::test]
async fn times_out_when_the_completion_event_never_arrives() {
    let addr = spawn_push_server(|mut ws| async move {
        // Say nothing; just hold the connection open.
        let _ = ws.next().await;
    })
    .await;

    let mut conn = connect(addr).await;
    let cancel = CancellationToken::new();
    let started = Instant::now();
    let err = await_completion(&mut conn, "job-x", Duration::from_millis(300), &cancel)
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert_matches!(err, WaitError::CompletionTimeout { waited } => {
        assert_eq!(waited, Duration::from_millis(300));
    });
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_secs(3), "wait overran: {elapsed:?}");
}

#[tokio::test]
async fn cancellation_resolves_the_wait() {
    let addr = spawn_push_server(|mut ws| async move {
        let _ = ws.next().await;
    })
    .await;

    let mut conn = connect(addr).await;
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = await_completion(&mut conn, "job-x", Duration::from_secs(5), &cancel)
        .await
        .unwrap_err();
    assert_matches!(err, WaitError::Cancelled);
}

#[tokio::test]
async fn premature_close_is_an_error() {
    let addr = spawn_push_server(|mut ws| async move {
        ws.close(None).await.unwrap();
    })
    .await;

    let mut conn = connect(addr).await;
    let cancel = CancellationToken::new();
    let err = await_completion(&mut conn, "job-x", Duration::from_secs(5), &cancel)
        .await
        .unwrap_err();
    assert_matches!(err, WaitError::ChannelClosed);
}

#[tokio::test]
async fn execution_error_fails_the_wait() {
    let addr = spawn_push_server(|mut ws| async move {
        ws.send(text(
            r#"{"type":"execution_error","data":{"prompt_id":"job-x","node_id":"3","exception_message":"out of memory","exception_type":"RuntimeError"}}"#,
        ))
        .await
        .unwrap();
        let _ = ws.next().await;
    })
    .await;

    let mut conn = connect(addr).await;
    let cancel = CancellationToken::new();
    let err = await_completion(&mut conn, "job-x", Duration::from_secs(5), &cancel)
        .await
        .unwrap_err();
    assert_matches!(err, WaitError::Execution { ref node_id, ref message } => {
        assert_eq!(node_id, "3");
        assert_eq!(message, "out of memory");
    });
}

#[tokio::test]
async fn malformed_and_foreign_frames_are_skipped() {
    let addr = spawn_push_server(|mut ws| async move {
        ws.send(text("not json at all")).await.unwrap();
        ws.send(Message::Binary(vec![0xde, 0xad])).await.unwrap();
        ws.send(text(
            r#"{"type":"status","data":{"status":{"exec_info":{"queue_remaining":0}}}}"#,
        ))
        .await
        .unwrap();
        ws.send(text(
            r#"{"type":"executing","data":{"node":null,"prompt_id":"job-x"}}"#,
        ))
        .await
        .unwrap();
        let _ = ws.next().await;
    })
    .await;

    let mut conn = connect(addr).await;
    let cancel = CancellationToken::new();
    let summary = await_completion(&mut conn, "job-x", Duration::from_secs(5), &cancel)
        .await
        .unwrap();
    assert!(summary.executed_files.is_empty());
}
