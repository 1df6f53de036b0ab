//! End-to-end tests for the custom avatar flow against one mocked ComfyUI
//! service speaking both HTTP and WebSocket on a single ephemeral port
//! (both URLs derive from the same configured address).

use std::path::PathBuf;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::ws::{Message as WsMessage, WebSocketUpgrade};
use axum::extract::Path;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tempfile::TempDir;

use passforge_comfyui::avatar::{generate_custom_avatar, AvatarError};
use passforge_core::roster::CUSTOM_AVATAR_TAGLINE;
use passforge_core::Config;

const PROMPT_ID: &str = "job-av";
const ARTIFACT_BYTES: &[u8] = b"avatar png bytes";

/// A mock service for one generation job: the push channel immediately
/// reports completion of [`PROMPT_ID`], and the history endpoint serves
/// the given response.
fn comfy_service(history: serde_json::Value) -> Router {
    Router::new()
        .route(
            "/ws",
            get(|ws: WebSocketUpgrade| async move {
                let response: Response = ws.on_upgrade(|mut socket| async move {
                    socket
                        .send(WsMessage::Text(
                            r#"{"type":"executing","data":{"node":null,"prompt_id":"job-av"}}"#
                                .into(),
                        ))
                        .await
                        .unwrap();
                    // Hold the channel open; the client closes it.
                    let _ = socket.recv().await;
                });
                response
            }),
        )
        .route(
            "/prompt",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["client_id"], "test-client");
                Json(json!({"prompt_id": PROMPT_ID}))
            }),
        )
        .route(
            "/history/{prompt_id}",
            get(move |Path(prompt_id): Path<String>| {
                let history = history.clone();
                async move {
                    assert_eq!(prompt_id, PROMPT_ID);
                    Json(history)
                }
            }),
        )
        .route("/view", get(|| async { ARTIFACT_BYTES.to_vec() }))
}

/// Serve `router` on an ephemeral port and return its host:port address.
async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr.to_string()
}

fn test_config(server_address: String, avatars_dir: PathBuf) -> Config {
    Config {
        server_address,
        client_id: "test-client".into(),
        completion_timeout: Duration::from_secs(5),
        templates_dir: PathBuf::from("Templates"),
        samples_dir: PathBuf::from("Samples"),
        avatars_dir,
        output_dir: PathBuf::from("FinalPass"),
        font_path: None,
        font_bold_path: None,
    }
}

#[tokio::test]
async fn generates_and_caches_a_custom_avatar() {
    let dir = TempDir::new().unwrap();
    let history = json!({
        "job-av": {
            "outputs": {
                "38": {
                    "images": [
                        {"filename": "out_00001_.png", "subfolder": "", "type": "output"}
                    ]
                }
            }
        }
    });
    let addr = spawn_service(comfy_service(history)).await;
    let config = test_config(addr, dir.path().join("Avatars"));

    let avatar = generate_custom_avatar(&config, "Panda", "astronomer")
        .await
        .unwrap();

    assert_eq!(avatar.display_name, "astronomer Panda");
    assert_eq!(avatar.tagline, CUSTOM_AVATAR_TAGLINE);
    assert_eq!(
        avatar.file_path,
        dir.path().join("Avatars").join("Panda_astronomer_avatar.png")
    );
    assert_eq!(std::fs::read(&avatar.file_path).unwrap(), ARTIFACT_BYTES);
}

#[tokio::test]
async fn history_without_artifacts_is_no_artifacts() {
    let dir = TempDir::new().unwrap();
    let history = json!({"job-av": {"outputs": {}}});
    let addr = spawn_service(comfy_service(history)).await;
    let config = test_config(addr, dir.path().join("Avatars"));

    let err = generate_custom_avatar(&config, "Fox", "pilot")
        .await
        .unwrap_err();

    assert_matches!(err, AvatarError::NoArtifacts { ref prompt_id } => {
        assert_eq!(prompt_id, PROMPT_ID);
    });
    assert!(!dir.path().join("Avatars").join("Fox_pilot_avatar.png").exists());
}
