// Common test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Once};

use askpdf::config::{Config, ProviderConfig, ServerConfig, StorageConfig};
use askpdf::provider::ChatPdfClient;
use askpdf::storage::LocalStorage;
use askpdf::AppState;
use axum::body::Body;
use axum::http::Request;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

static INIT: Once = Once::new();

pub const BOUNDARY: &str = "askpdf-test-boundary";

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn test_config(upload_dir: &Path, provider_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
        },
        storage: StorageConfig {
            upload_dir: upload_dir.to_path_buf(),
            max_upload_bytes: 1024 * 1024,
        },
        provider: ProviderConfig {
            api_key: Some("sec_test".to_string()),
            base_url: provider_url.to_string(),
            timeout_secs: 10,
        },
    }
}

pub fn test_state(config: Config) -> AppState {
    init_test_logger();
    let store = Arc::new(LocalStorage::from_config(&config.storage));
    let provider = Arc::new(ChatPdfClient::new(&config.provider).expect("provider client"));
    AppState::new(config, store, provider)
}

/// Provider stub whose add-file call returns `source_id`.
pub async fn mount_add_file(server: &MockServer, status: u16, source_id: &str) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sourceId": source_id }))
    } else {
        ResponseTemplate::new(status).set_body_json(serde_json::json!({ "error": "nope" }))
    };

    Mock::given(method("POST"))
        .and(path("/sources/add-file"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Provider stub whose chat call returns `content` (or fails with `status`).
pub async fn mount_chat(server: &MockServer, status: u16, content: &str) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "content": content }))
    } else {
        ResponseTemplate::new(status).set_body_string(content.to_string())
    };

    Mock::given(method("POST"))
        .and(path("/chats/message"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Encode `(field name, bytes)` pairs as a multipart/form-data body.
pub fn multipart_body(fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, bytes) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{name}.pdf\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn upload_request(fields: &[(&str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields)))
        .unwrap()
}

pub fn chat_request(json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chats")
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn stored_files(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            names
        }
        Err(_) => Vec::new(),
    }
}
