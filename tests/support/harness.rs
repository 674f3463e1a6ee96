#![allow(dead_code)]

use palimpsest::artifact::SqliteArtifactStore;
use palimpsest::config::GenerationConfig;
use palimpsest::memory::SqliteReflectionStore;
use serde_json::json;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_KEY: &str = "test-key";

pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

/// Both stores over one database file in a fresh temp dir.
pub struct FileStores {
    pub dir: TempDir,
    pub artifacts: SqliteArtifactStore,
    pub reflections: SqliteReflectionStore,
}

impl FileStores {
    pub async fn open() -> Self {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("palimpsest.db");
        Self {
            artifacts: SqliteArtifactStore::open(&db).await.unwrap(),
            reflections: SqliteReflectionStore::open(&db).await.unwrap(),
            dir,
        }
    }
}

/// Generation settings pointing at a mock OpenAI-compatible server.
pub fn mock_generation(server: &MockServer) -> GenerationConfig {
    GenerationConfig {
        provider: format!("custom:{}", server.uri()),
        ..GenerationConfig::default()
    }
}

pub fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    }))
}

/// Answer every chat completion with `text`.
pub async fn mount_completion(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(text))
        .mount(server)
        .await;
}

/// The user message of every chat completion the server received.
pub async fn sent_prompts(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| {
            let body: serde_json::Value = request.body_json().unwrap();
            body["messages"][0]["content"]
                .as_str()
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}
