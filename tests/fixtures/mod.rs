//! Shared test fixtures.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use duologue::infrastructure::repository::InMemoryConversationStore;
use duologue::{AppState, ServerConfig, build_router};

/// In-process server for integration tests.
///
/// Each test binds its own fixed port so tests can run in parallel
/// without sharing state.
pub struct TestServer {
    port: u16,
}

impl TestServer {
    /// Bind the port and serve a fresh app in a background task.
    ///
    /// The listener is bound before this returns, so requests can be
    /// issued immediately.
    pub async fn start(port: u16) -> Self {
        Self::start_with_idle_timeout(port, Duration::from_secs(300)).await
    }

    /// Like [`TestServer::start`] with a custom websocket idle timeout.
    pub async fn start_with_idle_timeout(port: u16, idle_timeout: Duration) -> Self {
        let store = Arc::new(InMemoryConversationStore::new());
        let state = Arc::new(AppState::new(store, idle_timeout));
        let app = build_router(state, &ServerConfig::default_origins());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .expect("Failed to bind test port");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self { port }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self, room_id: i64) -> String {
        format!("ws://127.0.0.1:{}/ws/chat/{}", self.port, room_id)
    }
}

/// Create a conversation between two users and return its id.
pub async fn create_conversation(
    client: &reqwest::Client,
    base_url: &str,
    current_user: &str,
    peer: &str,
) -> i64 {
    let response = client
        .post(format!("{base_url}/conversations"))
        .json(&serde_json::json!({
            "currentUserId": current_user,
            "participantId": peer,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    body["id"].as_i64().expect("id should be an integer")
}
