//! Server wiring and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, patch},
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::infrastructure::repository::InMemoryConversationStore;
use crate::ui::handler::{
    create_conversation, get_conversation_detail, health_check, list_conversations,
    list_messages, mark_conversation_read, room_ws_handler, send_message,
    update_message_status,
};
use crate::ui::signal::shutdown_signal;
use crate::ui::state::AppState;

/// Listener and session settings for [`run_server`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Live sessions that stay silent this long are evicted.
    pub idle_timeout: Duration,
    /// Browser origins allowed to call the API.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Origins accepted when none are configured (local dev frontends).
    pub fn default_origins() -> Vec<String> {
        vec![
            "http://localhost:5173".to_string(),
            "http://127.0.0.1:5173".to_string(),
        ]
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            idle_timeout: Duration::from_secs(300),
            allowed_origins: Self::default_origins(),
        }
    }
}

/// CORS for the browser frontend: explicit origin list, credentials
/// allowed (so origins cannot be a wildcard).
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid allowed origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Assemble the full route table over shared state.
pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/conversations", get(list_conversations).post(create_conversation))
        .route("/conversations/{id}", get(get_conversation_detail))
        .route(
            "/conversations/{id}/messages",
            get(list_messages).post(send_message),
        )
        .route("/conversations/{id}/read", patch(mark_conversation_read))
        .route("/messages/{id}/status", patch(update_message_status))
        .route("/ws/chat/{room_id}", get(room_ws_handler))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind, serve until a shutdown signal, then drain live sessions.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let store = Arc::new(InMemoryConversationStore::new());
    let state = Arc::new(AppState::new(store, config.idle_timeout));
    let app = build_router(state.clone(), &config.allowed_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Closing the session channels lets every forward task finish.
    state.broadcaster.shutdown();
    tracing::info!("server stopped");
    Ok(())
}
