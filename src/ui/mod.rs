//! Presentation layer: HTTP/websocket handlers and server lifecycle.

pub mod handler;
pub mod runner;
pub mod signal;
pub mod state;

pub use runner::{ServerConfig, build_router, run_server};
pub use state::AppState;
