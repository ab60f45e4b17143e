//! Two-party messaging service core.
//!
//! Layered layout: `domain` owns the model and the storage trait,
//! `usecase` holds application logic over that trait, `infrastructure`
//! provides the storage backend, wire DTOs and the live-session
//! registry, and `ui` wires it all into an axum server.

pub mod domain;
pub mod infrastructure;
pub mod logger;
pub mod time;
pub mod ui;
pub mod usecase;

pub use ui::{AppState, ServerConfig, build_router, run_server};
