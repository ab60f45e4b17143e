//! Data transfer objects for the REST and live-channel surfaces.

pub mod http;
pub mod websocket;
