//! Request handlers for the HTTP and websocket surfaces.

pub mod http;
pub mod websocket;

pub use http::{
    create_conversation, get_conversation_detail, health_check, list_conversations,
    list_messages, mark_conversation_read, send_message, update_message_status,
};
pub use websocket::room_ws_handler;
