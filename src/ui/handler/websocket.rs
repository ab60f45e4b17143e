//! Live-channel handlers.
//!
//! One websocket connection is one session, bound to a single room for
//! its lifetime. The socket's send half is owned by a forward task
//! draining the session channel, so everything written to this client
//! (fan-out events and inline errors alike) goes through the same
//! registered [`SessionHandle`].

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};

use crate::domain::{ConversationId, UserId};
use crate::infrastructure::SessionHandle;
use crate::infrastructure::dto::websocket::{ErrorEvent, InboundChatMessage, RoomEvent};
use crate::ui::handler::http::ApiError;
use crate::ui::state::AppState;
use crate::usecase::{ChatError, SendMessageUseCase};

/// Upgrade `GET /ws/chat/{room_id}` to a live session on that room.
pub async fn room_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let room = ConversationId::new(room_id).map_err(ChatError::from)?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room: ConversationId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (session, mut frames) = SessionHandle::new();
    let session_id = session.id();
    state.broadcaster.register(room, session.clone());
    tracing::info!(room = room.value(), session = %session_id, "session connected");

    // Forward task: drain the session channel onto the socket. Ends when
    // the channel closes (unregister/shutdown) or the socket is gone.
    let mut forward_task = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_sender.close().await;
    });

    // Inbound loop with idle eviction: a session that sends nothing for
    // the configured window is treated as dead.
    loop {
        let inbound = tokio::select! {
            inbound = ws_receiver.next() => inbound,
            _ = tokio::time::sleep(state.idle_timeout) => {
                tracing::info!(room = room.value(), session = %session_id, "idle timeout, evicting session");
                break;
            }
            _ = &mut forward_task => break,
        };

        match inbound {
            Some(Ok(Message::Text(text))) => {
                if !handle_inbound(&state, room, &session, &text).await {
                    break;
                }
            }
            Some(Ok(Message::Close(_))) | None => {
                tracing::info!(room = room.value(), session = %session_id, "session closed");
                break;
            }
            Some(Ok(_)) => {
                // Ping/pong handled by the protocol layer; binary ignored.
            }
            Some(Err(e)) => {
                tracing::warn!(room = room.value(), session = %session_id, "websocket error: {e}");
                break;
            }
        }
    }

    state.broadcaster.unregister(room, session_id);
    forward_task.abort();
}

/// Process one inbound text frame.
///
/// Returns `false` when the connection should close (unexpected fault);
/// protocol errors are reported inline and keep the session alive.
async fn handle_inbound(
    state: &Arc<AppState>,
    room: ConversationId,
    session: &SessionHandle,
    text: &str,
) -> bool {
    let inbound: InboundChatMessage = match serde_json::from_str(text) {
        Ok(inbound) => inbound,
        Err(e) => {
            tracing::warn!(room = room.value(), "malformed inbound frame: {e}");
            return send_error(session, ErrorEvent::missing_fields());
        }
    };

    let sender = match UserId::new(inbound.sender_id) {
        Ok(sender) => sender,
        Err(_) => return send_error(session, ErrorEvent::missing_fields()),
    };

    let usecase = SendMessageUseCase::new(state.store.clone());
    match usecase.execute(room, sender, inbound.content).await {
        Ok(message) => {
            // Persisted; fan out to everyone on the room, sender included.
            state.broadcaster.broadcast(room, &RoomEvent::message(&message));
            true
        }
        Err(ChatError::Validation(_)) => send_error(session, ErrorEvent::missing_fields()),
        Err(ChatError::Forbidden(detail)) => {
            send_error(session, ErrorEvent { error: detail })
        }
        Err(e) => {
            tracing::error!(room = room.value(), "inbound send failed: {e}");
            false
        }
    }
}

/// Queue an inline error event; a dead channel means the session is gone
/// and the connection should close.
fn send_error(session: &SessionHandle, event: ErrorEvent) -> bool {
    match serde_json::to_string(&event) {
        Ok(frame) => session.deliver(frame).is_ok(),
        Err(_) => false,
    }
}
