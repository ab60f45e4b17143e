//! Per-room live-session registry and fan-out.
//!
//! One process-wide [`RoomBroadcaster`] holds every live session, grouped
//! by room (conversation id). The registry starts empty and is torn down
//! at shutdown by closing every session channel.
//!
//! Each room maps to one DashMap entry, so register/unregister/broadcast
//! for the same room are mutually exclusive while unrelated rooms never
//! contend. Delivery is a non-blocking enqueue onto the session's
//! unbounded channel; a slow socket therefore cannot stall the exclusive
//! region, and queueing under the entry guard preserves per-session event
//! order across consecutive broadcasts.

use std::collections::HashMap;

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::ConversationId;

use super::dto::websocket::RoomEvent;

/// Sending half of one live session.
///
/// A session is bound to a single room for its lifetime. The receiving
/// half is drained by the connection task that forwards frames onto the
/// socket; when either side drops, the channel closes and the next
/// delivery attempt evicts the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    sender: mpsc::UnboundedSender<String>,
}

impl SessionHandle {
    /// Create a session handle and the receiver its connection task drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                id: Uuid::new_v4(),
                sender,
            },
            receiver,
        )
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queue a text frame for this session. Fails iff the session is gone.
    pub fn deliver(&self, frame: String) -> Result<(), ()> {
        self.sender.send(frame).map_err(|_| ())
    }
}

/// Process-wide registry of live sessions, keyed by room.
#[derive(Debug, Default)]
pub struct RoomBroadcaster {
    rooms: DashMap<ConversationId, HashMap<Uuid, SessionHandle>>,
}

impl RoomBroadcaster {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session to the room's set.
    ///
    /// The room entry is materialized on first registration.
    pub fn register(&self, room: ConversationId, session: SessionHandle) {
        let session_id = session.id();
        self.rooms
            .entry(room)
            .or_default()
            .insert(session_id, session);
        tracing::debug!(room = room.value(), session = %session_id, "session registered");
    }

    /// Remove a session from the room's set.
    ///
    /// A room whose set becomes empty loses its entry; no empty entries
    /// leak.
    pub fn unregister(&self, room: ConversationId, session_id: Uuid) {
        if let Some(mut sessions) = self.rooms.get_mut(&room) {
            if sessions.remove(&session_id).is_some() {
                tracing::debug!(room = room.value(), session = %session_id, "session unregistered");
            }
        }
        self.rooms.remove_if(&room, |_, sessions| sessions.is_empty());
    }

    /// Fan an event out to every session currently registered on `room`.
    ///
    /// Best-effort and fire-and-forget per session: a failed delivery
    /// evicts that session and the rest still receive the event. Returns
    /// the number of sessions the event was queued to.
    pub fn broadcast(&self, room: ConversationId, event: &RoomEvent) -> usize {
        let frame = match serde_json::to_string(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(room = room.value(), "failed to serialize event: {e}");
                return 0;
            }
        };

        let delivered = {
            let Some(mut sessions) = self.rooms.get_mut(&room) else {
                return 0;
            };
            let before = sessions.len();
            sessions.retain(|session_id, session| {
                let alive = session.deliver(frame.clone()).is_ok();
                if !alive {
                    tracing::warn!(
                        room = room.value(),
                        session = %session_id,
                        "delivery failed, evicting session"
                    );
                }
                alive
            });
            let evicted = before - sessions.len();
            if evicted > 0 {
                tracing::debug!(room = room.value(), evicted, "evicted dead sessions");
            }
            sessions.len()
        };

        self.rooms.remove_if(&room, |_, sessions| sessions.is_empty());
        delivered
    }

    /// Number of sessions currently registered on `room`.
    pub fn session_count(&self, room: ConversationId) -> usize {
        self.rooms.get(&room).map_or(0, |sessions| sessions.len())
    }

    /// Number of rooms with at least one session.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Force-close every session and empty the registry.
    ///
    /// Dropping the handles closes the per-session channels, which ends
    /// each connection's forward task and closes its socket.
    pub fn shutdown(&self) {
        let rooms = self.rooms.len();
        self.rooms.clear();
        if rooms > 0 {
            tracing::info!(rooms, "broadcaster shut down, all sessions closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: i64) -> ConversationId {
        ConversationId::new(id).unwrap()
    }

    fn read_event() -> RoomEvent {
        RoomEvent::MessagesRead {
            conversation_id: 7,
            user_id: "bob".to_string(),
            count: 3,
        }
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let broadcaster = RoomBroadcaster::new();
        let (session, _rx) = SessionHandle::new();
        let session_id = session.id();

        broadcaster.register(room(7), session);
        assert_eq!(broadcaster.session_count(room(7)), 1);

        broadcaster.unregister(room(7), session_id);
        assert_eq!(broadcaster.session_count(room(7)), 0);
        // Empty room entries are removed, not kept around.
        assert_eq!(broadcaster.room_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_sessions_in_room() {
        let broadcaster = RoomBroadcaster::new();
        let (session_b, mut rx_b) = SessionHandle::new();
        let (session_c, mut rx_c) = SessionHandle::new();
        let (session_other, mut rx_other) = SessionHandle::new();
        broadcaster.register(room(7), session_b);
        broadcaster.register(room(7), session_c);
        broadcaster.register(room(8), session_other);

        let delivered = broadcaster.broadcast(room(7), &read_event());

        assert_eq!(delivered, 2);
        let frame_b = rx_b.recv().await.unwrap();
        let frame_c = rx_c.recv().await.unwrap();
        assert_eq!(frame_b, frame_c);
        assert!(frame_b.contains("\"messages_read\""));
        // The other room saw nothing.
        assert!(rx_other.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_room_is_noop() {
        let broadcaster = RoomBroadcaster::new();

        assert_eq!(broadcaster.broadcast(room(7), &read_event()), 0);
    }

    #[tokio::test]
    async fn test_failed_session_evicted_others_still_receive() {
        let broadcaster = RoomBroadcaster::new();
        let (session_dead, rx_dead) = SessionHandle::new();
        let (session_live, mut rx_live) = SessionHandle::new();
        broadcaster.register(room(7), session_dead);
        broadcaster.register(room(7), session_live);

        // Dropping the receiver makes the next delivery fail.
        drop(rx_dead);
        let delivered = broadcaster.broadcast(room(7), &read_event());

        assert_eq!(delivered, 1);
        assert!(rx_live.recv().await.is_some());
        // The failed session is gone immediately after the call.
        assert_eq!(broadcaster.session_count(room(7)), 1);
    }

    #[tokio::test]
    async fn test_all_sessions_dead_removes_room_entry() {
        let broadcaster = RoomBroadcaster::new();
        let (session, rx) = SessionHandle::new();
        broadcaster.register(room(7), session);
        drop(rx);

        let delivered = broadcaster.broadcast(room(7), &read_event());

        assert_eq!(delivered, 0);
        assert_eq!(broadcaster.room_count(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_order_preserved_per_session() {
        let broadcaster = RoomBroadcaster::new();
        let (session, mut rx) = SessionHandle::new();
        broadcaster.register(room(7), session);

        for count in 1..=3 {
            broadcaster.broadcast(
                room(7),
                &RoomEvent::MessagesRead {
                    conversation_id: 7,
                    user_id: "bob".to_string(),
                    count,
                },
            );
        }

        for count in 1..=3 {
            let frame = rx.recv().await.unwrap();
            assert!(frame.contains(&format!("\"count\":{count}")));
        }
    }

    #[tokio::test]
    async fn test_shutdown_closes_all_sessions() {
        let broadcaster = RoomBroadcaster::new();
        let (session_a, mut rx_a) = SessionHandle::new();
        let (session_b, mut rx_b) = SessionHandle::new();
        broadcaster.register(room(1), session_a);
        broadcaster.register(room(2), session_b);

        broadcaster.shutdown();

        assert_eq!(broadcaster.room_count(), 0);
        // Channels are closed: receivers drain to None.
        assert!(rx_a.recv().await.is_none());
        assert!(rx_b.recv().await.is_none());
    }
}
