//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ConversationStore, DEFAULT_NAME_CATALOG};
use crate::infrastructure::RoomBroadcaster;
use crate::usecase::PairLockRegistry;

/// State handed to every handler.
pub struct AppState {
    /// Storage boundary (data access abstraction)
    pub store: Arc<dyn ConversationStore>,
    /// Process-wide live-session registry
    pub broadcaster: Arc<RoomBroadcaster>,
    /// Per-pair serialization for conversation creation
    pub pair_locks: Arc<PairLockRegistry>,
    /// Catalog for display-name assignment
    pub name_catalog: &'static [&'static str],
    /// Idle eviction for live sessions
    pub idle_timeout: Duration,
}

impl AppState {
    /// Build state around a store with a fresh registry and lock table.
    pub fn new(store: Arc<dyn ConversationStore>, idle_timeout: Duration) -> Self {
        Self {
            store,
            broadcaster: Arc::new(RoomBroadcaster::new()),
            pair_locks: Arc::new(PairLockRegistry::new()),
            name_catalog: DEFAULT_NAME_CATALOG,
            idle_timeout,
        }
    }
}
