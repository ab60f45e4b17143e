//! Infrastructure layer: storage backends, the live-session registry and
//! wire DTOs.

pub mod broadcast;
pub mod dto;
pub mod repository;

pub use broadcast::{RoomBroadcaster, SessionHandle};
