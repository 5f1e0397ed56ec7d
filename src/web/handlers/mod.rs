//! API handlers for the chat room.

pub mod messages;
pub mod participants;
pub mod status;

use std::sync::Arc;

use crate::lobby::Lobby;

pub use messages::{list_messages, send_message};
pub use participants::{list_participants, register_participant};
pub use status::heartbeat;

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    /// The room.
    pub lobby: Arc<Lobby>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(lobby: Arc<Lobby>) -> Self {
        Self { lobby }
    }
}
