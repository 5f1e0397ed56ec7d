//! Chat module for Parlor.
//!
//! This module provides the room history:
//! - Message model with tagged recipients (everyone / a participant)
//! - Append-only message store with bounded, visibility-filtered queries
//! - Visibility rules for public, private and status messages

mod message;
mod store;
mod visibility;

pub use message::{
    is_reserved_name, Message, MessageKind, NewMessage, Recipient, EVERYONE, JOIN_TEXT,
    LEAVE_TEXT,
};
pub use store::MessageStore;
pub use visibility::is_visible;
