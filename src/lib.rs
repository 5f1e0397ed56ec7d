//! Parlor - a presence-tracked chat room over HTTP.
//!
//! Participants join under a unique name, keep themselves alive with
//! heartbeats, and exchange public and private messages. A background
//! sweeper evicts participants whose heartbeats stop and announces their
//! departure in the room history.

pub mod chat;
pub mod clock;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod lobby;
pub mod logging;
pub mod presence;
pub mod web;

pub use chat::{is_visible, Message, MessageKind, MessageStore, NewMessage, Recipient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use db::Database;
pub use error::{ParlorError, Result};
pub use lobby::{Lobby, SendMessage};
pub use presence::{Participant, ParticipantRegistry, SweepState, Sweeper, SweeperHandle};
pub use web::WebServer;
