//! Presence tracking for Parlor.
//!
//! Participants stay registered while they keep sending heartbeats. The
//! [`Sweeper`] periodically evicts those that went quiet for longer than the
//! configured TTL.

mod registry;
mod sweeper;

pub use registry::{Participant, ParticipantRegistry};
pub use sweeper::{SweepState, Sweeper, SweeperHandle};
