//! Web API module for Parlor.
//!
//! JSON over HTTP: participants join, post messages, poll history and send
//! heartbeats. The caller is identified by the `User` header.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
