//! Middleware for Web API.

pub mod cors;
pub mod identity;

pub use cors::create_cors_layer;
pub use identity::{CallerName, USER_HEADER};
