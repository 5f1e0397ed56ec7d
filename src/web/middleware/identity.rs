//! Caller identity extraction.
//!
//! Parlor has no authentication: the caller names itself in the `User`
//! header, the same way the browser client does.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// Name of the identity header.
pub const USER_HEADER: &str = "user";

/// Caller name from the `User` header.
///
/// `None` when the header is absent, not valid UTF-8, or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerName(pub Option<String>);

impl CallerName {
    /// Borrow the caller name.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerName
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(CallerName(name))
    }
}
