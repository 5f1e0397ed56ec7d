//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::chat::{is_reserved_name, MessageKind};
use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// This extractor deserializes the request body as JSON and then validates it
/// using the `validator` crate. Malformed JSON and failed validation are both
/// rejected with 422, the latter with field-level details.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Convert a JSON extraction failure into a 422 response.
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::unprocessable(format!("Invalid JSON: {}", rejection.body_text()))
}

// ============================================================================
// Custom Validators
// ============================================================================

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}

/// Validate a participant name: non-empty, no control characters, not the
/// broadcast sentinel.
pub fn valid_name(value: &str) -> Result<(), validator::ValidationError> {
    not_empty_trimmed(value)?;
    if value.chars().any(|c| c.is_control()) {
        return Err(validator::ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    if is_reserved_name(value) {
        return Err(validator::ValidationError::new("reserved_name")
            .with_message("Must not be \"everyone\"".into()));
    }
    Ok(())
}

/// Validate that a message type is one participants may send.
pub fn sendable_message_type(value: &str) -> Result<(), validator::ValidationError> {
    match MessageKind::from_wire(value) {
        Some(kind) if kind.is_sendable() => Ok(()),
        _ => Err(validator::ValidationError::new("message_type")
            .with_message("Must be one of [message, private-message]".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_trimmed() {
        assert!(not_empty_trimmed("Hello").is_ok());
        assert!(not_empty_trimmed("  Hello  ").is_ok());
        assert!(not_empty_trimmed("").is_err());
        assert!(not_empty_trimmed("   ").is_err());
        assert!(not_empty_trimmed("\t\n").is_err());
    }

    #[test]
    fn test_valid_name() {
        assert!(valid_name("alice").is_ok());
        assert!(valid_name("João").is_ok());
        assert!(valid_name("").is_err());
        assert!(valid_name("ali\x00ce").is_err());
        assert!(valid_name("ali\nce").is_err());
        assert!(valid_name("everyone").is_err());
        assert!(valid_name("Everyone").is_err());
    }

    #[test]
    fn test_sendable_message_type() {
        assert!(sendable_message_type("message").is_ok());
        assert!(sendable_message_type("private-message").is_ok());
        assert!(sendable_message_type("status").is_err());
        assert!(sendable_message_type("").is_err());
        assert!(sendable_message_type("MESSAGE").is_err());
    }
}
