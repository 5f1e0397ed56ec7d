//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{not_empty_trimmed, sendable_message_type, valid_name};

/// Participant registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[serde(default)]
    #[validate(custom(function = "valid_name"))]
    pub name: String,
}

/// Message submission request. The sender comes from the `User` header.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Recipient name, or `everyone`.
    #[serde(default)]
    #[validate(custom(function = "not_empty_trimmed"))]
    pub to: String,
    /// Message body.
    #[serde(default)]
    #[validate(custom(function = "not_empty_trimmed"))]
    pub text: String,
    /// `message` or `private-message`.
    #[serde(default, rename = "type")]
    #[validate(custom(function = "sendable_message_type"))]
    pub kind: String,
}

/// Query parameters for listing messages.
#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    /// Maximum number of messages, newest last.
    #[serde(default)]
    pub limit: Option<String>,
}

impl MessagesQuery {
    /// Parsed limit; unparsable values count as absent.
    pub fn limit(&self) -> Option<i64> {
        self.limit.as_deref().and_then(|s| s.trim().parse().ok())
    }
}
