//! Message handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::{Validate, ValidationError, ValidationErrors};

use super::AppState;
use crate::chat::MessageKind;
use crate::lobby::SendMessage;
use crate::web::dto::{json_rejection, MessageResponse, MessagesQuery, SendMessageRequest};
use crate::web::error::ApiError;
use crate::web::middleware::CallerName;

/// POST /messages - Post a message as the caller.
///
/// A missing `User` header is reported together with the body violations.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    caller: CallerName,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body.map_err(json_rejection)?;

    let mut errors = req.validate().err().unwrap_or_else(ValidationErrors::new);
    if caller.0.is_none() {
        errors.add(
            "from",
            ValidationError::new("required").with_message("Must not be empty".into()),
        );
    }
    if !errors.is_empty() {
        return Err(ApiError::from_validation_errors(errors));
    }

    let (Some(from), Some(kind)) = (caller.0, MessageKind::from_wire(&req.kind)) else {
        return Err(ApiError::unprocessable("Invalid message"));
    };

    state
        .lobby
        .send(
            &from,
            SendMessage {
                to: req.to,
                text: req.text,
                kind,
            },
        )
        .await?;

    Ok(StatusCode::CREATED)
}

/// GET /messages - History visible to the caller.
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    caller: CallerName,
    Query(query): Query<MessagesQuery>,
) -> Json<Vec<MessageResponse>> {
    let messages = state
        .lobby
        .messages(caller.as_deref(), query.limit())
        .await;
    Json(messages.iter().map(MessageResponse::from).collect())
}
