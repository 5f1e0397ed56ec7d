//! Participant handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::AppState;
use crate::web::dto::{ParticipantResponse, RegisterRequest, ValidatedJson};
use crate::web::error::ApiError;

/// POST /participants - Join the room.
pub async fn register_participant(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    state.lobby.join(&req.name).await?;
    Ok(StatusCode::CREATED)
}

/// GET /participants - List registered participants.
pub async fn list_participants(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ParticipantResponse>> {
    let participants = state.lobby.participants().await;
    Json(participants.iter().map(ParticipantResponse::from).collect())
}
