//! Heartbeat handler.

use axum::{extract::State, http::StatusCode};
use std::sync::Arc;

use super::AppState;
use crate::web::error::ApiError;
use crate::web::middleware::CallerName;

/// POST /status - Refresh the caller's presence.
pub async fn heartbeat(
    State(state): State<Arc<AppState>>,
    caller: CallerName,
) -> Result<StatusCode, ApiError> {
    let Some(name) = caller.as_deref() else {
        return Err(ApiError::not_found("participant not found"));
    };

    state.lobby.heartbeat(name).await?;
    Ok(StatusCode::OK)
}
