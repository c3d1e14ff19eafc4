//! HTTP request handlers for queue operations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use knq_common::db::models::QueueEntry;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub singer: String,
    pub artist: String,
    pub music: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub entry: QueueEntry,
    /// Entries currently waiting or playing, the new one included
    pub in_line: i64,
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
    pub entries: Vec<QueueEntry>,
    pub count: usize,
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Queue API error wrapper mapping domain errors onto HTTP status codes
#[derive(Debug)]
pub struct ApiError(knq_common::Error);

impl From<knq_common::Error> for ApiError {
    fn from(err: knq_common::Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use knq_common::Error;

        let (status, message) = match &self.0 {
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::InvalidState(msg) => (StatusCode::CONFLICT, msg.clone()),
            Error::Throttled(msg) => (StatusCode::TOO_MANY_REQUESTS, msg.clone()),
            err => {
                // Store failures are logged in full; clients get a generic notice
                error!("Queue operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

// ============================================================================
// Queue Endpoints
// ============================================================================

/// GET /api/queue
///
/// Active entries (status != done) ordered by position; the playing entry
/// (position 0) first. Both views re-fetch this in full on every SSE event.
pub async fn get_queue(State(state): State<AppState>) -> Result<Json<QueueResponse>, ApiError> {
    let entries = state.queue.list_active().await?;
    let count = entries.len();
    Ok(Json(QueueResponse { entries, count }))
}

/// POST /api/queue
///
/// Submit a singer/artist/music entry at the end of the waiting queue.
pub async fn submit_entry(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let outcome = state.queue.submit(&req.singer, &req.artist, &req.music).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            entry: outcome.entry,
            in_line: outcome.in_line,
        }),
    ))
}

/// POST /api/queue/:id/play
///
/// Promote a waiting entry to playing.
pub async fn play_now(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueueEntry>, ApiError> {
    let promoted = state.queue.promote(&id).await?;
    Ok(Json(promoted))
}

/// DELETE /api/queue/:id
///
/// Remove an entry unconditionally.
pub async fn remove_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueueEntry>, ApiError> {
    let removed = state.queue.remove(&id).await?;
    Ok(Json(removed))
}
