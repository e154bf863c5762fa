//! Session introspection endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use crate::state::AppState;

/// GET /api/sessions
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "sessions": state.sessions.list() }))
}

/// POST /api/sessions/:key/reset
pub async fn reset_session(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    if state.sessions.remove(&key) {
        tracing::info!(session_key = %key, "session reset");
        (StatusCode::OK, Json(serde_json::json!({ "reset": key })))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown session '{key}'") })),
        )
    }
}
