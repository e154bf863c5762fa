pub mod chat;
pub mod sessions;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;

use pc_domain::error::Error;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health))
        // Chat (core pipeline), one endpoint per backend variant
        .route("/api/chat", post(chat::chat))
        .route("/api/chat-pageindex", post(chat::chat_pageindex))
        // Session introspection
        .route("/api/sessions", get(sessions::list_sessions))
        .route("/api/sessions/:key/reset", post(sessions::reset_session))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "variants": state.upstreams.list_variants(),
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error mapping
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Maps the domain error taxonomy onto HTTP responses.
///
/// Upstream failures carry the upstream status through when it is a valid
/// error code (and include the upstream body as `details`, matching what
/// the widget already displays); everything internal is logged server-side
/// and collapsed into a generic message.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            Error::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": message }),
            ),
            Error::Config(message) => {
                tracing::error!(error = %message, "configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "API key configuration error" }),
                )
            }
            Error::Upstream { status, body } => {
                tracing::warn!(status, body = %body, "upstream error");
                let code = StatusCode::from_u16(*status)
                    .ok()
                    .filter(|c| c.is_client_error() || c.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    code,
                    serde_json::json!({
                        "error": format!("upstream error: {status}"),
                        "details": body,
                    }),
                )
            }
            Error::MalformedResponse(message) => {
                tracing::warn!(error = %message, "malformed upstream response");
                (
                    StatusCode::BAD_GATEWAY,
                    serde_json::json!({ "error": "upstream returned an unusable response" }),
                )
            }
            Error::Unreachable(message) | Error::Timeout(message) => {
                tracing::warn!(error = %message, "upstream unreachable");
                (
                    StatusCode::BAD_GATEWAY,
                    serde_json::json!({ "error": "upstream unreachable" }),
                )
            }
            other => {
                tracing::error!(error = %other, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
