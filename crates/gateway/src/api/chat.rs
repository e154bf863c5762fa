//! Chat API endpoints — one POST route per backend variant, both backed by
//! the same exchange pipeline.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::exchange::{run_exchange, ExchangeInput};
use crate::state::AppState;

pub const WEBSEARCH_VARIANT: &str = "websearch";
pub const PAGEINDEX_VARIANT: &str = "pageindex";

const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug, Deserialize)]
pub struct ChatApiRequest {
    /// User message text. Absent or blank → 400.
    #[serde(default)]
    pub message: Option<String>,
    /// Session identifier; one transcript per (variant, session id).
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    /// Document override for the document-grounded variant.
    #[serde(default, alias = "docIds")]
    pub doc_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatApiResponse {
    pub reply: String,
    pub citations: Vec<String>,
    pub source: String,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    run(state, WEBSEARCH_VARIANT, body).await
}

/// POST /api/chat-pageindex
pub async fn chat_pageindex(
    State(state): State<AppState>,
    Json(body): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    run(state, PAGEINDEX_VARIANT, body).await
}

async fn run(
    state: AppState,
    variant: &str,
    body: ChatApiRequest,
) -> Result<Json<ChatApiResponse>, ApiError> {
    let input = ExchangeInput {
        variant: variant.to_owned(),
        session_id: body
            .session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_ID.to_owned()),
        message: body.message.unwrap_or_default(),
        doc_ids: body.doc_ids,
    };

    let out = run_exchange(&state, input).await?;
    Ok(Json(ChatApiResponse {
        reply: out.reply,
        citations: out.citations,
        source: out.source,
    }))
}
