//! One chat exchange, end to end.
//!
//! This is the single pipeline behind every chat endpoint, parameterized by
//! the variant's policy table: validate → resolve policy and client → load
//! session → record user turn → call upstream → sanitize → record assistant
//! turn → trim. The pipeline is terminal on the first failure; in
//! particular, an upstream failure leaves the session with the user turn
//! recorded and no paired assistant turn (at-most-once semantics, never
//! retried).

use pc_domain::config::{VariantConfig, VariantKind};
use pc_domain::error::{Error, Result};
use pc_upstream::ChatRequest;

use crate::state::AppState;

pub struct ExchangeInput {
    /// Backend variant id (a `[[variants]]` entry).
    pub variant: String,
    /// Caller-supplied session identifier.
    pub session_id: String,
    pub message: String,
    /// Document override for document-grounded variants.
    pub doc_ids: Vec<String>,
}

#[derive(Debug)]
pub struct ExchangeOutput {
    pub reply: String,
    pub citations: Vec<String>,
    pub source: String,
    pub session_key: String,
}

/// Session keys are scoped per variant so the two backends never share a
/// transcript, whatever session id the caller picked.
pub fn session_key(cfg: &VariantConfig, session_id: &str) -> String {
    format!("{}:{}", cfg.id, session_id)
}

pub async fn run_exchange(state: &AppState, input: ExchangeInput) -> Result<ExchangeOutput> {
    let message = input.message.trim();
    if message.is_empty() {
        return Err(Error::BadRequest("no message provided".into()));
    }

    let cfg = state
        .config
        .variant(&input.variant)
        .ok_or_else(|| Error::BadRequest(format!("unknown variant '{}'", input.variant)))?;

    let doc_ids = cfg.effective_doc_ids(&input.doc_ids);
    if cfg.kind == VariantKind::Pageindex && doc_ids.is_empty() {
        return Err(Error::BadRequest("no document ids provided".into()));
    }

    // Credential resolution happened at startup; a variant that failed is
    // absent from the registry and must not produce an outbound call.
    let client = state.upstreams.get(&cfg.id).ok_or_else(|| {
        Error::Config(format!(
            "variant '{}' is not available (missing credentials?)",
            cfg.id
        ))
    })?;

    let key = session_key(cfg, &input.session_id);
    state.sessions.get_or_create(&key, cfg.system_prompt.as_deref());
    let transcript = state.sessions.append_user(&key, message)?;

    let req = ChatRequest {
        messages: transcript,
        model: None,
        temperature: cfg.temperature,
        max_tokens: cfg.max_tokens,
        doc_ids,
    };
    let upstream_reply = client.send(&req).await?;

    let reply = state.sanitizer.clean(&upstream_reply.text);
    state.sessions.append_assistant(&key, &reply)?;
    state.sessions.trim(&key, cfg.max_turns, cfg.preserve_system_turn);

    let mut citations = upstream_reply.citations;
    citations.extend(upstream_reply.documents);

    tracing::info!(
        variant = %cfg.id,
        session_key = %key,
        reply_chars = reply.len(),
        citations = citations.len(),
        "exchange complete"
    );

    Ok(ExchangeOutput {
        reply,
        citations,
        source: cfg.id.clone(),
        session_key: key,
    })
}
