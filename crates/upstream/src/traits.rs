use pc_domain::error::Result;
use pc_domain::turn::Turn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Reply types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A backend-agnostic chat completion request.
#[derive(Debug, Clone, Default)]
pub struct ChatRequest {
    /// The ordered transcript to send.
    pub messages: Vec<Turn>,
    /// Model identifier override. `None` uses the variant's default.
    pub model: Option<String>,
    /// Sampling temperature. `None` lets the backend choose.
    pub temperature: Option<f32>,
    /// Maximum tokens in the response. `None` lets the backend choose.
    pub max_tokens: Option<u32>,
    /// Document identifiers for document-grounded variants.
    pub doc_ids: Vec<String>,
}

/// A backend-agnostic chat completion reply.
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// Raw reply text, before sanitization.
    pub text: String,
    /// Source citations, when the backend reports them.
    pub citations: Vec<String>,
    /// Matched document identifiers, when the backend reports them.
    pub documents: Vec<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One remote chat-completion endpoint.
///
/// Implementations perform exactly one HTTP call per `send` (no retries,
/// no timeout beyond the transport default) and classify the outcome into
/// the shared error taxonomy: non-2xx status becomes `Error::Upstream`,
/// 2xx with missing fields becomes `Error::MalformedResponse`, and a
/// transport failure becomes `Error::Unreachable` or `Error::Timeout`.
#[async_trait::async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Send the transcript and wait for the full reply.
    async fn send(&self, req: &ChatRequest) -> Result<ChatReply>;

    /// The variant id this client serves.
    fn variant_id(&self) -> &str;
}
