//! Integration tests for the exchange pipeline — full round-trip against a
//! stub upstream, no network. Covers the session/trim invariants and the
//! failure-path guarantees (no session mutation on rejected input, no
//! outbound call without credentials, no assistant turn after an upstream
//! failure).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pc_domain::config::Config;
use pc_domain::error::{Error, Result};
use pc_domain::turn::Role;
use pc_gateway::exchange::{run_exchange, ExchangeInput};
use pc_gateway::sanitize::ReplySanitizer;
use pc_gateway::state::AppState;
use pc_sessions::SessionStore;
use pc_upstream::{ChatReply, ChatRequest, UpstreamClient, UpstreamRegistry};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Stub upstream
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

enum StubMode {
    Reply { text: String, citations: Vec<String>, documents: Vec<String> },
    Fail { status: u16, body: String },
}

struct StubUpstream {
    id: &'static str,
    mode: StubMode,
    calls: AtomicUsize,
}

impl StubUpstream {
    fn replying(id: &'static str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            mode: StubMode::Reply {
                text: text.to_owned(),
                citations: Vec::new(),
                documents: Vec::new(),
            },
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(id: &'static str, status: u16) -> Arc<Self> {
        Arc::new(Self {
            id,
            mode: StubMode::Fail { status, body: "service unavailable".into() },
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UpstreamClient for StubUpstream {
    async fn send(&self, _req: &ChatRequest) -> Result<ChatReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            StubMode::Reply { text, citations, documents } => Ok(ChatReply {
                text: text.clone(),
                citations: citations.clone(),
                documents: documents.clone(),
            }),
            StubMode::Fail { status, body } => {
                Err(Error::Upstream { status: *status, body: body.clone() })
            }
        }
    }

    fn variant_id(&self) -> &str {
        self.id
    }
}

fn test_state(clients: Vec<Arc<dyn UpstreamClient>>) -> AppState {
    let config = Arc::new(Config::default());
    AppState {
        sanitizer: Arc::new(ReplySanitizer::from_config(&config.sanitizer)),
        sessions: Arc::new(SessionStore::new()),
        upstreams: Arc::new(UpstreamRegistry::with_clients(clients)),
        config,
    }
}

fn input(variant: &str, session_id: &str, message: &str) -> ExchangeInput {
    ExchangeInput {
        variant: variant.into(),
        session_id: session_id.into(),
        message: message.into(),
        doc_ids: Vec::new(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Input validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn empty_message_is_rejected_without_touching_sessions() {
    let stub = StubUpstream::replying("websearch", "hi");
    let state = test_state(vec![stub.clone()]);

    let err = run_exchange(&state, input("websearch", "default", "   "))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BadRequest(_)));
    assert!(state.sessions.is_empty());
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn unknown_variant_is_rejected() {
    let state = test_state(vec![]);
    let err = run_exchange(&state, input("telepathy", "default", "hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));
}

#[tokio::test]
async fn pageindex_without_documents_is_rejected_before_any_call() {
    let stub = StubUpstream::replying("pageindex", "grounded answer");
    let state = test_state(vec![stub.clone()]);

    let err = run_exchange(&state, input("pageindex", "default", "where is the relay?"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BadRequest(_)));
    assert!(state.sessions.is_empty());
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn pageindex_with_request_documents_succeeds() {
    let stub = StubUpstream::replying("pageindex", "grounded answer");
    let state = test_state(vec![stub.clone()]);

    let mut req = input("pageindex", "default", "where is the relay?");
    req.doc_ids = vec!["doc-1".into()];
    let out = run_exchange(&state, req).await.unwrap();

    assert_eq!(out.reply, "grounded answer");
    assert_eq!(out.source, "pageindex");
    assert_eq!(stub.calls(), 1);
    assert!(state.sessions.transcript("pageindex:default").is_some());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Credential handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn missing_credentials_never_reach_an_upstream() {
    // Only pageindex has a client; websearch is unconfigured.
    let bystander = StubUpstream::replying("pageindex", "hi");
    let state = test_state(vec![bystander.clone()]);

    let err = run_exchange(&state, input("websearch", "default", "hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert_eq!(bystander.calls(), 0);
    assert!(state.sessions.is_empty());
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Upstream failure
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn upstream_failure_keeps_user_turn_and_no_assistant_turn() {
    let stub = StubUpstream::failing("websearch", 503);
    let state = test_state(vec![stub.clone()]);

    let err = run_exchange(&state, input("websearch", "default", "What is SCADA?"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Upstream { status: 503, .. }));
    assert_eq!(stub.calls(), 1);

    let transcript = state.sessions.transcript("websearch:default").unwrap();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, Role::System);
    assert_eq!(transcript[1].role, Role::User);
    assert_eq!(transcript[1].content, "What is SCADA?");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Round-trip and session reuse
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn round_trip_builds_and_reuses_the_transcript() {
    let stub = StubUpstream::replying("websearch", "A supervisory control system.");
    let state = test_state(vec![stub.clone()]);

    let out = run_exchange(&state, input("websearch", "default", "What is SCADA?"))
        .await
        .unwrap();
    assert_eq!(out.reply, "A supervisory control system.");
    assert_eq!(out.session_key, "websearch:default");

    let transcript = state.sessions.transcript("websearch:default").unwrap();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[0].role, Role::System);
    assert_eq!(transcript[1].role, Role::User);
    assert_eq!(transcript[2].role, Role::Assistant);

    // Second message appends to the same transcript.
    run_exchange(&state, input("websearch", "default", "And DCS?"))
        .await
        .unwrap();
    let transcript = state.sessions.transcript("websearch:default").unwrap();
    assert_eq!(transcript.len(), 5);
    assert_eq!(state.sessions.len(), 1);
}

#[tokio::test]
async fn distinct_session_ids_get_distinct_transcripts() {
    let stub = StubUpstream::replying("websearch", "ok");
    let state = test_state(vec![stub]);

    run_exchange(&state, input("websearch", "alpha", "q1")).await.unwrap();
    run_exchange(&state, input("websearch", "beta", "q2")).await.unwrap();

    assert_eq!(state.sessions.len(), 2);
    assert_eq!(state.sessions.transcript("websearch:alpha").unwrap().len(), 3);
    assert_eq!(state.sessions.transcript("websearch:beta").unwrap().len(), 3);
}

#[tokio::test]
async fn transcript_stays_bounded_with_system_turn_pinned() {
    let stub = StubUpstream::replying("websearch", "noted");
    let state = test_state(vec![stub]);
    let max_turns = state.config.variant("websearch").unwrap().max_turns;

    for i in 0..20 {
        run_exchange(&state, input("websearch", "default", &format!("question {i}")))
            .await
            .unwrap();
    }

    let transcript = state.sessions.transcript("websearch:default").unwrap();
    assert_eq!(transcript.len(), max_turns);
    assert_eq!(transcript[0].role, Role::System);
    assert_eq!(transcript.last().unwrap().content, "noted");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sanitization and citations
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn reply_is_sanitized_before_storage_and_response() {
    let stub = StubUpstream::replying(
        "websearch",
        "Let me search for that. The **pump** requires 24V [1].",
    );
    let state = test_state(vec![stub]);

    let out = run_exchange(&state, input("websearch", "default", "Pump voltage?"))
        .await
        .unwrap();
    assert_eq!(out.reply, "The pump requires 24V .");

    let transcript = state.sessions.transcript("websearch:default").unwrap();
    assert_eq!(transcript.last().unwrap().content, out.reply);
}

#[tokio::test]
async fn citations_and_documents_are_merged_into_the_response() {
    let stub = Arc::new(StubUpstream {
        id: "pageindex",
        mode: StubMode::Reply {
            text: "See the wiring diagram.".into(),
            citations: vec!["https://example.com/manual".into()],
            documents: vec!["doc-7".into()],
        },
        calls: AtomicUsize::new(0),
    });
    let state = test_state(vec![stub]);

    let mut req = input("pageindex", "default", "wiring?");
    req.doc_ids = vec!["doc-7".into()];
    let out = run_exchange(&state, req).await.unwrap();

    assert_eq!(out.citations, vec!["https://example.com/manual", "doc-7"]);
}
