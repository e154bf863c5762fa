use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
    /// Backend variants, one `[[variants]]` table each.
    #[serde(default = "default_variants")]
    pub variants: Vec<VariantConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sessions: SessionsConfig::default(),
            sanitizer: SanitizerConfig::default(),
            variants: default_variants(),
        }
    }
}

impl Config {
    /// Look up a variant table by its id.
    pub fn variant(&self, id: &str) -> Option<&VariantConfig> {
        self.variants.iter().find(|v| v.id == id)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_5000")]
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: d_host(),
            port: 5000,
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. A single `"*"` entry allows all origins.
    #[serde(default = "d_any_origin")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: d_any_origin() }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Evict sessions idle longer than this many minutes. 0 disables the
    /// sweep entirely.
    #[serde(default = "d_720")]
    pub idle_minutes: u32,
    /// How often the background sweep runs.
    #[serde(default = "d_300")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self { idle_minutes: 720, sweep_interval_secs: 300 }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reply sanitizer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Case-insensitive sentence-start prefixes. A leading sentence that
    /// begins with one of these is deleted through its terminating
    /// punctuation.
    #[serde(default = "d_openers")]
    pub narration_openers: Vec<String>,
    /// Returned when sanitizing leaves nothing (or the upstream reply was
    /// empty to begin with).
    #[serde(default = "d_fallback")]
    pub empty_reply_fallback: String,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            narration_openers: d_openers(),
            empty_reply_fallback: d_fallback(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Backend variants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// OpenAI-style chat completions with web search (bearer auth).
    Websearch,
    /// Document-grounded PageIndex completions (`api_key` header).
    Pageindex,
}

/// Per-backend policy: prompt text, generation parameters, trim policy,
/// and credential source. Loaded once at startup, read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConfig {
    pub id: String,
    pub kind: VariantKind,
    pub base_url: String,
    /// Model identifier sent in the request body. Pageindex has none.
    #[serde(default)]
    pub model: Option<String>,
    /// System turn seeded at session creation. `None` starts the
    /// transcript with the first user turn.
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Transcript length cap enforced after each exchange.
    #[serde(default = "d_11")]
    pub max_turns: usize,
    /// When true (the canonical policy), the system turn at index 0 is
    /// never evicted; when false, trimming is a pure sliding window.
    #[serde(default = "d_true")]
    pub preserve_system_turn: bool,
    /// Name of the environment variable holding the API credential.
    pub api_key_env: String,
    /// Default document set for document-grounded variants. Request
    /// `docIds` take precedence.
    #[serde(default)]
    pub doc_ids: Vec<String>,
    /// Environment variable holding a comma-separated document list, used
    /// when neither the request nor `doc_ids` supplies one.
    #[serde(default)]
    pub doc_ids_env: Option<String>,
}

impl VariantConfig {
    /// Resolve the document list for one request: request override, then
    /// the configured defaults, then the env var.
    pub fn effective_doc_ids(&self, requested: &[String]) -> Vec<String> {
        if !requested.is_empty() {
            return requested.to_vec();
        }
        if !self.doc_ids.is_empty() {
            return self.doc_ids.clone();
        }
        if let Some(var) = &self.doc_ids_env {
            if let Ok(raw) = std::env::var(var) {
                return raw
                    .split(',')
                    .map(|id| id.trim().to_owned())
                    .filter(|id| !id.is_empty())
                    .collect();
            }
        }
        Vec::new()
    }
}

fn default_variants() -> Vec<VariantConfig> {
    vec![
        VariantConfig {
            id: "websearch".into(),
            kind: VariantKind::Websearch,
            base_url: "https://api.perplexity.ai".into(),
            model: Some("sonar".into()),
            system_prompt: Some(WEBSEARCH_PROMPT.trim().into()),
            temperature: Some(0.7),
            max_tokens: Some(400),
            max_turns: 11,
            preserve_system_turn: true,
            api_key_env: "PERPLEXITY_API_KEY".into(),
            doc_ids: Vec::new(),
            doc_ids_env: None,
        },
        VariantConfig {
            id: "pageindex".into(),
            kind: VariantKind::Pageindex,
            base_url: "https://api.pageindex.ai".into(),
            model: None,
            system_prompt: Some(PAGEINDEX_PROMPT.trim().into()),
            temperature: None,
            max_tokens: None,
            max_turns: 21,
            preserve_system_turn: true,
            api_key_env: "PAGEINDEX_API_KEY".into(),
            doc_ids: Vec::new(),
            doc_ids_env: Some("PAGEINDEX_DOC_IDS".into()),
        },
    ]
}

const WEBSEARCH_PROMPT: &str = "
You are the assistant of an industrial process automation consultancy.
Answer in one to three sentences, direct and free of marketing filler. Use
professional but plain terminology and expand uncommon abbreviations on
first use. Lead with the answer itself, then add at most one clarification
or example.
For a general question, give a clear definition plus one or two key effects
(reliability, safety, cost). For an applied question, answer yes/no/depends
and name the deciding factors (production type, existing systems, safety
requirements). If the question is unclear, ask exactly one clarifying
question.
Summarize external sources in your own words and never reference specific
sites or brands unless the user asks about them directly. When you are not
confident in an answer, say so and suggest a consultation with a design
engineer; for sizing, PLC/SCADA selection, or safety questions always offer
to put the user in touch with a specialist.
";

const PAGEINDEX_PROMPT: &str = "
You are a professional assistant for industrial process automation. Answer
briefly (two to three sentences at most), professionally, and to the point,
using technical terms. If the documents do not contain the answer, say so
honestly in a single sentence.
";

// ── Serde default helpers ──────────────────────────────────────────

fn d_host() -> String {
    "0.0.0.0".into()
}
fn d_5000() -> u16 {
    5000
}
fn d_11() -> usize {
    11
}
fn d_300() -> u64 {
    300
}
fn d_720() -> u32 {
    720
}
fn d_true() -> bool {
    true
}
fn d_any_origin() -> Vec<String> {
    vec!["*".into()]
}
fn d_openers() -> Vec<String> {
    [
        "let me search",
        "let me look",
        "let me find",
        "i'll search",
        "i searched",
        "i found",
        "based on my search",
        "searching the web",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}
fn d_fallback() -> String {
    "The model returned no answer.".into()
}
