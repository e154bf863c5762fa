/// Shared error type used across all PlantChat crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The caller's input is invalid. Surfaced as HTTP 400.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Deployment misconfiguration (missing credential, bad variant table).
    /// Surfaced as HTTP 500, never retried.
    #[error("config: {0}")]
    Config(String),

    /// The upstream service answered with a non-2xx status. The raw body is
    /// kept for diagnostics.
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16, body: String },

    /// The upstream answered 2xx but the body was unparseable or missing
    /// the fields the contract promises.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),

    /// Transport-level failure before an HTTP status was obtained.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("timeout: {0}")]
    Timeout(String),

    /// An operation was called against a session that does not exist.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
