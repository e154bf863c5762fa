use std::sync::Arc;

use pc_domain::config::Config;
use pc_sessions::SessionStore;
use pc_upstream::UpstreamRegistry;

use crate::sanitize::ReplySanitizer;

/// Shared application state passed to all API handlers.
///
/// Constructed once at process start (see [`crate::bootstrap`]) and cloned
/// per request; every service is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub upstreams: Arc<UpstreamRegistry>,
    pub sanitizer: Arc<ReplySanitizer>,
}
