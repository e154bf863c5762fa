//! Application state construction and background tasks.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use pc_domain::config::Config;
use pc_sessions::{IdlePolicy, SessionStore};
use pc_upstream::UpstreamRegistry;

use crate::sanitize::ReplySanitizer;
use crate::state::AppState;

/// Build the shared state: session store, upstream registry (credentials
/// resolve here), and the reply sanitizer.
pub fn build_app_state(config: Arc<Config>) -> AppState {
    let sessions = Arc::new(SessionStore::new());
    let upstreams = Arc::new(UpstreamRegistry::from_config(&config));
    let sanitizer = Arc::new(ReplySanitizer::from_config(&config.sanitizer));

    AppState { config, sessions, upstreams, sanitizer }
}

/// Spawn the idle-session sweep, if enabled.
pub fn spawn_background_tasks(state: &AppState) {
    let policy = IdlePolicy::new(state.config.sessions.idle_minutes);
    if !policy.enabled() {
        tracing::info!("idle session eviction disabled (sessions.idle_minutes = 0)");
        return;
    }

    let every = Duration::from_secs(state.config.sessions.sweep_interval_secs.max(1));
    let store = state.sessions.clone();
    tracing::info!(
        idle_minutes = state.config.sessions.idle_minutes,
        sweep_interval_secs = every.as_secs(),
        "idle session eviction enabled"
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(&policy, Utc::now());
            if evicted > 0 {
                tracing::info!(evicted, remaining = store.len(), "idle sessions evicted");
            }
        }
    });
}
