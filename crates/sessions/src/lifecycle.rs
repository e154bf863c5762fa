//! Idle-session eviction policy.
//!
//! Sessions are never destroyed by the request path; without a sweep the
//! key space grows for the lifetime of the process. The policy is evaluated
//! periodically by a background task against each session's last-active
//! timestamp.

use chrono::{DateTime, Utc};

/// Decides whether a session has been idle long enough to evict.
#[derive(Debug, Clone, Copy)]
pub struct IdlePolicy {
    idle_minutes: u32,
}

impl IdlePolicy {
    /// `idle_minutes == 0` disables eviction (nothing is ever idle).
    pub fn new(idle_minutes: u32) -> Self {
        Self { idle_minutes }
    }

    pub fn enabled(&self) -> bool {
        self.idle_minutes > 0
    }

    pub fn is_idle(&self, last_active: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.idle_minutes == 0 {
            return false;
        }
        let elapsed = now.signed_duration_since(last_active).num_minutes();
        elapsed >= self.idle_minutes as i64
    }
}
