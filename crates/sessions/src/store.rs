//! In-memory session store.
//!
//! Each session key maps to a `Session` holding the ordered transcript and
//! access timestamps. Transcripts live for the lifetime of the process;
//! there is no persistence across restarts. The store is the only owner of
//! transcript data: callers get clones, never references into the map.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use pc_domain::error::{Error, Result};
use pc_domain::turn::{Role, Turn};

use crate::lifecycle::IdlePolicy;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A single tracked session.
#[derive(Debug, Clone)]
struct Session {
    id: String,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    transcript: Vec<Turn>,
}

/// Read-only view of a session, for the introspection API.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub key: String,
    pub id: String,
    pub turns: usize,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Process-wide map from session key to transcript.
///
/// Concurrent requests for distinct keys never contend beyond the map lock.
/// Two concurrent requests sharing one key may interleave their appends;
/// ordering between them is unspecified (one human, one session).
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve or create the session for `key`, seeding the system turn on
    /// creation. Returns whether the session is new.
    pub fn get_or_create(&self, key: &str, system_prompt: Option<&str>) -> bool {
        // Fast path: session already exists.
        {
            let sessions = self.sessions.read();
            if sessions.contains_key(key) {
                return false;
            }
        }

        let mut sessions = self.sessions.write();
        if sessions.contains_key(key) {
            return false;
        }

        let now = Utc::now();
        let mut transcript = Vec::new();
        if let Some(prompt) = system_prompt {
            transcript.push(Turn::system(prompt));
        }
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            last_active: now,
            transcript,
        };

        tracing::debug!(session_key = key, session_id = %session.id, "session created");
        sessions.insert(key.to_owned(), session);
        true
    }

    /// Append a user turn and return a snapshot of the full transcript
    /// (the message list for the outbound upstream call).
    pub fn append_user(&self, key: &str, text: &str) -> Result<Vec<Turn>> {
        let mut sessions = self.sessions.write();
        let session = session_mut(&mut sessions, key)?;
        push_turn(session, Turn::user(text))?;
        Ok(session.transcript.clone())
    }

    /// Append an assistant turn.
    pub fn append_assistant(&self, key: &str, text: &str) -> Result<()> {
        let mut sessions = self.sessions.write();
        let session = session_mut(&mut sessions, key)?;
        push_turn(session, Turn::assistant(text))
    }

    /// Bound the transcript at `max_turns`, evicting the oldest turns.
    ///
    /// With `preserve_system_turn`, a system turn at index 0 is pinned and
    /// eviction starts at index 1; otherwise this is a pure sliding window
    /// over all turns. Returns the number of evicted turns.
    pub fn trim(&self, key: &str, max_turns: usize, preserve_system_turn: bool) -> usize {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get_mut(key) else {
            return 0;
        };

        let transcript = &mut session.transcript;
        if max_turns == 0 || transcript.len() <= max_turns {
            return 0;
        }
        let excess = transcript.len() - max_turns;

        let pinned_system = preserve_system_turn
            && matches!(transcript.first(), Some(turn) if turn.role == Role::System);
        if pinned_system {
            transcript.drain(1..1 + excess);
        } else {
            transcript.drain(0..excess);
        }

        tracing::debug!(session_key = key, evicted = excess, "transcript trimmed");
        excess
    }

    /// Clone the transcript for a session, if it exists.
    pub fn transcript(&self, key: &str) -> Option<Vec<Turn>> {
        self.sessions.read().get(key).map(|s| s.transcript.clone())
    }

    /// Drop a session entirely. Returns whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.sessions.write().remove(key).is_some()
    }

    /// List all sessions, most recently active first.
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = self.sessions.read();
        let mut summaries: Vec<SessionSummary> = sessions
            .iter()
            .map(|(key, s)| SessionSummary {
                key: key.clone(),
                id: s.id.clone(),
                turns: s.transcript.len(),
                created_at: s.created_at,
                last_active: s.last_active,
            })
            .collect();
        summaries.sort_by(|a, b| b.last_active.cmp(&a.last_active));
        summaries
    }

    /// Evict every session the policy considers idle at `now`. Returns the
    /// number of evicted sessions.
    pub fn evict_idle(&self, policy: &IdlePolicy, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|key, s| {
            let idle = policy.is_idle(s.last_active, now);
            if idle {
                tracing::debug!(session_key = key, "evicting idle session");
            }
            !idle
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

fn session_mut<'a>(
    sessions: &'a mut HashMap<String, Session>,
    key: &str,
) -> Result<&'a mut Session> {
    sessions
        .get_mut(key)
        .ok_or_else(|| Error::InvalidState(format!("no session for key '{key}'")))
}

fn push_turn(session: &mut Session, turn: Turn) -> Result<()> {
    if turn.content.trim().is_empty() {
        return Err(Error::BadRequest("empty turn content".into()));
    }
    session.transcript.push(turn);
    session.last_active = Utc::now();
    Ok(())
}
