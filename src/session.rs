use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use cookie::{Cookie, SameSite};
use parking_lot::RwLock;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use tracing::debug;

use crate::provider::WordProvider;
use crate::state::ViewController;

pub const SESSION_COOKIE: &str = "ordskatt_session";
/// Each session may hold a full inline illustration.
pub const DEFAULT_MAX_SESSIONS: usize = 256;
const SESSION_ID_LEN: usize = 24;

/// One [`ViewController`] per browser session.
pub struct SessionStore {
    provider: Arc<dyn WordProvider>,
    max_sessions: usize,
    sessions: RwLock<HashMap<String, SessionEntry>>,
    /// Logical clock for least-recently-seen eviction.
    clock: AtomicU64,
}

struct SessionEntry {
    controller: Arc<ViewController>,
    last_seen: u64,
}

/// Controller resolved for a request.
pub struct SessionHandle {
    pub id: String,
    pub controller: Arc<ViewController>,
    /// The id was minted for this request and must be sent back as a cookie.
    pub is_new: bool,
}

impl SessionStore {
    pub fn new(provider: Arc<dyn WordProvider>) -> Self {
        Self::with_capacity(provider, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_capacity(provider: Arc<dyn WordProvider>, max_sessions: usize) -> Self {
        Self {
            provider,
            max_sessions: max_sessions.max(1),
            sessions: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> Arc<dyn WordProvider> {
        Arc::clone(&self.provider)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the controller for a known id, or creates a fresh session.
    pub fn resolve(&self, id: Option<&str>) -> SessionHandle {
        let now = self.clock.fetch_add(1, Ordering::Relaxed);
        let mut sessions = self.sessions.write();
        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_seen = now;
                return SessionHandle {
                    id: id.to_string(),
                    controller: Arc::clone(&entry.controller),
                    is_new: false,
                };
            }
        }
        while sessions.len() >= self.max_sessions {
            match oldest_session_key(&sessions) {
                Some(key) => {
                    debug!(session = %key, "evicting least recently seen session");
                    sessions.remove(&key);
                }
                None => break,
            }
        }
        let id = generate_session_id();
        let controller = Arc::new(ViewController::new(self.provider()));
        sessions.insert(
            id.clone(),
            SessionEntry {
                controller: Arc::clone(&controller),
                last_seen: now,
            },
        );
        SessionHandle {
            id,
            controller,
            is_new: true,
        }
    }
}

fn oldest_session_key(sessions: &HashMap<String, SessionEntry>) -> Option<String> {
    sessions
        .iter()
        .min_by_key(|(_, entry)| entry.last_seen)
        .map(|(key, _)| key.clone())
}

pub fn generate_session_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

/// Reads the session id from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(id: &str) -> String {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
        .to_string()
}
