//! In-memory login sessions
//!
//! Tokens are random UUIDs mapped to usernames. Each session expires after a fixed
//! lifetime; expired entries are dropped on lookup and swept whenever a new session
//! starts, so the map only holds live sessions. Sessions do not survive a restart.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap};

/// Cookie carrying the session token for browser clients
pub const SESSION_COOKIE: &str = "khata_session";

/// Lifetime of a session from login
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

struct Session {
    username: String,
    expires_at: Instant,
}

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A panic while holding the lock cannot leave the map half-updated
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Session>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Session>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a session and return its token
    pub fn create(&self, username: &str) -> String {
        let now = Instant::now();
        let token = uuid::Uuid::new_v4().to_string();

        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!(swept, "Expired sessions removed");
        }

        sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                expires_at: now + self.ttl,
            },
        );
        token
    }

    /// Username behind a live token
    pub fn get(&self, token: &str) -> Option<String> {
        let now = Instant::now();
        let expired = match self.read().get(token) {
            Some(s) if s.expires_at > now => return Some(s.username.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.write().remove(token);
        }
        None
    }

    /// End a session; false when the token was unknown
    pub fn remove(&self, token: &str) -> bool {
        self.write().remove(token).is_some()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.read().len()
    }
}

/// Session token from `Authorization: Bearer` or the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.as_secs()
    )
}

/// `Set-Cookie` value that clears the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
