// Cookie cache for CV-CUE sessions.
//
// The wireless manager authenticates follow-up requests with cookies set
// by the login endpoint. `SessionState` is the in-memory name/value set;
// `SessionStore` persists it as a JSON blob so a new process can reuse a
// still-valid session instead of logging in again.
//
// Every filesystem failure here is soft: an unreadable cache is treated
// as "no session" and a corrupt one is deleted on sight.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default cache filename, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".session";

// ── State ────────────────────────────────────────────────────────────

/// The set of session cookies, keyed by cookie name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    cookies: BTreeMap<String, String>,
}

impl SessionState {
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Record the cookie pair from one `Set-Cookie` header value.
    ///
    /// Only the leading `name=value` segment is kept; attributes such as
    /// `Path` or `HttpOnly` are dropped. Malformed headers are ignored.
    pub fn absorb_set_cookie(&mut self, header: &str) {
        let pair = header.split(';').next().unwrap_or_default();
        if let Some((name, value)) = pair.split_once('=') {
            let name = name.trim();
            if !name.is_empty() {
                self.insert(name, value.trim());
            }
        }
    }

    /// The value for a `Cookie` request header, or `None` when there are
    /// no cookies to send.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let joined = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }
}

// ── Store ────────────────────────────────────────────────────────────

/// Persists a [`SessionState`] at a configurable file path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached session.
    ///
    /// A missing file yields an empty state. A file that cannot be read
    /// or parsed also yields an empty state; the corrupt file is removed
    /// so the next save starts clean.
    pub fn load(&self) -> SessionState {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return SessionState::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read session cache");
                return SessionState::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => {
                info!(path = %self.path.display(), "loaded cached session");
                state
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session cache is corrupt, discarding");
                if let Err(e) = fs::remove_file(&self.path) {
                    warn!(path = %self.path.display(), error = %e, "failed to remove corrupt session cache");
                }
                SessionState::default()
            }
        }
    }

    /// Save the session. I/O failures are logged, never raised — the
    /// caller proceeds without a persisted session.
    pub fn save(&self, state: &SessionState) {
        let encoded = match serde_json::to_vec(state) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode session cache");
                return;
            }
        };
        match fs::write(&self.path, encoded) {
            Ok(()) => info!(path = %self.path.display(), "saved session"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to save session cache");
            }
        }
    }

    /// Delete the cache file if present. Failures are logged, not raised.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => info!(path = %self.path.display(), "cleared session cache"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to clear session cache");
            }
        }
    }
}
