use thiserror::Error;

/// Top-level error type for the `cuelink-api` crate.
///
/// Covers every failure mode the library surfaces: filter construction,
/// transport, HTTP status handling, response decoding, and pagination
/// limits. The CLI maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Filters ─────────────────────────────────────────────────────
    /// Unrecognized comparison or logical operator name.
    #[error("invalid operator '{operator}'")]
    InvalidOperator { operator: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API responses ───────────────────────────────────────────────
    /// Non-2xx HTTP status. The response body is kept for diagnostics.
    #[error("API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Pagination ──────────────────────────────────────────────────
    /// A full-collection fetch exceeded its configured page cap.
    #[error("pagination aborted after {pages} pages (cap exceeded)")]
    PageLimit { pages: u64 },
}

impl Error {
    /// The HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this error indicates the session is no longer
    /// accepted and a fresh login might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
