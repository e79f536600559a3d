// CV-CUE HTTP client
//
// Wraps `reqwest::Client` with base-URL path concatenation, explicit
// cookie handling (so the session can be persisted across processes),
// and non-2xx status mapping. Resource endpoints (managed devices) are
// reached through accessor methods — explicit composition, no registry.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use url::Url;

use crate::devices::ManagedDevices;
use crate::error::Error;
use crate::session::{DEFAULT_SESSION_FILE, SessionState, SessionStore};
use crate::transport::TransportConfig;

/// The cookie whose presence marks "has a session".
///
/// Matches the wireless manager's behavior: one named cookie is the sole
/// authentication signal.
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// Login session lifetime requested from the API, in minutes.
const SESSION_TIMEOUT_MINUTES: u32 = 300;

/// Resolved credentials for one CV-CUE tenant.
///
/// Produced by `cuelink-config` from explicit overrides, `CV_CUE_*`
/// environment variables, and the config file. Immutable for the
/// client's lifetime.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key_id: String,
    pub key_value: SecretString,
    pub client_id: String,
    /// Base URL including any path prefix, e.g.
    /// `https://tenant.example.com/wifi/api`. Trailing slashes are
    /// stripped at construction.
    pub base_url: String,
}

/// Client for the CV-CUE REST API.
///
/// Owns the HTTP transport, the resolved credentials, and the cached
/// session cookies. One instance is single-owner: methods that change
/// session state take `&mut self`.
pub struct CueClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    store: SessionStore,
    session: SessionState,
}

impl CueClient {
    /// Create a client with default transport settings and the default
    /// session cache path (`.session` in the working directory).
    pub fn new(credentials: Credentials) -> Result<Self, Error> {
        Self::with_transport(
            credentials,
            &TransportConfig::default(),
            SessionStore::new(DEFAULT_SESSION_FILE),
        )
    }

    /// Create a client with explicit transport settings and session store.
    ///
    /// The cached session (if any) is loaded here; a corrupt cache is
    /// discarded by the store and the client starts unauthenticated.
    pub fn with_transport(
        credentials: Credentials,
        transport: &TransportConfig,
        store: SessionStore,
    ) -> Result<Self, Error> {
        let base_url = credentials.base_url.trim_end_matches('/').to_owned();
        // Catch malformed base URLs before the first request.
        Url::parse(&base_url)?;

        let http = transport.build_client()?;
        let session = store.load();

        Ok(Self {
            http,
            base_url,
            credentials,
            store,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    /// Managed device (access point) operations.
    pub fn managed_devices(&self) -> ManagedDevices<'_> {
        ManagedDevices::new(self)
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        let full = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Ok(Url::parse(&full)?)
    }

    /// Issue a request and return the parsed JSON response.
    ///
    /// The session cookies ride along as a `Cookie` header. Bodiless
    /// requests still carry `Content-Type: application/json` — the API
    /// requires it. Any non-2xx status maps to [`Error::HttpStatus`] with
    /// the response body preserved; an empty 2xx body parses as JSON null.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        self.send(method, path, query, body, &[]).await
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        headers: &[(&'static str, &str)],
    ) -> Result<Value, Error> {
        let url = self.url(path)?;
        debug!(%method, %url, "dispatching request");

        let mut req = self.http.request(method, url);
        if !query.is_empty() {
            req = req.query(query);
        }
        req = match body {
            Some(body) => req.json(body),
            None => req.header(CONTENT_TYPE, "application/json"),
        };
        if let Some(cookie) = self.session.cookie_header() {
            req = req.header(COOKIE, cookie);
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "request failed");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_json_body(&text)
    }

    /// `GET {base}{path}`.
    pub async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, Error> {
        self.request(Method::GET, path, query, None).await
    }

    /// `POST {base}{path}` with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// `PUT {base}{path}` with a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, Error> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    /// `DELETE {base}{path}`.
    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        self.request(Method::DELETE, path, &[], None).await
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Authenticate with the API-key credentials and cache the session.
    ///
    /// Cookies from the login response replace the in-memory set and are
    /// persisted through the session store. Nothing is persisted on
    /// failure. Returns the login endpoint's JSON response.
    pub async fn login(&mut self) -> Result<Value, Error> {
        let url = self.url("/session")?;
        debug!(%url, "logging in");

        let body = json!({
            "type": "apiKeyCredentials",
            "keyId": self.credentials.key_id,
            "keyValue": self.credentials.key_value.expose_secret(),
            "clientIdentifier": self.credentials.client_id,
            "timeout": SESSION_TIMEOUT_MINUTES,
        });

        let resp = self.http.post(url).json(&body).send().await?;
        let status = resp.status();

        let set_cookies: Vec<String> = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(ToOwned::to_owned))
            .collect();
        let text = resp.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "login failed");
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        for header in &set_cookies {
            self.session.absorb_set_cookie(header);
        }
        self.store.save(&self.session);
        info!("login successful");

        parse_json_body(&text)
    }

    /// Whether the cached session is still accepted by the API.
    ///
    /// Returns `false` without any network traffic when the session
    /// cookie is absent. Otherwise probes `GET /session`: exactly 200
    /// means active; any other status or a transport failure means
    /// inactive. The stale cookie is left in place — callers decide
    /// whether to re-login.
    pub async fn is_session_active(&self) -> bool {
        if !self.session.contains(SESSION_COOKIE) {
            debug!("session inactive: {SESSION_COOKIE} cookie not cached");
            return false;
        }

        let Ok(url) = self.url("/session") else {
            return false;
        };
        debug!(%url, "probing session status");

        let mut req = self.http.get(url).header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = self.session.cookie_header() {
            req = req.header(COOKIE, cookie);
        }

        match req.send().await {
            Ok(resp) => {
                let active = resp.status() == reqwest::StatusCode::OK;
                debug!(status = resp.status().as_u16(), active, "session probe");
                active
            }
            Err(e) => {
                warn!(error = %e, "session probe failed");
                false
            }
        }
    }

    /// Drop the in-memory cookies and delete the cache file.
    pub fn clear_session(&mut self) {
        self.session = SessionState::default();
        self.store.clear();
    }
}

fn parse_json_body(text: &str) -> Result<Value, Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: text.to_owned(),
    })
}
