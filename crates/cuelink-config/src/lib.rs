//! Configuration and credential resolution for cuelink.
//!
//! Credentials come from three layers, highest priority first: explicit
//! overrides (CLI flags), `CV_CUE_*` environment variables, and a TOML
//! config file. All four credential fields are required; a client is
//! never constructed from a partial set.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use cuelink_api::{Credentials, DEFAULT_SESSION_FILE};

/// Environment variables recognized for credential resolution.
pub const ENV_KEY_ID: &str = "CV_CUE_KEY_ID";
pub const ENV_KEY_VALUE: &str = "CV_CUE_KEY_VALUE";
pub const ENV_CLIENT_ID: &str = "CV_CUE_CLIENT_ID";
pub const ENV_BASE_URL: &str = "CV_CUE_BASE_URL";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {field}: pass it explicitly or set {env}")]
    MissingCredential {
        field: &'static str,
        env: &'static str,
    },

    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File / environment layer ────────────────────────────────────────

/// Fields accepted in the TOML config file and the `CV_CUE_*`
/// environment (environment wins over file).
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub key_id: Option<String>,
    pub key_value: Option<String>,
    pub client_id: Option<String>,
    pub base_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub insecure: Option<bool>,
}

/// Default config file location (`~/.config/cuelink/config.toml` on
/// Linux), falling back to the working directory.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "cuelink").map_or_else(
        || PathBuf::from("cuelink.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn load_layers(config_file: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = config_file.map_or_else(config_path, Path::to_path_buf);
    let config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("CV_CUE_"))
        .extract()?;
    Ok(config)
}

// ── Resolution ──────────────────────────────────────────────────────

/// Explicit overrides, typically CLI flags. Always win over environment
/// and file values.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub key_id: Option<String>,
    pub key_value: Option<String>,
    pub client_id: Option<String>,
    pub base_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub insecure: Option<bool>,
}

/// Everything a client needs, fully resolved.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub credentials: Credentials,
    pub session_file: PathBuf,
    pub timeout: Duration,
    pub insecure: bool,
}

/// Resolve credentials and client settings from overrides > environment
/// > config file.
///
/// Fails with [`ConfigError::MissingCredential`] when any of the four
/// required fields is absent from every layer, and validates the base
/// URL up front.
pub fn resolve(
    overrides: Overrides,
    config_file: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_layers(config_file)?;

    let key_id = overrides
        .key_id
        .or(file.key_id)
        .ok_or(ConfigError::MissingCredential {
            field: "API key ID",
            env: ENV_KEY_ID,
        })?;
    let key_value = overrides
        .key_value
        .or(file.key_value)
        .ok_or(ConfigError::MissingCredential {
            field: "API key value",
            env: ENV_KEY_VALUE,
        })?;
    let client_id = overrides
        .client_id
        .or(file.client_id)
        .ok_or(ConfigError::MissingCredential {
            field: "client identifier",
            env: ENV_CLIENT_ID,
        })?;
    let base_url = overrides
        .base_url
        .or(file.base_url)
        .ok_or(ConfigError::MissingCredential {
            field: "base URL",
            env: ENV_BASE_URL,
        })?;

    let base_url = base_url.trim_end_matches('/').to_owned();
    Url::parse(&base_url).map_err(|source| ConfigError::InvalidBaseUrl {
        url: base_url.clone(),
        source,
    })?;

    Ok(ResolvedConfig {
        credentials: Credentials {
            key_id,
            key_value: SecretString::from(key_value),
            client_id,
            base_url,
        },
        session_file: overrides
            .session_file
            .or(file.session_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
        timeout: Duration::from_secs(overrides.timeout.or(file.timeout).unwrap_or(30)),
        insecure: overrides.insecure.or(file.insecure).unwrap_or(false),
    })
}
