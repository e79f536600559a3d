//! CLI error types with miette diagnostics.
//!
//! Maps library errors into user-facing diagnostics with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes for scripting (0 is success).
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(
        code(cuelink::config),
        help(
            "Pass --key-id, --key-value, --client-id and --base-url,\n\
             set the CV_CUE_* environment variables, or fill in the config file."
        )
    )]
    Config(#[from] cuelink_config::ConfigError),

    #[error("invalid --filter '{filter}'")]
    #[diagnostic(
        code(cuelink::invalid_filter),
        help(
            "Expected PROPERTY:OPERATOR:VALUE, e.g. name:contains:Arista.\n\
             Operators: equals, notEquals, lessThan, greaterThan,\n\
             lessThanOrEquals, greaterThanOrEquals, contains, notContains."
        )
    )]
    InvalidFilter { filter: String },

    #[error("login failed")]
    #[diagnostic(
        code(cuelink::auth_failed),
        help("Verify the API key ID/value and client identifier for this tenant.")
    )]
    LoginFailed {
        #[source]
        source: cuelink_api::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(cuelink::api))]
    Api(#[from] cuelink_api::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidFilter { .. } => exit_code::USAGE,
            Self::LoginFailed { .. } => exit_code::AUTH,
            Self::Api(err) => match err {
                cuelink_api::Error::HttpStatus { status: 401 | 403, .. } => exit_code::AUTH,
                cuelink_api::Error::Transport(_) => exit_code::CONNECTION,
                _ => exit_code::GENERAL,
            },
        }
    }
}
