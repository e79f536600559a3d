//! Command handlers, one module per top-level subcommand.

pub mod devices;
pub mod session;

use cuelink_api::CueClient;

use crate::error::CliError;

/// Login if the cached session is no longer accepted.
///
/// Device commands call this first so a stale or absent session is
/// transparently refreshed before the real request.
pub async fn ensure_session(client: &mut CueClient) -> Result<(), CliError> {
    if client.is_session_active().await {
        return Ok(());
    }
    tracing::debug!("session not active, logging in");
    client
        .login()
        .await
        .map(|_| ())
        .map_err(|source| CliError::LoginFailed { source })
}
