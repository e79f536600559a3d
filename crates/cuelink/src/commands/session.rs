//! Session command handlers.

use cuelink_api::CueClient;

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &mut CueClient,
    args: SessionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SessionCommand::Login => {
            let response = client
                .login()
                .await
                .map_err(|source| CliError::LoginFailed { source })?;
            if !global.quiet {
                eprintln!("Login successful");
            }
            if global.verbose > 0 {
                output::print_output(&output::render_json(&response), global.quiet);
            }
            Ok(())
        }

        SessionCommand::Status => {
            if client.is_session_active().await {
                output::print_output("Session is active", global.quiet);
            } else {
                output::print_output(
                    "Session is not active\nRun 'cuelink session login' to create a new session",
                    global.quiet,
                );
            }
            Ok(())
        }

        SessionCommand::Clear => {
            client.clear_session();
            if !global.quiet {
                eprintln!("Session cache cleared");
            }
            Ok(())
        }
    }
}
