mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cuelink_api::{CueClient, SessionStore, TransportConfig};
use cuelink_config::Overrides;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Completions don't need credentials or a client.
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "cuelink", &mut std::io::stdout());
            Ok(())
        }

        Command::Session(args) => {
            let mut client = build_client(&cli.global)?;
            commands::session::handle(&mut client, args, &cli.global).await
        }

        Command::Devices(args) => {
            let mut client = build_client(&cli.global)?;
            commands::devices::handle(&mut client, args, &cli.global).await
        }
    }
}

/// Resolve configuration and construct the API client.
fn build_client(global: &GlobalOpts) -> Result<CueClient, CliError> {
    let overrides = Overrides {
        key_id: global.key_id.clone(),
        key_value: global.key_value.clone(),
        client_id: global.client_id.clone(),
        base_url: global.base_url.clone(),
        session_file: global.session_file.clone(),
        timeout: global.timeout,
        insecure: global.insecure.then_some(true),
    };
    let resolved = cuelink_config::resolve(overrides, global.config.as_deref())?;

    let transport = TransportConfig {
        timeout: resolved.timeout,
        accept_invalid_certs: resolved.insecure,
    };
    let store = SessionStore::new(resolved.session_file);

    Ok(CueClient::with_transport(
        resolved.credentials,
        &transport,
        store,
    )?)
}
