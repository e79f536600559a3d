//! Clap derive structures for the `cuelink` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cuelink -- manage Arista CV-CUE access points from the command line
#[derive(Debug, Parser)]
#[command(
    name = "cuelink",
    version,
    about = "Manage Arista CV-CUE wireless networks from the command line",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API key ID
    #[arg(long, env = "CV_CUE_KEY_ID", global = true, hide_env = true)]
    pub key_id: Option<String>,

    /// API key value
    #[arg(long, env = "CV_CUE_KEY_VALUE", global = true, hide_env = true)]
    pub key_value: Option<String>,

    /// Client identifier sent at login
    #[arg(long, env = "CV_CUE_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// API base URL (e.g. https://tenant.example.com/wifi/api)
    #[arg(long, short = 'c', env = "CV_CUE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Session cache file (default: .session in the working directory)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Config file path (default: platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "json", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Human-readable table
    Table,
    /// One `name - macaddress` line per device (scripting)
    Compact,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the cached API session
    Session(SessionArgs),

    /// Managed device (access point) operations
    #[command(alias = "dev")]
    Devices(DevicesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Login and cache a new session
    Login,
    /// Check whether the cached session is still active
    Status,
    /// Delete the cached session
    Clear,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List one page of access points
    List(ListApsArgs),
    /// Fetch every access point across all pages
    FetchAll(FetchAllArgs),
}

/// Filter flags shared by `list` and `fetch-all`.
#[derive(Debug, Args)]
pub struct FilterOpts {
    /// Filter by active status
    #[arg(long)]
    pub active: Option<bool>,

    /// Filter by model (repeatable)
    #[arg(long)]
    pub model: Vec<String>,

    /// Filter by name (repeatable)
    #[arg(long)]
    pub name: Vec<String>,

    /// Advanced filter PROPERTY:OPERATOR:VALUE (repeatable),
    /// e.g. name:contains:Arista
    #[arg(long = "filter", value_name = "PROPERTY:OPERATOR:VALUE")]
    pub filters: Vec<String>,

    /// Logical operator combining advanced filters
    #[arg(long, default_value = "AND", value_parser = ["AND", "OR"])]
    pub filter_operator: String,
}

#[derive(Debug, Args)]
pub struct ListApsArgs {
    /// Results per page
    #[arg(long, default_value = "10")]
    pub pagesize: u64,

    /// Start index for pagination
    #[arg(long, default_value = "0")]
    pub startindex: u64,

    /// Include the total count in the response
    #[arg(long)]
    pub total_count: bool,

    /// Restrict to one location
    #[arg(long)]
    pub location_id: Option<i64>,

    /// Column to sort by
    #[arg(long, default_value = "boxid")]
    pub sortby: String,

    /// Sort in descending order
    #[arg(long)]
    pub descending: bool,

    #[command(flatten)]
    pub filter: FilterOpts,
}

#[derive(Debug, Args)]
pub struct FetchAllArgs {
    /// Results fetched per page
    #[arg(long, default_value = "100")]
    pub pagesize: u64,

    /// Abort after this many pages (default: unbounded)
    #[arg(long)]
    pub max_pages: Option<u64>,

    /// Print only the device count
    #[arg(long)]
    pub count: bool,

    #[command(flatten)]
    pub filter: FilterOpts,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
