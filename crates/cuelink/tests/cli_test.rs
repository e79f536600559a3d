#![allow(clippy::unwrap_used)]
// End-to-end CLI smoke tests. Nothing here talks to a real wireless
// manager; these cover argument parsing, help text, and configuration
// failures.

use assert_cmd::Command;
use predicates::prelude::*;

/// A `cuelink` command with every credential source stripped.
fn bare_command() -> Command {
    let mut cmd = Command::cargo_bin("cuelink").unwrap();
    cmd.env_remove("CV_CUE_KEY_ID")
        .env_remove("CV_CUE_KEY_VALUE")
        .env_remove("CV_CUE_CLIENT_ID")
        .env_remove("CV_CUE_BASE_URL");
    cmd
}

#[test]
fn help_lists_subcommands() {
    bare_command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn no_arguments_prints_usage() {
    bare_command().assert().failure().code(2);
}

#[test]
fn missing_credentials_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    bare_command()
        .current_dir(dir.path())
        .args(["--config", "does-not-exist.toml", "session", "status"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("CV_CUE_KEY_ID"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    bare_command()
        .current_dir(dir.path())
        .args([
            "--config",
            "does-not-exist.toml",
            "--key-id",
            "k",
            "--key-value",
            "v",
            "--client-id",
            "c",
            "--base-url",
            "not a url",
            "session",
            "status",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid base URL"));
}

#[test]
fn invalid_filter_operator_is_rejected_by_clap() {
    bare_command()
        .args(["devices", "list", "--filter-operator", "XOR"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn completions_generate_without_credentials() {
    bare_command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cuelink"));
}

#[test]
fn session_clear_works_without_a_cached_session() {
    let dir = tempfile::tempdir().unwrap();
    bare_command()
        .current_dir(dir.path())
        .args([
            "--config",
            "does-not-exist.toml",
            "--key-id",
            "k",
            "--key-value",
            "v",
            "--client-id",
            "c",
            "--base-url",
            "https://tenant.example.com/wifi/api",
            "session",
            "clear",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Session cache cleared"));
}
