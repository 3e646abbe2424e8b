/// End-to-end tests for the CLI exit contract
///
/// Network-free: these only exercise the paths that terminate before any
/// upstream request is issued.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Exit code 4 with the fixed failure payload when the credential is absent.
#[test]
fn test_missing_token_prints_failure_payload() {
    cargo_bin_cmd!("codeql-harvest")
        .env_remove("CODEQL_GITHUB_TOKEN")
        .assert()
        .code(4)
        .stdout(predicate::str::contains(
            "Internal Server Error: Missing Configuration",
        ));
}

/// An empty credential counts as absent.
#[test]
fn test_empty_token_counts_as_missing() {
    cargo_bin_cmd!("codeql-harvest")
        .env("CODEQL_GITHUB_TOKEN", "")
        .assert()
        .code(4)
        .stdout(predicate::str::contains("Missing Configuration"));
}

/// Exit code 0: --help should return success
#[test]
fn test_exit_code_help() {
    cargo_bin_cmd!("codeql-harvest").arg("--help").assert().code(0);
}

/// Exit code 0: --version should return success
#[test]
fn test_exit_code_version() {
    cargo_bin_cmd!("codeql-harvest")
        .arg("--version")
        .assert()
        .code(0);
}

/// Exit code 2: Invalid arguments
#[test]
fn test_exit_code_invalid_argument() {
    cargo_bin_cmd!("codeql-harvest")
        .arg("--invalid-option")
        .assert()
        .code(2);
}

/// A malformed bucket destination is caught before any request is issued.
#[test]
fn test_invalid_bucket_spec_fails_fast() {
    cargo_bin_cmd!("codeql-harvest")
        .env("CODEQL_GITHUB_TOKEN", "ghp_test")
        .args(["--bucket", "gs://"])
        .assert()
        .code(3);
}
