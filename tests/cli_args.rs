//! Integration tests for the tripcache binary
//!
//! Every case here avoids the network: inputs are rejected before any lookup,
//! API keys are removed, or the command only touches the local cache.

use std::process::Command;

use serde_json::Value;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tripcache"))
        .args(args)
        .env_remove("OPENWEATHER_API_KEY")
        .env_remove("FOURSQUARE_API_KEY")
        .env_remove("TRIPCACHE_CACHE_DIR")
        .env_remove("TRIPCACHE_TIMEOUT_SECS")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute tripcache")
}

/// The JSON error document is the last line on stderr, after any logs
fn error_document(output: &std::process::Output) -> Value {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let last = stderr.lines().last().unwrap_or_default();
    serde_json::from_str(last).unwrap_or_else(|e| panic!("stderr is not JSON ({}): {}", e, stderr))
}

fn stdout_document(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be one JSON document")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tripcache"), "Help should mention tripcache");
    assert!(stdout.contains("convert"), "Help should list the convert command");
    assert!(stdout.contains("--no-persist"));
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_negative_amount_prints_json_error() {
    let output = run_cli(&["--no-persist", "convert", "-5", "USD", "EUR"]);
    assert!(!output.status.success(), "Expected negative amount to fail");

    let error = error_document(&output);
    assert_eq!(error["error"], "invalid_input");
    assert_eq!(error["retryable"], false);
    assert!(error["message"].as_str().unwrap().contains("positive number"));
}

#[test]
fn test_invalid_currency_code_prints_json_error() {
    let output = run_cli(&["--no-persist", "convert", "10", "US", "EUR"]);
    assert!(!output.status.success());

    let error = error_document(&output);
    assert_eq!(error["error"], "invalid_input");
    assert!(error["message"].as_str().unwrap().contains("currency code"));
}

#[test]
fn test_zero_timeout_is_rejected() {
    let output = run_cli(&["--timeout-secs", "0", "countries"]);
    assert!(!output.status.success());
    assert_eq!(error_document(&output)["error"], "invalid_argument");
}

#[test]
fn test_weather_without_key_is_configuration_error() {
    let output = run_cli(&["--no-persist", "weather", "Paris"]);
    assert!(!output.status.success());

    let error = error_document(&output);
    assert_eq!(error["error"], "configuration");
    assert!(error["message"].as_str().unwrap().contains("OPENWEATHER_API_KEY"));
}

#[test]
fn test_attractions_without_key_serve_mock_data() {
    let output = run_cli(&["--no-persist", "attractions", "Japan", "--limit", "2"]);
    assert!(output.status.success());

    let body = stdout_document(&output);
    assert_eq!(body["cached"], false);
    assert_eq!(body["source"], "Fallback data");
    assert_eq!(body["location"], "Japan");
    assert_eq!(body["total"], 3);
    assert_eq!(body["attractions"].as_array().unwrap().len(), 2);
    assert_eq!(body["attractions"][0]["name"], "Tokyo Tower");
    assert!(body["note"].as_str().unwrap().contains("FOURSQUARE_API_KEY"));
}

#[test]
fn test_attractions_limit_out_of_range() {
    let output = run_cli(&["--no-persist", "attractions", "Japan", "--limit", "51"]);
    assert!(!output.status.success());
    assert_eq!(error_document(&output)["error"], "invalid_input");
}

#[test]
fn test_mock_attraction_details() {
    let output = run_cli(&["--no-persist", "attraction", "mock_jp_1"]);
    assert!(output.status.success());

    let body = stdout_document(&output);
    assert_eq!(body["attraction"]["id"], "mock_jp_1");
    assert_eq!(body["attraction"]["name"], "Sample Attraction");
    assert_eq!(body["source"], "Fallback data");
}

#[test]
fn test_sweep_on_empty_cache_dir() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = run_cli(&["--cache-dir", dir.path().to_str().unwrap(), "sweep"]);
    assert!(output.status.success());
    assert_eq!(stdout_document(&output)["removed"], 0);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use tripcache::cli::{Cli, Command};
    use tripcache::config::Config;

    #[test]
    fn test_cli_country_command() {
        let cli = Cli::parse_from(["tripcache", "country", "fr"]);
        assert_eq!(cli.command, Command::Country { code: "fr".into() });
    }

    #[test]
    fn test_cli_sweep_watch_interval() {
        let cli = Cli::parse_from(["tripcache", "sweep", "--watch", "--interval-secs", "60"]);
        assert_eq!(
            cli.command,
            Command::Sweep {
                watch: true,
                interval_secs: 60,
            }
        );
    }

    #[test]
    fn test_config_from_cli_defaults_timeout() {
        let cli = Cli::parse_from(["tripcache", "--no-persist", "countries"]);
        let config = Config::from_cli(&cli).unwrap();
        assert!(config.in_memory);
        assert_eq!(config.timeout.as_secs(), cli.timeout_secs);
    }
}
