//! Integration tests for CLI argument handling
//!
//! Runs the binary for flags that exit before the interactive menu starts,
//! and the menu itself against a cache directory prepared on disk.

use std::io::Write;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_movietime"))
        .args(args)
        .output()
        .expect("Failed to execute movietime")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("movietime"), "Help should mention movietime");
    assert!(stdout.contains("--cache-dir"), "Help should mention --cache-dir");
    assert!(stdout.contains("--no-preload"), "Help should mention --no-preload");
}

#[test]
fn test_empty_theater_prints_error_and_exits() {
    let output = run_cli(&["--theater", "", "--no-preload"]);
    assert!(!output.status.success(), "Expected empty theater to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid value for --theater"),
        "Should print error message about the empty theater: {}",
        stderr
    );
}

#[test]
fn test_missing_config_file_prints_error_and_exits() {
    let output = run_cli(&["--config", "/nonexistent/movietime.toml", "--no-preload"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config file"), "stderr: {}", stderr);
}

#[test]
fn test_menu_reads_cached_title_and_exits() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    std::fs::write(
        temp_dir.path().join("movie_detail_cache.json"),
        r#"{"Arrival": {"Response": "True", "Title": "Arrival", "Released": "11 Nov 2016"}}"#,
    )
    .unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_movietime"))
        .args(["--no-preload", "--cache-dir"])
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute movietime");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"3\nArrival\n\n5\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Movietime!"));
    assert!(stdout.contains("  Released: 11 Nov 2016"));
    assert!(stdout.contains("Thank you for using Movietime!"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use movietime::cli::{Cli, StartupConfig};
    use movietime::config::Config;

    #[test]
    fn test_cli_no_args_preloads() {
        let cli = Cli::parse_from(["movietime"]);
        let startup = StartupConfig::with_config(&cli, Config::default()).unwrap();
        assert!(startup.preload);
    }

    #[test]
    fn test_cli_location_override() {
        let cli = Cli::parse_from(["movietime", "--location", "Detroit, Michigan, United States"]);
        let startup = StartupConfig::with_config(&cli, Config::default()).unwrap();
        assert_eq!(
            startup.config.defaults.location,
            "Detroit, Michigan, United States"
        );
    }

    #[test]
    fn test_cli_empty_location_is_error() {
        let cli = Cli::parse_from(["movietime", "--location", ""]);
        assert!(StartupConfig::with_config(&cli, Config::default()).is_err());
    }
}
