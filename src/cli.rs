//! Command-line interface parsing for Movietime
//!
//! This module handles parsing of CLI arguments using clap and merges them
//! over the loaded configuration file.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{Config, ConfigError};

/// Default log filter when neither `RUST_LOG`, `--log-level` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// A flag was given an empty value
    #[error("Invalid value for --{0}: must not be empty")]
    EmptyArgument(&'static str),

    /// The configuration file could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Movietime - Look up movie showtimes, upcoming releases and movie details
#[derive(Parser, Debug)]
#[command(name = "movietime")]
#[command(about = "Movie showtimes, upcoming releases and title lookups with a local cache")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for cached API responses and the saved tree
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Default theater used for preloading and the playing-now list
    #[arg(long, value_name = "NAME")]
    pub theater: Option<String>,

    /// Location of the default theater, as "City, State, Country"
    #[arg(long, value_name = "TEXT")]
    pub location: Option<String>,

    /// Skip warming the caches at start-up
    #[arg(long)]
    pub no_preload: bool,

    /// Log filter, e.g. "debug" or "movietime=debug" (RUST_LOG takes precedence)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub config: Config,
    /// Whether to warm the caches before showing the menu
    pub preload: bool,
}

/// Returns `value` unless it is blank
fn non_empty(value: &Option<String>, flag: &'static str) -> Result<Option<String>, CliError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(CliError::EmptyArgument(flag)),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

impl StartupConfig {
    /// Loads the configuration file named by `--config` (or the default one)
    /// and applies the remaining flags over it.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let config = Config::load(cli.config.as_deref())?;
        Self::with_config(cli, config)
    }

    /// Applies CLI flags over an already loaded configuration
    pub fn with_config(cli: &Cli, mut config: Config) -> Result<Self, CliError> {
        if let Some(theater) = non_empty(&cli.theater, "theater")? {
            config.defaults.theater = theater;
        }
        if let Some(location) = non_empty(&cli.location, "location")? {
            config.defaults.location = location;
        }
        if let Some(dir) = &cli.cache_dir {
            config.storage.cache_dir = Some(dir.clone());
        }
        if let Some(filter) = non_empty(&cli.log_level, "log-level")? {
            config.log_level = Some(filter);
        }

        Ok(StartupConfig {
            config,
            preload: !cli.no_preload,
        })
    }

    /// Log filter to use when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &str {
        self.config.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
