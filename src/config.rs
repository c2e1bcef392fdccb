//! Configuration for Movietime
//!
//! Settings are read from a TOML file (by default `config.toml` in the
//! platform config directory), then API keys can be overridden from the
//! environment. Every section has defaults so an empty or missing file works.

use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the RapidAPI (Flixster) key
pub const RAPIDAPI_KEY_ENV: &str = "MOVIETIME_RAPIDAPI_KEY";
/// Environment variable overriding the OMDb key
pub const OMDB_KEY_ENV: &str = "MOVIETIME_OMDB_API_KEY";
/// Environment variable overriding the SerpApi key
pub const SERPAPI_KEY_ENV: &str = "MOVIETIME_SERPAPI_KEY";

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for our schema
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,

    pub defaults: DefaultsConfig,

    pub storage: StorageConfig,

    /// Log filter used when `RUST_LOG` is not set
    pub log_level: Option<String>,
}

/// Endpoints and credentials of the external data sources
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub rapidapi_key: Option<String>,
    pub rapidapi_host: String,
    pub flixster_base_url: String,
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
    pub serpapi_key: Option<String>,
    pub serpapi_base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            rapidapi_key: None,
            rapidapi_host: "flixster.p.rapidapi.com".to_string(),
            flixster_base_url: "https://flixster.p.rapidapi.com/movies".to_string(),
            omdb_api_key: None,
            omdb_base_url: "http://www.omdbapi.com".to_string(),
            serpapi_key: None,
            serpapi_base_url: "https://serpapi.com/search.json".to_string(),
        }
    }
}

/// Default theater used for preloading and the "playing now" list
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub theater: String,
    pub location: String,
    /// Country passed to the upcoming-releases feed
    pub country_id: String,
    /// Maximum number of upcoming releases requested
    pub upcoming_limit: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            theater: "Ann Arbor 20 IMAX".to_string(),
            location: "Ann Arbor, Michigan, United States".to_string(),
            country_id: "usa".to_string(),
            upcoming_limit: 100,
        }
    }
}

/// Where cache files and the saved index live
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Cache directory; the platform cache dir when unset
    pub cache_dir: Option<PathBuf>,
    /// Saved index file; `tree.json` inside the cache directory when unset
    pub index_file: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults. An
    /// explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Default config file path (`~/.config/movietime/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "movietime").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Overrides API keys with non-empty values returned by `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(RAPIDAPI_KEY_ENV) {
            self.api.rapidapi_key = Some(key);
        }
        if let Some(key) = get(OMDB_KEY_ENV) {
            self.api.omdb_api_key = Some(key);
        }
        if let Some(key) = get(SERPAPI_KEY_ENV) {
            self.api.serpapi_key = Some(key);
        }
    }

    /// Resolved cache directory
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.storage.cache_dir.clone().or_else(|| {
            ProjectDirs::from("", "", "movietime").map(|dirs| dirs.cache_dir().to_path_buf())
        })
    }

    /// Resolved path of the saved showtime index
    pub fn index_file(&self) -> PathBuf {
        match (&self.storage.index_file, self.cache_dir()) {
            (Some(path), _) => path.clone(),
            (None, Some(dir)) => dir.join("tree.json"),
            (None, None) => PathBuf::from("tree.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.defaults.theater, "Ann Arbor 20 IMAX");
        assert_eq!(config.defaults.upcoming_limit, 100);
        assert!(config.api.omdb_api_key.is_none());
        assert!(config.api.flixster_base_url.ends_with("/movies"));
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
log_level = "debug"

[api]
omdb_api_key = "from-file"

[defaults]
theater = "State Theatre"
"#,
        )
        .unwrap();

        let mut config = Config::from_file(&path).unwrap();
        config.apply_env_overrides(|_| None);

        assert_eq!(config.api.omdb_api_key.as_deref(), Some("from-file"));
        assert_eq!(config.defaults.theater, "State Theatre");
        assert_eq!(config.defaults.location, "Ann Arbor, Michigan, United States");
        assert_eq!(config.api.rapidapi_host, "flixster.p.rapidapi.com");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[api\nbroken").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides_api_keys() {
        let mut config = Config::default();
        config.api.omdb_api_key = Some("file".to_string());

        let env: HashMap<&str, &str> = [
            (RAPIDAPI_KEY_ENV, "rapid"),
            (OMDB_KEY_ENV, "omdb"),
            (SERPAPI_KEY_ENV, "  "),
        ]
        .into_iter()
        .collect();
        config.apply_env_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.rapidapi_key.as_deref(), Some("rapid"));
        assert_eq!(config.api.omdb_api_key.as_deref(), Some("omdb"));
        assert!(config.api.serpapi_key.is_none(), "blank values are ignored");
    }

    #[test]
    fn test_cache_dir_prefers_storage_setting() {
        let mut config = Config::default();
        if let Some(dir) = config.cache_dir() {
            assert!(dir.to_string_lossy().contains("movietime"));
        }
        // None is fine when there is no home directory (e.g. in CI)

        config.storage.cache_dir = Some(PathBuf::from("/tmp/movietime-cache"));
        assert_eq!(config.cache_dir(), Some(PathBuf::from("/tmp/movietime-cache")));
    }

    #[test]
    fn test_index_file_defaults_to_cache_dir() {
        let mut config = Config::default();
        config.storage.cache_dir = Some(PathBuf::from("/tmp/movietime-cache"));
        assert_eq!(
            config.index_file(),
            PathBuf::from("/tmp/movietime-cache/tree.json")
        );

        config.storage.index_file = Some(PathBuf::from("/tmp/saved.json"));
        assert_eq!(config.index_file(), PathBuf::from("/tmp/saved.json"));
    }
}
