//! Configuration file loading for the assistant.
//!
//! Settings come from `assistant.toml`; every field is optional and a missing
//! file means all defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Assistant settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AssistantConfig {
    /// Directory holding the `a.tsv` .. `e.tsv` opening files.
    #[serde(default = "default_openings_dir")]
    pub openings_dir: PathBuf,
    /// Command line of the analysis engine.
    #[serde(default = "default_engine")]
    pub engine: String,
    /// How long the engine searches before `stop`.
    #[serde(default = "default_think_time_ms")]
    pub think_time_ms: u64,
    /// How long to wait for a position score.
    #[serde(default = "default_score_timeout_ms")]
    pub score_timeout_ms: u64,
    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_openings_dir() -> PathBuf {
    PathBuf::from("openings")
}

fn default_engine() -> String {
    "stockfish".to_string()
}

fn default_think_time_ms() -> u64 {
    1000
}

fn default_score_timeout_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            openings_dir: default_openings_dir(),
            engine: default_engine(),
            think_time_ms: default_think_time_ms(),
            score_timeout_ms: default_score_timeout_ms(),
            log_level: default_log_level(),
        }
    }
}

impl AssistantConfig {
    /// Default location of the configuration file.
    pub const DEFAULT_PATH: &'static str = "assistant.toml";

    /// Loads the configuration, falling back to defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_time_ms)
    }

    pub fn score_timeout(&self) -> Duration {
        Duration::from_millis(self.score_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_defaults() {
        let config: AssistantConfig = toml::from_str("").unwrap();
        assert_eq!(config, AssistantConfig::default());
        assert_eq!(config.openings_dir, PathBuf::from("openings"));
        assert_eq!(config.engine, "stockfish");
        assert_eq!(config.think_time(), Duration::from_secs(1));
        assert_eq!(config.score_timeout(), Duration::from_secs(1));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_parse_partial_config() {
        let config: AssistantConfig = toml::from_str(
            r#"
engine = "/usr/games/stockfish"
think_time_ms = 250
"#,
        )
        .unwrap();
        assert_eq!(config.engine, "/usr/games/stockfish");
        assert_eq!(config.think_time_ms, 250);
        assert_eq!(config.score_timeout_ms, 1000);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AssistantConfig::load(&dir.path().join("assistant.toml")).unwrap();
        assert_eq!(config, AssistantConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assistant.toml");
        std::fs::write(&path, "openings_dir = \"/srv/openings\"\nlog_level = \"debug\"\n").unwrap();
        let config = AssistantConfig::load(&path).unwrap();
        assert_eq!(config.openings_dir, PathBuf::from("/srv/openings"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assistant.toml");
        std::fs::write(&path, "think_time_ms = \"soon\"").unwrap();
        assert!(matches!(
            AssistantConfig::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
