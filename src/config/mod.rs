//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::fetch::FetcherConfig;
use crate::models::Season;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Largest leaderboard page the backend serves.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Entries per leaderboard page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

fn default_user_agent() -> String {
    format!("ranked-stats/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            page_size: default_page_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl ApiConfig {
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
            user_agent: self.user_agent.clone(),
            page_size: self.page_size,
        }
    }
}

/// Ranked season configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonsConfig {
    /// Index of the active season
    #[serde(default = "default_current_season")]
    pub current: u32,

    /// Display names, first season first
    #[serde(default)]
    pub names: Vec<String>,
}

fn default_current_season() -> u32 {
    4
}

impl Default for SeasonsConfig {
    fn default() -> Self {
        Self {
            current: default_current_season(),
            names: (1..=default_current_season())
                .map(|i| format!("Season {}", i))
                .collect(),
        }
    }
}

impl SeasonsConfig {
    /// Descriptor for a season, `None` outside `1..=current`.
    pub fn season(&self, index: u32) -> Option<Season> {
        if index == 0 || index > self.current {
            return None;
        }
        let name = self
            .names
            .get(index as usize - 1)
            .cloned()
            .unwrap_or_else(|| format!("Season {}", index));
        Some(Season::new(index, name, self.current))
    }

    pub fn current_season(&self) -> Option<Season> {
        self.season(self.current)
    }

    /// Every configured season, oldest first.
    pub fn all(&self) -> Vec<Season> {
        (1..=self.current).filter_map(|i| self.season(i)).collect()
    }
}

/// Elo histogram configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Width of each histogram bucket in elo
    #[serde(default = "default_elo_precision")]
    pub elo_precision: i64,
}

fn default_elo_precision() -> i64 {
    10
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            elo_precision: default_elo_precision(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub seasons: SeasonsConfig,

    #[serde(default)]
    pub distribution: DistributionConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            seasons: SeasonsConfig::default(),
            distribution: DistributionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.distribution.elo_precision <= 0 {
            return Err(ConfigError::ValidationError(
                "Elo precision must be greater than 0".to_string(),
            ));
        }

        if self.seasons.current == 0 {
            return Err(ConfigError::ValidationError(
                "Current season must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.api.page_size, 100);
        assert_eq!(config.seasons.current, 4);
        assert_eq!(config.distribution.elo_precision, 10);
    }

    #[test]
    fn test_config_validation_ok() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_page_size() {
        let mut config = AppConfig::default();
        config.api.page_size = 0;
        assert!(config.validate().is_err());

        config.api.page_size = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_precision() {
        let mut config = AppConfig::default();
        config.distribution.elo_precision = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_season() {
        let mut config = AppConfig::default();
        config.seasons.current = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_season_descriptors() {
        let seasons = SeasonsConfig {
            current: 3,
            names: vec!["Launch".to_string(), "Season 2".to_string()],
        };

        let first = seasons.season(1).unwrap();
        assert_eq!(first.name, "Launch");
        assert!(first.is_first && !first.is_last);

        let third = seasons.season(3).unwrap();
        assert_eq!(third.name, "Season 3");
        assert!(third.is_last);

        assert!(seasons.season(0).is_none());
        assert!(seasons.season(4).is_none());
        assert_eq!(seasons.all().len(), 3);
        assert_eq!(seasons.current_season().unwrap().index, 3);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"

[api]
base_url = "https://ranked.example.com/api"

[seasons]
current = 2
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api.base_url, "https://ranked.example.com/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.seasons.current, 2);
        assert!(config.seasons.names.is_empty());
        assert_eq!(config.seasons.season(2).unwrap().name, "Season 2");
    }

    #[test]
    fn test_example_config_parses() {
        let config: AppConfig =
            toml::from_str(include_str!("../../ranked-stats.example.toml")).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.seasons.all().len(), 4);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[distribution]\nelo_precision = -5").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.seasons.current, 4);
    }

    #[test]
    fn test_fetcher_config_from_api() {
        let api = ApiConfig {
            timeout_seconds: 5,
            page_size: 250,
            ..ApiConfig::default()
        };
        let fetcher = api.fetcher_config();
        assert_eq!(fetcher.timeout, Duration::from_secs(5));
        assert_eq!(fetcher.page_size, 250);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.seasons.names, parsed.seasons.names);
        assert_eq!(config.api.base_url, parsed.api.base_url);
    }
}
