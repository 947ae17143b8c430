//! Configuration System
//!
//! Handles loading configuration from a TOML file and environment variables.
//! Environment variables override file settings.

use crate::charts::{ChartOptions, DEFAULT_TITLE};
use crate::query::YearRange;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input file settings
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    #[serde(default = "default_id_column")]
    pub id_column: String,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("gdp_pcap.csv")
}

fn default_id_column() -> String {
    "country".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            id_column: default_id_column(),
        }
    }
}

/// Default year range used when a query gives none
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_year_low")]
    pub year_low: i32,

    #[serde(default = "default_year_high")]
    pub year_high: i32,
}

fn default_year_low() -> i32 {
    1800
}

fn default_year_high() -> i32 {
    2100
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            year_low: default_year_low(),
            year_high: default_year_high(),
        }
    }
}

impl QueryConfig {
    pub fn default_range(&self) -> YearRange {
        YearRange::new(self.year_low, self.year_high)
    }
}

/// Chart image settings
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,

    #[serde(default = "default_chart_height")]
    pub height: u32,

    #[serde(default = "default_chart_title")]
    pub title: String,
}

fn default_chart_width() -> u32 {
    1200
}

fn default_chart_height() -> u32 {
    700
}

fn default_chart_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            title: default_chart_title(),
        }
    }
}

impl ChartConfig {
    pub fn options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            title: self.title.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load from default locations or environment
    /// Load the first config file found on the default search path, or
    /// defaults plus environment overrides when there is none. A file that
    /// exists but cannot be read or parsed is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("gdpview").join("config.toml")),
            Some(PathBuf::from("./gdpview.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        match Self::load_first(&config_paths)? {
            Some(config) => Ok(config),
            None => {
                tracing::debug!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Load the first of `paths` that exists.
    pub fn load_first(paths: &[PathBuf]) -> Result<Option<Self>, ConfigError> {
        for path in paths {
            if path.exists() {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                return Ok(Some(config));
            }
        }
        Ok(None)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `GDPVIEW_*` overrides read through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("GDPVIEW_DATA") {
            self.data.path = PathBuf::from(path);
        }
        if let Some(column) = lookup("GDPVIEW_ID_COLUMN") {
            self.data.id_column = column;
        }

        if let Some(low) = lookup("GDPVIEW_YEAR_LOW").and_then(|v| v.parse().ok()) {
            self.query.year_low = low;
        }
        if let Some(high) = lookup("GDPVIEW_YEAR_HIGH").and_then(|v| v.parse().ok()) {
            self.query.year_high = high;
        }

        if let Some(level) = lookup("GDPVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GDPVIEW_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# gdpview Configuration
#
# Environment variables override these settings:
# - GDPVIEW_DATA
# - GDPVIEW_ID_COLUMN
# - GDPVIEW_YEAR_LOW
# - GDPVIEW_YEAR_HIGH
# - GDPVIEW_LOG_LEVEL
# - GDPVIEW_LOG_FORMAT

[data]
# Wide CSV: one row per country, one column per year
path = "gdp_pcap.csv"

# Name of the identifier column
id_column = "country"

[query]
# Year range used when none is given
year_low = 1800
year_high = 2100

[chart]
width = 1200
height = 700
title = "GDP Per Capita over Time"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_generated_config_matches_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.data.path, defaults.data.path);
        assert_eq!(config.data.id_column, defaults.data.id_column);
        assert_eq!(config.query.default_range(), defaults.query.default_range());
        assert_eq!(config.chart.options(), defaults.chart.options());
        assert_eq!(config.logging.level, defaults.logging.level);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[query]\nyear_low = 1950\n").unwrap();
        assert_eq!(config.query.default_range(), YearRange::new(1950, 2100));
        assert_eq!(config.data.id_column, "country");
        assert_eq!(config.chart.width, 1200);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GDPVIEW_DATA", "/tmp/other.csv"),
            ("GDPVIEW_YEAR_HIGH", "2020"),
            ("GDPVIEW_YEAR_LOW", "not-a-year"),
            ("GDPVIEW_LOG_FORMAT", "json"),
        ]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.data.path, PathBuf::from("/tmp/other.csv"));
        assert_eq!(config.query.default_range(), YearRange::new(1800, 2020));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[query]\nyear_low = \"soon\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            Config::load(&dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_search_path_stops_at_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        let good = dir.path().join("gdpview.toml");
        std::fs::write(&broken, "[chart\nwidth = 10\n").unwrap();
        std::fs::write(&good, "[chart]\nwidth = 10\n").unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load_first(&[missing.clone(), broken, good.clone()]),
            Err(ConfigError::Parse { .. })
        ));

        let config = Config::load_first(&[missing.clone(), good]).unwrap().unwrap();
        assert_eq!(config.chart.width, 10);
        assert!(Config::load_first(&[missing]).unwrap().is_none());
    }
}
