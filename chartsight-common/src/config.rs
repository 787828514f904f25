use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Application-wide controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsightConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Poll interval for live-updating charts, in milliseconds.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Headroom added past "now" when sliding a time domain, in milliseconds.
    #[serde(default = "default_domain_buffer_ms")]
    pub domain_buffer_ms: i64,
}

fn default_refresh_interval_ms() -> u64 {
    5_000
}

fn default_domain_buffer_ms() -> i64 {
    60_000
}

impl Default for ChartsightConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            refresh_interval_ms: default_refresh_interval_ms(),
            domain_buffer_ms: default_domain_buffer_ms(),
        }
    }
}

/// Per-chart declaration consumed at mount time.
///
/// Mirrors the parts of a visualization spec the controller cares about:
/// which data source backs the chart, which signals and scale to talk to,
/// and whether a polling endpoint drives live updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Polling data endpoint. Presence turns on live updates.
    #[serde(default)]
    pub data_url: Option<String>,

    /// Name of the view's backing data source.
    #[serde(default = "default_source_name")]
    pub source: String,

    /// Record field holding the category a mark belongs to.
    #[serde(default = "default_category_field")]
    pub category_field: String,

    /// Name of the legend filter signal. Absent means the legend is
    /// rendered but non-interactive.
    #[serde(default)]
    pub legend_signal: Option<String>,

    /// Name of the time-domain signal slid forward on each live update.
    #[serde(default)]
    pub domain_signal: Option<String>,

    /// Chart title, if any.
    #[serde(default)]
    pub title: Option<String>,
}

fn default_source_name() -> String {
    "source".to_string()
}

fn default_category_field() -> String {
    "category".to_string()
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            data_url: None,
            source: default_source_name(),
            category_field: default_category_field(),
            legend_signal: None,
            domain_signal: None,
            title: None,
        }
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let config = json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(config)
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
