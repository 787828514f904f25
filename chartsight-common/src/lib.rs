//! Chartsight Common Library
//!
//! This crate provides shared types and utilities for Chartsight controllers:
//!
//! - [`record`] - Data-source record model and emptiness classification
//! - [`serialization`] - JSON/CBOR encoding and decoding of snapshot payloads
//! - [`encoding`] - Reversible category-token encoding for element attributes
//! - [`config`] - Configuration and chart-spec loading (JSON5 format)
//! - [`error`] - Error types

pub mod config;
pub mod encoding;
pub mod error;
pub mod record;
pub mod serialization;

// Re-export commonly used types at the crate root
pub use config::{
    ChartSpec, ChartsightConfig, LogFormat, LoggingConfig, load_config, parse_config,
};
pub use encoding::{decode_category, encode_category};
pub use error::{Error, Result};
pub use record::{SourceRecord, current_timestamp_millis, source_is_empty};
pub use serialization::{Format, decode, decode_auto, detect_format, encode};

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
