use thiserror::Error;

/// Common error type for Chartsight components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CBOR serialization error: {0}")]
    Cbor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid category token: {0}")]
    Encoding(String),

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Snapshot fetch failed: {0}")]
    Fetch(String),

    #[error("Malformed chart spec: {0}")]
    MalformedSpec(String),
}

impl From<ciborium::ser::Error<std::io::Error>> for Error {
    fn from(e: ciborium::ser::Error<std::io::Error>) -> Self {
        Error::Cbor(e.to_string())
    }
}

impl From<ciborium::de::Error<std::io::Error>> for Error {
    fn from(e: ciborium::de::Error<std::io::Error>) -> Self {
        Error::Cbor(e.to_string())
    }
}

/// Result type alias using Chartsight's Error.
pub type Result<T> = std::result::Result<T, Error>;
