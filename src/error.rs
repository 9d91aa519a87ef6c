//! Error types for Bloomwell
//!
//! The calculator and the reducer never fail. Everything that touches the
//! outside world (storage, CSV feeds, config files) reports through here.

use thiserror::Error;

/// Main error type for Bloomwell operations
#[derive(Error, Debug)]
pub enum Error {
    /// Durable storage failure (SQLite)
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// JSON encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Upstream CSV feed could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Caller supplied values outside the documented domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Bloomwell operations
pub type Result<T> = std::result::Result<T, Error>;
