//! Top-level error enum
//!
//! Aggregates the error types of the common crate behind a single interface

use super::ConfigError;
use thiserror::Error;

/// Top-level error enum shared by the svcwatch crates
#[derive(Error, Debug)]
pub enum BaseError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Internal error (usually a programming error)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BaseError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Unified Result type
pub type Result<T> = std::result::Result<T, BaseError>;
