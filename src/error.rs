//! Unified error model
//!
//! Top-level error type of the svcwatch binary, aggregating the errors of
//! the workspace crates and of the dependencies used at the edges.

use svcwatch_common::{BaseError, ConfigError};
use svcwatch_monitor::MonitorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // ========== Configuration ==========
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // ========== Workspace crates ==========
    #[error("Base library error: {0}")]
    Base(Box<BaseError>),

    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    // ========== System ==========
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Task error: {0}")]
    Join(#[from] tokio::task::JoinError),

    // ========== Application ==========
    #[error("Service startup failed: {message}")]
    ServiceStartup { message: String },

    #[error("Service configuration validation failed: {message}")]
    ServiceValidation { message: String },

    /// Status API server failures (bind, local address)
    #[error("Status API server error: {0:#}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Application error: {message}")]
    Custom { message: String },
}

impl From<BaseError> for Error {
    fn from(err: BaseError) -> Self {
        Error::Base(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    pub fn service_startup(message: impl Into<String>) -> Self {
        Self::ServiceStartup {
            message: message.into(),
        }
    }

    pub fn service_validation(message: impl Into<String>) -> Self {
        Self::ServiceValidation {
            message: message.into(),
        }
    }
}
