//! Error types for svcwatch-monitor

use svcwatch_common::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MonitorError>;

/// Construction-time failures of the monitoring engine
///
/// Probe failures never surface here; they are folded into a
/// [`crate::ProbeResult`] so a sweep always completes.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
