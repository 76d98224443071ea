//! svcwatch common infrastructure
//!
//! Configuration, error taxonomy, shared monitoring types and the Prometheus
//! registry used by the health-check engine and its HTTP/report collaborators.

pub mod config;
pub mod error;
pub mod metrics;
pub mod monitoring;

// Re-export commonly used types for convenience
pub use config::SvcwatchConfig;
pub use error::{BaseError, ConfigError, Result};
pub use monitoring::{ProbeKind, ProbeStatus, ServiceDescriptor};
