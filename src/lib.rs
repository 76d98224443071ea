//! # svcwatch
//!
//! Health-check aggregator: periodic probing of a fixed service registry,
//! a JSON status API and one-shot validation reports

pub mod error;
pub mod report;
pub mod service;

// Re-export commonly used types
pub use error::{Error, Result};
pub use report::ValidationReport;
pub use svcwatch_common::config::SvcwatchConfig;
pub use svcwatch_monitor::{Monitor, Scheduler};
