//! Error handling module
//!
//! Error types separated by concept, one core concept per file

mod base_error;
mod config_error;

pub use base_error::{BaseError, Result};
pub use config_error::ConfigError;
