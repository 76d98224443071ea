//! Configuration errors
//!
//! Everything that can go wrong while loading, parsing or validating the
//! configuration, including building the probe registry from it.

use thiserror::Error;

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Duplicate service name in registry: {name}")]
    DuplicateServiceName { name: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration validation failed: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },
}

impl ConfigError {
    pub fn duplicate_service(name: impl Into<String>) -> Self {
        Self::DuplicateServiceName { name: name.into() }
    }

    pub fn invalid_value(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::ParseError {
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_service_message_names_the_service() {
        let err = ConfigError::duplicate_service("redis");
        assert_eq!(err.to_string(), "Duplicate service name in registry: redis");
    }

    #[test]
    fn validation_error_joins_messages() {
        let err = ConfigError::Validation {
            errors: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Configuration validation failed: a; b");
    }
}
