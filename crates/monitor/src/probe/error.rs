//! Probe failure taxonomy

use std::time::Duration;

use thiserror::Error;

/// Why a single strategy did not confirm a service
///
/// Most variants only mean "try the next strategy"; see [`ProbeError::is_fatal`].
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{target} timed out after {}s", .after.as_secs())]
    Timeout { target: String, after: Duration },

    #[error("Connection to {addr} refused")]
    ConnectionRefused { addr: String },

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Protocol error: {message}")]
    Protocol { message: String },

    #[error("{program} is not installed")]
    ToolUnavailable { program: String },

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    NonZeroExit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Unexpected reply from {program}: {reply:?}")]
    UnexpectedReply { program: String, reply: String },
}

impl ProbeError {
    /// A fault of the probe machinery rather than of the probed service
    ///
    /// Fatal errors end the probe with an `error` status instead of falling
    /// back to a bare TCP check.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Spawn { .. })
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}
