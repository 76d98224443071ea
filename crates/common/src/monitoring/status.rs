//! Probe status definitions
//!
//! Classification of a single probe outcome

use serde::{Deserialize, Serialize};
use strum::Display;

/// Classified outcome of a probe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProbeStatus {
    /// The service answered its protocol-level check
    Healthy,
    /// Something listens on the port, protocol health unverified
    Accessible,
    /// The probe itself failed unexpectedly
    Error,
    /// Nothing is listening
    Unreachable,
}

impl ProbeStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeStatus::Healthy)
    }

    /// Healthy or Accessible
    pub fn is_accessible(&self) -> bool {
        matches!(self, ProbeStatus::Healthy | ProbeStatus::Accessible)
    }

    /// Counts as a failure in a validation run
    pub fn is_failure(&self) -> bool {
        matches!(self, ProbeStatus::Error | ProbeStatus::Unreachable)
    }
}
