use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use svcwatch_common::ProbeStatus;

/// Outcome of probing one service once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    pub detail: String,
    pub observed_at: DateTime<Utc>,
}

impl ProbeResult {
    pub fn new(status: ProbeStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
            observed_at: Utc::now(),
        }
    }

    pub fn healthy(detail: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Healthy, detail)
    }

    pub fn accessible(detail: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Accessible, detail)
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Error, detail)
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::new(ProbeStatus::Unreachable, detail)
    }
}
