//! Status snapshot
//!
//! Immutable view of the latest sweep. A snapshot is assembled in full and
//! then published as a whole, so readers never see a mix of two sweeps.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use svcwatch_common::{ProbeStatus, ServiceDescriptor};

use crate::probe::ProbeResult;

/// Latest observation of one service
///
/// Serializes flat: `name`, `port`, `probe_kind`, `status`, `detail`,
/// `observed_at`, `uptime_percentage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(flatten)]
    pub descriptor: ServiceDescriptor,

    #[serde(flatten)]
    pub latest: ProbeResult,

    pub uptime_percentage: f64,
}

impl ServiceStatus {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn status(&self) -> ProbeStatus {
        self.latest.status
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub total_services: usize,
    pub healthy_services: usize,
    pub accessible_services: usize,
    pub error_services: usize,
    pub health_percentage: f64,
    pub accessibility_percentage: f64,
    /// `None` until the first sweep completes
    pub last_update: Option<DateTime<Utc>>,
}

impl SnapshotSummary {
    fn empty() -> Self {
        Self {
            total_services: 0,
            healthy_services: 0,
            accessible_services: 0,
            error_services: 0,
            health_percentage: 0.0,
            accessibility_percentage: 0.0,
            last_update: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub summary: SnapshotSummary,
    pub services: BTreeMap<String, ServiceStatus>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl StatusSnapshot {
    /// Snapshot served before the first sweep
    pub fn empty() -> Self {
        Self {
            summary: SnapshotSummary::empty(),
            services: BTreeMap::new(),
        }
    }

    /// Build a snapshot and its summary from per-service statuses
    pub fn assemble(
        statuses: impl IntoIterator<Item = ServiceStatus>,
        last_update: DateTime<Utc>,
    ) -> Self {
        let services: BTreeMap<String, ServiceStatus> = statuses
            .into_iter()
            .map(|s| (s.descriptor.name.clone(), s))
            .collect();

        let total = services.len();
        let healthy = count(&services, ProbeStatus::is_healthy);
        let accessible = count(&services, ProbeStatus::is_accessible);
        let errors = count(&services, ProbeStatus::is_failure);

        Self {
            summary: SnapshotSummary {
                total_services: total,
                healthy_services: healthy,
                accessible_services: accessible,
                error_services: errors,
                health_percentage: percentage(healthy, total),
                accessibility_percentage: percentage(accessible, total),
                last_update: Some(last_update),
            },
            services,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ServiceStatus> {
        self.services.get(name)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn count(services: &BTreeMap<String, ServiceStatus>, pred: fn(&ProbeStatus) -> bool) -> usize {
    services.values().filter(|s| pred(&s.latest.status)).count()
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
