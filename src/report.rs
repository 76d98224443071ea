//! Validation report
//!
//! Result of a one-shot sweep (`svcwatch check`), persisted as
//! `validation-status-YYYY-MM-DD.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use svcwatch_common::{ProbeKind, ProbeStatus};
use svcwatch_monitor::{ProbeRegistry, ProbeResult};
use tracing::info;

use crate::error::Result;

pub const VALIDATION_TYPE: &str = "connectivity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    /// No service is in `error` or `unreachable`
    Pass,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub timestamp: DateTime<Utc>,
    pub validation_type: String,
    pub overall_status: OverallStatus,
    pub services_tested: usize,
    pub services_passing: usize,
    pub services_failing: usize,
    /// One decimal with a percent sign, `"0%"` when nothing was tested
    pub success_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub port: u16,
    pub probe_kind: ProbeKind,
    pub status: ProbeStatus,
    pub detail: String,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub summary: ValidationSummary,
    pub results: BTreeMap<String, ValidationResult>,
    pub port_mappings: BTreeMap<String, u16>,
}

impl ValidationReport {
    /// Build a report from the results of one sweep
    ///
    /// Services without a result are skipped; a sweep always yields one
    /// result per registered service.
    pub fn build(
        registry: &ProbeRegistry,
        results: &BTreeMap<String, ProbeResult>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let results: BTreeMap<String, ValidationResult> = registry
            .iter()
            .filter_map(|descriptor| {
                let result = results.get(&descriptor.name)?;
                Some((
                    descriptor.name.clone(),
                    ValidationResult {
                        port: descriptor.port,
                        probe_kind: descriptor.probe_kind,
                        status: result.status,
                        detail: result.detail.clone(),
                        observed_at: result.observed_at,
                    },
                ))
            })
            .collect();

        let tested = results.len();
        let failing = results.values().filter(|r| r.status.is_failure()).count();
        let passing = tested - failing;

        let overall_status = if failing == 0 {
            OverallStatus::Pass
        } else {
            OverallStatus::Partial
        };

        Self {
            summary: ValidationSummary {
                timestamp,
                validation_type: VALIDATION_TYPE.to_string(),
                overall_status,
                services_tested: tested,
                services_passing: passing,
                services_failing: failing,
                success_rate: success_rate(passing, tested),
            },
            results,
            port_mappings: registry.port_table(),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.summary.overall_status == OverallStatus::Pass
    }

    pub fn file_name(&self) -> String {
        format!(
            "validation-status-{}.json",
            self.summary.timestamp.format("%Y-%m-%d")
        )
    }

    /// Write the report into `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;

        info!("Validation report written to {}", path.display());
        Ok(path)
    }

    /// Names of the services that failed, in name order
    pub fn failing_services(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, r)| r.status.is_failure())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

fn success_rate(passing: usize, tested: usize) -> String {
    if tested == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", passing as f64 * 100.0 / tested as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcwatch_common::ServiceDescriptor;

    fn registry() -> ProbeRegistry {
        ProbeRegistry::new(vec![
            ServiceDescriptor::new("dragonfly", 18000, ProbeKind::ProcessRedis),
            ServiceDescriptor::tcp("postgresql", 18020),
            ServiceDescriptor::new("chromadb", 18270, ProbeKind::Http),
        ])
        .unwrap()
    }

    fn timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-04T05:06:07Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_partial_report() {
        let results = BTreeMap::from([
            (
                "dragonfly".to_string(),
                ProbeResult::healthy("Redis PING successful"),
            ),
            (
                "postgresql".to_string(),
                ProbeResult::accessible("Port is accessible"),
            ),
            (
                "chromadb".to_string(),
                ProbeResult::unreachable("Port not accessible"),
            ),
        ]);

        let report = ValidationReport::build(&registry(), &results, timestamp());

        assert_eq!(report.summary.overall_status, OverallStatus::Partial);
        assert_eq!(report.summary.services_tested, 3);
        assert_eq!(report.summary.services_passing, 2);
        assert_eq!(report.summary.services_failing, 1);
        assert_eq!(report.summary.success_rate, "66.7%");
        assert_eq!(report.failing_services(), vec!["chromadb"]);
        assert_eq!(report.port_mappings["postgresql"], 18020);
        assert!(!report.is_pass());
    }

    #[test]
    fn test_empty_report() {
        let registry = ProbeRegistry::new(Vec::new()).unwrap();
        let report = ValidationReport::build(&registry, &BTreeMap::new(), timestamp());

        assert!(report.is_pass());
        assert_eq!(report.summary.success_rate, "0%");
        assert_eq!(report.summary.services_tested, 0);
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let results = BTreeMap::from([(
            "postgresql".to_string(),
            ProbeResult::accessible("Port is accessible"),
        )]);
        let report = ValidationReport::build(&registry(), &results, timestamp());

        let path = report.write_to(&dir.path().join("reports")).unwrap();
        assert!(path.ends_with("validation-status-2026-03-04.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["overall_status"], "PASS");
        assert_eq!(json["summary"]["validation_type"], "connectivity");
        assert_eq!(json["summary"]["success_rate"], "100.0%");
        assert_eq!(json["results"]["postgresql"]["status"], "accessible");
        assert_eq!(json["results"]["postgresql"]["probe_kind"], "tcp");
        assert_eq!(json["port_mappings"]["chromadb"], 18270);
    }
}
