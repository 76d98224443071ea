//! Sweep orchestration
//!
//! [`Monitor`] runs every registered probe concurrently, records the
//! outcomes in the history store and publishes a fresh [`StatusSnapshot`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use chrono::Utc;
use futures::future::join_all;
use svcwatch_common::SvcwatchConfig;
use svcwatch_common::config::DEFAULT_HISTORY_CAPACITY;
use svcwatch_common::metrics::{
    PROBE_RESULTS, SERVICE_HEALTHY, SERVICE_UPTIME, SERVICES_HEALTHY, SERVICES_TOTAL,
    SWEEP_DURATION, SWEEPS_TOTAL,
};
use tokio::sync::Mutex;
use tracing::{Instrument, Span, debug, error, info, instrument, warn};

use crate::error::Result;
use crate::history::{HistoryEntry, HistoryStore};
use crate::probe::{ProbeExecutor, ProbeResult, Prober};
use crate::registry::ProbeRegistry;
use crate::snapshot::{ServiceStatus, StatusSnapshot};

/// Engine tunables independent of the probe strategies
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub history_capacity: usize,
    /// Upper bound on a single service's probe within a sweep
    pub probe_deadline: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            probe_deadline: Duration::from_secs(30),
        }
    }
}

impl MonitorSettings {
    pub fn from_config(config: &SvcwatchConfig) -> Self {
        Self {
            history_capacity: config.monitor.history_capacity,
            probe_deadline: config.probe.deadline(),
        }
    }
}

#[derive(Debug)]
pub struct Monitor {
    registry: ProbeRegistry,
    prober: Arc<dyn Prober>,
    history: HistoryStore,
    snapshot: ArcSwap<StatusSnapshot>,
    probe_deadline: Duration,
    sweep_lock: Mutex<()>,
}

impl Monitor {
    pub fn new(registry: ProbeRegistry, prober: Arc<dyn Prober>, settings: MonitorSettings) -> Self {
        SERVICES_TOTAL.set(registry.len() as i64);

        Self {
            registry,
            prober,
            history: HistoryStore::new(settings.history_capacity),
            snapshot: ArcSwap::from_pointee(StatusSnapshot::empty()),
            probe_deadline: settings.probe_deadline,
            sweep_lock: Mutex::new(()),
        }
    }

    /// Build the production engine: configured registry and [`ProbeExecutor`]
    pub fn from_config(config: &SvcwatchConfig) -> Result<Self> {
        let registry = ProbeRegistry::new(config.services.clone())?;
        let prober = ProbeExecutor::new(config.monitor.host.clone(), config.probe.clone())?;

        Ok(Self::new(
            registry,
            Arc::new(prober),
            MonitorSettings::from_config(config),
        ))
    }

    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    pub fn history_store(&self) -> &HistoryStore {
        &self.history
    }

    /// Retained observations of one service, oldest first
    pub fn history(&self, name: &str) -> Vec<HistoryEntry> {
        self.history.entries(name)
    }

    pub fn uptime(&self, name: &str) -> f64 {
        self.history.uptime(name)
    }

    /// Latest published snapshot
    ///
    /// Never blocks on a running sweep; returns the empty snapshot before
    /// the first sweep completes.
    pub fn get_snapshot(&self) -> Arc<StatusSnapshot> {
        self.snapshot.load_full()
    }

    pub fn get_service_statuses(&self) -> BTreeMap<String, ServiceStatus> {
        self.snapshot.load().services.clone()
    }

    /// Probe every registered service once and publish the result
    ///
    /// Probes run concurrently, each bounded by the probe deadline. A probe
    /// that panics or misses the deadline is recorded as `error`, so exactly
    /// one history entry per service is appended. Concurrent calls are
    /// serialized.
    #[instrument(name = "sweep", skip_all, fields(services = self.registry.len()))]
    pub async fn run_one_sweep(&self) -> BTreeMap<String, ProbeResult> {
        let _guard = self.sweep_lock.lock().await;
        let started = Instant::now();
        debug!("Starting sweep over {} services", self.registry.len());

        let tasks = self.registry.iter().map(|descriptor| {
            let prober = Arc::clone(&self.prober);
            let descriptor = descriptor.clone();
            let deadline = self.probe_deadline;

            let task = async move {
                match tokio::time::timeout(deadline, prober.probe(&descriptor)).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(
                            "Probe of {} exceeded deadline of {}s",
                            descriptor.name,
                            deadline.as_secs()
                        );
                        ProbeResult::error(format!(
                            "Probe exceeded deadline of {}s",
                            deadline.as_secs()
                        ))
                    }
                }
            };
            tokio::spawn(task.instrument(Span::current()))
        });
        let outcomes = join_all(tasks).await;

        let mut results = BTreeMap::new();
        let mut statuses = Vec::with_capacity(self.registry.len());

        for (descriptor, outcome) in self.registry.iter().zip(outcomes) {
            let result = outcome.unwrap_or_else(|e| {
                error!("Probe task of {} failed: {}", descriptor.name, e);
                ProbeResult::error(format!("Probe task failed: {e}"))
            });

            let uptime = self.history.record(&descriptor.name, &result);
            record_metrics(&descriptor.name, &result, uptime);

            statuses.push(ServiceStatus {
                descriptor: descriptor.clone(),
                latest: result.clone(),
                uptime_percentage: uptime,
            });
            results.insert(descriptor.name.clone(), result);
        }

        let snapshot = StatusSnapshot::assemble(statuses, Utc::now());
        let summary = &snapshot.summary;
        SERVICES_HEALTHY.set(summary.healthy_services as i64);
        info!(
            "Sweep completed in {:.2}s: {}/{} healthy, {}/{} accessible",
            started.elapsed().as_secs_f64(),
            summary.healthy_services,
            summary.total_services,
            summary.accessible_services,
            summary.total_services
        );
        self.snapshot.store(Arc::new(snapshot));

        SWEEPS_TOTAL.inc();
        SWEEP_DURATION.observe(started.elapsed().as_secs_f64());

        results
    }
}

fn record_metrics(service: &str, result: &ProbeResult, uptime: f64) {
    let status = result.status.to_string();
    PROBE_RESULTS.with_label_values(&[service, status.as_str()]).inc();
    SERVICE_HEALTHY
        .with_label_values(&[service])
        .set(i64::from(result.status.is_healthy()));
    SERVICE_UPTIME.with_label_values(&[service]).set(uptime);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use svcwatch_common::{ProbeStatus, ServiceDescriptor};

    #[derive(Debug)]
    struct FixedProber(ProbeStatus);

    #[async_trait]
    impl Prober for FixedProber {
        async fn probe(&self, _descriptor: &ServiceDescriptor) -> ProbeResult {
            ProbeResult::new(self.0, "fixed")
        }
    }

    fn monitor(status: ProbeStatus, names: &[&str]) -> Monitor {
        let registry = ProbeRegistry::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| ServiceDescriptor::tcp(*n, 18000 + i as u16))
                .collect(),
        )
        .unwrap();
        Monitor::new(
            registry,
            Arc::new(FixedProber(status)),
            MonitorSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_snapshot_empty_before_first_sweep() {
        let monitor = monitor(ProbeStatus::Healthy, &["a", "b"]);
        let snapshot = monitor.get_snapshot();
        assert!(snapshot.is_empty());
        assert!(snapshot.summary.last_update.is_none());
        assert!(monitor.get_service_statuses().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_publishes_snapshot() {
        let monitor = monitor(ProbeStatus::Healthy, &["a", "b", "c"]);
        let results = monitor.run_one_sweep().await;

        assert_eq!(results.len(), 3);
        let snapshot = monitor.get_snapshot();
        assert_eq!(snapshot.summary.total_services, 3);
        assert_eq!(snapshot.summary.healthy_services, 3);
        assert_eq!(snapshot.summary.health_percentage, 100.0);
        assert_eq!(snapshot.get("b").unwrap().uptime_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_every_sweep_appends_one_entry_per_service() {
        let monitor = monitor(ProbeStatus::Error, &["a", "b"]);
        for _ in 0..3 {
            monitor.run_one_sweep().await;
        }

        assert_eq!(monitor.history("a").len(), 3);
        assert_eq!(monitor.history("b").len(), 3);
        assert_eq!(monitor.uptime("a"), 0.0);
    }

    #[tokio::test]
    async fn test_empty_registry_sweep() {
        let monitor = monitor(ProbeStatus::Healthy, &[]);
        let results = monitor.run_one_sweep().await;

        assert!(results.is_empty());
        let snapshot = monitor.get_snapshot();
        assert_eq!(snapshot.summary.total_services, 0);
        assert_eq!(snapshot.summary.health_percentage, 0.0);
        assert!(snapshot.summary.last_update.is_some());
    }
}
