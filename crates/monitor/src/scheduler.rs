//! Periodic sweep driver

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::monitor::Monitor;

/// Shortest accepted sweep interval
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Runs [`Monitor::run_one_sweep`] every `interval` until shutdown
///
/// The first sweep starts immediately. A sweep that overruns the interval
/// delays the next tick instead of queueing extra sweeps. Shutdown is
/// observed between sweeps.
#[derive(Debug)]
pub struct Scheduler {
    monitor: Arc<Monitor>,
    interval: Duration,
}

impl Scheduler {
    /// Intervals below [`MIN_INTERVAL`] are raised to it
    pub fn new(monitor: Arc<Monitor>, interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            warn!(
                "Sweep interval {:?} too short, using {:?}",
                interval, MIN_INTERVAL
            );
        }

        Self {
            monitor,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        info!(
            "Scheduler started: {} services every {}s",
            self.monitor.registry().len(),
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Scheduler received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    let results = self.monitor.run_one_sweep().await;
                    debug!("Scheduled sweep recorded {} results", results.len());
                }
            }
        }

        info!("Scheduler stopped");
    }

    pub fn spawn(self, shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown_rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitorSettings;
    use crate::probe::{ProbeResult, Prober};
    use crate::registry::ProbeRegistry;
    use async_trait::async_trait;
    use svcwatch_common::ServiceDescriptor;

    #[derive(Debug)]
    struct HealthyProber;

    #[async_trait]
    impl Prober for HealthyProber {
        async fn probe(&self, _descriptor: &ServiceDescriptor) -> ProbeResult {
            ProbeResult::healthy("ok")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_sweeps_until_shutdown() {
        let registry = ProbeRegistry::new(vec![ServiceDescriptor::tcp("svc", 18000)]).unwrap();
        let monitor = Arc::new(Monitor::new(
            registry,
            Arc::new(HealthyProber),
            MonitorSettings::default(),
        ));
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle =
            Scheduler::new(Arc::clone(&monitor), Duration::from_secs(30)).spawn(shutdown_rx);

        // Ticks at 0s, 30s and 60s
        tokio::time::sleep(Duration::from_secs(65)).await;
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(monitor.history("svc").len(), 3);
        assert_eq!(monitor.get_snapshot().summary.healthy_services, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let registry = ProbeRegistry::new(vec![ServiceDescriptor::tcp("svc", 18000)]).unwrap();
        let monitor = Arc::new(Monitor::new(
            registry,
            Arc::new(HealthyProber),
            MonitorSettings::default(),
        ));
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let scheduler = Scheduler::new(Arc::clone(&monitor), Duration::ZERO);
        assert_eq!(scheduler.interval(), MIN_INTERVAL);
        let handle = scheduler.spawn(shutdown_rx);

        // Ticks at 0s, 1s and 2s
        tokio::time::sleep(Duration::from_millis(2500)).await;
        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();

        assert_eq!(monitor.history("svc").len(), 3);
    }
}
