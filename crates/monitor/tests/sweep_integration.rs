use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use svcwatch_common::{ProbeStatus, ServiceDescriptor};
use svcwatch_monitor::{Monitor, MonitorSettings, ProbeRegistry, ProbeResult, Prober};

/// Scripted prober: per-service behaviour, healthy by default
#[derive(Debug, Default)]
struct ScriptedProber {
    behaviours: HashMap<String, Behaviour>,
}

#[derive(Debug, Clone)]
enum Behaviour {
    Status(ProbeStatus),
    Sleep(Duration),
    Panic,
}

impl ScriptedProber {
    fn with(mut self, name: &str, behaviour: Behaviour) -> Self {
        self.behaviours.insert(name.to_string(), behaviour);
        self
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, descriptor: &ServiceDescriptor) -> ProbeResult {
        match self.behaviours.get(&descriptor.name) {
            None => ProbeResult::healthy("scripted"),
            Some(Behaviour::Status(status)) => ProbeResult::new(*status, "scripted"),
            Some(Behaviour::Sleep(duration)) => {
                tokio::time::sleep(*duration).await;
                ProbeResult::healthy("slept")
            }
            Some(Behaviour::Panic) => panic!("probe of {} blew up", descriptor.name),
        }
    }
}

fn registry(names: &[&str]) -> ProbeRegistry {
    ProbeRegistry::new(
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ServiceDescriptor::tcp(*name, 18000 + i as u16))
            .collect(),
    )
    .expect("unique names")
}

fn monitor(names: &[&str], prober: ScriptedProber, deadline: Duration) -> Arc<Monitor> {
    Arc::new(Monitor::new(
        registry(names),
        Arc::new(prober),
        MonitorSettings {
            history_capacity: 100,
            probe_deadline: deadline,
        },
    ))
}

#[tokio::test]
async fn test_all_failing_sweep_records_every_service() {
    let names = ["a", "b", "c", "d", "e"];
    let prober = names.iter().fold(ScriptedProber::default(), |p, n| {
        p.with(n, Behaviour::Status(ProbeStatus::Unreachable))
    });
    let monitor = monitor(&names, prober, Duration::from_secs(5));

    let results = monitor.run_one_sweep().await;

    assert_eq!(results.len(), names.len());
    for name in names {
        assert_eq!(monitor.history(name).len(), 1);
        assert_eq!(results[name].status, ProbeStatus::Unreachable);
    }
    let summary = &monitor.get_snapshot().summary;
    assert_eq!(summary.healthy_services, 0);
    assert_eq!(summary.error_services, names.len());
    assert_eq!(summary.health_percentage, 0.0);
}

#[tokio::test]
async fn test_panicking_probe_is_isolated() {
    let prober = ScriptedProber::default().with("boom", Behaviour::Panic);
    let monitor = monitor(&["ok", "boom"], prober, Duration::from_secs(5));

    let results = monitor.run_one_sweep().await;

    assert_eq!(results["ok"].status, ProbeStatus::Healthy);
    assert_eq!(results["boom"].status, ProbeStatus::Error);
    assert_eq!(monitor.history("boom").len(), 1);
    assert_eq!(monitor.get_snapshot().summary.total_services, 2);
}

#[tokio::test]
async fn test_probe_deadline_bounds_sweep() {
    let prober = ScriptedProber::default().with("slow", Behaviour::Sleep(Duration::from_secs(60)));
    let monitor = monitor(&["fast", "slow"], prober, Duration::from_millis(200));

    let started = std::time::Instant::now();
    let results = tokio::time::timeout(Duration::from_secs(10), monitor.run_one_sweep())
        .await
        .expect("sweep must finish within the deadline");

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(results["fast"].status, ProbeStatus::Healthy);
    assert_eq!(results["slow"].status, ProbeStatus::Error);
    assert!(results["slow"].detail.contains("deadline"));
}

#[tokio::test]
async fn test_probes_run_concurrently() {
    let names = ["a", "b", "c", "d"];
    let prober = names.iter().fold(ScriptedProber::default(), |p, n| {
        p.with(n, Behaviour::Sleep(Duration::from_millis(300)))
    });
    let monitor = monitor(&names, prober, Duration::from_secs(5));

    let started = std::time::Instant::now();
    monitor.run_one_sweep().await;

    // Sequential probing would take at least 1.2s
    assert!(
        started.elapsed() < Duration::from_millis(1000),
        "sweep took {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_readers_see_whole_snapshots_during_sweep() {
    let prober = ScriptedProber::default().with("slow", Behaviour::Sleep(Duration::from_millis(300)));
    let monitor = monitor(&["fast", "slow"], prober, Duration::from_secs(5));

    let sweeping = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move { monitor.run_one_sweep().await })
    };

    // Mid-sweep: the fast result must not leak into the published snapshot
    tokio::time::sleep(Duration::from_millis(100)).await;
    let during = monitor.get_snapshot();
    assert!(during.is_empty());
    assert!(during.summary.last_update.is_none());

    sweeping.await.expect("sweep task");
    let after = monitor.get_snapshot();
    assert_eq!(after.len(), 2);
    assert_eq!(after.summary.total_services, 2);
    assert!(after.summary.last_update.is_some());
}

#[tokio::test]
async fn test_concurrent_sweeps_are_serialized() {
    let monitor = monitor(&["a", "b"], ScriptedProber::default(), Duration::from_secs(5));

    let (first, second) = tokio::join!(monitor.run_one_sweep(), monitor.run_one_sweep());

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(monitor.history("a").len(), 2);
    assert_eq!(monitor.history("b").len(), 2);
}

#[tokio::test]
async fn test_uptime_tracks_history() {
    let monitor = monitor(&["svc"], ScriptedProber::default(), Duration::from_secs(5));

    monitor.run_one_sweep().await;
    assert_eq!(monitor.get_snapshot().get("svc").unwrap().uptime_percentage, 100.0);

    let statuses = monitor.get_service_statuses();
    assert_eq!(statuses["svc"].status(), ProbeStatus::Healthy);
    assert_eq!(monitor.uptime("svc"), 100.0);
}
