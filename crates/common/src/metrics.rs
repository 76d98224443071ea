//! Prometheus metrics module
//!
//! Global metric collection and export

use crate::error::BaseError;
use lazy_static::lazy_static;
use prometheus::{
    GaugeVec, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry,
};
use std::sync::Once;

static METRICS_INIT: Once = Once::new();

lazy_static! {
    /// Global Prometheus Registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ========== Sweep metrics ==========

    /// Completed sweeps
    pub static ref SWEEPS_TOTAL: IntCounter = IntCounter::new(
        "svcwatch_sweeps_total",
        "Total number of completed sweeps"
    ).unwrap();

    /// Sweep wall-clock duration (seconds)
    pub static ref SWEEP_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new("svcwatch_sweep_duration_seconds", "Sweep duration in seconds")
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0])
    ).unwrap();

    /// Probe outcomes by service and status
    pub static ref PROBE_RESULTS: IntCounterVec = IntCounterVec::new(
        Opts::new("svcwatch_probe_results_total", "Total number of probe results"),
        &["service", "status"]
    ).unwrap();

    // ========== Service metrics ==========

    /// 1 when the latest status of a service is healthy, else 0
    pub static ref SERVICE_HEALTHY: IntGaugeVec = IntGaugeVec::new(
        Opts::new("svcwatch_service_healthy", "Whether the latest probe of a service was healthy"),
        &["service"]
    ).unwrap();

    /// Uptime over the current history window
    pub static ref SERVICE_UPTIME: GaugeVec = GaugeVec::new(
        Opts::new("svcwatch_service_uptime_percent", "Uptime percentage over the history window"),
        &["service"]
    ).unwrap();

    /// Healthy services in the latest snapshot
    pub static ref SERVICES_HEALTHY: IntGauge = IntGauge::new(
        "svcwatch_services_healthy",
        "Number of healthy services in the latest snapshot"
    ).unwrap();

    /// Registered services
    pub static ref SERVICES_TOTAL: IntGauge = IntGauge::new(
        "svcwatch_services_total",
        "Number of registered services"
    ).unwrap();
}

/// Register all metrics with the global Registry
///
/// This function is idempotent - calling it multiple times is safe.
/// Only the first call will actually register the metrics.
pub fn register_metrics() -> crate::error::Result<()> {
    let mut result = Ok(());

    METRICS_INIT.call_once(|| {
        let register_result = (|| {
            REGISTRY.register(Box::new(SWEEPS_TOTAL.clone()))?;
            REGISTRY.register(Box::new(SWEEP_DURATION.clone()))?;
            REGISTRY.register(Box::new(PROBE_RESULTS.clone()))?;

            REGISTRY.register(Box::new(SERVICE_HEALTHY.clone()))?;
            REGISTRY.register(Box::new(SERVICE_UPTIME.clone()))?;
            REGISTRY.register(Box::new(SERVICES_HEALTHY.clone()))?;
            REGISTRY.register(Box::new(SERVICES_TOTAL.clone()))?;

            Ok::<(), prometheus::Error>(())
        })();

        if let Err(e) = register_result {
            result = Err(BaseError::from(e));
        }
    });

    result
}

/// Export metrics in Prometheus text format
pub fn export_metrics() -> crate::error::Result<String> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;

    String::from_utf8(buffer)
        .map_err(|e| BaseError::internal(format!("metrics output is not UTF-8: {e}")))
}
