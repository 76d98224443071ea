//! Span export settings
//!
//! Every sweep opens a `sweep` span and every service check inside it a
//! child `probe` span; API requests open `http.request` spans. With the
//! `opentelemetry` feature these are exported over OTLP.

use serde::{Deserialize, Serialize};

/// Span name of a single service check
pub const PROBE_SPAN_NAME: &str = "probe";

/// OTLP export of sweep, probe and request spans
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enable: bool,

    /// `service.name` resource attribute
    pub service_name: String,

    /// OTLP gRPC collector, e.g. `http://otel-collector:4317`
    pub endpoint: String,

    /// Share of root spans (sweeps, requests) exported, in `[0, 1]`
    pub sample_ratio: f64,

    /// Export one `probe` span per service and sweep
    ///
    /// A 17-service table swept every 30s yields ~50k probe spans a day;
    /// turning this off keeps only the sweep spans.
    pub probe_spans: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enable: false,
            service_name: "svcwatch".to_string(),
            endpoint: "http://127.0.0.1:4317".to_string(),
            sample_ratio: 1.0,
            probe_spans: true,
        }
    }
}

impl TracingConfig {
    /// Problems that prevent export; empty when disabled
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.enable {
            return problems;
        }

        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            problems.push("observability.tracing.endpoint cannot be empty".to_string());
        } else if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            problems.push(format!(
                "observability.tracing.endpoint '{endpoint}' must start with http:// or https://"
            ));
        }

        if self.service_name.trim().is_empty() {
            problems.push("observability.tracing.service_name cannot be empty".to_string());
        }

        if !(0.0..=1.0).contains(&self.sample_ratio) {
            problems.push(format!(
                "observability.tracing.sample_ratio ({}) must be within [0, 1]",
                self.sample_ratio
            ));
        }

        problems
    }

    pub fn is_enabled(&self) -> bool {
        self.enable
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Whether a span of this name goes to the exporter
    pub fn exports_span(&self, span_name: &str) -> bool {
        self.probe_spans || span_name != PROBE_SPAN_NAME
    }
}
