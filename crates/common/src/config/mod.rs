//! Unified configuration management
//!
//! Single source of truth for svcwatch settings: instance identity, the
//! service registry, probe timeouts, the HTTP binding, report output and
//! observability. The file format is TOML.

pub mod bind;
pub mod monitor;
pub mod probe;
pub mod tracing;

pub use crate::config::bind::{BindConfig, HttpBindConfig};
pub use crate::config::monitor::{DEFAULT_HISTORY_CAPACITY, MonitorConfig};
pub use crate::config::probe::ProbeConfig;
pub use crate::config::tracing::TracingConfig;

use crate::error::ConfigError;
use crate::monitoring::ServiceDescriptor;
use crate::monitoring::service_descriptor::default_services;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main configuration of a svcwatch instance
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SvcwatchConfig {
    /// Instance name, shown in logs and exported spans
    #[serde(default = "default_name")]
    pub name: String,

    /// Runtime environment: "dev", "prod" or "test"
    #[serde(default = "default_env")]
    pub env: String,

    /// Sweep scheduling and history retention
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Probe timeouts and external tools
    #[serde(default)]
    pub probe: ProbeConfig,

    /// HTTP API binding
    #[serde(default)]
    pub bind: BindConfig,

    /// Validation report output
    #[serde(default)]
    pub report: ReportConfig,

    /// Registered services, in probing order
    ///
    /// When omitted the standard 18xxx table is used.
    #[serde(default = "default_services")]
    pub services: Vec<ServiceDescriptor>,

    /// Observability (logging + tracing)
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Validation report output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportConfig {
    /// Directory validation reports are written into
    #[serde(
        default = "default_report_dir",
        serialize_with = "serialize_pathbuf",
        deserialize_with = "deserialize_pathbuf"
    )]
    pub dir: PathBuf,
}

/// Observability configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObservabilityConfig {
    /// Filter level (EnvFilter syntax, e.g. "info,hyper=warn")
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    #[serde(default)]
    pub log: LogConfig,

    /// OpenTelemetry tracing (requires the `opentelemetry` feature)
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Log configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    /// "console" (default) or "file"
    #[serde(default = "default_log_output")]
    pub output: String,

    /// Rotate log files daily when output = "file"
    #[serde(default)]
    pub rotate: bool,

    /// Log directory when output = "file"
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            filter_level: default_filter_level(),
            tracing: TracingConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: default_log_output(),
            rotate: false,
            path: default_log_path(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: default_report_dir(),
        }
    }
}

fn default_name() -> String {
    "svcwatch".to_string()
}

fn default_env() -> String {
    "dev".to_string()
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs/".to_string()
}

fn default_filter_level() -> String {
    "info".to_string()
}

fn serialize_pathbuf<S>(path: &Path, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    path.display().to_string().serialize(serializer)
}

fn deserialize_pathbuf<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
}

impl Default for SvcwatchConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            env: default_env(),
            monitor: MonitorConfig::default(),
            probe: ProbeConfig::default(),
            bind: BindConfig::default(),
            report: ReportConfig::default(),
            services: default_services(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl SvcwatchConfig {
    pub fn tracing_config(&self) -> &TracingConfig {
        &self.observability.tracing
    }

    pub fn observability_config(&self) -> &ObservabilityConfig {
        &self.observability
    }

    pub fn log_config(&self) -> &LogConfig {
        &self.observability.log
    }

    pub fn is_console_logging(&self) -> bool {
        self.observability.log.output == "console"
    }

    pub fn should_rotate_logs(&self) -> bool {
        self.observability.log.output == "file" && self.observability.log.rotate
    }

    /// Log/trace filter level, RUST_LOG takes precedence
    pub fn get_filter_level(&self) -> String {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|v| {
                let trimmed = v.trim().to_string();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed)
                }
            })
            .unwrap_or_else(|| self.observability.filter_level.clone())
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        if !path_ref.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path_ref.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path_ref).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;

        Ok(Self::from_toml(&content)?)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Validate configuration
    ///
    /// Collects every problem instead of stopping at the first one. Entries
    /// starting with "Warning:" are not fatal.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Instance name cannot be empty".to_string());
        }

        if !["dev", "prod", "test"].contains(&self.env.as_str()) {
            errors.push(format!(
                "Invalid environment '{}', must be one of: dev, prod, test",
                self.env
            ));
        }

        // monitor
        if self.monitor.host.trim().is_empty() {
            errors.push("monitor.host cannot be empty".to_string());
        }
        if self.monitor.interval_secs == 0 {
            errors.push("monitor.interval_secs must be greater than 0".to_string());
        }
        if self.monitor.history_capacity == 0 {
            errors.push("monitor.history_capacity must be at least 1".to_string());
        }

        // probe
        for (field, value) in [
            ("probe.tcp_timeout_secs", self.probe.tcp_timeout_secs),
            ("probe.http_timeout_secs", self.probe.http_timeout_secs),
            ("probe.command_timeout_secs", self.probe.command_timeout_secs),
            ("probe.cluster_timeout_secs", self.probe.cluster_timeout_secs),
            ("probe.deadline_secs", self.probe.deadline_secs),
        ] {
            if value == 0 {
                errors.push(format!("{field} must be greater than 0"));
            }
        }
        if self.probe.deadline_secs > 0 && self.probe.deadline_secs < self.probe.worst_case_secs()
        {
            errors.push(format!(
                "Warning: probe.deadline_secs ({}) is shorter than the slowest strategy ({}s); such probes will be reported as errors",
                self.probe.deadline_secs,
                self.probe.worst_case_secs()
            ));
        }
        for (field, value) in [
            ("probe.redis_cli", &self.probe.redis_cli),
            ("probe.rpk", &self.probe.rpk),
            ("probe.etcdctl", &self.probe.etcdctl),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{field} cannot be empty"));
            }
        }

        // services
        if self.services.is_empty() {
            errors.push("Warning: no services configured, sweeps will be empty".to_string());
        }
        let mut seen = HashSet::new();
        for service in &self.services {
            if service.name.trim().is_empty() {
                errors.push("Service name cannot be empty".to_string());
            } else if !seen.insert(service.name.as_str()) {
                errors.push(format!("Duplicate service name '{}'", service.name));
            }
            if service.port == 0 {
                errors.push(format!("Service '{}' has invalid port 0", service.name));
            }
        }

        // observability
        {
            let main_level = self
                .observability
                .filter_level
                .split(',')
                .next()
                .unwrap_or("")
                .trim();
            if !["trace", "debug", "info", "warn", "error"].contains(&main_level) {
                errors.push(format!(
                    "Invalid filter level '{}', must start with one of: trace, debug, info, warn, error",
                    self.observability.filter_level
                ));
            }
        }

        if !["console", "file"].contains(&self.observability.log.output.as_str()) {
            errors.push(format!(
                "Invalid log output '{}' (observability.log.output), must be 'console' or 'file'",
                self.observability.log.output
            ));
        }

        errors.extend(self.observability.tracing.problems());

        if self.report.dir.as_os_str().is_empty() {
            errors.push("report.dir cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validation problems that are fatal (non-warning)
    pub fn validation_errors(&self) -> Vec<String> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .into_iter()
                .filter(|e| !e.starts_with("Warning:"))
                .collect(),
        }
    }
}
