//! Probe strategy configuration
//!
//! Timeouts of every strategy and the external tools the process probes
//! shell out to.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Probe executor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Bare TCP connect timeout (also used by the fallback check)
    #[serde(default = "default_five")]
    pub tcp_timeout_secs: u64,

    /// Timeout of each HTTP request (`/health`, then `/`)
    #[serde(default = "default_five")]
    pub http_timeout_secs: u64,

    /// Timeout of `redis-cli` and `etcdctl` invocations
    #[serde(default = "default_five")]
    pub command_timeout_secs: u64,

    /// Timeout of the `rpk cluster info` invocation
    #[serde(default = "default_cluster_timeout_secs")]
    pub cluster_timeout_secs: u64,

    /// Hard upper bound on one service's probe inside a sweep
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,

    /// Redis CLI used by `process_redis` probes
    #[serde(default = "default_redis_cli")]
    pub redis_cli: String,

    /// Redpanda CLI used by `process_cluster` probes
    #[serde(default = "default_rpk")]
    pub rpk: String,

    /// etcd CLI used by `process_etcd` probes
    #[serde(default = "default_etcdctl")]
    pub etcdctl: String,

    /// Exact (trimmed) stdout expected from `redis-cli PING`
    #[serde(default = "default_redis_expected_reply")]
    pub redis_expected_reply: String,
}

fn default_five() -> u64 {
    5
}

fn default_cluster_timeout_secs() -> u64 {
    10
}

fn default_deadline_secs() -> u64 {
    30
}

fn default_redis_cli() -> String {
    "redis-cli".to_string()
}

fn default_rpk() -> String {
    "rpk".to_string()
}

fn default_etcdctl() -> String {
    "etcdctl".to_string()
}

fn default_redis_expected_reply() -> String {
    "PONG".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            tcp_timeout_secs: default_five(),
            http_timeout_secs: default_five(),
            command_timeout_secs: default_five(),
            cluster_timeout_secs: default_cluster_timeout_secs(),
            deadline_secs: default_deadline_secs(),
            redis_cli: default_redis_cli(),
            rpk: default_rpk(),
            etcdctl: default_etcdctl(),
            redis_expected_reply: default_redis_expected_reply(),
        }
    }
}

impl ProbeConfig {
    pub fn tcp_timeout(&self) -> Duration {
        Duration::from_secs(self.tcp_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn cluster_timeout(&self) -> Duration {
        Duration::from_secs(self.cluster_timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    /// Longest single strategy, fallback TCP check included
    pub fn worst_case_secs(&self) -> u64 {
        let specialized = self
            .http_timeout_secs
            .saturating_mul(2)
            .max(self.command_timeout_secs)
            .max(self.cluster_timeout_secs);
        specialized.saturating_add(self.tcp_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_worst_case_fits_deadline() {
        let config = ProbeConfig::default();
        // Two HTTP requests (or one cluster call) plus the TCP fallback
        assert_eq!(config.worst_case_secs(), 15);
        assert!(config.worst_case_secs() < config.deadline_secs);
    }

    #[test]
    fn test_worst_case_saturates() {
        let config = ProbeConfig {
            http_timeout_secs: u64::MAX,
            tcp_timeout_secs: u64::MAX,
            ..Default::default()
        };
        assert_eq!(config.worst_case_secs(), u64::MAX);
    }
}
