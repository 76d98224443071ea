//! Sweep scheduling configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of history entries kept per service
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Scheduler and history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Host every registered service is probed on
    #[serde(default = "default_host")]
    pub host: String,

    /// Seconds between two sweeps (best effort)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// History entries kept per service before FIFO eviction
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_interval_secs() -> u64 {
    30
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            interval_secs: default_interval_secs(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
