//! Bounded probe history and uptime
//!
//! Each service keeps at most `capacity` observations, oldest first. The
//! store is shared between the sweep (writer) and API readers; a per-service
//! shard lock keeps an append and the following uptime computation
//! consistent.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use svcwatch_common::ProbeStatus;
use svcwatch_common::config::DEFAULT_HISTORY_CAPACITY;

use crate::probe::ProbeResult;

/// One retained observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub observed_at: DateTime<Utc>,
    pub status: ProbeStatus,
}

impl From<&ProbeResult> for HistoryEntry {
    fn from(result: &ProbeResult) -> Self {
        Self {
            observed_at: result.observed_at,
            status: result.status,
        }
    }
}

#[derive(Debug)]
pub struct HistoryStore {
    capacity: usize,
    entries: DashMap<String, VecDeque<HistoryEntry>>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStore {
    /// Create a store retaining `capacity` entries per service (at least one)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: DashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an observation, evicting the oldest one when full
    ///
    /// Returns the uptime including the new observation.
    pub fn record(&self, service: &str, result: &ProbeResult) -> f64 {
        let mut history = self
            .entries
            .entry(service.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));

        history.push_back(HistoryEntry::from(result));
        if history.len() > self.capacity {
            history.pop_front();
        }
        debug_assert!(
            history.len() <= self.capacity,
            "history of {service} exceeds capacity {}",
            self.capacity
        );

        uptime_percentage(&history)
    }

    /// Uptime of a service over its retained window, 0 when unknown
    pub fn uptime(&self, service: &str) -> f64 {
        self.entries
            .get(service)
            .map(|history| uptime_percentage(&history))
            .unwrap_or(0.0)
    }

    /// Copy of the retained entries, oldest first
    pub fn entries(&self, service: &str) -> Vec<HistoryEntry> {
        self.entries
            .get(service)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, service: &str) -> usize {
        self.entries.get(service).map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, service: &str) -> bool {
        self.len(service) == 0
    }
}

/// Share of HEALTHY entries, in percent
///
/// With fewer than two entries the window is too short to be a ratio: a
/// single healthy observation reports 100, anything else 0. ACCESSIBLE does
/// not count as up.
fn uptime_percentage(history: &VecDeque<HistoryEntry>) -> f64 {
    if history.len() < 2 {
        return match history.back() {
            Some(entry) if entry.status.is_healthy() => 100.0,
            _ => 0.0,
        };
    }

    let healthy = history.iter().filter(|e| e.status.is_healthy()).count();
    healthy as f64 * 100.0 / history.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn result_at(status: ProbeStatus, offset_secs: i64) -> ProbeResult {
        let base = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        ProbeResult {
            status,
            detail: String::new(),
            observed_at: base + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_unknown_service() {
        let store = HistoryStore::default();
        assert_eq!(store.uptime("nope"), 0.0);
        assert!(store.entries("nope").is_empty());
        assert!(store.is_empty("nope"));
    }

    #[test]
    fn test_single_entry_bootstrap() {
        let store = HistoryStore::default();
        assert_eq!(store.record("up", &result_at(ProbeStatus::Healthy, 0)), 100.0);
        assert_eq!(store.record("down", &result_at(ProbeStatus::Error, 0)), 0.0);
        assert_eq!(
            store.record("port", &result_at(ProbeStatus::Accessible, 0)),
            0.0
        );
    }

    #[test]
    fn test_uptime_ratio() {
        let store = HistoryStore::default();
        let statuses = [
            ProbeStatus::Healthy,
            ProbeStatus::Healthy,
            ProbeStatus::Accessible,
            ProbeStatus::Error,
        ];
        let mut last = 0.0;
        for (i, status) in statuses.into_iter().enumerate() {
            last = store.record("svc", &result_at(status, i as i64));
        }

        assert_eq!(last, 50.0);
        assert_eq!(store.uptime("svc"), 50.0);
    }

    #[test]
    fn test_fifo_eviction() {
        let store = HistoryStore::new(100);
        for i in 0..150 {
            store.record("svc", &result_at(ProbeStatus::Healthy, i));
        }

        let entries = store.entries("svc");
        assert_eq!(entries.len(), 100);
        assert_eq!(entries[0].observed_at, result_at(ProbeStatus::Healthy, 50).observed_at);
        assert_eq!(
            entries[99].observed_at,
            result_at(ProbeStatus::Healthy, 149).observed_at
        );
    }

    #[test]
    fn test_eviction_changes_uptime() {
        let store = HistoryStore::new(2);
        store.record("svc", &result_at(ProbeStatus::Unreachable, 0));
        store.record("svc", &result_at(ProbeStatus::Healthy, 1));
        assert_eq!(store.uptime("svc"), 50.0);

        store.record("svc", &result_at(ProbeStatus::Healthy, 2));
        assert_eq!(store.uptime("svc"), 100.0);
        assert_eq!(store.len("svc"), 2);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let store = HistoryStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.record("svc", &result_at(ProbeStatus::Error, 0));
        store.record("svc", &result_at(ProbeStatus::Healthy, 1));
        assert_eq!(store.len("svc"), 1);
        assert_eq!(store.uptime("svc"), 100.0);
    }
}
