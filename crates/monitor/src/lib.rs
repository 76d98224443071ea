//! svcwatch-monitor - health-check orchestration for svcwatch
//!
//! This crate owns everything between "a list of service descriptors" and
//! "a status snapshot readers can consume":
//!
//! - **ProbeRegistry**: the immutable, ordered set of monitored services
//! - **Probers**: strategy-specific checks (TCP, HTTP, external CLIs) with
//!   a bare TCP fallback
//! - **HistoryStore**: bounded FIFO of observations per service, uptime
//! - **Monitor**: runs one sweep and publishes the snapshot atomically
//! - **Scheduler**: drives sweeps on a fixed interval until shutdown
//!
//! # Data flow
//!
//! ```text
//!   Scheduler ──tick──► Monitor::run_one_sweep
//!                           │
//!                           ├── Prober (one task per service, deadline)
//!                           ├── HistoryStore::record (+ uptime)
//!                           └── ArcSwap<StatusSnapshot>::store
//!                                        │
//!                       readers ◄── get_snapshot / get_service_statuses
//! ```

pub mod error;
pub mod history;
pub mod monitor;
pub mod probe;
pub mod registry;
pub mod scheduler;
pub mod snapshot;

pub use error::{MonitorError, Result};
pub use history::{HistoryEntry, HistoryStore};
pub use monitor::{Monitor, MonitorSettings};
pub use probe::{ProbeError, ProbeExecutor, ProbeResult, Prober};
pub use registry::ProbeRegistry;
pub use scheduler::Scheduler;
pub use snapshot::{ServiceStatus, SnapshotSummary, StatusSnapshot};
