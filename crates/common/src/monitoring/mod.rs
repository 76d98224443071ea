//! Monitoring module
//!
//! Shared vocabulary of the health-check engine: what a service is, how it
//! is probed, and how a probe outcome is classified

pub mod probe_kind;
pub mod service_descriptor;
pub mod status;

pub use probe_kind::ProbeKind;
pub use service_descriptor::{ServiceDescriptor, default_services};
pub use status::ProbeStatus;
