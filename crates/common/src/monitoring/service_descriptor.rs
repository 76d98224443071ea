//! Service descriptor
//!
//! Defines the static description of a monitored service

use crate::monitoring::ProbeKind;
use serde::{Deserialize, Serialize};

/// A monitored service: unique name, port and probe strategy
///
/// Descriptors are built once from configuration and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service name, unique within a registry
    pub name: String,
    /// Port probed on the monitor host
    pub port: u16,
    /// Probe strategy
    #[serde(default)]
    pub probe_kind: ProbeKind,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, port: u16, probe_kind: ProbeKind) -> Self {
        Self {
            name: name.into(),
            port,
            probe_kind,
        }
    }

    pub fn tcp(name: impl Into<String>, port: u16) -> Self {
        Self::new(name, port, ProbeKind::Tcp)
    }
}

/// The standard 18xxx service table
pub fn default_services() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::new("dragonfly", 18000, ProbeKind::ProcessRedis),
        ServiceDescriptor::tcp("redis", 18010),
        ServiceDescriptor::tcp("postgresql", 18020),
        // shares the PostgreSQL listener
        ServiceDescriptor::tcp("timescaledb", 18020),
        ServiceDescriptor::tcp("qdrant", 18003),
        ServiceDescriptor::tcp("neo4j", 18040),
        ServiceDescriptor::new("redpanda", 18090, ProbeKind::ProcessCluster),
        ServiceDescriptor::tcp("influxdb", 18200),
        ServiceDescriptor::tcp("minio", 18170),
        ServiceDescriptor::new("etcd", 18230, ProbeKind::ProcessEtcd),
        ServiceDescriptor::tcp("ipfs", 18180),
        ServiceDescriptor::tcp("janusgraph", 18220),
        ServiceDescriptor::tcp("elasticsearch", 18991),
        ServiceDescriptor::new("chromadb", 18270, ProbeKind::Http),
        ServiceDescriptor::new("faiss", 18271, ProbeKind::Http),
        ServiceDescriptor::new("haystack", 18240, ProbeKind::Http),
        ServiceDescriptor::tcp("weaviate", 18110),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_services_have_unique_names() {
        let services = default_services();
        let names: HashSet<_> = services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), services.len());
        assert_eq!(services.len(), 17);
    }

    #[test]
    fn test_probe_kind_defaults_to_tcp() {
        let descriptor: ServiceDescriptor =
            toml::from_str("name = \"neo4j\"\nport = 18040\n").unwrap();
        assert_eq!(descriptor, ServiceDescriptor::tcp("neo4j", 18040));
    }
}
