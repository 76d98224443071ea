//! Probe registry
//!
//! Fixed, ordered collection of service descriptors. Built once at startup
//! and never mutated afterwards.

use std::collections::{BTreeMap, HashSet};

use svcwatch_common::{ConfigError, ServiceDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRegistry {
    descriptors: Vec<ServiceDescriptor>,
}

impl ProbeRegistry {
    /// Build a registry, rejecting duplicate service names and port 0
    ///
    /// Ports may repeat; two logical services can share one endpoint.
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            if !seen.insert(descriptor.name.as_str()) {
                return Err(ConfigError::duplicate_service(&descriptor.name));
            }
            if descriptor.port == 0 {
                return Err(ConfigError::invalid_value(
                    format!("services.{}.port", descriptor.name),
                    descriptor.port,
                ));
            }
        }

        Ok(Self { descriptors })
    }

    /// Registry built from the built-in service table
    pub fn with_defaults() -> Self {
        Self {
            descriptors: svcwatch_common::monitoring::default_services(),
        }
    }

    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Service name to port, as exposed by the status API and reports
    pub fn port_table(&self) -> BTreeMap<String, u16> {
        self.descriptors
            .iter()
            .map(|d| (d.name.clone(), d.port))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ProbeRegistry {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcwatch_common::ProbeKind;

    #[test]
    fn test_registry_preserves_order() {
        let registry = ProbeRegistry::new(vec![
            ServiceDescriptor::tcp("zeta", 1),
            ServiceDescriptor::tcp("alpha", 2),
            ServiceDescriptor::new("mid", 3, ProbeKind::Http),
        ])
        .unwrap();

        let names: Vec<_> = registry.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("mid").unwrap().probe_kind, ProbeKind::Http);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_rejects_duplicate_names() {
        let err = ProbeRegistry::new(vec![
            ServiceDescriptor::tcp("redis", 18010),
            ServiceDescriptor::tcp("redis", 18011),
        ])
        .unwrap_err();

        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn test_registry_rejects_port_zero() {
        let err = ProbeRegistry::new(vec![ServiceDescriptor::tcp("minio", 0)]).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid value for field 'services.minio.port': 0"
        );
    }

    #[test]
    fn test_registry_allows_shared_ports() {
        let registry = ProbeRegistry::new(vec![
            ServiceDescriptor::tcp("postgresql", 18020),
            ServiceDescriptor::tcp("timescaledb", 18020),
        ])
        .unwrap();

        let ports = registry.port_table();
        assert_eq!(ports["postgresql"], 18020);
        assert_eq!(ports["timescaledb"], 18020);
    }

    #[test]
    fn test_default_registry() {
        let registry = ProbeRegistry::with_defaults();
        assert_eq!(registry.len(), 17);
        assert!(registry.contains("dragonfly"));
        assert!(!registry.is_empty());
    }
}
