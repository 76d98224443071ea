//! Probe kind definitions
//!
//! Defines the probe strategies supported by the system

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Probe strategy of a registered service
///
/// Every kind other than `Tcp` has a specialized check and falls back to a
/// bare TCP connect when that check fails.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, PartialEq, Eq, Hash, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProbeKind {
    /// Plain TCP connect
    #[default]
    Tcp,
    /// `redis-cli PING` against the port
    ProcessRedis,
    /// `rpk cluster info` against the broker port
    ProcessCluster,
    /// `etcdctl endpoint health` against the client port
    ProcessEtcd,
    /// HTTP GET on `/health`, then `/`
    Http,
}

impl ProbeKind {
    /// Whether the probe shells out to an external tool
    pub fn is_process(&self) -> bool {
        matches!(
            self,
            ProbeKind::ProcessRedis | ProbeKind::ProcessCluster | ProbeKind::ProcessEtcd
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_matches_serde_names() {
        assert_eq!(ProbeKind::ProcessRedis.to_string(), "process_redis");
        assert_eq!(
            serde_json::to_string(&ProbeKind::ProcessEtcd).unwrap(),
            "\"process_etcd\""
        );
        assert_eq!(ProbeKind::from_str("http").unwrap(), ProbeKind::Http);
    }

    #[test]
    fn test_is_process() {
        assert!(ProbeKind::ProcessCluster.is_process());
        assert!(!ProbeKind::Http.is_process());
        assert!(!ProbeKind::Tcp.is_process());
    }
}
