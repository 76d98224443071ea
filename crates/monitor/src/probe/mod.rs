//! Service probes
//!
//! The [`Prober`] trait is the seam between the sweep orchestration and
//! the actual network I/O. [`ProbeExecutor`] is the production prober:
//! it dispatches on the descriptor's [`ProbeKind`]. A specialized strategy
//! that cannot confirm the service falls back to a bare TCP connect
//! (`process_*`, `http`):
//!
//! | outcome                              | status        |
//! |--------------------------------------|---------------|
//! | specialized strategy succeeded       | `healthy`     |
//! | TCP connect succeeded                | `accessible`  |
//! | TCP connect failed                   | `unreachable` |
//! | probe machinery failed               | `error`       |

pub mod command;
mod error;
pub mod http;
mod result;
pub mod tcp;

pub use error::ProbeError;
pub use result::ProbeResult;

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use svcwatch_common::config::ProbeConfig;
use svcwatch_common::{ProbeKind, ServiceDescriptor};
use tracing::{debug, instrument, warn};

use crate::error::Result;

/// Probe one service and classify the outcome
///
/// Implementations must not fail: every problem is folded into the
/// returned [`ProbeResult`]. The caller applies the overall deadline.
#[async_trait]
pub trait Prober: Send + Sync + Debug {
    async fn probe(&self, descriptor: &ServiceDescriptor) -> ProbeResult;
}

/// Strategy dispatcher used in production
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    host: String,
    config: ProbeConfig,
    client: Client,
}

impl ProbeExecutor {
    pub fn new(host: impl Into<String>, config: ProbeConfig) -> Result<Self> {
        // Probes target local endpoints; environment proxies must not apply
        let client = Client::builder().no_proxy().build()?;

        Ok(Self {
            host: host.into(),
            config,
            client,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    async fn specialized(
        &self,
        descriptor: &ServiceDescriptor,
    ) -> Option<std::result::Result<&'static str, ProbeError>> {
        let host = self.host.as_str();
        let port = descriptor.port;

        let outcome = match descriptor.probe_kind {
            ProbeKind::Tcp => return None,
            ProbeKind::ProcessRedis => command::redis_ping(&self.config, host, port)
                .await
                .map(|_| command::REDIS_PING_SUCCESSFUL),
            ProbeKind::ProcessCluster => command::cluster_info(&self.config, host, port)
                .await
                .map(|_| command::CLUSTER_ACCESSIBLE),
            ProbeKind::ProcessEtcd => command::etcd_endpoint_health(&self.config, host, port)
                .await
                .map(|_| command::ETCD_ENDPOINT_HEALTHY),
            ProbeKind::Http => {
                http::check(&self.client, host, port, self.config.http_timeout()).await
            }
        };

        Some(outcome)
    }

    async fn tcp_fallback(&self, descriptor: &ServiceDescriptor) -> ProbeResult {
        match tcp::connect(&self.host, descriptor.port, self.config.tcp_timeout()).await {
            Ok(()) => ProbeResult::accessible(tcp::PORT_ACCESSIBLE),
            Err(e) => {
                debug!("TCP check of {} failed: {}", descriptor.name, e);
                ProbeResult::unreachable(format!("{}: {}", tcp::PORT_NOT_ACCESSIBLE, e))
            }
        }
    }
}

#[async_trait]
impl Prober for ProbeExecutor {
    #[instrument(
        name = "probe",
        skip_all,
        fields(service = %descriptor.name, kind = %descriptor.probe_kind, port = descriptor.port)
    )]
    async fn probe(&self, descriptor: &ServiceDescriptor) -> ProbeResult {
        match self.specialized(descriptor).await {
            Some(Ok(detail)) => return ProbeResult::healthy(detail),
            Some(Err(e)) if e.is_fatal() => {
                warn!("Probe of {} failed: {}", descriptor.name, e);
                return ProbeResult::error(e.to_string());
            }
            Some(Err(e)) => debug!(
                "{} check of {} failed, falling back to TCP: {}",
                descriptor.probe_kind, descriptor.name, e
            ),
            None => {}
        }

        self.tcp_fallback(descriptor).await
    }
}
