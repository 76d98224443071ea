//! HTTP probe
//!
//! `GET /health` first; a service without a health endpoint still counts
//! as healthy when its root answers 200.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use super::ProbeError;

pub const HEALTH_CHECK_PASSED: &str = "HTTP health check passed";
pub const ROOT_ACCESSIBLE: &str = "HTTP root accessible";

/// Probe `http://host:port/health`, then `http://host:port/`
///
/// Each request is bounded by `timeout`. Returns the detail string of the
/// first request that answered 200.
pub async fn check(
    client: &Client,
    host: &str,
    port: u16,
    timeout: Duration,
) -> Result<&'static str, ProbeError> {
    let health_url = format!("http://{host}:{port}/health");
    match get_ok(client, &health_url, timeout).await {
        Ok(()) => return Ok(HEALTH_CHECK_PASSED),
        Err(e) => debug!("Health endpoint check failed, trying root: {}", e),
    }

    let root_url = format!("http://{host}:{port}/");
    get_ok(client, &root_url, timeout)
        .await
        .map(|_| ROOT_ACCESSIBLE)
}

async fn get_ok(client: &Client, url: &str, timeout: Duration) -> Result<(), ProbeError> {
    let request = client.get(url).timeout(timeout);
    let response = request.send().await.map_err(|source| {
        if source.is_timeout() {
            ProbeError::Timeout {
                target: url.to_string(),
                after: timeout,
            }
        } else {
            ProbeError::Http {
                url: url.to_string(),
                source,
            }
        }
    })?;

    match response.status() {
        StatusCode::OK => Ok(()),
        status => Err(ProbeError::protocol(format!("GET {url} returned {status}"))),
    }
}
