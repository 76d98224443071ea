//! Bare TCP reachability check

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::ProbeError;

pub const PORT_ACCESSIBLE: &str = "Port is accessible";
pub const PORT_NOT_ACCESSIBLE: &str = "Port not accessible";

/// Open and immediately close a TCP connection to `host:port`
///
/// No payload is exchanged. A hostname resolving to several addresses is
/// tried address by address within the same timeout.
pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<(), ProbeError> {
    let addr = format!("{host}:{port}");

    let mut stream = match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
        Err(_) => {
            return Err(ProbeError::Timeout {
                target: addr,
                after: timeout,
            });
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
            return Err(ProbeError::ConnectionRefused { addr });
        }
        Ok(Err(source)) => return Err(ProbeError::Connect { addr, source }),
        Ok(Ok(stream)) => stream,
    };

    // Close errors say nothing about reachability
    let _ = stream.shutdown().await;
    Ok(())
}
