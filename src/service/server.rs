//! HTTP server lifecycle
//!
//! Binds the API router and serves it until the shared shutdown channel
//! fires.

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug)]
pub struct HttpServer {
    listener: TcpListener,
    shutdown_tx: broadcast::Sender<()>,
}

impl HttpServer {
    /// Bind `bind_addr` (`ip:port`)
    pub async fn bind(bind_addr: &str, shutdown_tx: broadcast::Sender<()>) -> Result<Self> {
        let addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{bind_addr}': {e}"))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to address '{addr}': {e}"))?;

        Ok(Self {
            listener,
            shutdown_tx,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve `app` in a background task
    ///
    /// A server error broadcasts shutdown so the rest of the process stops
    /// with it.
    pub fn serve(self, app: Router) -> JoinHandle<()> {
        let Self {
            listener,
            shutdown_tx,
        } = self;

        if let Ok(addr) = listener.local_addr() {
            info!("HTTP server listening on {}", addr);
        }

        let mut shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server received shutdown signal");
            });

            if let Err(e) = server.await {
                error!("HTTP server error: {}", e);
                let _ = shutdown_tx.send(());
            }
            info!("HTTP server stopped");
        })
    }
}
