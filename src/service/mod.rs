//! HTTP service layer
//!
//! JSON status API over the shared [`svcwatch_monitor::Monitor`], served by
//! a single axum server with graceful shutdown.

pub mod api;
pub mod server;
pub mod trace;

pub use api::{ApiState, create_router};
pub use server::HttpServer;
