//! JSON status API
//!
//! Read-only views of the latest snapshot and of the per-service history.
//! Handlers never trigger a sweep.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use svcwatch_monitor::{HistoryEntry, Monitor, ServiceStatus, SnapshotSummary};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::service::trace::http_trace_layer;

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub monitor: Arc<Monitor>,
}

/// Build the API router with tracing and permissive CORS
pub fn create_router(monitor: Arc<Monitor>) -> Router {
    info!("Building status API router");

    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/services", get(services_handler))
        .route("/api/services/{name}/history", get(history_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(ApiState { monitor })
        .layer(http_trace_layer())
        .layer(CorsLayer::permissive())
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown service: {0}")]
    ServiceNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => {
                error!("Internal API error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[derive(Serialize)]
struct RegistryInfo {
    total_ports_assigned: usize,
    ports: BTreeMap<String, u16>,
}

#[derive(Serialize)]
struct StatusResponse<'a> {
    summary: &'a SnapshotSummary,
    services: &'a BTreeMap<String, ServiceStatus>,
    registry: RegistryInfo,
}

#[derive(Serialize)]
struct HistoryResponse {
    name: String,
    uptime_percentage: f64,
    entries: Vec<HistoryEntry>,
}

/// Latest snapshot plus the registry port table
async fn status_handler(State(state): State<ApiState>) -> Response {
    let snapshot = state.monitor.get_snapshot();
    let ports = state.monitor.registry().port_table();

    Json(StatusResponse {
        summary: &snapshot.summary,
        services: &snapshot.services,
        registry: RegistryInfo {
            total_ports_assigned: ports.len(),
            ports,
        },
    })
    .into_response()
}

async fn services_handler(
    State(state): State<ApiState>,
) -> Json<BTreeMap<String, ServiceStatus>> {
    Json(state.monitor.get_service_statuses())
}

async fn history_handler(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    if !state.monitor.registry().contains(&name) {
        return Err(ApiError::ServiceNotFound(name));
    }

    let entries = state.monitor.history(&name);
    let uptime_percentage = state.monitor.uptime(&name);

    Ok(Json(HistoryResponse {
        name,
        uptime_percentage,
        entries,
    }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Prometheus metrics endpoint
async fn metrics_handler() -> Response {
    match svcwatch_common::metrics::export_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => ApiError::Internal(format!("Failed to export metrics: {e}")).into_response(),
    }
}
