//! Health check and monitoring handlers

use axum::{extract::State, http::StatusCode, response::Json};
use std::{sync::Arc, time::Instant};
use tracing::{debug, error};

use crate::{metrics::install_prometheus, models::HealthCheckResponse, service::OrderService};

/// Health check handlers
#[derive(Clone, Debug)]
pub struct HealthHandlers {
    service: Arc<OrderService>,
    start_time: Instant,
}

impl HealthHandlers {
    pub const fn new(service: Arc<OrderService>, start_time: Instant) -> Self {
        Self {
            service,
            start_time,
        }
    }

    /// Health check endpoint
    pub async fn health_check(State(handlers): State<Self>) -> Json<HealthCheckResponse> {
        debug!("Health check request");

        let (status, pending_orders) = match handlers.service.list_pending().await {
            Ok(pending) => ("healthy", Some(pending.len())),
            Err(e) => {
                error!("Health check could not reach the order store: {}", e);
                ("degraded", None)
            }
        };

        Json(HealthCheckResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: handlers.start_time.elapsed().as_secs(),
            kitchen_subscribers: handlers.service.notifier().subscriber_count(),
            pending_orders,
        })
    }

    /// Prometheus metrics endpoint
    pub async fn metrics() -> Result<String, StatusCode> {
        install_prometheus()
            .map(|handle| handle.render())
            .ok_or(StatusCode::SERVICE_UNAVAILABLE)
    }
}
