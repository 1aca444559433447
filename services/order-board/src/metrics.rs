//! Prometheus metrics for the order board
//!
//! Recorded through the `metrics` facade; nothing is exported until
//! [`install_prometheus`] has run.

use std::sync::OnceLock;

use ::metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

use crate::order::OrderStatus;

/// Order board metrics collector
#[derive(Debug)]
pub struct BoardMetrics;

impl BoardMetrics {
    fn new() -> Self {
        Self::register_metrics();
        Self
    }

    fn register_metrics() {
        describe_counter!("order_board_orders_created_total", "Total orders created");
        describe_counter!(
            "order_board_status_updates_total",
            "Total status updates by resulting status"
        );
        describe_counter!(
            "order_board_requests_rejected_total",
            "Requests rejected by error kind"
        );
        describe_counter!(
            "order_board_kitchen_events_sent_total",
            "Kitchen events written to sockets"
        );
        describe_gauge!(
            "order_board_kitchen_connections_active",
            "Connected kitchen displays"
        );
        describe_histogram!(
            "order_board_http_request_duration_seconds",
            "HTTP request duration in seconds"
        );
    }

    /// Record order created
    pub fn record_order_created(&self) {
        counter!("order_board_orders_created_total").increment(1);
    }

    /// Record status update
    pub fn record_status_update(&self, status: OrderStatus) {
        counter!("order_board_status_updates_total", "status" => status.as_str()).increment(1);
    }

    /// Record a rejected request
    pub fn record_rejection(&self, kind: &'static str) {
        counter!("order_board_requests_rejected_total", "kind" => kind).increment(1);
    }

    /// Record event written to a kitchen socket
    pub fn record_kitchen_event_sent(&self) {
        counter!("order_board_kitchen_events_sent_total").increment(1);
    }

    /// Publish the current number of kitchen connections
    #[allow(clippy::cast_precision_loss)]
    pub fn set_kitchen_connections(&self, active: usize) {
        gauge!("order_board_kitchen_connections_active").set(active as f64);
    }

    /// Record HTTP request duration
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: f64) {
        histogram!("order_board_http_request_duration_seconds",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string()
        )
        .record(duration);
    }
}

/// Global metrics instance
static METRICS: OnceLock<BoardMetrics> = OnceLock::new();

/// Installed Prometheus recorder, if installation succeeded
static PROMETHEUS: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

/// Get global metrics instance
pub fn get_metrics() -> &'static BoardMetrics {
    METRICS.get_or_init(BoardMetrics::new)
}

/// Install the Prometheus recorder once per process
pub fn install_prometheus() -> Option<&'static PrometheusHandle> {
    PROMETHEUS
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Prometheus recorder not installed: {}", e);
                None
            }
        })
        .as_ref()
}
