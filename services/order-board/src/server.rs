//! Order board server implementation

use anyhow::Result;
use axum::{
    Router,
    extract::{State, rejection::JsonRejection, ws::WebSocketUpgrade},
    http::StatusCode,
    middleware,
    response::{Json, Response},
    routing::{get, post},
};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{
    config::BoardConfig,
    error::BoardResult,
    handlers::{HealthHandlers, OrderHandlers},
    metrics::install_prometheus,
    middleware::{create_cors_layer, logging_middleware},
    models::{AckResponse, CreateOrderResponse, HealthCheckResponse, OrderView},
    notifier::Notifier,
    service::OrderService,
    store::{InMemoryOrderStore, OrderStore, SqliteOrderStore},
    websocket::KitchenSocket,
};

/// Unified application state containing all handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub order_handlers: OrderHandlers,
    pub health_handlers: HealthHandlers,
    pub kitchen_socket: KitchenSocket,
}

impl AppState {
    /// Build handler state around one service
    pub fn new(service: Arc<OrderService>, start_time: Instant) -> Self {
        Self {
            kitchen_socket: KitchenSocket::new(service.notifier().clone()),
            order_handlers: OrderHandlers::new(Arc::clone(&service)),
            health_handlers: HealthHandlers::new(service, start_time),
        }
    }
}

/// Order board server
#[derive(Debug)]
pub struct OrderBoardServer {
    config: BoardConfig,
    service: Arc<OrderService>,
    start_time: Instant,
}

impl OrderBoardServer {
    /// Create a server, opening the store named in the configuration
    pub async fn new(config: BoardConfig) -> Result<Self> {
        info!("Initializing order board server");

        let store: Arc<dyn OrderStore> = if config.uses_memory_store() {
            info!("Using in-memory order store, orders will not survive a restart");
            Arc::new(InMemoryOrderStore::new())
        } else {
            match SqliteOrderStore::connect(&config.database.url, config.database.max_connections)
                .await
            {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Failed to open order store at {}: {}", config.database.url, e);
                    return Err(e.into());
                }
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Create a server around an already opened store
    pub fn with_store(config: BoardConfig, store: Arc<dyn OrderStore>) -> Self {
        let notifier = Notifier::new(config.notifier.channel_capacity);
        let service = Arc::new(OrderService::new(store, notifier));

        Self {
            config,
            service,
            start_time: Instant::now(),
        }
    }

    /// The service requests are routed to
    #[must_use]
    pub fn service(&self) -> Arc<OrderService> {
        Arc::clone(&self.service)
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = match self.config.server_address().parse() {
            Ok(addr) => addr,
            Err(e) => {
                error!(
                    "Invalid server address '{}': {}",
                    self.config.server_address(),
                    e
                );
                return Err(anyhow::anyhow!("Invalid server address: {}", e));
            }
        };

        if self.config.monitoring.metrics_enabled && install_prometheus().is_none() {
            error!("Metrics endpoint enabled but the Prometheus recorder is unavailable");
        }

        let app = self.router();

        let listener = match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                info!("Order board listening on {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind TCP listener to {}: {}", addr, e);
                return Err(anyhow::anyhow!("Failed to bind to address {}: {}", addr, e));
            }
        };

        if let Err(e) = axum::serve(listener, app).await {
            error!("Server encountered a fatal error: {}", e);
            return Err(anyhow::anyhow!("Server error: {}", e));
        }

        Ok(())
    }

    /// Create the Axum application with all routes and middleware
    #[must_use]
    pub fn router(&self) -> Router {
        let state = AppState::new(Arc::clone(&self.service), self.start_time);
        build_router(state, &self.config)
    }
}

/// Assemble routes and middleware around prepared state
pub fn build_router(state: AppState, config: &BoardConfig) -> Router {
    let mut app = Router::new()
        .route("/crear_pedido", post(create_order))
        .route("/actualizar_estado", post(update_status))
        .route("/api/pedidos_pendientes", get(pending_orders))
        .route("/ws", get(kitchen_socket))
        .route(&config.monitoring.health_path, get(health_check));

    if config.monitoring.metrics_enabled {
        app = app.route(&config.monitoring.metrics_path, get(metrics));
    }

    let mut app = app
        .with_state(state)
        .layer(axum::extract::DefaultBodyLimit::max(config.server.max_body_size))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            config.server.timeout_seconds,
        )))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http());

    if config.cors.enabled {
        app = app.layer(create_cors_layer(&config.cors));
    }

    info!("Order board routes configured");
    app
}

// Handler wrapper functions to work with unified state
async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> BoardResult<Json<CreateOrderResponse>> {
    OrderHandlers::create_order(State(state.order_handlers), payload).await
}

async fn update_status(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> BoardResult<Json<AckResponse>> {
    OrderHandlers::update_status(State(state.order_handlers), payload).await
}

async fn pending_orders(State(state): State<AppState>) -> BoardResult<Json<Vec<OrderView>>> {
    OrderHandlers::pending_orders(State(state.order_handlers)).await
}

async fn kitchen_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    KitchenSocket::handle_websocket(ws, State(state.kitchen_socket)).await
}

async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    HealthHandlers::health_check(State(state.health_handlers)).await
}

async fn metrics() -> Result<String, StatusCode> {
    HealthHandlers::metrics().await
}

/// API route documentation
#[allow(clippy::print_stdout)]
pub fn print_routes() {
    println!("Order Board Routes:");
    println!("===================");
    println!();
    println!("Orders:");
    println!("  POST /crear_pedido            - Create an order and notify kitchens");
    println!("  POST /actualizar_estado       - Set order status (0 pending, 1 delivered, 2 rejected)");
    println!("  GET  /api/pedidos_pendientes  - List pending orders");
    println!();
    println!("Kitchen:");
    println!("  GET  /ws                      - WebSocket stream of nuevo_pedido events");
    println!();
    println!("Health & Monitoring:");
    println!("  GET  /health                  - Health check");
    println!("  GET  /metrics                 - Prometheus metrics");
}
