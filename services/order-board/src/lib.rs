//! Restaurant order board
//!
//! Waitstaff submit orders over HTTP, kitchen displays receive them live
//! over a WebSocket, and the kitchen marks each order delivered or
//! rejected.
//! - SQLite-backed order store with monotonically assigned ids
//! - Broadcast hub fanning new orders out to every connected kitchen
//! - JSON endpoints compatible with the existing ordering and kitchen pages

#![allow(missing_docs)]

use anyhow::Result;

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod notifier;
pub mod order;
pub mod server;
pub mod service;
pub mod store;
pub mod websocket;

pub use self::config::{BoardConfig, CorsConfig, DatabaseConfig, MonitoringConfig, NotifierConfig, ServerConfig};
pub use error::{BoardError, BoardResult};
pub use notifier::{KitchenEvent, NEW_ORDER_EVENT, Notifier};
pub use order::{NewOrder, Order, OrderId, OrderStatus};
pub use server::OrderBoardServer;
pub use service::OrderService;
pub use store::{InMemoryOrderStore, OrderStore, SqliteOrderStore};

/// Start the order board server
pub async fn start_server(config: BoardConfig) -> Result<()> {
    let server = OrderBoardServer::new(config).await?;
    server.start().await
}
