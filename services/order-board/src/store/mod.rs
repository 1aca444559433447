//! Order persistence
//!
//! `OrderStore` is the seam between the service and storage. Each
//! operation is one statement against the backend; there is no
//! application-level locking, so concurrent status updates to the same
//! order resolve as last writer wins.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::BoardResult;
use crate::order::{NewOrder, Order, OrderId, OrderStatus};

pub use memory::InMemoryOrderStore;
pub use sqlite::SqliteOrderStore;

/// Durable, queryable storage for orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a validated order, assigning the next id
    async fn persist(&self, order: NewOrder) -> BoardResult<Order>;

    /// Fetch one order
    async fn get(&self, id: OrderId) -> BoardResult<Option<Order>>;

    /// Overwrite the status of an existing order and return the updated record
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> BoardResult<Order>;

    /// All orders currently in `status`
    async fn list_by_status(&self, status: OrderStatus) -> BoardResult<Vec<Order>>;

    /// Validate and persist a new pending order
    async fn insert(&self, table: &str, details: &str, total: f64) -> BoardResult<Order> {
        let order = NewOrder::new(table, details, total)?;
        self.persist(order).await
    }
}
