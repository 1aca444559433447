//! In-process order store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::OrderStore;
use crate::error::{BoardError, BoardResult};
use crate::order::{NewOrder, Order, OrderId, OrderStatus};

/// Order store backed by a map; contents are lost on drop
#[derive(Debug)]
pub struct InMemoryOrderStore {
    orders: RwLock<BTreeMap<OrderId, Order>>,
    next_id: AtomicI64,
}

impl InMemoryOrderStore {
    /// Create an empty store; the first order gets id 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of orders ever stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    /// Whether no order has been stored yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn persist(&self, order: NewOrder) -> BoardResult<Order> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let order = order.into_order(id);
        self.orders.write().insert(id, order.clone());

        debug!("Order {} stored in memory", id);
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> BoardResult<Option<Order>> {
        Ok(self.orders.read().get(&id).cloned())
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> BoardResult<Order> {
        let mut orders = self.orders.write();
        let order = orders
            .get_mut(&id)
            .ok_or(BoardError::OrderNotFound { order_id: id })?;
        order.status = status;

        debug!("Order {} moved to {:?}", id, status);
        Ok(order.clone())
    }

    async fn list_by_status(&self, status: OrderStatus) -> BoardResult<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .values()
            .filter(|order| order.status == status)
            .cloned()
            .collect())
    }
}
