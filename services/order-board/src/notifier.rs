//! Realtime fan-out of new orders to kitchen displays
//!
//! A single broadcast hub shared by every kitchen connection. Publishing is
//! a non-blocking enqueue: clients that are not subscribed at that moment
//! never see the event, and a subscriber that falls too far behind skips
//! the events it missed.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

use crate::models::OrderView;
use crate::order::Order;

/// Event name kitchen displays listen for
pub const NEW_ORDER_EVENT: &str = "nuevo_pedido";

/// Message pushed to kitchen displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenEvent {
    /// Event name
    pub event: String,
    /// Order payload
    pub data: OrderView,
    /// Publish time, unix seconds
    pub timestamp: i64,
}

impl KitchenEvent {
    /// Event announcing a freshly created order
    #[must_use]
    pub fn new_order(order: &Order) -> Self {
        Self {
            event: NEW_ORDER_EVENT.to_string(),
            data: OrderView::from(order),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Broadcast hub for kitchen events
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<KitchenEvent>,
}

impl Notifier {
    /// Create a hub that buffers up to `capacity` events per subscriber
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Register a subscriber; it only sees events published from now on
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.tx.subscribe()
    }

    /// Number of connected subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Publish a new-order event, returning how many subscribers it reached
    pub fn broadcast_new_order(&self, order: &Order) -> usize {
        let event = KitchenEvent::new_order(order);

        match self.tx.send(event) {
            Ok(subscribers) => {
                debug!(
                    order_id = order.id,
                    subscribers = subscribers,
                    "New order published"
                );
                subscribers
            }
            Err(_) => {
                debug!(order_id = order.id, "No kitchen connected, event dropped");
                0
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(256)
    }
}
