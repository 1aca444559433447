//! Order lifecycle orchestration
//!
//! `OrderService` is the boundary the HTTP layer calls: it parses raw
//! payloads into typed requests, persists through the store and publishes
//! new orders to the kitchen hub.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::BoardResult;
use crate::metrics::get_metrics;
use crate::models::{CreateOrderRequest, UpdateStatusRequest};
use crate::notifier::Notifier;
use crate::order::{Order, OrderStatus};
use crate::store::OrderStore;

/// Creates orders, changes their status, lists what the kitchen still owes
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    notifier: Notifier,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("store", &"Arc<dyn OrderStore>")
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl OrderService {
    /// Wire a service to its store and kitchen hub
    pub fn new(store: Arc<dyn OrderStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    /// Kitchen hub new orders are published on
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Parse, persist and publish a new order
    pub async fn create_order(&self, payload: &Value) -> BoardResult<Order> {
        let request = CreateOrderRequest::from_payload(payload).inspect_err(|e| {
            warn!("Rejected order payload: {}", e);
            get_metrics().record_rejection(e.kind());
        })?;

        let order = self
            .store
            .insert(&request.table, &request.details, request.total)
            .await
            .inspect_err(|e| get_metrics().record_rejection(e.kind()))?;

        let reached = self.notifier.broadcast_new_order(&order);
        get_metrics().record_order_created();

        info!(
            order_id = order.id,
            table = %order.table,
            kitchens = reached,
            "Order created"
        );
        Ok(order)
    }

    /// Parse a status change and apply it; status changes are not broadcast
    pub async fn set_status(&self, payload: &Value) -> BoardResult<Order> {
        let result = self.apply_status(payload).await;

        match &result {
            Ok(order) => {
                get_metrics().record_status_update(order.status);
                info!(order_id = order.id, status = ?order.status, "Order status updated");
            }
            Err(e) => {
                warn!("Status update rejected: {}", e);
                get_metrics().record_rejection(e.kind());
            }
        }

        result
    }

    async fn apply_status(&self, payload: &Value) -> BoardResult<Order> {
        let request = UpdateStatusRequest::from_payload(payload)?;
        let status = OrderStatus::try_from(request.status)?;
        self.store.update_status(request.id, status).await
    }

    /// Orders the kitchen has not delivered or rejected yet
    pub async fn list_pending(&self) -> BoardResult<Vec<Order>> {
        self.store.list_by_status(OrderStatus::Pending).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use crate::store::InMemoryOrderStore;
    use serde_json::json;

    fn service() -> (OrderService, Arc<InMemoryOrderStore>) {
        let store = Arc::new(InMemoryOrderStore::new());
        let service = OrderService::new(store.clone(), Notifier::new(16));
        (service, store)
    }

    #[tokio::test]
    async fn test_create_order_persists_and_publishes() {
        let (service, store) = service();
        let mut kitchen = service.notifier().subscribe();

        let order = service
            .create_order(&json!({"mesa": "T1", "detalles": "2x soup", "total": 9.5}))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(store.get(order.id).await.unwrap(), Some(order.clone()));

        let event = kitchen.recv().await.unwrap();
        assert_eq!(event.data.id, order.id);
        assert_eq!(event.data.table, "T1");
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let (service, _) = service();
        let payload = json!({"mesa": "T5", "detalles": "1x bread", "total": "1.20"});

        let first = service.create_order(&payload).await.unwrap();
        let second = service.create_order(&payload).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_invalid_payload_persists_nothing() {
        let (service, store) = service();
        let mut kitchen = service.notifier().subscribe();

        for payload in [
            json!({"detalles": "2x soup", "total": 9.5}),
            json!({"mesa": "T1", "total": 9.5}),
            json!({"mesa": "T1", "detalles": "2x soup", "total": "abc"}),
        ] {
            let result = service.create_order(&payload).await;
            assert!(matches!(result, Err(BoardError::InvalidPayload { .. })));
        }

        let result = service
            .create_order(&json!({"mesa": "", "detalles": "2x soup", "total": 9.5}))
            .await;
        assert!(matches!(result, Err(BoardError::Validation { .. })));

        assert!(store.is_empty());
        assert!(kitchen.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delivered_order_leaves_pending_list() {
        let (service, _) = service();
        let soup = service
            .create_order(&json!({"mesa": "T1", "detalles": "2x soup", "total": 9.5}))
            .await
            .unwrap();
        let salad = service
            .create_order(&json!({"mesa": "T2", "detalles": "1x salad", "total": 6}))
            .await
            .unwrap();

        let updated = service
            .set_status(&json!({"id": soup.id, "estado": 1}))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Delivered);

        let pending = service.list_pending().await.unwrap();
        assert_eq!(pending, vec![salad]);
    }

    #[tokio::test]
    async fn test_set_status_errors() {
        let (service, store) = service();
        let order = service
            .create_order(&json!({"mesa": "T1", "detalles": "2x soup", "total": 9.5}))
            .await
            .unwrap();

        let result = service.set_status(&json!({"id": 99999, "estado": 1})).await;
        assert!(matches!(
            result,
            Err(BoardError::OrderNotFound { order_id: 99999 })
        ));

        let result = service.set_status(&json!({"id": "x", "estado": 1})).await;
        assert!(matches!(result, Err(BoardError::InvalidPayload { .. })));

        let result = service.set_status(&json!({"id": order.id, "estado": 7})).await;
        assert!(matches!(result, Err(BoardError::Validation { .. })));

        assert_eq!(store.get(order.id).await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn test_status_change_is_not_broadcast() {
        let (service, _) = service();
        let order = service
            .create_order(&json!({"mesa": "T3", "detalles": "tea", "total": 2}))
            .await
            .unwrap();

        let mut kitchen = service.notifier().subscribe();
        service
            .set_status(&json!({"id": order.id, "estado": 2}))
            .await
            .unwrap();
        assert!(kitchen.try_recv().is_err());
    }
}
