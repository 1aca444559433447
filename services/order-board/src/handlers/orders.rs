//! Order intake and kitchen status handlers

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::{BoardError, BoardResult},
    models::{AckResponse, CreateOrderResponse, OrderView, ResponseStatus},
    service::OrderService,
};

/// Order handlers
#[derive(Clone, Debug)]
pub struct OrderHandlers {
    service: Arc<OrderService>,
}

impl OrderHandlers {
    pub const fn new(service: Arc<OrderService>) -> Self {
        Self { service }
    }

    /// `POST /crear_pedido`
    pub async fn create_order(
        State(handlers): State<Self>,
        payload: Result<Json<Value>, JsonRejection>,
    ) -> BoardResult<Json<CreateOrderResponse>> {
        let Json(payload) = payload.map_err(reject_body)?;
        let order = handlers.service.create_order(&payload).await?;

        Ok(Json(CreateOrderResponse {
            status: ResponseStatus::Ok,
            pedido: OrderView::from(&order),
        }))
    }

    /// `POST /actualizar_estado`
    pub async fn update_status(
        State(handlers): State<Self>,
        payload: Result<Json<Value>, JsonRejection>,
    ) -> BoardResult<Json<AckResponse>> {
        let Json(payload) = payload.map_err(reject_body)?;
        handlers.service.set_status(&payload).await?;

        Ok(Json(AckResponse::ok()))
    }

    /// `GET /api/pedidos_pendientes`
    pub async fn pending_orders(
        State(handlers): State<Self>,
    ) -> BoardResult<Json<Vec<OrderView>>> {
        let orders = handlers.service.list_pending().await?;
        Ok(Json(orders.iter().map(OrderView::from).collect()))
    }
}

/// Bodies that are not JSON objects get the same error shape as bad fields
fn reject_body(rejection: JsonRejection) -> BoardError {
    BoardError::invalid_payload(rejection.body_text())
}
