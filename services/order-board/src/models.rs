//! REST API models and request/response types
//!
//! Field names on the wire follow the ordering and kitchen clients
//! (`mesa`, `detalles`, `estado`, `nombre`, `pedido`).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::error::{BoardError, BoardResult};
use crate::order::{Order, OrderId};

/// Parsed body of `POST /crear_pedido`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    /// Originating table (`mesa`)
    pub table: String,
    /// Items ordered (`detalles`)
    pub details: String,
    /// Order total (`total`)
    pub total: f64,
}

impl CreateOrderRequest {
    /// Parse a raw JSON body, rejecting missing fields and type mismatches
    pub fn from_payload(payload: &Value) -> BoardResult<Self> {
        Ok(Self {
            table: string_field(payload, "mesa")?,
            details: string_field(payload, "detalles")?,
            total: number_field(payload, "total")?,
        })
    }
}

/// Parsed body of `POST /actualizar_estado`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    /// Order to update
    pub id: OrderId,
    /// Raw status code (`estado`), checked against the known statuses later
    pub status: i64,
}

impl UpdateStatusRequest {
    /// Parse a raw JSON body; both fields must be integers
    pub fn from_payload(payload: &Value) -> BoardResult<Self> {
        Ok(Self {
            id: integer_field(payload, "id")?,
            status: integer_field(payload, "estado")?,
        })
    }
}

fn field<'a>(payload: &'a Value, name: &str) -> BoardResult<&'a Value> {
    if !payload.is_object() {
        return Err(BoardError::invalid_payload("request body must be a JSON object"));
    }
    match payload.get(name) {
        None | Some(Value::Null) => Err(BoardError::invalid_payload(format!(
            "missing field '{name}'"
        ))),
        Some(value) => Ok(value),
    }
}

fn string_field(payload: &Value, name: &str) -> BoardResult<String> {
    field(payload, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| BoardError::invalid_payload(format!("field '{name}' must be a string")))
}

/// Numbers may arrive as JSON numbers or as numeric strings
fn number_field(payload: &Value, name: &str) -> BoardResult<f64> {
    let parsed = match field(payload, name)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|value| value.is_finite())
        .ok_or_else(|| BoardError::invalid_payload(format!("field '{name}' must be a number")))
}

/// Integers may arrive as JSON integers, whole-valued floats like `1.0`,
/// or integer strings
fn integer_field(payload: &Value, name: &str) -> BoardResult<i64> {
    let parsed = match field(payload, name)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(whole_number)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| BoardError::invalid_payload(format!("field '{name}' must be an integer")))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_number(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

/// Order as shown to clients and kitchen displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderView {
    /// Order ID
    pub id: OrderId,
    /// Table the order came from
    #[serde(rename = "nombre")]
    pub table: String,
    /// Items ordered
    #[serde(rename = "detalles")]
    pub details: String,
    /// Order total
    pub total: f64,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            table: order.table.clone(),
            details: order.details.clone(),
            total: order.total,
        }
    }
}

/// Outcome marker carried by every write response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Request applied
    Ok,
    /// Request rejected
    Error,
}

/// Response of `POST /crear_pedido`
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// Always `ok`
    pub status: ResponseStatus,
    /// The order that was created
    pub pedido: OrderView,
}

/// Bare acknowledgment, used by `POST /actualizar_estado`
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    /// Always `ok`
    pub status: ResponseStatus,
}

impl AckResponse {
    /// Successful acknowledgment
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
        }
    }
}

/// Error response model
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `error`
    pub status: ResponseStatus,
    /// Human-readable error message
    pub msg: String,
}

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidPayload { .. } | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::OrderNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Persistence(e) => {
                error!("Persistence failure while serving request: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            status: ResponseStatus::Error,
            msg: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Service version
    pub version: String,
    /// Service uptime in seconds
    pub uptime_seconds: u64,
    /// Connected kitchen displays
    pub kitchen_subscribers: usize,
    /// Orders waiting for the kitchen, when the store could be queried
    pub pending_orders: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_create_order() {
        let request =
            CreateOrderRequest::from_payload(&json!({"mesa": "T1", "detalles": "2x soup", "total": 9.5}))
                .unwrap();
        assert_eq!(request.table, "T1");
        assert_eq!(request.details, "2x soup");
        assert!((request.total - 9.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_coerced_from_string() {
        let request =
            CreateOrderRequest::from_payload(&json!({"mesa": "T2", "detalles": "tea", "total": " 3.75 "}))
                .unwrap();
        assert!((request.total - 3.75).abs() < f64::EPSILON);

        let request =
            CreateOrderRequest::from_payload(&json!({"mesa": "T2", "detalles": "tea", "total": 4}))
                .unwrap();
        assert!((request.total - 4.0).abs() < f64::EPSILON);
    }

    #[rstest]
    #[case::missing_mesa(json!({"detalles": "2x soup", "total": 9.5}))]
    #[case::missing_detalles(json!({"mesa": "T1", "total": 9.5}))]
    #[case::missing_total(json!({"mesa": "T1", "detalles": "2x soup"}))]
    #[case::null_mesa(json!({"mesa": null, "detalles": "2x soup", "total": 9.5}))]
    #[case::non_numeric_total(json!({"mesa": "T1", "detalles": "2x soup", "total": "nine"}))]
    #[case::nan_total(json!({"mesa": "T1", "detalles": "2x soup", "total": "NaN"}))]
    #[case::bool_total(json!({"mesa": "T1", "detalles": "2x soup", "total": true}))]
    #[case::numeric_mesa(json!({"mesa": 4, "detalles": "2x soup", "total": 9.5}))]
    #[case::not_an_object(json!(["T1", "2x soup", 9.5]))]
    fn test_create_order_rejects(#[case] payload: Value) {
        assert!(matches!(
            CreateOrderRequest::from_payload(&payload),
            Err(BoardError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_parse_update_status() {
        let request = UpdateStatusRequest::from_payload(&json!({"id": 12, "estado": 1})).unwrap();
        assert_eq!(request, UpdateStatusRequest { id: 12, status: 1 });

        let request =
            UpdateStatusRequest::from_payload(&json!({"id": "12", "estado": "2"})).unwrap();
        assert_eq!(request, UpdateStatusRequest { id: 12, status: 2 });
    }

    #[test]
    fn test_whole_float_accepted_as_integer() {
        let request =
            UpdateStatusRequest::from_payload(&json!({"id": 3, "estado": 1.0})).unwrap();
        assert_eq!(request, UpdateStatusRequest { id: 3, status: 1 });

        let request =
            UpdateStatusRequest::from_payload(&json!({"id": 7.0, "estado": 0})).unwrap();
        assert_eq!(request, UpdateStatusRequest { id: 7, status: 0 });
    }

    #[rstest]
    #[case::missing_id(json!({"estado": 1}))]
    #[case::missing_estado(json!({"id": 1}))]
    #[case::fractional_id(json!({"id": 1.5, "estado": 1}))]
    #[case::fractional_estado(json!({"id": 1, "estado": 0.5}))]
    #[case::out_of_range_id(json!({"id": 1e20, "estado": 1}))]
    #[case::text_estado(json!({"id": 1, "estado": "delivered"}))]
    fn test_update_status_rejects(#[case] payload: Value) {
        assert!(matches!(
            UpdateStatusRequest::from_payload(&payload),
            Err(BoardError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_order_view_field_names() {
        let view = OrderView {
            id: 1,
            table: "T1".to_string(),
            details: "2x soup".to_string(),
            total: 9.5,
        };
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({"id": 1, "nombre": "T1", "detalles": "2x soup", "total": 9.5})
        );
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (BoardError::invalid_payload("bad"), StatusCode::BAD_REQUEST),
            (BoardError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                BoardError::OrderNotFound { order_id: 4 },
                StatusCode::NOT_FOUND,
            ),
            (
                BoardError::Persistence(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
