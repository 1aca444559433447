//! Order definitions and structures

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, BoardResult};

/// Store-assigned order identifier
pub type OrderId = i64;

/// Order structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID, assigned by the store
    pub id: OrderId,
    /// Table the order came from
    pub table: String,
    /// Items ordered
    pub details: String,
    /// Order total
    pub total: f64,
    /// Order status
    pub status: OrderStatus,
}

/// Order status
///
/// Any status may follow any other; the board does not enforce a lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Waiting for the kitchen
    #[default]
    Pending,
    /// Served to the table
    Delivered,
    /// Turned down by the kitchen
    Rejected,
}

impl OrderStatus {
    /// Integer code used on the wire and in the database
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Delivered => 1,
            Self::Rejected => 2,
        }
    }

    /// Lowercase name, used as a metrics label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<i64> for OrderStatus {
    type Error = BoardError;

    fn try_from(code: i64) -> BoardResult<Self> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Delivered),
            2 => Ok(Self::Rejected),
            other => Err(BoardError::validation(format!(
                "unknown order status {other}, expected 0 (pending), 1 (delivered) or 2 (rejected)"
            ))),
        }
    }
}

/// A validated order that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    table: String,
    details: String,
    total: f64,
}

impl NewOrder {
    /// Validate the fields of a new order
    pub fn new(table: impl Into<String>, details: impl Into<String>, total: f64) -> BoardResult<Self> {
        let table = table.into();
        let details = details.into();

        if table.trim().is_empty() {
            return Err(BoardError::validation("table must not be empty"));
        }
        if details.trim().is_empty() {
            return Err(BoardError::validation("details must not be empty"));
        }
        if !total.is_finite() {
            return Err(BoardError::validation("total must be a finite number"));
        }
        if total < 0.0 {
            return Err(BoardError::validation(format!(
                "total must not be negative, got {total}"
            )));
        }

        Ok(Self {
            table,
            details,
            total,
        })
    }

    /// Table the order came from
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Items ordered
    #[must_use]
    pub fn details(&self) -> &str {
        &self.details
    }

    /// Order total
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Attach a store-assigned id; new orders always start pending
    #[must_use]
    pub fn into_order(self, id: OrderId) -> Order {
        Order {
            id,
            table: self.table,
            details: self.details,
            total: self.total,
            status: OrderStatus::Pending,
        }
    }
}
