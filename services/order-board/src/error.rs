//! Error types for the order board

use thiserror::Error;

/// Order board error types
#[derive(Error, Debug)]
pub enum BoardError {
    /// Request body is missing fields or carries values of the wrong type
    #[error("Invalid payload: {reason}")]
    InvalidPayload {
        /// What was wrong with the payload
        reason: String,
    },

    /// Well-formed values that break an order invariant
    #[error("Validation error: {message}")]
    Validation {
        /// Detailed validation error message
        message: String,
    },

    /// Order not found in the store
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// The identifier that was looked up
        order_id: i64,
    },

    /// Persistence layer error
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl BoardError {
    pub(crate) fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Short label used for metrics and logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload { .. } => "invalid_payload",
            Self::Validation { .. } => "validation",
            Self::OrderNotFound { .. } => "not_found",
            Self::Persistence(_) => "persistence",
        }
    }
}

/// Type alias for order board results
pub type BoardResult<T> = Result<T, BoardError>;
