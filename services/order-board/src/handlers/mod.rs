//! API handlers for the order board endpoints

pub mod health;
pub mod orders;

pub use health::HealthHandlers;
pub use orders::OrderHandlers;
