//! Shared types for the kitchen flow system.

pub mod types;

pub use types::{DeliveryId, OrderId, PreparationId};
