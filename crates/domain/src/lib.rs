//! Domain layer for the kitchen flow system.
//!
//! Two aggregates track an order through the kitchen:
//! - [`Preparation`] — the cooking side, `Received → InProgress → Finished`
//! - [`Delivery`] — the pickup side, `ReadyForPickup → Finalized`
//!
//! Each aggregate owns its status machine; transitions are guarded and
//! return typed errors carrying the offending current status.

pub mod delivery;
pub mod preparation;

pub use delivery::{Delivery, DeliveryError, DeliveryStatus};
pub use preparation::{Preparation, PreparationError, PreparationStatus};
