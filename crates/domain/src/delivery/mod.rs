//! Delivery aggregate and related types.

mod aggregate;
mod status;

pub use aggregate::Delivery;
pub use status::DeliveryStatus;

use thiserror::Error;

/// Errors that can occur during delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The preparation id was nil.
    #[error("preparation id must not be nil")]
    PreparationIdRequired,

    /// The delivery is not in a status that permits the transition.
    #[error("cannot {action} delivery from {current} status")]
    InvalidTransition {
        current: DeliveryStatus,
        action: &'static str,
    },
}
