//! Preparation aggregate and related types.

mod aggregate;
mod status;

pub use aggregate::Preparation;
pub use status::PreparationStatus;

use thiserror::Error;

/// Errors that can occur during preparation operations.
#[derive(Debug, Error)]
pub enum PreparationError {
    /// The order id was nil.
    #[error("order id must not be nil")]
    OrderIdRequired,

    /// The order snapshot was empty or whitespace.
    #[error("order snapshot must not be empty")]
    SnapshotRequired,

    /// The preparation is not in a status that permits the transition.
    #[error("cannot {action} preparation from {current} status")]
    InvalidTransition {
        current: PreparationStatus,
        action: &'static str,
    },
}
