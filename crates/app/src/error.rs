//! Operation-level error taxonomy.

use common::{DeliveryId, OrderId, PreparationId};
use domain::{DeliveryError, PreparationError, PreparationStatus};
use store::StoreError;
use thiserror::Error;

/// Errors returned by [`KitchenService`](crate::KitchenService) operations.
///
/// Four expected, recoverable-by-caller kinds (not-found, conflict,
/// invalid transition, validation) plus transparent storage passthrough.
/// Nothing is retried internally and nothing is masked as a generic
/// failure.
#[derive(Debug, Error)]
pub enum KitchenError {
    /// No preparation exists for the given id.
    #[error("no preparation found for id {0}")]
    PreparationNotFound(PreparationId),

    /// No preparation is waiting in `Received` status.
    #[error("no preparation with status Received is available")]
    NoPendingPreparation,

    /// No delivery exists for the given id.
    #[error("no delivery found for id {0}")]
    DeliveryNotFound(DeliveryId),

    /// A preparation already exists for this order (idempotent creation).
    #[error("a preparation already exists for order {0}")]
    PreparationExists(OrderId),

    /// A delivery already exists for this preparation (idempotent creation).
    #[error("a delivery already exists for preparation {0}")]
    DeliveryExists(PreparationId),

    /// A delivery was requested for a preparation that is not finished yet.
    #[error("preparation {id} is not finished (current status: {current})")]
    PreparationNotFinished {
        id: PreparationId,
        current: PreparationStatus,
    },

    /// A preparation-side domain rule was violated.
    #[error(transparent)]
    Preparation(#[from] PreparationError),

    /// A delivery-side domain rule was violated.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// Malformed input detected before any storage access.
    #[error("{0}")]
    Validation(String),

    /// A storage failure, surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
