//! Delivery aggregate implementation.

use chrono::{DateTime, Utc};
use common::{DeliveryId, OrderId, PreparationId};
use serde::{Deserialize, Serialize};

use super::{DeliveryError, DeliveryStatus};

/// Pickup-side record created once a preparation finishes.
///
/// At most one delivery exists per preparation; `finalized_at` is set
/// exactly once, at the `ReadyForPickup → Finalized` transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    id: DeliveryId,
    preparation_id: PreparationId,
    order_id: Option<OrderId>,
    status: DeliveryStatus,
    created_at: DateTime<Utc>,
    finalized_at: Option<DateTime<Utc>>,
}

impl Delivery {
    /// Creates a new delivery in `ReadyForPickup` status.
    ///
    /// The order id is an optional convenience copy for lookups; only the
    /// preparation id is load-bearing.
    pub fn new(
        preparation_id: PreparationId,
        order_id: Option<OrderId>,
    ) -> Result<Self, DeliveryError> {
        if preparation_id.is_nil() {
            return Err(DeliveryError::PreparationIdRequired);
        }

        Ok(Self {
            id: DeliveryId::new(),
            preparation_id,
            order_id,
            status: DeliveryStatus::ReadyForPickup,
            created_at: Utc::now(),
            finalized_at: None,
        })
    }

    /// Rehydrates a delivery from persisted fields, trusting the stored row.
    pub fn from_stored(
        id: DeliveryId,
        preparation_id: PreparationId,
        order_id: Option<OrderId>,
        status: DeliveryStatus,
        created_at: DateTime<Utc>,
        finalized_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            preparation_id,
            order_id,
            status,
            created_at,
            finalized_at,
        }
    }
}

// Query methods
impl Delivery {
    /// Returns the delivery id.
    pub fn id(&self) -> DeliveryId {
        self.id
    }

    /// Returns the owning preparation id.
    pub fn preparation_id(&self) -> PreparationId {
        self.preparation_id
    }

    /// Returns the upstream order id, if recorded.
    pub fn order_id(&self) -> Option<OrderId> {
        self.order_id
    }

    /// Returns the current status.
    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the finalization timestamp, set once on finalize.
    pub fn finalized_at(&self) -> Option<DateTime<Utc>> {
        self.finalized_at
    }
}

// Lifecycle transitions
impl Delivery {
    /// Finalizes the delivery: `ReadyForPickup → Finalized`.
    pub fn finalize(&mut self) -> Result<(), DeliveryError> {
        if !self.status.can_finalize() {
            return Err(DeliveryError::InvalidTransition {
                current: self.status,
                action: "finalize",
            });
        }

        self.status = DeliveryStatus::Finalized;
        self.finalized_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn new_delivery_is_ready_for_pickup() {
        let prep_id = PreparationId::new();
        let order_id = OrderId::from_uuid(Uuid::new_v4());
        let delivery = Delivery::new(prep_id, Some(order_id)).unwrap();

        assert_eq!(delivery.preparation_id(), prep_id);
        assert_eq!(delivery.order_id(), Some(order_id));
        assert_eq!(delivery.status(), DeliveryStatus::ReadyForPickup);
        assert!(delivery.finalized_at().is_none());
    }

    #[test]
    fn new_rejects_nil_preparation_id() {
        let result = Delivery::new(PreparationId::from_uuid(Uuid::nil()), None);
        assert!(matches!(result, Err(DeliveryError::PreparationIdRequired)));
    }

    #[test]
    fn order_id_is_optional() {
        let delivery = Delivery::new(PreparationId::new(), None).unwrap();
        assert!(delivery.order_id().is_none());
    }

    #[test]
    fn finalize_sets_timestamp_once() {
        let mut delivery = Delivery::new(PreparationId::new(), None).unwrap();
        delivery.finalize().unwrap();

        assert_eq!(delivery.status(), DeliveryStatus::Finalized);
        assert!(delivery.finalized_at().is_some());
    }

    #[test]
    fn finalize_twice_fails_with_current_status() {
        let mut delivery = Delivery::new(PreparationId::new(), None).unwrap();
        delivery.finalize().unwrap();
        let first_finalized_at = delivery.finalized_at();

        let err = delivery.finalize().unwrap_err();
        assert!(matches!(
            err,
            DeliveryError::InvalidTransition {
                current: DeliveryStatus::Finalized,
                action: "finalize",
            }
        ));
        assert_eq!(delivery.finalized_at(), first_finalized_at);
    }

    #[test]
    fn from_stored_rehydrates_finalized_row() {
        let id = DeliveryId::new();
        let prep_id = PreparationId::new();
        let created = Utc::now();
        let finalized = Utc::now();

        let delivery = Delivery::from_stored(
            id,
            prep_id,
            None,
            DeliveryStatus::Finalized,
            created,
            Some(finalized),
        );

        assert_eq!(delivery.id(), id);
        assert_eq!(delivery.status(), DeliveryStatus::Finalized);
        assert_eq!(delivery.finalized_at(), Some(finalized));
    }

    #[test]
    fn serialization_roundtrip() {
        let delivery =
            Delivery::new(PreparationId::new(), Some(OrderId::from_uuid(Uuid::new_v4()))).unwrap();
        let json = serde_json::to_string(&delivery).unwrap();
        let deserialized: Delivery = serde_json::from_str(&json).unwrap();
        assert_eq!(delivery, deserialized);
    }
}
