//! Preparation aggregate implementation.

use chrono::{DateTime, Utc};
use common::{OrderId, PreparationId};
use serde::{Deserialize, Serialize};

use super::{PreparationError, PreparationStatus};

/// Kitchen-side record of an order being cooked.
///
/// Created once per `order_id` when payment is confirmed, then advanced
/// in place by [`start`](Preparation::start) and
/// [`finish`](Preparation::finish). The order snapshot is opaque JSON
/// captured at creation; this aggregate never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preparation {
    id: PreparationId,
    order_id: OrderId,
    status: PreparationStatus,
    created_at: DateTime<Utc>,
    order_snapshot: String,
}

impl Preparation {
    /// Creates a new preparation in `Received` status.
    ///
    /// Rejects a nil order id and an empty or whitespace-only snapshot
    /// before anything touches storage.
    pub fn new(
        order_id: OrderId,
        order_snapshot: impl Into<String>,
    ) -> Result<Self, PreparationError> {
        if order_id.is_nil() {
            return Err(PreparationError::OrderIdRequired);
        }

        let order_snapshot = order_snapshot.into();
        if order_snapshot.trim().is_empty() {
            return Err(PreparationError::SnapshotRequired);
        }

        Ok(Self {
            id: PreparationId::new(),
            order_id,
            status: PreparationStatus::Received,
            created_at: Utc::now(),
            order_snapshot,
        })
    }

    /// Rehydrates a preparation from persisted fields.
    ///
    /// Storage adapters call this instead of [`new`](Preparation::new);
    /// the stored row is trusted and no validation is re-run.
    pub fn from_stored(
        id: PreparationId,
        order_id: OrderId,
        status: PreparationStatus,
        created_at: DateTime<Utc>,
        order_snapshot: String,
    ) -> Self {
        Self {
            id,
            order_id,
            status,
            created_at,
            order_snapshot,
        }
    }
}

// Query methods
impl Preparation {
    /// Returns the preparation id.
    pub fn id(&self) -> PreparationId {
        self.id
    }

    /// Returns the upstream order id.
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the current status.
    pub fn status(&self) -> PreparationStatus {
        self.status
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the opaque order snapshot captured at creation.
    pub fn order_snapshot(&self) -> &str {
        &self.order_snapshot
    }
}

// Lifecycle transitions
impl Preparation {
    /// Starts the preparation: `Received → InProgress`.
    pub fn start(&mut self) -> Result<(), PreparationError> {
        if !self.status.can_start() {
            return Err(PreparationError::InvalidTransition {
                current: self.status,
                action: "start",
            });
        }

        self.status = PreparationStatus::InProgress;
        Ok(())
    }

    /// Finishes the preparation: `InProgress → Finished`.
    pub fn finish(&mut self) -> Result<(), PreparationError> {
        if !self.status.can_finish() {
            return Err(PreparationError::InvalidTransition {
                current: self.status,
                action: "finish",
            });
        }

        self.status = PreparationStatus::Finished;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn order_id() -> OrderId {
        OrderId::from_uuid(Uuid::new_v4())
    }

    #[test]
    fn new_preparation_starts_received() {
        let order = order_id();
        let prep = Preparation::new(order, r#"{"items":[]}"#).unwrap();

        assert_eq!(prep.order_id(), order);
        assert_eq!(prep.status(), PreparationStatus::Received);
        assert_eq!(prep.order_snapshot(), r#"{"items":[]}"#);
        assert!(!prep.id().is_nil());
    }

    #[test]
    fn new_rejects_nil_order_id() {
        let result = Preparation::new(OrderId::from_uuid(Uuid::nil()), "{}");
        assert!(matches!(result, Err(PreparationError::OrderIdRequired)));
    }

    #[test]
    fn new_rejects_blank_snapshot() {
        assert!(matches!(
            Preparation::new(order_id(), ""),
            Err(PreparationError::SnapshotRequired)
        ));
        assert!(matches!(
            Preparation::new(order_id(), "   \n"),
            Err(PreparationError::SnapshotRequired)
        ));
    }

    #[test]
    fn start_advances_to_in_progress() {
        let mut prep = Preparation::new(order_id(), "{}").unwrap();
        prep.start().unwrap();
        assert_eq!(prep.status(), PreparationStatus::InProgress);
    }

    #[test]
    fn start_twice_fails_with_current_status() {
        let mut prep = Preparation::new(order_id(), "{}").unwrap();
        prep.start().unwrap();

        let err = prep.start().unwrap_err();
        assert!(matches!(
            err,
            PreparationError::InvalidTransition {
                current: PreparationStatus::InProgress,
                action: "start",
            }
        ));
    }

    #[test]
    fn finish_requires_in_progress() {
        let mut prep = Preparation::new(order_id(), "{}").unwrap();

        let err = prep.finish().unwrap_err();
        assert!(matches!(
            err,
            PreparationError::InvalidTransition {
                current: PreparationStatus::Received,
                ..
            }
        ));

        prep.start().unwrap();
        prep.finish().unwrap();
        assert_eq!(prep.status(), PreparationStatus::Finished);
    }

    #[test]
    fn no_transition_out_of_finished() {
        let mut prep = Preparation::new(order_id(), "{}").unwrap();
        prep.start().unwrap();
        prep.finish().unwrap();

        assert!(prep.start().is_err());
        let err = prep.finish().unwrap_err();
        assert!(matches!(
            err,
            PreparationError::InvalidTransition {
                current: PreparationStatus::Finished,
                ..
            }
        ));
    }

    #[test]
    fn from_stored_rehydrates_without_validation() {
        let id = PreparationId::new();
        let order = order_id();
        let created = Utc::now();
        let prep = Preparation::from_stored(
            id,
            order,
            PreparationStatus::InProgress,
            created,
            "{}".to_string(),
        );

        assert_eq!(prep.id(), id);
        assert_eq!(prep.order_id(), order);
        assert_eq!(prep.status(), PreparationStatus::InProgress);
        assert_eq!(prep.created_at(), created);
    }

    #[test]
    fn serialization_roundtrip() {
        let prep = Preparation::new(order_id(), r#"{"total":1200}"#).unwrap();
        let json = serde_json::to_string(&prep).unwrap();
        let deserialized: Preparation = serde_json::from_str(&json).unwrap();
        assert_eq!(prep, deserialized);
    }
}
