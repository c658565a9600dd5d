//! Delivery status machine.

use serde::{Deserialize, Serialize};

/// The status of a delivery in its lifecycle.
///
/// Status transitions:
/// ```text
/// ReadyForPickup ──finalize──► Finalized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryStatus {
    /// The finished order is waiting at the counter.
    #[default]
    ReadyForPickup,

    /// The order was picked up (terminal status).
    Finalized,
}

impl DeliveryStatus {
    /// Returns true if the delivery can be finalized from this status.
    pub fn can_finalize(&self) -> bool {
        matches!(self, DeliveryStatus::ReadyForPickup)
    }

    /// Returns true if this is the terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Finalized)
    }

    /// Returns the fixed integer wire code for this status.
    pub fn code(&self) -> i16 {
        match self {
            DeliveryStatus::ReadyForPickup => 1,
            DeliveryStatus::Finalized => 2,
        }
    }

    /// Resolves a wire code back to a status, if valid.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(DeliveryStatus::ReadyForPickup),
            2 => Some(DeliveryStatus::Finalized),
            _ => None,
        }
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::ReadyForPickup => "ReadyForPickup",
            DeliveryStatus::Finalized => "Finalized",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_can_finalize() {
        assert!(DeliveryStatus::ReadyForPickup.can_finalize());
        assert!(!DeliveryStatus::Finalized.can_finalize());
    }

    #[test]
    fn finalized_is_terminal() {
        assert!(!DeliveryStatus::ReadyForPickup.is_terminal());
        assert!(DeliveryStatus::Finalized.is_terminal());
    }

    #[test]
    fn wire_codes_start_at_one() {
        assert_eq!(DeliveryStatus::ReadyForPickup.code(), 1);
        assert_eq!(DeliveryStatus::Finalized.code(), 2);
        assert_eq!(DeliveryStatus::from_code(0), None);
        assert_eq!(
            DeliveryStatus::from_code(1),
            Some(DeliveryStatus::ReadyForPickup)
        );
        assert_eq!(DeliveryStatus::from_code(2), Some(DeliveryStatus::Finalized));
    }

    #[test]
    fn display() {
        assert_eq!(DeliveryStatus::ReadyForPickup.to_string(), "ReadyForPickup");
        assert_eq!(DeliveryStatus::Finalized.to_string(), "Finalized");
    }
}
