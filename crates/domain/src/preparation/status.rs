//! Preparation status machine.

use serde::{Deserialize, Serialize};

/// The status of a preparation in its lifecycle.
///
/// Status transitions:
/// ```text
/// Received ──start──► InProgress ──finish──► Finished
/// ```
///
/// The status only ever advances; there is no transition out of `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PreparationStatus {
    /// Order received after payment confirmation, waiting for the kitchen.
    #[default]
    Received,

    /// A kitchen worker has claimed the order and is cooking it.
    InProgress,

    /// Cooking done, the order is ready to hand over to delivery.
    Finished,
}

impl PreparationStatus {
    /// Returns true if the preparation can be started from this status.
    pub fn can_start(&self) -> bool {
        matches!(self, PreparationStatus::Received)
    }

    /// Returns true if the preparation can be finished from this status.
    pub fn can_finish(&self) -> bool {
        matches!(self, PreparationStatus::InProgress)
    }

    /// Returns true if this is the terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PreparationStatus::Finished)
    }

    /// Returns the fixed integer wire code for this status.
    pub fn code(&self) -> i16 {
        match self {
            PreparationStatus::Received => 0,
            PreparationStatus::InProgress => 1,
            PreparationStatus::Finished => 2,
        }
    }

    /// Resolves a wire code back to a status, if valid.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(PreparationStatus::Received),
            1 => Some(PreparationStatus::InProgress),
            2 => Some(PreparationStatus::Finished),
            _ => None,
        }
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreparationStatus::Received => "Received",
            PreparationStatus::InProgress => "InProgress",
            PreparationStatus::Finished => "Finished",
        }
    }
}

impl std::fmt::Display for PreparationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
