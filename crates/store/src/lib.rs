//! Storage layer for the kitchen flow system.
//!
//! Defines the two repository ports the application core calls through
//! ([`PreparationStore`] and [`DeliveryStore`]) together with an in-memory
//! adapter for tests and default wiring, and a PostgreSQL adapter backed
//! by `sqlx`.

pub mod delivery;
pub mod error;
pub mod memory;
pub mod page;
pub mod postgres;
pub mod preparation;

pub use delivery::DeliveryStore;
pub use error::{Result, StoreError};
pub use memory::{InMemoryDeliveryStore, InMemoryPreparationStore};
pub use page::{MAX_PAGE_SIZE, Page, PageRequest};
pub use postgres::{PostgresDeliveryStore, PostgresPreparationStore, run_migrations};
pub use preparation::PreparationStore;
