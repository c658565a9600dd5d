//! Application layer for the kitchen flow system.
//!
//! [`KitchenService`] coordinates the two repository ports and owns the
//! operation-level semantics: idempotent creation, the concurrency-safe
//! take-next claim, the finish→delivery cascade, and the paginated reads.

pub mod error;
pub mod service;

pub use error::KitchenError;
pub use service::KitchenService;
