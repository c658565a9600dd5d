use async_trait::async_trait;
use common::{OrderId, PreparationId};
use domain::{Preparation, PreparationStatus};

use crate::page::{Page, PageRequest};
use crate::Result;

/// Repository port for [`Preparation`] records.
///
/// All implementations must be thread-safe (`Send + Sync`); the core
/// issues these calls from concurrent request handlers.
#[async_trait]
pub trait PreparationStore: Send + Sync {
    /// Persists a new preparation.
    ///
    /// Fails with [`StoreError::DuplicateKey`](crate::StoreError::DuplicateKey)
    /// when a record for the same `order_id` already exists; a racing
    /// duplicate create must fail here rather than silently succeed twice.
    async fn insert(&self, preparation: &Preparation) -> Result<()>;

    /// Looks up a preparation by its id.
    async fn get(&self, id: PreparationId) -> Result<Option<Preparation>>;

    /// Looks up a preparation by its natural key, the upstream order id.
    async fn get_by_order(&self, order_id: OrderId) -> Result<Option<Preparation>>;

    /// Updates a preparation in place, keyed by id.
    ///
    /// Fails loudly with [`StoreError::UnknownId`](crate::StoreError::UnknownId)
    /// when the id is unknown.
    async fn update(&self, preparation: &Preparation) -> Result<()>;

    /// Conditionally updates a preparation: the write only lands if the
    /// stored status still equals `expected` at write time.
    ///
    /// Returns `false` when the condition no longer holds (another caller
    /// got there first); the caller is expected to reselect. Unknown ids
    /// fail loudly like [`update`](PreparationStore::update).
    async fn update_if_status(
        &self,
        preparation: &Preparation,
        expected: PreparationStatus,
    ) -> Result<bool>;

    /// Selects the oldest preparation in `Received` status, ties broken
    /// by id ascending. Returns `None` when nothing is pending.
    async fn oldest_received(&self) -> Result<Option<Preparation>>;

    /// Paginated scan ordered by creation time descending (id tie-break),
    /// optionally restricted to a single status. The returned total count
    /// reflects the filtered set, independent of the page window.
    async fn list(
        &self,
        page: PageRequest,
        status: Option<PreparationStatus>,
    ) -> Result<Page<Preparation>>;
}
