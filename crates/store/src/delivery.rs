use async_trait::async_trait;
use common::{DeliveryId, PreparationId};
use domain::Delivery;

use crate::page::{Page, PageRequest};
use crate::Result;

/// Repository port for [`Delivery`] records.
#[async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Persists a new delivery.
    ///
    /// Fails with [`StoreError::DuplicateKey`](crate::StoreError::DuplicateKey)
    /// when a record for the same `preparation_id` already exists.
    async fn insert(&self, delivery: &Delivery) -> Result<()>;

    /// Looks up a delivery by its id.
    async fn get(&self, id: DeliveryId) -> Result<Option<Delivery>>;

    /// Looks up a delivery by its natural key, the owning preparation id.
    async fn get_by_preparation(&self, preparation_id: PreparationId) -> Result<Option<Delivery>>;

    /// Updates a delivery in place, keyed by id; unknown ids fail loudly.
    async fn update(&self, delivery: &Delivery) -> Result<()>;

    /// Paginated scan of deliveries in `ReadyForPickup` status, ordered by
    /// creation time ascending (oldest ready first, id tie-break).
    async fn list_ready(&self, page: PageRequest) -> Result<Page<Delivery>>;
}
