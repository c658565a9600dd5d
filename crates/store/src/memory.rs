use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{DeliveryId, OrderId, PreparationId};
use domain::{Delivery, DeliveryStatus, Preparation, PreparationStatus};
use tokio::sync::RwLock;

use crate::delivery::DeliveryStore;
use crate::page::{Page, PageRequest};
use crate::preparation::PreparationStore;
use crate::{Result, StoreError};

/// In-memory preparation store for tests and default wiring.
///
/// Enforces the same natural-key uniqueness as the PostgreSQL adapter and
/// performs the conditional status update under a single write lock, so
/// the select-then-claim race behaves like the database version.
#[derive(Clone, Default)]
pub struct InMemoryPreparationStore {
    records: Arc<RwLock<HashMap<PreparationId, Preparation>>>,
}

impl InMemoryPreparationStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored preparations.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store holds no preparations.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PreparationStore for InMemoryPreparationStore {
    async fn insert(&self, preparation: &Preparation) -> Result<()> {
        let mut records = self.records.write().await;

        if records
            .values()
            .any(|p| p.order_id() == preparation.order_id())
        {
            return Err(StoreError::DuplicateKey {
                key: "order_id",
                value: preparation.order_id().to_string(),
            });
        }

        records.insert(preparation.id(), preparation.clone());
        Ok(())
    }

    async fn get(&self, id: PreparationId) -> Result<Option<Preparation>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn get_by_order(&self, order_id: OrderId) -> Result<Option<Preparation>> {
        let records = self.records.read().await;
        Ok(records.values().find(|p| p.order_id() == order_id).cloned())
    }

    async fn update(&self, preparation: &Preparation) -> Result<()> {
        let mut records = self.records.write().await;

        if !records.contains_key(&preparation.id()) {
            return Err(StoreError::UnknownId(preparation.id().to_string()));
        }

        records.insert(preparation.id(), preparation.clone());
        Ok(())
    }

    async fn update_if_status(
        &self,
        preparation: &Preparation,
        expected: PreparationStatus,
    ) -> Result<bool> {
        let mut records = self.records.write().await;

        let Some(stored) = records.get(&preparation.id()) else {
            return Err(StoreError::UnknownId(preparation.id().to_string()));
        };

        if stored.status() != expected {
            return Ok(false);
        }

        records.insert(preparation.id(), preparation.clone());
        Ok(true)
    }

    async fn oldest_received(&self) -> Result<Option<Preparation>> {
        let records = self.records.read().await;
        let oldest = records
            .values()
            .filter(|p| p.status() == PreparationStatus::Received)
            .min_by_key(|p| (p.created_at(), p.id()))
            .cloned();
        Ok(oldest)
    }

    async fn list(
        &self,
        page: PageRequest,
        status: Option<PreparationStatus>,
    ) -> Result<Page<Preparation>> {
        let records = self.records.read().await;
        let mut matching: Vec<_> = records
            .values()
            .filter(|p| status.is_none_or(|s| p.status() == s))
            .cloned()
            .collect();

        // Newest first, id tie-break for a stable order
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then(a.id().cmp(&b.id()))
        });

        let total_count = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(Page::new(items, total_count))
    }
}

/// In-memory delivery store for tests and default wiring.
#[derive(Clone, Default)]
pub struct InMemoryDeliveryStore {
    records: Arc<RwLock<HashMap<DeliveryId, Delivery>>>,
}

impl InMemoryDeliveryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored deliveries.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store holds no deliveries.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl DeliveryStore for InMemoryDeliveryStore {
    async fn insert(&self, delivery: &Delivery) -> Result<()> {
        let mut records = self.records.write().await;

        if records
            .values()
            .any(|d| d.preparation_id() == delivery.preparation_id())
        {
            return Err(StoreError::DuplicateKey {
                key: "preparation_id",
                value: delivery.preparation_id().to_string(),
            });
        }

        records.insert(delivery.id(), delivery.clone());
        Ok(())
    }

    async fn get(&self, id: DeliveryId) -> Result<Option<Delivery>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn get_by_preparation(&self, preparation_id: PreparationId) -> Result<Option<Delivery>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|d| d.preparation_id() == preparation_id)
            .cloned())
    }

    async fn update(&self, delivery: &Delivery) -> Result<()> {
        let mut records = self.records.write().await;

        if !records.contains_key(&delivery.id()) {
            return Err(StoreError::UnknownId(delivery.id().to_string()));
        }

        records.insert(delivery.id(), delivery.clone());
        Ok(())
    }

    async fn list_ready(&self, page: PageRequest) -> Result<Page<Delivery>> {
        let records = self.records.read().await;
        let mut ready: Vec<_> = records
            .values()
            .filter(|d| d.status() == DeliveryStatus::ReadyForPickup)
            .cloned()
            .collect();

        // Oldest ready first, matching pickup fairness
        ready.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then(a.id().cmp(&b.id()))
        });

        let total_count = ready.len() as u64;
        let items = ready
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Ok(Page::new(items, total_count))
    }
}
