//! Kitchen service coordinating both aggregates.

use common::{DeliveryId, OrderId, PreparationId};
use domain::{Delivery, Preparation, PreparationStatus};
use store::{DeliveryStore, Page, PageRequest, PreparationStore, StoreError, MAX_PAGE_SIZE};

use crate::error::KitchenError;

/// Coordinates the preparation and delivery lifecycles over the two
/// repository ports.
///
/// The service is stateless between calls; every operation is a
/// synchronous request/response against the stores. Duplicate-create
/// races resolve at the store's natural-key constraints and are mapped
/// back to the same conflict the idempotency pre-check reports.
pub struct KitchenService<P, D> {
    preparations: P,
    deliveries: D,
}

impl<P, D> KitchenService<P, D>
where
    P: PreparationStore,
    D: DeliveryStore,
{
    /// Creates a new service over the given stores.
    pub fn new(preparations: P, deliveries: D) -> Self {
        Self {
            preparations,
            deliveries,
        }
    }

    /// Creates a preparation for a confirmed order, idempotent on the
    /// order id.
    #[tracing::instrument(skip(self, order_snapshot))]
    pub async fn create_preparation(
        &self,
        order_id: OrderId,
        order_snapshot: &str,
    ) -> Result<Preparation, KitchenError> {
        let preparation = Preparation::new(order_id, order_snapshot)?;

        if self.preparations.get_by_order(order_id).await?.is_some() {
            return Err(KitchenError::PreparationExists(order_id));
        }

        match self.preparations.insert(&preparation).await {
            Ok(()) => {
                metrics::counter!("kitchen_preparations_created_total").increment(1);
                tracing::info!(id = %preparation.id(), %order_id, "preparation created");
                Ok(preparation)
            }
            // Lost the check-then-create race; same outcome as the pre-check
            Err(StoreError::DuplicateKey { .. }) => Err(KitchenError::PreparationExists(order_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Claims the oldest pending preparation and starts it.
    ///
    /// The claim is a conditional update that only lands while the stored
    /// status is still `Received`; on a lost race the selection repeats.
    /// Two concurrent callers never both claim the same record.
    #[tracing::instrument(skip(self))]
    pub async fn take_next(&self) -> Result<Preparation, KitchenError> {
        loop {
            let Some(mut preparation) = self.preparations.oldest_received().await? else {
                return Err(KitchenError::NoPendingPreparation);
            };

            preparation.start()?;

            if self
                .preparations
                .update_if_status(&preparation, PreparationStatus::Received)
                .await?
            {
                metrics::counter!("kitchen_preparations_started_total").increment(1);
                tracing::info!(id = %preparation.id(), "preparation claimed");
                return Ok(preparation);
            }

            tracing::debug!(id = %preparation.id(), "claim lost to concurrent caller, reselecting");
        }
    }

    /// Finishes a preparation and provisions its delivery.
    ///
    /// The cascade is idempotent: a retried finish never yields a second
    /// delivery for the same preparation.
    #[tracing::instrument(skip(self))]
    pub async fn finish_preparation(
        &self,
        id: PreparationId,
    ) -> Result<(Preparation, DeliveryId), KitchenError> {
        if id.is_nil() {
            return Err(KitchenError::Validation(
                "preparation id must not be nil".to_string(),
            ));
        }

        let mut preparation = self
            .preparations
            .get(id)
            .await?
            .ok_or(KitchenError::PreparationNotFound(id))?;

        preparation.finish()?;
        self.preparations.update(&preparation).await?;

        let delivery_id = self.provision_delivery(&preparation).await?;
        metrics::counter!("kitchen_preparations_finished_total").increment(1);
        tracing::info!(id = %preparation.id(), %delivery_id, "preparation finished");

        Ok((preparation, delivery_id))
    }

    /// Reuses the existing delivery for a finished preparation, or
    /// creates one. A duplicate-key race re-reads and reuses the winner.
    async fn provision_delivery(
        &self,
        preparation: &Preparation,
    ) -> Result<DeliveryId, KitchenError> {
        if let Some(existing) = self.deliveries.get_by_preparation(preparation.id()).await? {
            return Ok(existing.id());
        }

        let delivery = Delivery::new(preparation.id(), Some(preparation.order_id()))?;
        match self.deliveries.insert(&delivery).await {
            Ok(()) => {
                metrics::counter!("kitchen_deliveries_created_total").increment(1);
                Ok(delivery.id())
            }
            Err(StoreError::DuplicateKey { .. }) => {
                let existing = self
                    .deliveries
                    .get_by_preparation(preparation.id())
                    .await?
                    .ok_or_else(|| {
                        KitchenError::Store(StoreError::UnknownId(preparation.id().to_string()))
                    })?;
                Ok(existing.id())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Explicitly creates a delivery for a finished preparation.
    ///
    /// Unlike the cascade inside [`finish_preparation`](Self::finish_preparation),
    /// an existing delivery here is a conflict the caller asked to create.
    #[tracing::instrument(skip(self))]
    pub async fn create_delivery(
        &self,
        preparation_id: PreparationId,
        order_id: Option<OrderId>,
    ) -> Result<Delivery, KitchenError> {
        if preparation_id.is_nil() {
            return Err(KitchenError::Validation(
                "preparation id must not be nil".to_string(),
            ));
        }

        let preparation = self
            .preparations
            .get(preparation_id)
            .await?
            .ok_or(KitchenError::PreparationNotFound(preparation_id))?;

        if preparation.status() != PreparationStatus::Finished {
            return Err(KitchenError::PreparationNotFinished {
                id: preparation_id,
                current: preparation.status(),
            });
        }

        if self
            .deliveries
            .get_by_preparation(preparation_id)
            .await?
            .is_some()
        {
            return Err(KitchenError::DeliveryExists(preparation_id));
        }

        let delivery = Delivery::new(preparation_id, order_id)?;
        match self.deliveries.insert(&delivery).await {
            Ok(()) => {
                metrics::counter!("kitchen_deliveries_created_total").increment(1);
                tracing::info!(id = %delivery.id(), %preparation_id, "delivery created");
                Ok(delivery)
            }
            Err(StoreError::DuplicateKey { .. }) => {
                Err(KitchenError::DeliveryExists(preparation_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Finalizes a delivery at pickup.
    #[tracing::instrument(skip(self))]
    pub async fn finalize_delivery(&self, id: DeliveryId) -> Result<Delivery, KitchenError> {
        if id.is_nil() {
            return Err(KitchenError::Validation(
                "delivery id must not be nil".to_string(),
            ));
        }

        let mut delivery = self
            .deliveries
            .get(id)
            .await?
            .ok_or(KitchenError::DeliveryNotFound(id))?;

        delivery.finalize()?;
        self.deliveries.update(&delivery).await?;

        metrics::counter!("kitchen_deliveries_finalized_total").increment(1);
        tracing::info!(id = %delivery.id(), "delivery finalized");
        Ok(delivery)
    }

    /// Looks up a preparation by id; `None` when absent.
    pub async fn get_preparation(
        &self,
        id: PreparationId,
    ) -> Result<Option<Preparation>, KitchenError> {
        Ok(self.preparations.get(id).await?)
    }

    /// Looks up a delivery by id; `None` when absent.
    pub async fn get_delivery(&self, id: DeliveryId) -> Result<Option<Delivery>, KitchenError> {
        Ok(self.deliveries.get(id).await?)
    }

    /// Looks up a delivery by its owning preparation; `None` when absent.
    pub async fn get_delivery_by_preparation(
        &self,
        preparation_id: PreparationId,
    ) -> Result<Option<Delivery>, KitchenError> {
        Ok(self.deliveries.get_by_preparation(preparation_id).await?)
    }

    /// Lists preparations, newest first, optionally filtered to one status.
    #[tracing::instrument(skip(self))]
    pub async fn list_preparations(
        &self,
        page_number: u32,
        page_size: u32,
        status: Option<PreparationStatus>,
    ) -> Result<Page<Preparation>, KitchenError> {
        let page = validated_page(page_number, page_size)?;
        Ok(self.preparations.list(page, status).await?)
    }

    /// Lists deliveries waiting for pickup, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_ready_deliveries(
        &self,
        page_number: u32,
        page_size: u32,
    ) -> Result<Page<Delivery>, KitchenError> {
        let page = validated_page(page_number, page_size)?;
        Ok(self.deliveries.list_ready(page).await?)
    }
}

/// Rejects out-of-range pagination before any storage access.
fn validated_page(page_number: u32, page_size: u32) -> Result<PageRequest, KitchenError> {
    let page = PageRequest::new(page_number, page_size);
    if !page.is_valid() {
        return Err(KitchenError::Validation(format!(
            "page number must be >= 1 and page size in [1, {MAX_PAGE_SIZE}] \
             (got number {page_number}, size {page_size})"
        )));
    }
    Ok(page)
}
