//! Delivery lifecycle endpoints.

use std::sync::Arc;

use app::KitchenError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{DeliveryId, OrderId, PreparationId};
use domain::Delivery;
use serde::{Deserialize, Serialize};
use store::{DeliveryStore, PreparationStore};
use uuid::Uuid;

use super::{AppState, PagedResponse};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryRequest {
    pub preparation_id: Uuid,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReadyQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub preparation_id: Uuid,
    pub order_id: Option<Uuid>,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl From<&Delivery> for DeliveryResponse {
    fn from(delivery: &Delivery) -> Self {
        Self {
            id: delivery.id().as_uuid(),
            preparation_id: delivery.preparation_id().as_uuid(),
            order_id: delivery.order_id().map(|o| o.as_uuid()),
            status: delivery.status().code(),
            created_at: delivery.created_at(),
            finalized_at: delivery.finalized_at(),
        }
    }
}

// -- Handlers --

/// POST /deliveries — explicitly create a delivery for a finished preparation.
#[tracing::instrument(skip(state, req))]
pub async fn create<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Json(req): Json<CreateDeliveryRequest>,
) -> Result<(StatusCode, Json<DeliveryResponse>), ApiError> {
    let delivery = state
        .service
        .create_delivery(
            PreparationId::from_uuid(req.preparation_id),
            req.order_id.map(OrderId::from_uuid),
        )
        .await?;

    Ok((StatusCode::CREATED, Json((&delivery).into())))
}

/// POST /deliveries/:id/finalize — record the pickup.
#[tracing::instrument(skip(state))]
pub async fn finalize<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryResponse>, ApiError> {
    let delivery = state
        .service
        .finalize_delivery(DeliveryId::from_uuid(id))
        .await?;

    Ok(Json((&delivery).into()))
}

/// GET /deliveries/:id — load one delivery.
#[tracing::instrument(skip(state))]
pub async fn get<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryResponse>, ApiError> {
    let id = DeliveryId::from_uuid(id);
    let delivery = state
        .service
        .get_delivery(id)
        .await?
        .ok_or(KitchenError::DeliveryNotFound(id))?;

    Ok(Json((&delivery).into()))
}

/// GET /deliveries/ready — paginated listing of deliveries awaiting pickup.
#[tracing::instrument(skip(state))]
pub async fn list_ready<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Query(query): Query<ListReadyQuery>,
) -> Result<Json<PagedResponse<DeliveryResponse>>, ApiError> {
    let page_number = query.page_number.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(10);

    let page = state
        .service
        .list_ready_deliveries(page_number, page_size)
        .await?;

    Ok(Json(PagedResponse::from_page(
        page,
        page_number,
        page_size,
        |delivery| DeliveryResponse::from(delivery),
    )))
}
