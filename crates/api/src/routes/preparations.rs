//! Preparation lifecycle endpoints.

use std::sync::Arc;

use app::KitchenError;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{OrderId, PreparationId};
use domain::{Preparation, PreparationStatus};
use serde::{Deserialize, Serialize};
use store::{DeliveryStore, PreparationStore};
use uuid::Uuid;

use super::{AppState, PagedResponse};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePreparationRequest {
    pub order_id: Uuid,
    pub order_snapshot: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPreparationsQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    /// Integer status code: Received=0, InProgress=1, Finished=2.
    pub status: Option<i16>,
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparationResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub order_snapshot: String,
}

impl From<&Preparation> for PreparationResponse {
    fn from(preparation: &Preparation) -> Self {
        Self {
            id: preparation.id().as_uuid(),
            order_id: preparation.order_id().as_uuid(),
            status: preparation.status().code(),
            created_at: preparation.created_at(),
            order_snapshot: preparation.order_snapshot().to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishPreparationResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub delivery_id: Uuid,
}

// -- Handlers --

/// POST /preparations — register a paid order for the kitchen.
#[tracing::instrument(skip(state, req))]
pub async fn create<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Json(req): Json<CreatePreparationRequest>,
) -> Result<(StatusCode, Json<PreparationResponse>), ApiError> {
    let preparation = state
        .service
        .create_preparation(OrderId::from_uuid(req.order_id), &req.order_snapshot)
        .await?;

    Ok((StatusCode::CREATED, Json((&preparation).into())))
}

/// POST /preparations/start — claim the oldest pending preparation.
#[tracing::instrument(skip(state))]
pub async fn start<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
) -> Result<Json<PreparationResponse>, ApiError> {
    let preparation = state.service.take_next().await?;
    Ok(Json((&preparation).into()))
}

/// POST /preparations/:id/finish — finish cooking and provision the delivery.
#[tracing::instrument(skip(state))]
pub async fn finish<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FinishPreparationResponse>, ApiError> {
    let (preparation, delivery_id) = state
        .service
        .finish_preparation(PreparationId::from_uuid(id))
        .await?;

    Ok(Json(FinishPreparationResponse {
        id: preparation.id().as_uuid(),
        order_id: preparation.order_id().as_uuid(),
        status: preparation.status().code(),
        created_at: preparation.created_at(),
        delivery_id: delivery_id.as_uuid(),
    }))
}

/// GET /preparations/:id — load one preparation.
#[tracing::instrument(skip(state))]
pub async fn get<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreparationResponse>, ApiError> {
    let id = PreparationId::from_uuid(id);
    let preparation = state
        .service
        .get_preparation(id)
        .await?
        .ok_or(KitchenError::PreparationNotFound(id))?;

    Ok(Json((&preparation).into()))
}

/// GET /preparations — paginated listing, newest first, optional status filter.
#[tracing::instrument(skip(state))]
pub async fn list<P: PreparationStore + 'static, D: DeliveryStore + 'static>(
    State(state): State<Arc<AppState<P, D>>>,
    Query(query): Query<ListPreparationsQuery>,
) -> Result<Json<PagedResponse<PreparationResponse>>, ApiError> {
    let status = query
        .status
        .map(|code| {
            PreparationStatus::from_code(code)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown status code: {code}")))
        })
        .transpose()?;

    let page_number = query.page_number.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(10);

    let page = state
        .service
        .list_preparations(page_number, page_size, status)
        .await?;

    Ok(Json(PagedResponse::from_page(
        page,
        page_number,
        page_size,
        |preparation| PreparationResponse::from(preparation),
    )))
}
