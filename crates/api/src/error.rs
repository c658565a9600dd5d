//! API error types with HTTP response mapping.

use app::KitchenError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DeliveryError, PreparationError};

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client, caught at the transport edge.
    BadRequest(String),
    /// Operation-level error from the kitchen service.
    Kitchen(KitchenError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Kitchen(err) => kitchen_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn kitchen_error_to_response(err: KitchenError) -> (StatusCode, String) {
    match &err {
        KitchenError::PreparationNotFound(_)
        | KitchenError::DeliveryNotFound(_)
        | KitchenError::NoPendingPreparation => (StatusCode::NOT_FOUND, err.to_string()),

        KitchenError::PreparationExists(_)
        | KitchenError::DeliveryExists(_)
        | KitchenError::PreparationNotFinished { .. } => (StatusCode::CONFLICT, err.to_string()),

        KitchenError::Preparation(prep_err) => match prep_err {
            PreparationError::InvalidTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
            PreparationError::OrderIdRequired | PreparationError::SnapshotRequired => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
        },

        KitchenError::Delivery(del_err) => match del_err {
            DeliveryError::InvalidTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
            DeliveryError::PreparationIdRequired => (StatusCode::BAD_REQUEST, err.to_string()),
        },

        KitchenError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),

        KitchenError::Store(store_err) => {
            tracing::error!(error = %store_err, "storage failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<KitchenError> for ApiError {
    fn from(err: KitchenError) -> Self {
        ApiError::Kitchen(err)
    }
}
