use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use crate::usecases::u501_sync_customers::{self, SyncReport};
use crate::usecases::u502_convert_lead::{self, ConvertLeadError};
use crate::usecases::u503_storefront_checkout::{self, CheckoutError, CheckoutRequest};
use crate::usecases::u504_corporate_inquiry::{self, InquiryError, InquiryRequest};

/// POST /api/customer/sync
pub async fn sync_customers() -> Result<Json<SyncReport>, StatusCode> {
    match u501_sync_customers::sync_customers().await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!("Customer sync failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/lead/:id/convert
pub async fn convert_lead(
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid id"})),
        )
    })?;

    match u502_convert_lead::convert_lead(uuid).await {
        Ok(result) => Ok(Json(json!({
            "order_id": result.order_id.to_string(),
            "order_code": result.order_code,
        }))),
        Err(ConvertLeadError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "lead not found"})),
        )),
        Err(ConvertLeadError::AlreadyConverted(_)) => Err((
            StatusCode::CONFLICT,
            Json(json!({"error": "lead is already converted"})),
        )),
        Err(e) => {
            tracing::error!("Lead conversion failed for {}: {}", id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal error"})),
            ))
        }
    }
}

/// POST /api/checkout
pub async fn checkout(
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<u503_storefront_checkout::CheckoutResponse>, (StatusCode, Json<serde_json::Value>)>
{
    match u503_storefront_checkout::checkout(request).await {
        Ok(response) => Ok(Json(response)),
        Err(CheckoutError::EmptyCart) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "cart is empty"})),
        )),
        Err(CheckoutError::Invalid(reason)) => {
            Err((StatusCode::BAD_REQUEST, Json(json!({"error": reason}))))
        }
        Err(e) => {
            tracing::error!("Checkout failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal error"})),
            ))
        }
    }
}

/// POST /api/inquiry
pub async fn corporate_inquiry(
    Json(request): Json<InquiryRequest>,
) -> Result<Json<u504_corporate_inquiry::InquiryResponse>, (StatusCode, Json<serde_json::Value>)> {
    match u504_corporate_inquiry::submit_inquiry(request).await {
        Ok(response) => Ok(Json(response)),
        Err(InquiryError::Invalid(reason)) => {
            Err((StatusCode::BAD_REQUEST, Json(json!({"error": reason}))))
        }
        Err(e) => {
            tracing::error!("Corporate inquiry failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal error"})),
            ))
        }
    }
}
