use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::domain::a003_inventory_item::{self, service::StockAdjustError};

/// GET /api/inventory
pub async fn list_all() -> Result<
    Json<Vec<contracts::domain::a003_inventory_item::aggregate::InventoryItem>>,
    StatusCode,
> {
    match a003_inventory_item::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/inventory/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<contracts::domain::a003_inventory_item::aggregate::InventoryItem>, StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    match a003_inventory_item::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/inventory
pub async fn upsert(
    Json(dto): Json<contracts::domain::a003_inventory_item::aggregate::InventoryItemDto>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match a003_inventory_item::service::upsert(dto).await {
        Ok(id) => Ok(Json(json!({"id": id.to_string()}))),
        Err(e) => {
            tracing::error!("Failed to save inventory item: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// Signed change; negative values consume stock
    pub delta: i64,
}

/// POST /api/inventory/:id/adjust
///
/// A refused adjustment (level would go below zero) answers 409 with the
/// current level so the operator sees why nothing changed.
pub async fn adjust(
    Path(id): Path<String>,
    Json(body): Json<AdjustRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid id"})),
        )
    })?;

    match a003_inventory_item::service::adjust_stock(uuid, body.delta).await {
        Ok(new_level) => Ok(Json(json!({"id": id, "current_stock": new_level}))),
        Err(StockAdjustError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "inventory item not found"})),
        )),
        Err(StockAdjustError::InsufficientStock { current, delta }) => Err((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "insufficient stock",
                "current_stock": current,
                "delta": delta,
            })),
        )),
        Err(StockAdjustError::Db(e)) => {
            tracing::error!("Stock adjustment failed for {}: {}", id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal error"})),
            ))
        }
    }
}

/// DELETE /api/inventory/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(StatusCode::BAD_REQUEST),
    };
    match a003_inventory_item::service::delete(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}
