use axum::extract::{Path, Query};
use axum::Json;
use contracts::domain::a002_order::aggregate::{Order, OrderDraft, OrderStatus, OrderType};
use serde::Deserialize;
use serde_json::json;

use crate::domain::a002_order;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    /// Fulfillment status ("pending", "in_production", ...)
    pub status: Option<String>,
    /// "retail" or "corporate"
    pub order_type: Option<String>,
}

fn parse_status(s: &str) -> Option<OrderStatus> {
    match s {
        "new" => Some(OrderStatus::New),
        "pending" => Some(OrderStatus::Pending),
        "confirmed" => Some(OrderStatus::Confirmed),
        "in_production" => Some(OrderStatus::InProduction),
        "delivered" => Some(OrderStatus::Delivered),
        _ => None,
    }
}

fn parse_order_type(s: &str) -> Option<OrderType> {
    match s.to_ascii_lowercase().as_str() {
        "retail" => Some(OrderType::Retail),
        "corporate" => Some(OrderType::Corporate),
        _ => None,
    }
}

/// GET /api/order?status=pending&order_type=retail
pub async fn list(
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, axum::http::StatusCode> {
    let status = match query.status.as_deref() {
        Some(s) => Some(parse_status(s).ok_or(axum::http::StatusCode::BAD_REQUEST)?),
        None => None,
    };
    let order_type = match query.order_type.as_deref() {
        Some(t) => Some(parse_order_type(t).ok_or(axum::http::StatusCode::BAD_REQUEST)?),
        None => None,
    };

    match a002_order::service::list_filtered(status, order_type).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list orders: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/order/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Order>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a002_order::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/order
pub async fn create(
    Json(draft): Json<OrderDraft>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    match a002_order::service::create(draft).await {
        Ok(id) => Ok(Json(json!({"id": id.to_string()}))),
        Err(e) => {
            tracing::error!("Failed to create order: {}", e);
            Err(axum::http::StatusCode::BAD_REQUEST)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// POST /api/order/:id/status
pub async fn update_status(
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Order>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    let status = parse_status(&body.status).ok_or(axum::http::StatusCode::BAD_REQUEST)?;

    match a002_order::service::update_status(uuid, status).await {
        Ok(order) => Ok(Json(order)),
        Err(e) => {
            tracing::error!("Failed to update order status: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/order/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a002_order::service::delete(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_strict() {
        assert_eq!(parse_status("pending"), Some(OrderStatus::Pending));
        assert_eq!(parse_status("shipped"), None);
    }

    #[test]
    fn order_type_parsing_ignores_case() {
        assert_eq!(parse_order_type("Corporate"), Some(OrderType::Corporate));
        assert_eq!(parse_order_type("wholesale"), None);
    }
}
