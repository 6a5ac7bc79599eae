use axum::{extract::Path, Json};
use contracts::domain::a005_customer::aggregate::{Customer, CustomerPatch};

use crate::domain::a005_customer;

/// GET /api/customer
pub async fn list_all() -> Result<Json<Vec<Customer>>, axum::http::StatusCode> {
    match a005_customer::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/customer/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Customer>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a005_customer::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /api/customer/:id, operator-owned fields only (notes, tags)
pub async fn patch(
    Path(id): Path<String>,
    Json(body): Json<CustomerPatch>,
) -> Result<Json<Customer>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a005_customer::service::apply_patch(uuid, body).await {
        Ok(customer) => Ok(Json(customer)),
        Err(e) => {
            tracing::error!("Failed to patch customer {}: {}", id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/customer/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a005_customer::service::delete(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
