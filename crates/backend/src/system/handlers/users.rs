use axum::{extract::Path, http::StatusCode, Json};
use contracts::system::users::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, User};
use serde_json::json;

use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/system/users (admin)
pub async fn list() -> Result<Json<Vec<User>>, StatusCode> {
    match service::list_all().await {
        Ok(users) => Ok(Json(users)),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/system/users (admin)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match service::create(request, Some(claims.sub)).await {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// GET /api/system/users/:id (admin)
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<User>, StatusCode> {
    match service::get_by_id(&id).await {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// PUT /api/system/users/:id (admin)
pub async fn update(
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<StatusCode, StatusCode> {
    match service::update(&id, request).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!("Failed to update user {}: {}", id, e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// DELETE /api/system/users/:id (admin)
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    // No self-delete; an admin locking themselves out is unrecoverable
    if claims.sub == id {
        return Err(StatusCode::BAD_REQUEST);
    }
    match service::delete(&id).await {
        Ok(true) => Ok(StatusCode::OK),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/system/users/:id/change-password
pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, StatusCode> {
    match service::change_password(&id, request, &claims.sub).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(e) => {
            tracing::error!("Failed to change password for {}: {}", id, e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
