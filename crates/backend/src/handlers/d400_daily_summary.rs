use axum::Json;
use contracts::dashboards::d400_daily_summary::dto::DailySummary;

use crate::dashboards::d400_daily_summary;

/// GET /api/dashboard/daily-summary
pub async fn get_daily_summary() -> Result<Json<DailySummary>, axum::http::StatusCode> {
    match d400_daily_summary::service::get_daily_summary().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("Failed to build daily summary: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
