use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::services::price_poll;
use crate::AppState;

// GET /cron/check-prices — invoked by the external scheduler.
pub async fn get_check_prices(State(state): State<AppState>) -> Response {
    match price_poll::run_price_check(&state).await {
        Ok(summary) => (StatusCode::OK, Json(json!({
            "success": true,
            "checked": summary.checked,
            "updated": summary.updated,
            "notifications": summary.notifications,
            "results": summary.results,
        })))
            .into_response(),
        Err(e) => {
            tracing::error!("price check run failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Price check failed" })),
            )
                .into_response()
        }
    }
}
