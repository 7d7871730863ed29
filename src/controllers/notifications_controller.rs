use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::services::flights_service;
use crate::AppState;

// POST /notifications/:id/read
pub async fn post_mark_read(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad id" }))).into_response();
        }
    };

    match flights_service::mark_notification_read(&state, oid).await {
        // false means it was already read (or unknown); both are fine to ack
        Ok(newly_marked) => {
            (StatusCode::OK, Json(json!({ "success": true, "updated": newly_marked })))
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("db error: {e}") })),
        )
            .into_response(),
    }
}
