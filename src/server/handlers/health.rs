use axum::Json;
use serde_json::{Value, json};

/// Health check endpoint handler
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "freelance-desk"
    }))
}
