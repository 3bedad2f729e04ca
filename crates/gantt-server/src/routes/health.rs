use axum::Json;

/// GET /api/health: liveness only; does not touch the record store.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
