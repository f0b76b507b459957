use axum::response::Json;
use serde_json::{json, Value};

/// Liveness only; backend reachability lives under /api/test-connection
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
    }))
}
