use axum::response::Json;
use serde_json::{Value, json};

/// Liveness probe with the running crate version.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
