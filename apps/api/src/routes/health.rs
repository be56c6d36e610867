use axum::Json;
use serde_json::{json, Value};

use crate::llm_client::MODEL;

/// GET /health
/// Returns a simple status object with service version and model.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "model": MODEL
    }))
}
