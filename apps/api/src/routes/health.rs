use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Returns a simple status object with service version.
pub async fn status_handler() -> Json<Value> {
    Json(json!({
        "status": "Personal ATS API running",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
