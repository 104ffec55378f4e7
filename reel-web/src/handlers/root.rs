//! Service root

use axum::Json;
use serde_json::{Value, json};

/// Greeting served at `/`.
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello World!" }))
}
