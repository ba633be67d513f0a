use axum::response::Json;
use serde_json::{Value, json};

use crate::types::MessageResponse;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Welcome to Clouder App API"))
}
