use axum::Json;
use serde_json::{json, Value};

use crate::api::envelope::ApiResponse;

pub async fn root() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({ "message": "Leadflow API" })))
}

pub async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok(json!({ "status": "healthy" })))
}
