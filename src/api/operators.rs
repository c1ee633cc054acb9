use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    api::{
        envelope::ApiResponse,
        middleware::{ApiError, ApiResult, AppState},
        PaginationParams,
    },
    models::{CreateOperatorRequest, Operator, UpdateOperatorRequest},
};

pub async fn create_operator(
    State(state): State<AppState>,
    Json(request): Json<CreateOperatorRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Operator>>)> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    if request.load_limit < 1 {
        return Err(ApiError::Validation(
            "load_limit must be at least 1".to_string(),
        ));
    }

    let operator = state.db.create_operator(&request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(operator))))
}

pub async fn list_operators(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Operator>>>> {
    let (skip, limit) = params.validate()?;
    let operators = state.db.list_operators(skip, limit).await?;
    Ok(Json(ApiResponse::ok(operators)))
}

pub async fn get_operator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Operator>>> {
    let operator = state
        .db
        .get_operator_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Operator not found".to_string()))?;

    Ok(Json(ApiResponse::ok(operator)))
}

pub async fn update_operator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOperatorRequest>,
) -> ApiResult<Json<ApiResponse<Operator>>> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_string()));
        }
    }
    if let Some(load_limit) = request.load_limit {
        if load_limit < 1 {
            return Err(ApiError::Validation(
                "load_limit must be at least 1".to_string(),
            ));
        }
    }

    if state.db.get_operator_by_id(id).await?.is_none() {
        tracing::warn!("Operator not found for update: operator_id={}", id);
        return Err(ApiError::NotFound("Operator not found".to_string()));
    }

    let operator = state
        .db
        .update_operator(id, &request)
        .await?
        .ok_or_else(|| ApiError::Internal("Operator not found".to_string()))?;

    Ok(Json(ApiResponse::ok(operator)))
}

pub async fn delete_operator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    if state.db.get_operator_by_id(id).await?.is_none() {
        tracing::warn!("Operator not found for delete: operator_id={}", id);
        return Err(ApiError::NotFound("Operator not found".to_string()));
    }

    state.db.delete_operator(id).await?;
    Ok(Json(ApiResponse::ok(json!({ "deleted": true }))))
}
