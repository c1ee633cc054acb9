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
    models::{
        CreateSourceRequest, SetOperatorWeightRequest, Source, SourceOperatorWeight,
        SourceWithWeightsResponse, UpdateSourceRequest,
    },
};

pub async fn create_source(
    State(state): State<AppState>,
    Json(request): Json<CreateSourceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Source>>)> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }

    let source = state.db.create_source(&request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(source))))
}

pub async fn list_sources(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Source>>>> {
    let (skip, limit) = params.validate()?;
    let sources = state.db.list_sources(skip, limit).await?;
    Ok(Json(ApiResponse::ok(sources)))
}

pub async fn get_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Source>>> {
    let source = state
        .db
        .get_source_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Source not found".to_string()))?;

    Ok(Json(ApiResponse::ok(source)))
}

pub async fn get_source_with_weights(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<SourceWithWeightsResponse>>> {
    let source = state
        .db
        .get_source_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Source not found".to_string()))?;

    let weights = state.db.weights_for_source(id).await?;
    Ok(Json(ApiResponse::ok(SourceWithWeightsResponse::new(
        source, weights,
    ))))
}

pub async fn update_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSourceRequest>,
) -> ApiResult<Json<ApiResponse<Source>>> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation("name must not be empty".to_string()));
        }
    }

    if state.db.get_source_by_id(id).await?.is_none() {
        tracing::warn!("Source not found for update: source_id={}", id);
        return Err(ApiError::NotFound("Source not found".to_string()));
    }

    let source = state
        .db
        .update_source(id, &request)
        .await?
        .ok_or_else(|| ApiError::Internal("Source not found".to_string()))?;

    Ok(Json(ApiResponse::ok(source)))
}

pub async fn delete_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    if state.db.get_source_by_id(id).await?.is_none() {
        tracing::warn!("Source not found for delete: source_id={}", id);
        return Err(ApiError::NotFound("Source not found".to_string()));
    }

    state.db.delete_source(id).await?;
    Ok(Json(ApiResponse::ok(json!({ "deleted": true }))))
}

/// Create-or-update-in-place for the (source, operator) weight.
pub async fn set_operator_weight(
    State(state): State<AppState>,
    Path(source_id): Path<i64>,
    Json(request): Json<SetOperatorWeightRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SourceOperatorWeight>>)> {
    if request.weight < 1 {
        return Err(ApiError::Validation("weight must be at least 1".to_string()));
    }

    if state.db.get_source_by_id(source_id).await?.is_none() {
        tracing::warn!("Source not found: source_id={}", source_id);
        return Err(ApiError::NotFound("Source not found".to_string()));
    }
    if state
        .db
        .get_operator_by_id(request.operator_id)
        .await?
        .is_none()
    {
        tracing::warn!("Operator not found: operator_id={}", request.operator_id);
        return Err(ApiError::NotFound("Operator not found".to_string()));
    }

    let weight = state
        .db
        .upsert_weight(source_id, request.operator_id, request.weight)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(weight))))
}

pub async fn remove_operator_weight(
    State(state): State<AppState>,
    Path((source_id, operator_id)): Path<(i64, i64)>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let deleted = state.db.delete_weight(source_id, operator_id).await?;
    if !deleted {
        tracing::warn!(
            "Weight not found: source_id={}, operator_id={}",
            source_id,
            operator_id
        );
        return Err(ApiError::NotFound(
            "SourceOperatorWeight not found".to_string(),
        ));
    }

    Ok(Json(ApiResponse::ok(json!({ "deleted": true }))))
}
