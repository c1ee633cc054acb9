use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    api::{
        envelope::ApiResponse,
        middleware::{ApiError, ApiResult, AppState},
        PaginationParams,
    },
    models::{Lead, LeadWithContactsResponse, UpdateLeadRequest},
};

// Leads are created by contact intake only, so there is no POST here.

pub async fn list_leads(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Lead>>>> {
    let (skip, limit) = params.validate()?;
    let leads = state.db.list_leads(skip, limit).await?;
    Ok(Json(ApiResponse::ok(leads)))
}

pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<Lead>>> {
    let lead = state
        .db
        .get_lead_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    Ok(Json(ApiResponse::ok(lead)))
}

pub async fn get_lead_with_contacts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<LeadWithContactsResponse>>> {
    let lead = state
        .db
        .get_lead_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    let contacts = state.db.contacts_for_lead(id).await?;
    Ok(Json(ApiResponse::ok(LeadWithContactsResponse::new(
        lead, contacts,
    ))))
}

pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateLeadRequest>,
) -> ApiResult<Json<ApiResponse<Lead>>> {
    if state.db.get_lead_by_id(id).await?.is_none() {
        tracing::warn!("Lead not found for update: lead_id={}", id);
        return Err(ApiError::NotFound("Lead not found".to_string()));
    }

    let lead = state
        .db
        .update_lead(id, &request)
        .await?
        .ok_or_else(|| ApiError::Internal("Lead not found".to_string()))?;

    Ok(Json(ApiResponse::ok(lead)))
}
