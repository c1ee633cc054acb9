use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::{envelope::ApiResponse, middleware::{ApiResult, AppState}, PaginationParams},
    models::{Contact, ContactDetailResponse, CreateContactRequest, UpdateContactRequest},
};

/// Contact intake. The operator is selected automatically; the response
/// carries the contact with lead, source and operator populated.
pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<CreateContactRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ContactDetailResponse>>)> {
    let detail = state.contact_service.create_contact(&request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(detail))))
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<Vec<Contact>>>> {
    let (skip, limit) = params.validate()?;
    let contacts = state.contact_service.list_contacts(skip, limit).await?;
    Ok(Json(ApiResponse::ok(contacts)))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<ContactDetailResponse>>> {
    let detail = state.contact_service.get_contact(id).await?;
    Ok(Json(ApiResponse::ok(detail)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateContactRequest>,
) -> ApiResult<Json<ApiResponse<Contact>>> {
    let contact = state.contact_service.update_contact(id, &request).await?;
    Ok(Json(ApiResponse::ok(contact)))
}

pub async fn get_distribution_statistics(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<HashMap<i64, HashMap<String, i64>>>>> {
    let stats = state.contact_service.distribution().await?;
    Ok(Json(ApiResponse::ok(stats)))
}
