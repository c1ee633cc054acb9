use serde::{Deserialize, Serialize};

use crate::models::{Lead, Operator, Source};

/// A single inbound request from a lead through a source. `operator_id` is
/// null when no operator was eligible at intake time; `is_active` contacts
/// count toward the assigned operator's load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub lead_id: i64,
    pub source_id: i64,
    pub operator_id: Option<i64>,
    pub is_active: bool,
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// DTOs for API requests/responses
#[derive(Debug, Deserialize)]
pub struct CreateContactRequest {
    // Lead-matching fields
    pub external_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,

    pub source_id: i64,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub is_active: Option<bool>,
    pub message: Option<String>,
    pub operator_id: Option<i64>,
}

/// Contact joined with its lead, source and operator. Assembled by an
/// explicit join query, not by lazy relation loading.
#[derive(Debug, Serialize)]
pub struct ContactDetailResponse {
    pub id: i64,
    pub lead_id: i64,
    pub source_id: i64,
    pub operator_id: Option<i64>,
    pub is_active: bool,
    pub message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub lead: Lead,
    pub source: Source,
    pub operator: Option<Operator>,
}
