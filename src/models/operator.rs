use serde::{Deserialize, Serialize};

/// A human operator. `load_limit` caps the number of active contacts the
/// assignment selector may hand them at once; current load is always counted
/// live from the contacts table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub load_limit: i64,
    pub created_at: String,
    pub updated_at: String,
}

// DTOs for API requests/responses
#[derive(Debug, Deserialize)]
pub struct CreateOperatorRequest {
    pub name: String,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    #[serde(default = "default_load_limit")]
    pub load_limit: i64,
}

fn default_is_active() -> bool {
    true
}

fn default_load_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct UpdateOperatorRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub load_limit: Option<i64>,
}
