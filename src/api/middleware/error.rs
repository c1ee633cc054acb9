use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde_json::json;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Validation(String),
    Conflict(String),
    Unavailable(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => {
                // Full detail goes to the log, a generic message to the caller.
                tracing::error!("Database unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Database is temporarily unavailable".to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "data": null
        }));

        (status, body).into_response()
    }
}

/// Pull the offending column out of a constraint-violation message. Handles
/// the parenthesized form ("Key (name)=...") and SQLite's
/// "UNIQUE constraint failed: sources.name" form.
fn extract_conflict_field(message: &str) -> Option<String> {
    static FIELD_RE: OnceLock<Regex> = OnceLock::new();
    let re = FIELD_RE
        .get_or_init(|| Regex::new(r"\(([^)]+)\)|failed: (\w+\.\w+)").expect("valid regex"));

    let captures = re.captures(message)?;
    captures
        .get(1)
        .or_else(|| captures.get(2))
        .map(|m| m.as_str().to_string())
}

fn integrity_conflict(message: &str) -> ApiError {
    let lower = message.to_lowercase();

    if lower.contains("unique") || lower.contains("duplicate") {
        let msg = match extract_conflict_field(message) {
            Some(field) => format!("Value for field '{}' already exists", field),
            None => "Unique constraint violation".to_string(),
        };
        return ApiError::Conflict(msg);
    }

    if lower.contains("foreign key") || lower.contains("references") {
        return ApiError::Conflict("Referential integrity violation".to_string());
    }

    if lower.contains("not null") {
        return ApiError::Conflict("Required field cannot be empty".to_string());
    }

    ApiError::Conflict("Data integrity violation".to_string())
}

// Convert from sqlx errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                tracing::warn!("Database integrity error: {}", message);
                integrity_conflict(&message)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ApiError::Unavailable("Connection pool exhausted or closed".to_string())
            }
            sqlx::Error::Io(e) => ApiError::Unavailable(format!("Connection error: {}", e)),
            other => ApiError::Internal(format!("Database error: {}", other)),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
