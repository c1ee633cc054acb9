pub mod base;
pub mod contacts;
pub mod envelope;
pub mod leads;
pub mod middleware;
pub mod operators;
pub mod router;
pub mod sources;

pub use envelope::*;
pub use middleware::*;

use serde::Deserialize;

use crate::api::middleware::error::{ApiError, ApiResult};

/// skip/limit listing parameters shared by every collection endpoint.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

pub const MAX_PAGE_SIZE: i64 = 1000;

impl PaginationParams {
    pub fn validate(&self) -> ApiResult<(i64, i64)> {
        if self.skip < 0 {
            return Err(ApiError::Validation("skip must not be negative".to_string()));
        }
        if self.limit < 1 {
            return Err(ApiError::Validation("limit must be positive".to_string()));
        }
        Ok((self.skip, self.limit.min(MAX_PAGE_SIZE)))
    }
}
