use serde::{Deserialize, Serialize};

/// An acquisition source (a bot, a landing page, an ad campaign). Operators
/// are bound to a source only through weight rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-(source, operator) assignment weight. At most one row per pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOperatorWeight {
    pub id: i64,
    pub source_id: i64,
    pub operator_id: i64,
    pub weight: i64,
    pub created_at: String,
    pub updated_at: String,
}

// DTOs for API requests/responses
#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSourceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetOperatorWeightRequest {
    pub operator_id: i64,
    #[serde(default = "default_weight")]
    pub weight: i64,
}

fn default_weight() -> i64 {
    10
}

#[derive(Debug, Serialize)]
pub struct SourceWithWeightsResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub operator_weights: Vec<SourceOperatorWeight>,
}

impl SourceWithWeightsResponse {
    pub fn new(source: Source, operator_weights: Vec<SourceOperatorWeight>) -> Self {
        Self {
            id: source.id,
            name: source.name,
            description: source.description,
            created_at: source.created_at,
            updated_at: source.updated_at,
            operator_weights,
        }
    }
}
