use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::api::middleware::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::base::root))
        .route("/health", get(api::base::health))
        // Operator routes
        .route("/api/v1/operators", post(api::operators::create_operator))
        .route("/api/v1/operators", get(api::operators::list_operators))
        .route("/api/v1/operators/:id", get(api::operators::get_operator))
        .route(
            "/api/v1/operators/:id",
            patch(api::operators::update_operator),
        )
        .route(
            "/api/v1/operators/:id",
            delete(api::operators::delete_operator),
        )
        // Source routes
        .route("/api/v1/sources", post(api::sources::create_source))
        .route("/api/v1/sources", get(api::sources::list_sources))
        .route("/api/v1/sources/:id", get(api::sources::get_source))
        .route("/api/v1/sources/:id", patch(api::sources::update_source))
        .route("/api/v1/sources/:id", delete(api::sources::delete_source))
        .route(
            "/api/v1/sources/:id/with-weights",
            get(api::sources::get_source_with_weights),
        )
        .route(
            "/api/v1/sources/:id/operator-weights",
            post(api::sources::set_operator_weight),
        )
        .route(
            "/api/v1/sources/:id/operator-weights/:operator_id",
            delete(api::sources::remove_operator_weight),
        )
        // Contact routes
        .route("/api/v1/contacts", post(api::contacts::create_contact))
        .route("/api/v1/contacts", get(api::contacts::list_contacts))
        .route("/api/v1/contacts/:id", get(api::contacts::get_contact))
        .route(
            "/api/v1/contacts/:id",
            patch(api::contacts::update_contact),
        )
        .route(
            "/api/v1/contacts/statistics/distribution",
            get(api::contacts::get_distribution_statistics),
        )
        // Lead routes
        .route("/api/v1/leads", get(api::leads::list_leads))
        .route("/api/v1/leads/:id", get(api::leads::get_lead))
        .route("/api/v1/leads/:id", patch(api::leads::update_lead))
        .route(
            "/api/v1/leads/:id/with-contacts",
            get(api::leads::get_lead_with_contacts),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
