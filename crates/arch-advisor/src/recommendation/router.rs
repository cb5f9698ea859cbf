use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::requirements::RawRequirements;
use super::service::ArchitectureAdvisor;

/// Router exposing evaluation and catalog inspection over HTTP.
pub fn recommendation_router(advisor: Arc<ArchitectureAdvisor>) -> Router {
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler))
        .route("/api/v1/catalog", get(catalog_handler))
        .with_state(advisor)
}

pub(crate) async fn recommend_handler(
    State(advisor): State<Arc<ArchitectureAdvisor>>,
    axum::Json(raw): axum::Json<RawRequirements>,
) -> Response {
    match advisor.recommend(raw) {
        Ok(recommendation) => (StatusCode::OK, axum::Json(recommendation)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn catalog_handler(State(advisor): State<Arc<ArchitectureAdvisor>>) -> Response {
    let summary = advisor.catalog().summary();
    (StatusCode::OK, axum::Json(summary)).into_response()
}
