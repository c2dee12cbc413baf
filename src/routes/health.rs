use crate::{
    health::{HealthResponse, HealthService},
    routes::ApiErrorResponse,
};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HealthCheckQuery {
    /// `all` or the name of a single registered checker
    #[serde(default)]
    pub check: Option<String>,
}

/// Create health check routes, served with the health registry as state
pub fn create_health_routes() -> Router<Arc<HealthService>> {
    Router::new().route("/", get(health_check))
}

/// Report service health
#[utoipa::path(
    get,
    path = "/health",
    params(HealthCheckQuery),
    responses(
        (status = 200, description = "Health report", body = HealthResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(health_service): State<Arc<HealthService>>,
    Query(params): Query<HealthCheckQuery>,
) -> Json<HealthResponse> {
    Json(health_service.check_health(params.check.as_deref()).await)
}
