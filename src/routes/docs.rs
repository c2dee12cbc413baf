use crate::{error::AppError, server::Server};
use axum::{Json, Router, http::header, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expense Tracker API",
        version = "1.0.0",
        description = "Record personal expenses and aggregate spending statistics"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::users::register_user,
        crate::routes::users::login_user,
        crate::routes::users::get_user,
        crate::routes::expenses::create_expense,
        crate::routes::expenses::list_expenses,
        crate::routes::expenses::get_expense,
        crate::routes::expenses::update_expense,
        crate::routes::expenses::delete_expense,
        crate::routes::stats::get_stats,
    ),
    components(
        schemas(
            crate::routes::ApiErrorResponse,
            crate::health::HealthResponse,
            crate::health::HealthStatus,
            crate::health::HealthCheckResult,
            crate::health::HealthSummary,
            crate::routes::users::RegisterRequest,
            crate::routes::users::LoginRequest,
            crate::routes::users::UserResponse,
            crate::database::entities::ExpenseRecord,
            crate::database::entities::ExpenseCategory,
            crate::routes::expenses::CreateExpenseRequest,
            crate::routes::expenses::UpdateExpenseRequest,
            crate::routes::expenses::ExpenseListResponse,
            crate::routes::expenses::DeleteExpenseResponse,
            crate::stats::StatsSummary,
            crate::stats::SummaryTotals,
            crate::stats::CategoryBreakdown,
            crate::stats::MonthlyBreakdown,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "User registration and login"),
        (name = "Expenses", description = "Expense record management"),
        (name = "Statistics", description = "Aggregated spending statistics"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn create_docs_routes() -> Router<Server> {
    Router::new()
        .route("/docs/openapi.json", get(openapi_json))
        .route("/docs/openapi.yaml", get(openapi_yaml))
}

/// Serve OpenAPI specification as JSON
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Serve OpenAPI specification as YAML
async fn openapi_yaml() -> Result<([(header::HeaderName, &'static str); 1], String), AppError> {
    let spec = ApiDoc::openapi();
    let yaml = serde_yaml_ng::to_string(&spec).map_err(|e| {
        AppError::Internal(format!("Failed to serialize OpenAPI spec to YAML: {e}"))
    })?;

    Ok(([(header::CONTENT_TYPE, "application/yaml")], yaml))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[test]
    fn test_openapi_lists_every_route() {
        let spec = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/users/register",
            "/api/users/login",
            "/api/users/{user_id}",
            "/api/expenses",
            "/api/expenses/{expense_id}",
            "/api/stats",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn test_openapi_json() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_docs_routes().with_state(server);

        let request = Request::builder()
            .uri("/docs/openapi.json")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("application/json"));
    }

    #[tokio::test]
    async fn test_openapi_yaml() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_docs_routes().with_state(server);

        let request = Request::builder()
            .uri("/docs/openapi.yaml")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response.headers().get("content-type").unwrap();
        assert!(content_type.to_str().unwrap().contains("application/yaml"));
    }
}
