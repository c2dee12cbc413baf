use crate::{
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
    stats::{DateRange, StatsSummary},
};
use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Create expense statistics routes
pub fn create_stats_routes() -> Router<Server> {
    Router::new().route("/stats", get(get_stats))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsQuery {
    /// User whose expenses are summarised
    pub user_id: Option<String>,
    /// Inclusive start date, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`
    pub end_date: Option<String>,
}

/// Aggregate statistics over a user's expenses
#[utoipa::path(
    get,
    path = "/api/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Expense statistics", body = StatsSummary),
        (status = 400, description = "Invalid userId or date range", body = ApiErrorResponse),
        (status = 500, description = "Storage failure or timeout", body = ApiErrorResponse)
    ),
    tag = "Statistics"
)]
pub async fn get_stats(
    State(server): State<Server>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsSummary>, AppError> {
    let range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;

    let stats = server
        .stats_service
        .compute_stats(
            params.user_id.as_deref().unwrap_or_default(),
            range.start,
            range.end,
        )
        .await?;

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::{ExpenseCategory, ExpenseRecord, UserRecord};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let user = server
            .database
            .users()
            .create(&UserRecord::new("alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        for (amount, category, day) in [
            (10, ExpenseCategory::Food, 5),
            (20, ExpenseCategory::Food, 20),
        ] {
            let expense = ExpenseRecord::new(user.id, Decimal::new(amount, 0), category)
                .with_date(Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap());
            server.database.expenses().create(&expense).await.unwrap();
        }
        let app = create_stats_routes().with_state(server);

        let (status, body) = get(app, &format!("/stats?userId={}", user.id)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["total"], 30.0);
        assert_eq!(body["summary"]["count"], 2);
        assert_eq!(body["byCategory"][0]["category"], "food");
        assert_eq!(body["monthlyBreakdown"][0]["month"], 1);
    }

    #[tokio::test]
    async fn test_stats_rejects_bad_input() {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let app = create_stats_routes().with_state(server);

        let (status, body) = get(app.clone(), "/stats").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad request");

        let (status, _) = get(
            app.clone(),
            "/stats?userId=1&startDate=2024-02-01&endDate=2024-01-01",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(app, "/stats?userId=1&startDate=01-02-2024").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
