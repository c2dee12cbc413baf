mod common;

use axum::http::StatusCode;
use common::TestHarness;

#[tokio::test]
async fn test_stats_reference_scenario() {
    let harness = TestHarness::new().await;
    let user_id = harness.register_user("alice").await;
    harness.add_expense(user_id, 10.0, "food", "2024-01-05").await;
    harness.add_expense(user_id, 20.0, "food", "2024-01-20").await;
    harness
        .add_expense(user_id, 5.0, "transport", "2024-02-01")
        .await;

    let (status, body) = harness
        .get(&format!("/api/stats?userId={}", user_id))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total"], 35.0);
    assert_eq!(body["summary"]["count"], 3);
    let average = body["summary"]["average"].as_f64().unwrap();
    assert!((average - 35.0 / 3.0).abs() < 1e-9);

    let by_category = body["byCategory"].as_array().unwrap();
    assert_eq!(by_category.len(), 2);
    assert_eq!(by_category[0]["category"], "food");
    assert_eq!(by_category[0]["total"], 30.0);
    assert_eq!(by_category[0]["count"], 2);
    assert_eq!(by_category[1]["category"], "transport");
    assert_eq!(by_category[1]["total"], 5.0);

    let monthly = body["monthlyBreakdown"].as_array().unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0]["year"], 2024);
    assert_eq!(monthly[0]["month"], 2);
    assert_eq!(monthly[0]["total"], 5.0);
    assert_eq!(monthly[1]["month"], 1);
    assert_eq!(monthly[1]["count"], 2);
}

#[tokio::test]
async fn test_stats_for_user_without_expenses() {
    let harness = TestHarness::new().await;
    let user_id = harness.register_user("bob").await;

    let (status, body) = harness
        .get(&format!("/api/stats?userId={}", user_id))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["total"], 0.0);
    assert_eq!(body["summary"]["count"], 0);
    assert_eq!(body["summary"]["average"], 0.0);
    assert_eq!(body["byCategory"].as_array().unwrap().len(), 0);
    assert_eq!(body["monthlyBreakdown"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_stats_inverted_range_is_bad_request() {
    let harness = TestHarness::new().await;
    let user_id = harness.register_user("carol").await;

    let (status, body) = harness
        .get(&format!(
            "/api/stats?userId={}&startDate=2024-02-01&endDate=2024-01-01",
            user_id
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad request");
    assert!(body["message"].as_str().unwrap().contains("after"));
}

#[tokio::test]
async fn test_stats_date_range_filters() {
    let harness = TestHarness::new().await;
    let user_id = harness.register_user("dave").await;
    harness.add_expense(user_id, 1.0, "bills", "2024-01-31").await;
    harness.add_expense(user_id, 2.0, "bills", "2024-02-01").await;
    harness
        .add_expense(user_id, 4.0, "health", "2024-02-29T23:30:00Z")
        .await;
    harness.add_expense(user_id, 8.0, "bills", "2024-03-01").await;

    let (status, body) = harness
        .get(&format!(
            "/api/stats?userId={}&startDate=2024-02-01&endDate=2024-02-29",
            user_id
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["count"], 2);
    assert_eq!(body["summary"]["total"], 6.0);
    assert_eq!(body["byCategory"][0]["category"], "health");
}

#[tokio::test]
async fn test_stats_rejects_malformed_user_id() {
    let harness = TestHarness::new().await;

    for uri in ["/api/stats", "/api/stats?userId=", "/api/stats?userId=abc"] {
        let (status, _) = harness.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_stats_isolated_per_user() {
    let harness = TestHarness::new().await;
    let alice = harness.register_user("alice").await;
    let bob = harness.register_user("bob").await;
    harness.add_expense(alice, 12.0, "food", "2024-05-01").await;
    harness.add_expense(bob, 99.0, "shopping", "2024-05-01").await;

    let (_, body) = harness.get(&format!("/api/stats?userId={}", alice)).await;

    assert_eq!(body["summary"]["total"], 12.0);
    assert_eq!(body["byCategory"].as_array().unwrap().len(), 1);
}
