use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use expense_tracker::{Server, test_utils::TestServerBuilder};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Full application on in-memory SQLite with JSON request helpers
pub struct TestHarness {
    #[allow(dead_code)]
    pub server: Server,
    pub app: Router,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();
        Self { server, app }
    }

    /// Send a request, returning status and parsed JSON body (`Null` if empty)
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    #[allow(dead_code)]
    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Register a user through the API and return its ID
    pub async fn register_user(&self, username: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/users/register",
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "correct-horse"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Record an expense through the API and return its ID
    #[allow(dead_code)]
    pub async fn add_expense(&self, user_id: i64, amount: f64, category: &str, date: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/expenses",
                json!({
                    "userId": user_id,
                    "amount": amount,
                    "category": category,
                    "date": date
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["id"].as_i64().unwrap()
    }
}
