use crate::database::DatabaseError;
use crate::stats::StatsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(config::ConfigError),
    Database(DatabaseError),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "Configuration error: {}", err),
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound => AppError::NotFound("Record not found".to_string()),
            DatabaseError::Constraint(msg) => AppError::Conflict(msg),
            other => AppError::Database(other),
        }
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::InvalidInput(msg) => AppError::BadRequest(msg),
            StatsError::Persistence(err) => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "Authentication failed"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": error_message,
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[test]
    fn test_app_error_display() {
        let config_err = AppError::Config(config::ConfigError::NotFound("test".to_string()));
        assert!(config_err.to_string().contains("Configuration error"));

        let internal_err = AppError::Internal("test message".to_string());
        assert_eq!(internal_err.to_string(), "Internal error: test message");

        let bad_request = AppError::BadRequest("startDate is after endDate".to_string());
        assert_eq!(
            bad_request.to_string(),
            "Bad request: startDate is after endDate"
        );

        let unauthorized_err = AppError::Unauthorized("invalid credentials".to_string());
        assert_eq!(
            unauthorized_err.to_string(),
            "Unauthorized: invalid credentials"
        );
    }

    #[test]
    fn test_app_error_from_database_error() {
        let app_err: AppError = DatabaseError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound(_)));

        let app_err: AppError = DatabaseError::Constraint("UNIQUE".to_string()).into();
        assert!(matches!(app_err, AppError::Conflict(_)));

        let app_err: AppError = DatabaseError::Timeout(Duration::from_secs(1)).into();
        assert!(matches!(app_err, AppError::Database(DatabaseError::Timeout(_))));
    }

    #[test]
    fn test_app_error_from_stats_error() {
        let app_err: AppError = StatsError::InvalidInput("bad".to_string()).into();
        assert!(matches!(app_err, AppError::BadRequest(_)));

        let app_err: AppError =
            StatsError::Persistence(DatabaseError::Database("gone".to_string())).into();
        assert!(matches!(app_err, AppError::Database(_)));
    }

    #[test]
    fn test_app_error_into_response() {
        let cases = [
            (
                AppError::Config(config::ConfigError::NotFound("test".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::Database(DatabaseError::Timeout(Duration::from_secs(10))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::BadRequest("x".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".to_string()), StatusCode::CONFLICT),
            (
                AppError::Unauthorized("x".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Internal("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_response_body_format() {
        let response = AppError::NotFound("Expense 3 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Not found");
        assert_eq!(json["message"], "Not found: Expense 3 not found");
    }
}
