use crate::{
    auth::{hash_password, verify_password},
    database::entities::UserRecord,
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Create user registration and login routes
pub fn create_user_routes() -> Router<Server> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/{user_id}", get(get_user))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user, never carries the password hash
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(request: &RegisterRequest) -> Result<(String, String), AppError> {
    let username = request.username.trim();
    let username_len = username.chars().count();
    if !(3..=50).contains(&username_len) {
        return Err(AppError::BadRequest(
            "Username must be between 3 and 50 characters".to_string(),
        ));
    }

    let email = normalize_email(&request.email);
    let valid_email = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid_email {
        return Err(AppError::BadRequest(format!(
            "'{}' is not a valid email address",
            request.email.trim()
        )));
    }

    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok((username.to_string(), email))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid registration data", body = ApiErrorResponse),
        (status = 409, description = "Username or email already taken", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Users"
)]
pub async fn register_user(
    State(server): State<Server>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let (username, email) = validate_registration(&request)?;

    if server
        .database
        .users()
        .exists_by_username_or_email(&username, &email)
        .await?
    {
        return Err(AppError::Conflict(
            "Username or email is already registered".to_string(),
        ));
    }

    // Argon2 is deliberately slow, keep it off the async workers
    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = server
        .database
        .users()
        .create(&UserRecord::new(username, email, password_hash))
        .await?;

    info!(user_id = user.id, username = %user.username, "User registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Check credentials and return the matching user
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = UserResponse),
        (status = 401, description = "Invalid email or password", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Users"
)]
pub async fn login_user(
    State(server): State<Server>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let email = normalize_email(&request.email);
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let Some(user) = server.database.users().find_by_email(&email).await? else {
        warn!(email = %email, "Login attempt for unknown email");
        return Err(invalid());
    };

    let password = request.password;
    let stored_hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !matches {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(invalid());
    }

    info!(user_id = user.id, "User logged in");
    Ok(Json(user.into()))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ApiErrorResponse)
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(server): State<Server>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = server
        .database
        .users()
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(user.into()))
}
