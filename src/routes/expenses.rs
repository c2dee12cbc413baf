use crate::{
    database::{
        DatabaseError, ExpenseChanges, ExpenseQuery,
        entities::{ExpenseCategory, ExpenseRecord},
        with_timeout,
    },
    error::AppError,
    routes::ApiErrorResponse,
    server::Server,
    stats::{DateRange, parse_user_id},
};
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Create expense CRUD routes
pub fn create_expense_routes() -> Router<Server> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route(
            "/{expense_id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub user_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339, defaults to now
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    /// An empty string clears the description
    pub description: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListExpensesQuery {
    pub user_id: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseListResponse {
    pub expenses: Vec<ExpenseRecord>,
    pub count: usize,
    pub limit: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteExpenseResponse {
    pub message: String,
    pub id: i32,
}

fn validate_amount(amount: Decimal) -> Result<Decimal, AppError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AppError::BadRequest(format!(
            "amount must not be negative, got {}",
            amount
        )));
    }
    Ok(amount)
}

fn parse_category(raw: &str) -> Result<ExpenseCategory, AppError> {
    raw.parse::<ExpenseCategory>().map_err(AppError::BadRequest)
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(AppError::BadRequest(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

/// Plain dates are stored at midnight UTC
fn parse_expense_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let value = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AppError::BadRequest(format!(
                "date '{}' is not an ISO-8601 date or timestamp",
                value
            ))
        })
}

/// Create a new expense
#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created", body = ExpenseRecord),
        (status = 400, description = "Invalid expense data", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn create_expense(
    State(server): State<Server>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseRecord>), AppError> {
    let amount = validate_amount(request.amount)?;
    let category = parse_category(&request.category)?;

    let mut expense = ExpenseRecord::new(request.user_id, amount, category);
    if let Some(description) = request.description.filter(|d| !d.trim().is_empty()) {
        validate_description(&description)?;
        expense = expense.with_description(description);
    }
    if let Some(date) = request.date.as_deref().filter(|d| !d.trim().is_empty()) {
        expense = expense.with_date(parse_expense_date(date)?);
    }

    if server
        .database
        .users()
        .find_by_id(request.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "User {} does not exist",
            request.user_id
        )));
    }

    let created = server.database.expenses().create(&expense).await?;

    info!(
        expense_id = created.id,
        user_id = created.user_id,
        category = %created.category,
        "Expense created"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// List a user's expenses, newest first
#[utoipa::path(
    get,
    path = "/api/expenses",
    params(ListExpensesQuery),
    responses(
        (status = 200, description = "Matching expenses", body = ExpenseListResponse),
        (status = 400, description = "Invalid query parameters", body = ApiErrorResponse),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn list_expenses(
    State(server): State<Server>,
    Query(params): Query<ListExpensesQuery>,
) -> Result<Json<ExpenseListResponse>, AppError> {
    let user_id = parse_user_id(params.user_id.as_deref().unwrap_or_default())?;
    let category = params
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(parse_category)
        .transpose()?;
    let range = DateRange::parse(params.start_date.as_deref(), params.end_date.as_deref())?;
    let limit = server.config.expenses.clamp_limit(params.limit);

    let query = ExpenseQuery {
        user_id: Some(user_id),
        category,
        start_date: range.start_bound(),
        end_date: range.end_bound(),
        limit: Some(limit),
    };

    let expenses = with_timeout(
        server.database.query_timeout(),
        server.database.expenses().find_matching(&query),
    )
    .await?;

    Ok(Json(ExpenseListResponse {
        count: expenses.len(),
        expenses,
        limit,
    }))
}

/// Get an expense by ID
#[utoipa::path(
    get,
    path = "/api/expenses/{expense_id}",
    params(
        ("expense_id" = i32, Path, description = "Expense ID")
    ),
    responses(
        (status = 200, description = "Expense found", body = ExpenseRecord),
        (status = 404, description = "Expense not found", body = ApiErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn get_expense(
    State(server): State<Server>,
    Path(expense_id): Path<i32>,
) -> Result<Json<ExpenseRecord>, AppError> {
    let expense = server
        .database
        .expenses()
        .find_by_id(expense_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Expense {} not found", expense_id)))?;

    Ok(Json(expense))
}

/// Update fields of an existing expense
#[utoipa::path(
    put,
    path = "/api/expenses/{expense_id}",
    params(
        ("expense_id" = i32, Path, description = "Expense ID")
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ExpenseRecord),
        (status = 400, description = "Invalid expense data", body = ApiErrorResponse),
        (status = 404, description = "Expense not found", body = ApiErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn update_expense(
    State(server): State<Server>,
    Path(expense_id): Path<i32>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseRecord>, AppError> {
    let changes = ExpenseChanges {
        amount: request.amount.map(validate_amount).transpose()?,
        category: request.category.as_deref().map(parse_category).transpose()?,
        description: match request.description {
            Some(description) if description.trim().is_empty() => Some(None),
            Some(description) => {
                validate_description(&description)?;
                Some(Some(description))
            }
            None => None,
        },
        date: request.date.as_deref().map(parse_expense_date).transpose()?,
    };

    if changes.amount.is_none()
        && changes.category.is_none()
        && changes.description.is_none()
        && changes.date.is_none()
    {
        return Err(AppError::BadRequest(
            "At least one of amount, category, description or date must be provided"
                .to_string(),
        ));
    }

    let updated = server
        .database
        .expenses()
        .update(expense_id, &changes)
        .await
        .map_err(|e| match e {
            DatabaseError::NotFound => {
                AppError::NotFound(format!("Expense {} not found", expense_id))
            }
            other => other.into(),
        })?;

    info!(expense_id, "Expense updated");
    Ok(Json(updated))
}

/// Delete an expense
#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    params(
        ("expense_id" = i32, Path, description = "Expense ID")
    ),
    responses(
        (status = 200, description = "Expense deleted", body = DeleteExpenseResponse),
        (status = 404, description = "Expense not found", body = ApiErrorResponse)
    ),
    tag = "Expenses"
)]
pub async fn delete_expense(
    State(server): State<Server>,
    Path(expense_id): Path<i32>,
) -> Result<Json<DeleteExpenseResponse>, AppError> {
    if !server.database.expenses().delete(expense_id).await? {
        return Err(AppError::NotFound(format!(
            "Expense {} not found",
            expense_id
        )));
    }

    info!(expense_id, "Expense deleted");
    Ok(Json(DeleteExpenseResponse {
        message: "Expense deleted successfully".to_string(),
        id: expense_id,
    }))
}
