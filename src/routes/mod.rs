pub mod docs;
pub mod expenses;
pub mod health;
pub mod stats;
pub mod users;

use crate::server::Server;
use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use docs::create_docs_routes;
pub use expenses::create_expense_routes;
pub use health::create_health_routes;
pub use stats::create_stats_routes;
pub use users::create_user_routes;

/// Error body returned by every failing API call
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Short error category
    pub error: String,
    /// Human readable detail
    pub message: String,
}

/// All JSON API routes, mounted under `/api`
pub fn create_api_routes() -> Router<Server> {
    Router::new()
        .nest("/users", create_user_routes())
        .nest("/expenses", create_expense_routes())
        .merge(create_stats_routes())
        .merge(create_docs_routes())
}
