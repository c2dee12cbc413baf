//! Database access layer with domain-specific DAOs
//!
//! The connection is opened once at startup and handed out as
//! `Arc<dyn DatabaseManager>`; every DAO borrows a clone of the pooled
//! connection.

use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::health::HealthChecker;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection, DbErr, SqlErr};
use thiserror::Error;

pub mod config;
pub mod dao;
pub mod entities;
pub mod migration;

pub use dao::{ExpenseChanges, ExpenseQuery, ExpensesDao, UsersDao};

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Record not found")]
    NotFound,
    #[error("Constraint violation: {0}")]
    Constraint(String),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Database query timed out after {0:?}")]
    Timeout(Duration),
}

impl From<DbErr> for DatabaseError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => DatabaseError::NotFound,
            other => match other.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => DatabaseError::Constraint(msg),
                Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DatabaseError::Constraint(msg),
                _ => DatabaseError::Database(other.to_string()),
            },
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Run a database future, failing with `DatabaseError::Timeout` once `limit` elapses.
///
/// Dropping the future on expiry aborts the in-flight query.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> DatabaseResult<T>
where
    F: Future<Output = DatabaseResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DatabaseError::Timeout(limit))?
}

/// Database manager trait for dependency injection and testing
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Run database migrations
    async fn migrate(&self) -> DatabaseResult<()>;

    /// Health check for database connection
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Close the underlying connection pool
    async fn close(&self) -> DatabaseResult<()>;

    /// Get users DAO
    fn users(&self) -> UsersDao;

    /// Get expenses DAO
    fn expenses(&self) -> ExpensesDao;

    /// Timeout applied to request-scoped reads
    fn query_timeout(&self) -> Duration;

    /// Get direct database connection (for migrations and admin operations)
    fn connection(&self) -> &DatabaseConnection;
}

/// Database connection manager implementation
pub struct DatabaseManagerImpl {
    pub connection: DatabaseConnection,
    query_timeout: Duration,
}

impl DatabaseManagerImpl {
    /// Create database manager from configuration
    pub async fn new_from_config(config: &Config) -> Result<Self, DatabaseError> {
        let mut options = ConnectOptions::new(config.database.url.clone());
        options
            .max_connections(config.database.max_connections)
            .sqlx_logging(false);

        // Every pooled connection to an in-memory SQLite database sees its own empty schema
        if config.database.url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        }

        let connection = sea_orm::Database::connect(options)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        tracing::info!(
            max_connections = config.database.max_connections,
            "Database connection established"
        );

        Ok(Self {
            connection,
            query_timeout: config.database.query_timeout(),
        })
    }
}

#[async_trait]
impl DatabaseManager for DatabaseManagerImpl {
    async fn migrate(&self) -> DatabaseResult<()> {
        use crate::database::migration::Migrator;
        use sea_orm_migration::MigratorTrait;

        tracing::info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| DatabaseError::Migration(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Successfully completed all migrations");
        Ok(())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.connection
            .ping()
            .await
            .map_err(|e| DatabaseError::Database(format!("db error: {}", e)))
    }

    async fn close(&self) -> DatabaseResult<()> {
        // Pool handles are shared, closing a clone closes every connection
        self.connection
            .clone()
            .close()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    fn users(&self) -> UsersDao {
        UsersDao::new(self.connection.clone())
    }

    fn expenses(&self) -> ExpensesDao {
        ExpensesDao::new(self.connection.clone())
    }

    fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}

#[async_trait]
impl HealthChecker for DatabaseManagerImpl {
    fn name(&self) -> &str {
        "database"
    }
    async fn check(&self) -> crate::health::HealthCheckResult {
        match self.health_check().await {
            Ok(_) => crate::health::HealthCheckResult::healthy_with_details(serde_json::json!({
                "status": "healthy",
                "connection": "ok"
            })),
            Err(err) => crate::health::HealthCheckResult::unhealthy_with_details(
                "DB health check failed".to_string(),
                serde_json::json!({
                    "status": "unhealthy",
                    "error": err.to_string()
                }),
            ),
        }
    }
}
