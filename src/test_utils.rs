use crate::{
    config::Config,
    database::{
        DatabaseManager,
        entities::{ExpenseCategory, ExpenseRecord, UserRecord},
    },
    server::Server,
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Test server builder backed by in-memory SQLite with migrations applied
pub struct TestServerBuilder {
    config: Config,
    use_memory_db: bool,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            use_memory_db: true,
        }
    }

    /// Keep the database URL from the supplied configuration
    pub fn with_real_database(mut self) -> Self {
        self.use_memory_db = false;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> Server {
        let mut config = self.config;
        if self.use_memory_db {
            config.database.url = "sqlite::memory:".to_string();
        }
        config.logging.log_request = false;

        let server = Server::new(config).await.unwrap();
        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a user named `name` with a placeholder hash, returning its ID
pub async fn create_test_user(database: &Arc<dyn DatabaseManager>, name: &str) -> i32 {
    database
        .users()
        .create(&UserRecord::new(
            name,
            format!("{}@example.com", name),
            "not-a-real-hash",
        ))
        .await
        .unwrap()
        .id
}

/// Insert an expense dated at noon UTC on the given day
pub async fn create_test_expense(
    database: &Arc<dyn DatabaseManager>,
    user_id: i32,
    amount: Decimal,
    category: ExpenseCategory,
    (year, month, day): (i32, u32, u32),
) -> ExpenseRecord {
    let expense = ExpenseRecord::new(user_id, amount, category)
        .with_date(Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap());
    database.expenses().create(&expense).await.unwrap()
}
