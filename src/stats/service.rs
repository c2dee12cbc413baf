use super::{DateRange, StatsAggregator, StatsResult, StatsSummary, parse_user_id};
use crate::database::{DatabaseManager, ExpenseQuery, with_timeout};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Computes expense statistics for a single user
pub struct StatsService {
    database: Arc<dyn DatabaseManager>,
}

impl StatsService {
    pub fn new(database: Arc<dyn DatabaseManager>) -> Self {
        Self { database }
    }

    /// Compute totals, category and monthly breakdowns for `user_id`.
    ///
    /// Input is validated before the database is touched. A user with no
    /// matching expenses yields an all-zero summary rather than an error.
    pub async fn compute_stats(
        &self,
        user_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> StatsResult<StatsSummary> {
        let user_id = parse_user_id(user_id)?;
        let range = DateRange::new(start_date, end_date)?;

        let query = ExpenseQuery {
            user_id: Some(user_id),
            start_date: range.start_bound(),
            end_date: range.end_bound(),
            ..Default::default()
        };

        let started = Instant::now();
        let records = with_timeout(
            self.database.query_timeout(),
            self.database.expenses().find_matching(&query),
        )
        .await?;

        debug!(
            user_id,
            records = records.len(),
            fetch_ms = started.elapsed().as_millis() as u64,
            "Fetched expenses for statistics"
        );

        let stats = StatsAggregator::aggregate(&records);

        info!(
            user_id,
            start_date = ?range.start,
            end_date = ?range.end,
            count = stats.summary.count,
            categories = stats.by_category.len(),
            months = stats.monthly_breakdown.len(),
            "Computed expense statistics"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::entities::{ExpenseCategory, ExpenseRecord, UserRecord};
    use crate::database::{
        DatabaseError, DatabaseManagerImpl, DatabaseResult, ExpensesDao, UsersDao,
    };
    use crate::stats::StatsError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use sea_orm::DatabaseConnection;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    async fn create_test_database() -> Arc<DatabaseManagerImpl> {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        let database = DatabaseManagerImpl::new_from_config(&config).await.unwrap();
        database.migrate().await.unwrap();
        Arc::new(database)
    }

    async fn seed_user(database: &DatabaseManagerImpl, name: &str) -> i32 {
        database
            .users()
            .create(&UserRecord::new(
                name,
                format!("{}@example.com", name),
                "hash",
            ))
            .await
            .unwrap()
            .id
    }

    async fn seed_expense(
        database: &DatabaseManagerImpl,
        user_id: i32,
        amount: i64,
        category: ExpenseCategory,
        (y, m, d): (i32, u32, u32),
    ) {
        let expense = ExpenseRecord::new(user_id, Decimal::new(amount, 0), category)
            .with_date(Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap());
        database.expenses().create(&expense).await.unwrap();
    }

    /// Counts expense lookups so tests can assert nothing reached storage
    struct CountingDatabase {
        inner: Arc<DatabaseManagerImpl>,
        expense_calls: AtomicUsize,
    }

    #[async_trait]
    impl DatabaseManager for CountingDatabase {
        async fn migrate(&self) -> DatabaseResult<()> {
            self.inner.migrate().await
        }

        async fn health_check(&self) -> DatabaseResult<()> {
            self.inner.health_check().await
        }

        async fn close(&self) -> DatabaseResult<()> {
            self.inner.close().await
        }

        fn users(&self) -> UsersDao {
            self.inner.users()
        }

        fn expenses(&self) -> ExpensesDao {
            self.expense_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.expenses()
        }

        fn query_timeout(&self) -> Duration {
            self.inner.query_timeout()
        }

        fn connection(&self) -> &DatabaseConnection {
            self.inner.connection()
        }
    }

    #[tokio::test]
    async fn test_compute_stats_reference_scenario() {
        let database = create_test_database().await;
        let user_id = seed_user(&database, "alice").await;
        seed_expense(&database, user_id, 10, ExpenseCategory::Food, (2024, 1, 5)).await;
        seed_expense(&database, user_id, 20, ExpenseCategory::Food, (2024, 1, 20)).await;
        seed_expense(&database, user_id, 5, ExpenseCategory::Transport, (2024, 2, 1)).await;

        let service = StatsService::new(database);
        let stats = service
            .compute_stats(&user_id.to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(stats.summary.total, Decimal::new(35, 0));
        assert_eq!(stats.summary.count, 3);
        assert_eq!(stats.by_category.len(), 2);
        assert_eq!(stats.by_category[0].category, ExpenseCategory::Food);
        assert_eq!(stats.by_category[0].total, Decimal::new(30, 0));
        assert_eq!(
            (stats.monthly_breakdown[0].year, stats.monthly_breakdown[0].month),
            (2024, 2)
        );
    }

    #[tokio::test]
    async fn test_compute_stats_only_counts_requested_user() {
        let database = create_test_database().await;
        let alice = seed_user(&database, "alice").await;
        let bob = seed_user(&database, "bob").await;
        seed_expense(&database, alice, 10, ExpenseCategory::Food, (2024, 1, 5)).await;
        seed_expense(&database, bob, 99, ExpenseCategory::Bills, (2024, 1, 5)).await;

        let service = StatsService::new(database);
        let stats = service
            .compute_stats(&alice.to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(stats.summary.total, Decimal::new(10, 0));
        assert_eq!(stats.summary.count, 1);
    }

    #[tokio::test]
    async fn test_compute_stats_range_bounds_are_inclusive() {
        let database = create_test_database().await;
        let user_id = seed_user(&database, "alice").await;
        seed_expense(&database, user_id, 1, ExpenseCategory::Food, (2024, 1, 31)).await;
        seed_expense(&database, user_id, 2, ExpenseCategory::Food, (2024, 2, 1)).await;
        seed_expense(&database, user_id, 4, ExpenseCategory::Food, (2024, 2, 29)).await;
        seed_expense(&database, user_id, 8, ExpenseCategory::Food, (2024, 3, 1)).await;

        let service = StatsService::new(database);
        let stats = service
            .compute_stats(
                &user_id.to_string(),
                NaiveDate::from_ymd_opt(2024, 2, 1),
                NaiveDate::from_ymd_opt(2024, 2, 29),
            )
            .await
            .unwrap();

        assert_eq!(stats.summary.count, 2);
        assert_eq!(stats.summary.total, Decimal::new(6, 0));
        assert_eq!(stats.monthly_breakdown.len(), 1);
    }

    #[tokio::test]
    async fn test_compute_stats_no_records() {
        let database = create_test_database().await;
        let service = StatsService::new(database);

        let stats = service.compute_stats("12345", None, None).await.unwrap();

        assert_eq!(stats, StatsSummary::empty());
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_database() {
        let counting = Arc::new(CountingDatabase {
            inner: create_test_database().await,
            expense_calls: AtomicUsize::new(0),
        });
        let service = StatsService::new(counting.clone());

        let err = service
            .compute_stats(
                "1",
                NaiveDate::from_ymd_opt(2024, 2, 1),
                NaiveDate::from_ymd_opt(2024, 1, 1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));

        let err = service
            .compute_stats("not-an-id", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StatsError::InvalidInput(_)));

        assert_eq!(counting.expense_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_closed_database_is_persistence_error() {
        let database = create_test_database().await;
        database.close().await.unwrap();
        let service = StatsService::new(database);

        let err = service.compute_stats("1", None, None).await.unwrap_err();

        assert!(matches!(
            err,
            StatsError::Persistence(DatabaseError::Database(_))
        ));
    }
}
