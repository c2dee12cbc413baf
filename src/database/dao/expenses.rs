use crate::database::entities::{ExpenseCategory, ExpenseRecord, expenses};
use crate::database::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Expense query parameters
#[derive(Debug, Default, Clone)]
pub struct ExpenseQuery {
    pub user_id: Option<i32>,
    pub category: Option<ExpenseCategory>,
    /// Inclusive lower bound on `date`
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl ExpenseQuery {
    pub fn for_user(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }
}

/// Partial update applied to an existing expense
#[derive(Debug, Default, Clone)]
pub struct ExpenseChanges {
    pub amount: Option<Decimal>,
    pub category: Option<ExpenseCategory>,
    pub description: Option<Option<String>>,
    pub date: Option<DateTime<Utc>>,
}

/// Expenses DAO for database operations
#[derive(Clone)]
pub struct ExpensesDao {
    db: DatabaseConnection,
}

impl ExpensesDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a new expense and return it with its assigned ID
    pub async fn create(&self, expense: &ExpenseRecord) -> DatabaseResult<ExpenseRecord> {
        let active_model = expenses::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: Set(expense.user_id),
            amount: Set(expense.amount),
            category: Set(expense.category),
            description: Set(expense.description.clone()),
            date: Set(expense.date),
            created_at: Set(expense.created_at),
            updated_at: Set(expense.updated_at),
        };

        let created = active_model
            .insert(&self.db)
            .await
            .map_err(DatabaseError::from)?;

        Ok(created)
    }

    /// Find expense by ID
    pub async fn find_by_id(&self, expense_id: i32) -> DatabaseResult<Option<ExpenseRecord>> {
        let expense = expenses::Entity::find_by_id(expense_id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(expense)
    }

    /// Get expenses matching the query, newest first
    pub async fn find_matching(&self, query: &ExpenseQuery) -> DatabaseResult<Vec<ExpenseRecord>> {
        let mut select = expenses::Entity::find();

        // Apply filters
        if let Some(user_id) = query.user_id {
            select = select.filter(expenses::Column::UserId.eq(user_id));
        }
        if let Some(category) = query.category {
            select = select.filter(expenses::Column::Category.eq(category));
        }
        if let Some(start_date) = query.start_date {
            select = select.filter(expenses::Column::Date.gte(start_date));
        }
        if let Some(end_date) = query.end_date {
            select = select.filter(expenses::Column::Date.lte(end_date));
        }

        select = select
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::Id);

        if let Some(limit) = query.limit {
            select = select.limit(Some(limit as u64));
        }

        let records = select
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records)
    }

    /// Apply changes to an expense, returning the updated record
    pub async fn update(
        &self,
        expense_id: i32,
        changes: &ExpenseChanges,
    ) -> DatabaseResult<ExpenseRecord> {
        let mut active_model = expenses::ActiveModel {
            id: Set(expense_id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        if let Some(amount) = changes.amount {
            active_model.amount = Set(amount);
        }
        if let Some(category) = changes.category {
            active_model.category = Set(category);
        }
        if let Some(ref description) = changes.description {
            active_model.description = Set(description.clone());
        }
        if let Some(date) = changes.date {
            active_model.date = Set(date);
        }

        active_model.update(&self.db).await.map_err(DatabaseError::from)
    }

    /// Delete an expense, returning whether a row was removed
    pub async fn delete(&self, expense_id: i32) -> DatabaseResult<bool> {
        let result = expenses::Entity::delete_by_id(expense_id)
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}
