//! # Expense Repository
//!
//! Database operations for business expenses (rent, transport, stock
//! purchases). Same append-only shape as inventory and sales.

use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use bizpro_core::validation::validate_new_expense;
use bizpro_core::{ExpenseRecord, NewExpense};

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: Database,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(db: Database) -> Self {
        ExpenseRepository { db }
    }

    /// Records an expense and returns its id.
    pub async fn insert(&self, expense: NewExpense) -> DbResult<i64> {
        let expense = validate_new_expense(expense)?;

        debug!(description = %expense.description, amount = expense.amount, "Recording expense");

        let id = self
            .db
            .with_transaction(move |conn| {
                Box::pin(async move {
                    let result = sqlx::query(
                        "INSERT INTO expenses (description, amount) VALUES (?1, ?2)",
                    )
                    .bind(expense.description)
                    .bind(expense.amount)
                    .execute(&mut *conn)
                    .await?;

                    Ok(result.last_insert_rowid())
                })
            })
            .await?;

        Ok(id)
    }

    /// Returns every expense, most recent first.
    pub async fn fetch_all(&self) -> DbResult<Vec<ExpenseRecord>> {
        let expenses = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            SELECT id, description, amount, created_at
            FROM expenses
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(expenses)
    }

    /// Counts recorded expenses.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}
