//! # Inventory Repository
//!
//! Database operations for stock lines.
//!
//! ## Key Operations
//! - `insert`: validate, then write inside a scoped transaction
//! - `fetch_all`: every line, newest first
//!
//! ## Insert Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert(NewInventoryItem { name: "  Widget  ", quantity: 5, ... })      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_item ── Err ──► DbError::Validation (nothing written)     │
//! │       │ Ok (name = "Widget")                                            │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │  INSERT INTO inventory (name, quantity, price) VALUES (?1, ?2, ?3)      │
//! │  COMMIT ── CHECK fails ──► ROLLBACK, DbError::ConstraintViolation       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rowid                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use bizpro_core::validation::validate_new_item;
use bizpro_core::{InventoryItem, NewInventoryItem};

/// Repository for inventory database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.inventory();
///
/// let id = repo.insert(NewInventoryItem::new("Widget", 10, 2.5)).await?;
/// let items = repo.fetch_all().await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: Database,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(db: Database) -> Self {
        InventoryRepository { db }
    }

    /// Inserts a stock line and returns its id.
    ///
    /// The draft is validated again here even if the caller already did,
    /// and the stored name is the trimmed one.
    pub async fn insert(&self, item: NewInventoryItem) -> DbResult<i64> {
        let item = validate_new_item(item)?;

        debug!(name = %item.name, quantity = item.quantity, price = item.price, "Inserting inventory item");

        let id = self
            .db
            .with_transaction(move |conn| {
                Box::pin(async move {
                    let result = sqlx::query(
                        r#"
                        INSERT INTO inventory (name, quantity, price)
                        VALUES (?1, ?2, ?3)
                        "#,
                    )
                    .bind(item.name)
                    .bind(item.quantity)
                    .bind(item.price)
                    .execute(&mut *conn)
                    .await?;

                    Ok(result.last_insert_rowid())
                })
            })
            .await?;

        Ok(id)
    }

    /// Returns every stock line, most recent first.
    pub async fn fetch_all(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, name, quantity, price, created_at
            FROM inventory
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        debug!(count = items.len(), "Fetched inventory");
        Ok(items)
    }

    /// Counts stock lines.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use bizpro_core::{NewInventoryItem, ValidationError};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = test_db().await;
        let repo = db.inventory();

        let id = repo
            .insert(NewInventoryItem::new("Maize flour 2kg", 24, 210.0))
            .await
            .unwrap();

        let items = repo.fetch_all().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].name, "Maize flour 2kg");
        assert_eq!(items[0].quantity, 24);
        assert_eq!(items[0].price, 210.0);
    }

    #[tokio::test]
    async fn test_name_is_stored_trimmed() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.insert(NewInventoryItem::new("  Widget  ", 1, 5.0))
            .await
            .unwrap();

        let items = repo.fetch_all().await.unwrap();
        assert_eq!(items[0].name, "Widget");
        assert!(items.iter().any(|item| item.name == "Widget"));
    }

    #[tokio::test]
    async fn test_zero_quantity_and_price_are_allowed() {
        let db = test_db().await;
        let repo = db.inventory();

        repo.insert(NewInventoryItem::new("Sample", 0, 0.0))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_items_leave_table_unchanged() {
        let db = test_db().await;
        let repo = db.inventory();
        repo.insert(NewInventoryItem::new("Widget", 3, 1.0))
            .await
            .unwrap();

        let rejected = [
            NewInventoryItem::new("Widget", -1, 1.0),
            NewInventoryItem::new("Widget", 1, -0.01),
            NewInventoryItem::new("   ", 1, 1.0),
            NewInventoryItem::new("Widget", 1, f64::NAN),
            NewInventoryItem::new("Widget", 1, f64::INFINITY),
        ];

        for item in rejected {
            let err = repo.insert(item).await.unwrap_err();
            assert!(err.is_validation(), "expected validation error, got {err}");
        }

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_negative_quantity_error_names_field() {
        let db = test_db().await;

        let err = db
            .inventory()
            .insert(NewInventoryItem::new("Widget", -1, 1.0))
            .await
            .unwrap_err();

        match err {
            DbError::Validation(ValidationError::Negative { field }) => {
                assert_eq!(field, "quantity")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_is_newest_first() {
        let db = test_db().await;
        let repo = db.inventory();

        for name in ["first", "second", "third"] {
            repo.insert(NewInventoryItem::new(name, 1, 1.0))
                .await
                .unwrap();
        }

        let names: Vec<String> = repo
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);

        // Read-your-writes: the latest insert is at the head
        repo.insert(NewInventoryItem::new("fourth", 1, 1.0))
            .await
            .unwrap();
        let items = repo.fetch_all().await.unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].name, "fourth");
    }
}
