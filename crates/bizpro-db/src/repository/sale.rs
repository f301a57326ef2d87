//! # Sale Repository
//!
//! Database operations for recorded sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. RECORD                                                             │
//! │     └── insert(NewSale) → rowid                                        │
//! │         (quantity must be > 0, total_price finite and >= 0)            │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── fetch_all() → newest first                                     │
//! │     └── ReportAggregator sums total_price per period                   │
//! │                                                                         │
//! │  There is no step 3: sales are never edited or voided.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use bizpro_core::validation::validate_new_sale;
use bizpro_core::{NewSale, SaleRecord};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: Database,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(db: Database) -> Self {
        SaleRepository { db }
    }

    /// Records a sale and returns its id.
    pub async fn insert(&self, sale: NewSale) -> DbResult<i64> {
        let sale = validate_new_sale(sale)?;

        debug!(
            item_name = %sale.item_name,
            quantity = sale.quantity,
            total_price = sale.total_price,
            "Recording sale"
        );

        let id = self
            .db
            .with_transaction(move |conn| {
                Box::pin(async move {
                    let result = sqlx::query(
                        r#"
                        INSERT INTO sales (item_name, quantity, total_price)
                        VALUES (?1, ?2, ?3)
                        "#,
                    )
                    .bind(sale.item_name)
                    .bind(sale.quantity)
                    .bind(sale.total_price)
                    .execute(&mut *conn)
                    .await?;

                    Ok(result.last_insert_rowid())
                })
            })
            .await?;

        Ok(id)
    }

    /// Returns every sale, most recent first.
    pub async fn fetch_all(&self) -> DbResult<Vec<SaleRecord>> {
        let sales = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT id, item_name, quantity, total_price, created_at
            FROM sales
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(sales)
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use bizpro_core::{NewSale, ValidationError};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_record_sale() {
        let db = test_db().await;
        let repo = db.sales();

        let id = repo
            .insert(NewSale::new(" Cooking oil 1L ", 2, 640.0))
            .await
            .unwrap();

        let sales = repo.fetch_all().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, id);
        assert_eq!(sales[0].item_name, "Cooking oil 1L");
        assert_eq!(sales[0].quantity, 2);
        assert_eq!(sales[0].total_price, 640.0);
    }

    #[tokio::test]
    async fn test_zero_quantity_sale_is_rejected() {
        let db = test_db().await;
        let repo = db.sales();

        let err = repo.insert(NewSale::new("Tea", 0, 0.0)).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustBePositive { .. })
        ));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_non_finite_total_is_rejected() {
        let db = test_db().await;
        let repo = db.sales();

        for total in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = repo.insert(NewSale::new("Tea", 1, total)).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_returns_every_sale_newest_first() {
        let db = test_db().await;
        let repo = db.sales();

        let mut ids = Vec::new();
        for n in 1..=5 {
            ids.push(repo.insert(NewSale::new("Bread", n, 55.0 * n as f64)).await.unwrap());
        }

        let sales = repo.fetch_all().await.unwrap();
        assert_eq!(sales.len(), 5);

        ids.reverse();
        let fetched: Vec<i64> = sales.iter().map(|sale| sale.id).collect();
        assert_eq!(fetched, ids);
        assert!(sales.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}
