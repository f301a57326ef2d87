//! # Report Aggregator
//!
//! Sums sales and expenses over a period window.
//!
//! ## How a Report Is Built
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  generate_report(Weekly)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  window = [now - 7d, now]  (bizpro_core::ReportPeriod)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    TOTAL(total_price) FROM sales    WHERE created_at IN window          │
//! │    TOTAL(amount)      FROM expenses WHERE created_at IN window          │
//! │  COMMIT                                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Report::from_totals(period, sales, expenses)                           │
//! │  (built only once both sums are in hand)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use bizpro_core::{Report, ReportPeriod};

/// Text layout SQLite uses for `created_at`.
const STORAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Formats a timestamp the way the ledger tables store it.
pub fn to_storage_timestamp(at: DateTime<Utc>) -> String {
    at.format(STORAGE_TIMESTAMP_FORMAT).to_string()
}

/// Computes period reports over the ledger.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    db: Database,
}

impl ReportAggregator {
    /// Creates a new ReportAggregator.
    pub fn new(db: Database) -> Self {
        ReportAggregator { db }
    }

    /// Generates the report for the window ending now.
    pub async fn generate_report(&self, period: ReportPeriod) -> DbResult<Report> {
        self.generate_report_at(period, Utc::now()).await
    }

    /// Generates the report for the window ending at `now`.
    pub async fn generate_report_at(
        &self,
        period: ReportPeriod,
        now: DateTime<Utc>,
    ) -> DbResult<Report> {
        let window = period.window_ending(now);
        let start = to_storage_timestamp(window.start);
        let end = to_storage_timestamp(window.end);

        // TOTAL() is 0.0 on an empty set, where SUM() would be NULL
        let (total_sales, total_expenses) = self
            .db
            .with_transaction(move |conn| {
                Box::pin(async move {
                    let sales: f64 = sqlx::query_scalar(
                        r#"
                        SELECT TOTAL(total_price) FROM sales
                        WHERE created_at >= ?1 AND created_at <= ?2
                        "#,
                    )
                    .bind(&start)
                    .bind(&end)
                    .fetch_one(&mut *conn)
                    .await?;

                    let expenses: f64 = sqlx::query_scalar(
                        r#"
                        SELECT TOTAL(amount) FROM expenses
                        WHERE created_at >= ?1 AND created_at <= ?2
                        "#,
                    )
                    .bind(&start)
                    .bind(&end)
                    .fetch_one(&mut *conn)
                    .await?;

                    Ok((sales, expenses))
                })
            })
            .await?;

        let report = Report::from_totals(period, total_sales, total_expenses);

        info!(
            period = %period,
            total_sales = report.total_sales,
            total_expenses = report.total_expenses,
            net_profit = report.net_profit,
            "Report generated"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{DbConfig, SqlParam};
    use bizpro_core::{NewExpense, NewSale};
    use chrono::{Duration, TimeZone};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    async fn sale_at(db: &Database, total: f64, at: DateTime<Utc>) {
        db.execute(
            "INSERT INTO sales (item_name, quantity, total_price, created_at) VALUES ('Item', 1, ?1, ?2)",
            &[SqlParam::Real(total), SqlParam::Text(to_storage_timestamp(at))],
        )
        .await
        .unwrap();
    }

    async fn expense_at(db: &Database, amount: f64, at: DateTime<Utc>) {
        db.execute(
            "INSERT INTO expenses (description, amount, created_at) VALUES ('Cost', ?1, ?2)",
            &[SqlParam::Real(amount), SqlParam::Text(to_storage_timestamp(at))],
        )
        .await
        .unwrap();
    }

    #[test]
    fn test_storage_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap() + Duration::milliseconds(67);
        assert_eq!(to_storage_timestamp(at), "2026-01-02 03:04:05.067");
    }

    #[tokio::test]
    async fn test_empty_ledger_reports_zero() {
        let db = test_db().await;

        let report = db.reports().generate_report(ReportPeriod::Daily).await.unwrap();

        assert_eq!(report, Report::empty(ReportPeriod::Daily));
    }

    #[tokio::test]
    async fn test_report_sums_recent_records() {
        let db = test_db().await;
        db.sales().insert(NewSale::new("Sugar", 1, 100.0)).await.unwrap();
        db.sales().insert(NewSale::new("Salt", 2, 50.0)).await.unwrap();
        db.expenses().insert(NewExpense::new("Transport", 30.0)).await.unwrap();

        for period in ReportPeriod::ALL {
            let report = db.reports().generate_report(period).await.unwrap();
            assert_eq!(report.period, period);
            assert_eq!(report.total_sales, 150.0);
            assert_eq!(report.total_expenses, 30.0);
            assert_eq!(report.net_profit, 120.0);
        }
    }

    #[tokio::test]
    async fn test_windows_exclude_older_records() {
        let db = test_db().await;
        let now = fixed_now();

        sale_at(&db, 10.0, now - Duration::hours(2)).await;
        sale_at(&db, 20.0, now - Duration::days(3)).await;
        sale_at(&db, 40.0, now - Duration::days(20)).await;
        sale_at(&db, 80.0, now - Duration::days(45)).await;
        expense_at(&db, 5.0, now - Duration::hours(30)).await;

        let reports = db.reports();
        let daily = reports.generate_report_at(ReportPeriod::Daily, now).await.unwrap();
        let weekly = reports.generate_report_at(ReportPeriod::Weekly, now).await.unwrap();
        let monthly = reports.generate_report_at(ReportPeriod::Monthly, now).await.unwrap();

        assert_eq!(daily.total_sales, 10.0);
        assert_eq!(daily.total_expenses, 0.0);
        assert_eq!(weekly.total_sales, 30.0);
        assert_eq!(weekly.total_expenses, 5.0);
        assert_eq!(monthly.total_sales, 70.0);
        assert_eq!(monthly.net_profit, 65.0);
    }

    #[tokio::test]
    async fn test_window_bounds_are_inclusive() {
        let db = test_db().await;
        let now = fixed_now();

        sale_at(&db, 1.0, now - Duration::days(1)).await;
        sale_at(&db, 2.0, now).await;
        // Written "after" the report instant
        sale_at(&db, 4.0, now + Duration::seconds(1)).await;

        let report = db
            .reports()
            .generate_report_at(ReportPeriod::Daily, now)
            .await
            .unwrap();
        assert_eq!(report.total_sales, 3.0);
    }

    #[tokio::test]
    async fn test_net_profit_can_be_negative() {
        let db = test_db().await;
        let now = fixed_now();

        sale_at(&db, 200.0, now - Duration::hours(1)).await;
        expense_at(&db, 1500.0, now - Duration::hours(1)).await;

        let report = db
            .reports()
            .generate_report_at(ReportPeriod::Weekly, now)
            .await
            .unwrap();
        assert_eq!(report.net_profit, -1300.0);
        assert!(report.is_loss());
    }

    #[tokio::test]
    async fn test_storage_failure_returns_error() {
        let db = test_db().await;
        db.close().await;

        let err = db
            .reports()
            .generate_report(ReportPeriod::Monthly)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::TransactionFailed(_)));
    }
}
