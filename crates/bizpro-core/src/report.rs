//! # Report Periods
//!
//! Period windows and the derived financial `Report`.
//!
//! ## Fixed-Duration Windows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Windows look back a fixed duration from "now".                         │
//! │  They are NOT aligned to calendar days, ISO weeks, or months.           │
//! │                                                                         │
//! │  Daily    [now - 24h,  now]                                             │
//! │  Weekly   [now - 7d,   now]                                             │
//! │  Monthly  [now - 30d,  now]                                             │
//! │                                                                         │
//! │  ─────────|──────────────────────────────|────────► time                │
//! │         start                           now                             │
//! │           └── both bounds inclusive ─────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Report Period
// =============================================================================

/// The look-back period of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Last 24 hours.
    Daily,
    /// Last 7 days.
    Weekly,
    /// Last 30 days.
    Monthly,
}

impl ReportPeriod {
    /// All periods, in display order.
    pub const ALL: [ReportPeriod; 3] = [
        ReportPeriod::Daily,
        ReportPeriod::Weekly,
        ReportPeriod::Monthly,
    ];

    /// Length of the look-back window.
    pub fn lookback(&self) -> Duration {
        match self {
            ReportPeriod::Daily => Duration::days(1),
            ReportPeriod::Weekly => Duration::days(7),
            ReportPeriod::Monthly => Duration::days(30),
        }
    }

    /// Returns the window `[now - lookback, now]`.
    pub fn window_ending(&self, now: DateTime<Utc>) -> ReportWindow {
        ReportWindow {
            start: now - self.lookback(),
            end: now,
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(ReportPeriod::Daily),
            "weekly" | "week" => Ok(ReportPeriod::Weekly),
            "monthly" | "month" => Ok(ReportPeriod::Monthly),
            other => Err(ValidationError::InvalidFormat {
                field: "period".to_string(),
                reason: format!("unknown period '{}', expected daily, weekly or monthly", other),
            }),
        }
    }
}

// =============================================================================
// Report Window
// =============================================================================

/// An inclusive time range bounding which records a report sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// =============================================================================
// Report
// =============================================================================

/// Totals for one period. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: ReportPeriod,
    pub total_sales: f64,
    pub total_expenses: f64,
    /// `total_sales - total_expenses`; negative when the period ran at a loss.
    pub net_profit: f64,
}

impl Report {
    /// Builds a report from the two period sums.
    pub fn from_totals(period: ReportPeriod, total_sales: f64, total_expenses: f64) -> Self {
        Report {
            period,
            total_sales,
            total_expenses,
            net_profit: total_sales - total_expenses,
        }
    }

    /// A report with nothing recorded in the window.
    pub fn empty(period: ReportPeriod) -> Self {
        Report::from_totals(period, 0.0, 0.0)
    }

    /// Returns true if the period made a loss.
    pub fn is_loss(&self) -> bool {
        self.net_profit < 0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_period_lookback() {
        assert_eq!(ReportPeriod::Daily.lookback(), Duration::hours(24));
        assert_eq!(ReportPeriod::Weekly.lookback(), Duration::days(7));
        assert_eq!(ReportPeriod::Monthly.lookback(), Duration::days(30));
    }

    #[test]
    fn test_windows_are_not_calendar_aligned() {
        let window = ReportPeriod::Daily.window_ending(noon());
        // Yesterday noon, not today's midnight
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap());
        assert_eq!(window.end, noon());

        let window = ReportPeriod::Monthly.window_ending(noon());
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 9, 18, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("daily".parse::<ReportPeriod>().unwrap(), ReportPeriod::Daily);
        assert_eq!("Weekly".parse::<ReportPeriod>().unwrap(), ReportPeriod::Weekly);
        assert_eq!(" month ".parse::<ReportPeriod>().unwrap(), ReportPeriod::Monthly);
        assert!("yearly".parse::<ReportPeriod>().is_err());

        for period in ReportPeriod::ALL {
            assert_eq!(period.to_string().parse::<ReportPeriod>().unwrap(), period);
        }
    }

    #[test]
    fn test_report_net_profit() {
        let report = Report::from_totals(ReportPeriod::Weekly, 150.0, 30.0);
        assert_eq!(report.net_profit, 120.0);
        assert!(!report.is_loss());

        let report = Report::from_totals(ReportPeriod::Daily, 10.0, 25.0);
        assert_eq!(report.net_profit, -15.0);
        assert!(report.is_loss());
    }

    #[test]
    fn test_empty_report() {
        let report = Report::empty(ReportPeriod::Daily);
        assert_eq!(report.total_sales, 0.0);
        assert_eq!(report.total_expenses, 0.0);
        assert_eq!(report.net_profit, 0.0);
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report::from_totals(ReportPeriod::Monthly, 150.0, 30.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["period"], "monthly");
        assert_eq!(json["totalSales"], 150.0);
        assert_eq!(json["totalExpenses"], 30.0);
        assert_eq!(json["netProfit"], 120.0);
    }
}
