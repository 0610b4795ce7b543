//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type that bounds payroll
//! aggregation, and its one-way [`PayPeriodStatus`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollReport;

/// Whether a pay period still accepts changes to its totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPeriodStatus {
    /// Totals are computed live from the shift store.
    Open,
    /// Totals are frozen.
    Closed,
}

impl std::fmt::Display for PayPeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayPeriodStatus::Open => write!(f, "open"),
            PayPeriodStatus::Closed => write!(f, "closed"),
        }
    }
}

/// A bounded date range over which worked hours are aggregated into payroll.
///
/// # Example
///
/// ```
/// use roster_engine::models::{PayPeriod, PayPeriodStatus};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let period = PayPeriod {
///     id: Uuid::new_v4(),
///     name: "March 2026 (1)".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
///     status: PayPeriodStatus::Open,
///     closed_payroll: None,
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())); // start date
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())); // end date
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap())); // after
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Unique identifier for the period.
    pub id: Uuid,
    /// Display name, e.g. "March 2026 (1)".
    pub name: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Open or closed.
    pub status: PayPeriodStatus,
    /// The report frozen when the period was closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_payroll: Option<PayrollReport>,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks if this period shares at least one day with `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }
}
