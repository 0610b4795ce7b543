//! Time-off request model and submission selections.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LeaveBucket;

/// The kind of leave a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffType {
    /// Paid vacation leave.
    Vacation,
    /// Paid sick leave.
    Sick,
    /// Leave without pay.
    Unpaid,
}

impl TimeOffType {
    /// Returns the leave bucket approval draws from, if any.
    pub fn bucket(self) -> Option<LeaveBucket> {
        match self {
            TimeOffType::Vacation => Some(LeaveBucket::Vacation),
            TimeOffType::Sick => Some(LeaveBucket::Sick),
            TimeOffType::Unpaid => None,
        }
    }
}

/// Where a request is in its approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffStatus {
    /// Submitted, waiting for an admin decision.
    Pending,
    /// Approved; the dates are blocked on the calendar.
    Approved,
    /// Rejected; the request occupies no dates.
    Rejected,
}

impl std::fmt::Display for TimeOffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeOffStatus::Pending => write!(f, "pending"),
            TimeOffStatus::Approved => write!(f, "approved"),
            TimeOffStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A request for leave over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The employee asking for leave.
    pub employee_id: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave, inclusive.
    pub end_date: NaiveDate,
    /// The kind of leave.
    pub request_type: TimeOffType,
    /// Partial-day hours; `None` means full days.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Current workflow status.
    pub status: TimeOffStatus,
    /// Why the employee is asking.
    #[serde(default)]
    pub reason: String,
    /// The admin who approved or rejected the request.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// Note recorded with the decision.
    #[serde(default)]
    pub decision_note: Option<String>,
}

impl TimeOffRequest {
    /// Returns true if `date` falls inside the request's inclusive range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days in the request's range.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_engine::models::{TimeOffRequest, TimeOffStatus, TimeOffType};
    /// use chrono::NaiveDate;
    /// use uuid::Uuid;
    ///
    /// let request = TimeOffRequest {
    ///     id: Uuid::new_v4(),
    ///     employee_id: "emp_001".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
    ///     request_type: TimeOffType::Vacation,
    ///     hours: None,
    ///     status: TimeOffStatus::Pending,
    ///     reason: "family trip".to_string(),
    ///     decided_by: None,
    ///     decision_note: None,
    /// };
    /// assert_eq!(request.day_count(), 3);
    /// ```
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// How much of a selected day is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPortion {
    /// The whole day.
    Full,
    /// Half the day.
    Half,
}

/// One calendar day picked by the employee when submitting time off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySelection {
    /// The selected date.
    pub date: NaiveDate,
    /// Full or half day.
    pub portion: DayPortion,
}
