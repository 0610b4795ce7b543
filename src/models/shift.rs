//! Shift model and related types.
//!
//! This module defines the Shift record together with its status and
//! decline classification.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LeaveBucket;

/// Where a shift is in its acceptance workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Assigned, waiting for the employee to respond.
    Pending,
    /// Confirmed by the employee.
    Accepted,
    /// Not going to be worked.
    Declined,
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftStatus::Pending => write!(f, "pending"),
            ShiftStatus::Accepted => write!(f, "accepted"),
            ShiftStatus::Declined => write!(f, "declined"),
        }
    }
}

/// The leave category charged when a shift is declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclineType {
    /// No balance is charged.
    Unpaid,
    /// Charged against sick hours.
    SickDay,
    /// Charged against vacation hours.
    VacationDay,
}

impl DeclineType {
    /// Returns the leave bucket this decline draws from, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_engine::models::{DeclineType, LeaveBucket};
    ///
    /// assert_eq!(DeclineType::SickDay.bucket(), Some(LeaveBucket::Sick));
    /// assert_eq!(DeclineType::Unpaid.bucket(), None);
    /// ```
    pub fn bucket(self) -> Option<LeaveBucket> {
        match self {
            DeclineType::Unpaid => None,
            DeclineType::SickDay => Some(LeaveBucket::Sick),
            DeclineType::VacationDay => Some(LeaveBucket::Vacation),
        }
    }
}

/// A single dated work assignment for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: Uuid,
    /// The employee the shift is assigned to.
    pub employee_id: String,
    /// The calendar date of the shift.
    pub date: NaiveDate,
    /// Start of the shift.
    pub start_time: NaiveTime,
    /// End of the shift, always after `start_time`.
    pub end_time: NaiveTime,
    /// Duration in hours, derived from the time pair to two decimal places.
    pub hours: Decimal,
    /// Current workflow status.
    pub status: ShiftStatus,
    /// Set only when the shift is declined.
    #[serde(default)]
    pub decline_type: Option<DeclineType>,
    /// Set only when the shift is declined.
    #[serde(default)]
    pub decline_reason: Option<String>,
    /// True when the shift was accepted before it was declined.
    #[serde(default)]
    pub was_previously_accepted: bool,
    /// Free-form notes copied from the assignment or rule.
    #[serde(default)]
    pub notes: String,
    /// The recurring rule that generated this shift, if any.
    #[serde(default)]
    pub recurring_rule_id: Option<Uuid>,
}

impl Shift {
    /// Returns true if the shift still occupies its time slot.
    ///
    /// Declined shifts free the slot; pending and accepted shifts hold it.
    pub fn is_active(&self) -> bool {
        self.status != ShiftStatus::Declined
    }
}
