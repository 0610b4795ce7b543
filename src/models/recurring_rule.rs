//! Recurring rule model.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A weekly template that expands into dated shifts.
///
/// `day_of_week` counts from Sunday: 0 is Sunday, 6 is Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRule {
    /// Unique identifier for the rule.
    pub id: Uuid,
    /// The employee every generated shift is assigned to.
    pub employee_id: String,
    /// Weekday to generate on, 0 (Sunday) through 6 (Saturday).
    pub day_of_week: u8,
    /// Start time of each generated shift.
    pub start_time: NaiveTime,
    /// End time of each generated shift.
    pub end_time: NaiveTime,
    /// Duration of each generated shift, derived from the time pair.
    pub hours: Decimal,
    /// First date the rule may generate on.
    pub start_date: NaiveDate,
    /// Last date the rule may generate on, inclusive.
    ///
    /// When absent the configured horizon applies.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Notes copied onto each generated shift.
    #[serde(default)]
    pub notes: String,
}

/// Converts a Sunday-based day number into a [`Weekday`].
///
/// Returns `None` for values above 6.
///
/// # Examples
///
/// ```
/// use roster_engine::models::weekday_from_sunday;
/// use chrono::Weekday;
///
/// assert_eq!(weekday_from_sunday(0), Some(Weekday::Sun));
/// assert_eq!(weekday_from_sunday(3), Some(Weekday::Wed));
/// assert_eq!(weekday_from_sunday(7), None);
/// ```
pub fn weekday_from_sunday(day: u8) -> Option<Weekday> {
    match day {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}
