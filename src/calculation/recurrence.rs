//! Recurring shift expansion.
//!
//! This module expands a weekly [`RecurringRule`] into concrete dated
//! shifts. Expansion is deterministic in its dates; every call mints new
//! shift identities.

use chrono::{Datelike, Days, Months, NaiveDate};
use uuid::Uuid;

use crate::config::RecurrenceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{RecurringRule, Shift, ShiftStatus, weekday_from_sunday};

use super::calculate_shift_hours;

/// Resolves the last date a rule may generate on.
///
/// An explicit `end_date` wins; otherwise the rule runs for
/// `limits.horizon_months` after `start_date`. Either way the end may lie
/// at most `limits.max_span_months` after the start.
///
/// # Returns
///
/// The inclusive end date, or:
/// - `InvalidRange` if an explicit end date precedes the start date
/// - `Validation` if the horizon overflows the calendar or the span exceeds
///   `max_span_months`
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::resolve_end_date;
/// use roster_engine::config::RecurrenceConfig;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
/// let end = resolve_end_date(start, None, &RecurrenceConfig::default()).unwrap();
/// assert_eq!(end, NaiveDate::from_ymd_opt(2026, 4, 30).unwrap());
/// ```
pub fn resolve_end_date(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    limits: &RecurrenceConfig,
) -> EngineResult<NaiveDate> {
    let end = match end_date {
        Some(end) if end < start_date => {
            return Err(EngineError::InvalidRange {
                start: start_date,
                end,
            });
        }
        Some(end) => end,
        None => start_date
            .checked_add_months(Months::new(limits.horizon_months))
            .ok_or_else(|| {
                EngineError::validation(
                    "end_date",
                    format!(
                        "could not resolve an end date {} months after {}",
                        limits.horizon_months, start_date
                    ),
                )
            })?,
    };

    // Past the last representable date every end is within the cap
    let cap = start_date.checked_add_months(Months::new(limits.max_span_months));
    if cap.is_some_and(|cap| end > cap) {
        return Err(EngineError::validation(
            "end_date",
            format!(
                "{} is more than {} months after {}",
                end, limits.max_span_months, start_date
            ),
        ));
    }
    Ok(end)
}

/// Lists every date the rule generates on, in ascending order.
///
/// The first date is the earliest date on or after `start_date` that falls
/// on the rule's weekday; subsequent dates follow at seven-day intervals up
/// to and including the resolved end date, stopping early at the last
/// representable date.
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::occurrence_dates;
/// use roster_engine::config::RecurrenceConfig;
/// use chrono::NaiveDate;
///
/// // 2026-03-02 is a Monday; day 3 is Wednesday.
/// let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
/// let dates = occurrence_dates(3, start, Some(end), &RecurrenceConfig::default()).unwrap();
///
/// assert_eq!(dates, vec![
///     NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 18).unwrap(),
/// ]);
/// ```
pub fn occurrence_dates(
    day_of_week: u8,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    limits: &RecurrenceConfig,
) -> EngineResult<Vec<NaiveDate>> {
    let weekday = weekday_from_sunday(day_of_week).ok_or_else(|| {
        EngineError::validation(
            "day_of_week",
            format!("{} is not a weekday number between 0 and 6", day_of_week),
        )
    })?;
    let last = resolve_end_date(start_date, end_date, limits)?;

    let offset = (weekday.num_days_from_sunday() + 7
        - start_date.weekday().num_days_from_sunday())
        % 7;
    let Some(first) = start_date.checked_add_days(Days::new(u64::from(offset))) else {
        // The rule's weekday never occurs before the calendar ends
        return Ok(Vec::new());
    };

    let mut dates = Vec::new();
    let mut next = Some(first);
    while let Some(current) = next.filter(|d| *d <= last) {
        dates.push(current);
        next = current.checked_add_days(Days::new(7));
    }

    Ok(dates)
}

/// Expands a rule into pending shifts, one per occurrence date.
///
/// Each shift inherits the rule's employee, times and notes, carries a
/// back-reference to the rule, and has its hours recomputed from the
/// time pair rather than copied from the rule.
///
/// # Errors
///
/// - `Validation` for a weekday above 6 or an end time not after the start time
/// - `Validation` for a rule spanning more than `limits.max_span_months`
/// - `InvalidRange` if the rule's end date precedes its start date
pub fn expand_recurring_rule(rule: &RecurringRule, limits: &RecurrenceConfig) -> EngineResult<Vec<Shift>> {
    let hours = calculate_shift_hours(rule.start_time, rule.end_time)?;
    let dates = occurrence_dates(rule.day_of_week, rule.start_date, rule.end_date, limits)?;

    Ok(dates
        .into_iter()
        .map(|date| Shift {
            id: Uuid::new_v4(),
            employee_id: rule.employee_id.clone(),
            date,
            start_time: rule.start_time,
            end_time: rule.end_time,
            hours,
            status: ShiftStatus::Pending,
            decline_type: None,
            decline_reason: None,
            was_previously_accepted: false,
            notes: rule.notes.clone(),
            recurring_rule_id: Some(rule.id),
        })
        .collect())
}
