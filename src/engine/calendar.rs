//! Per-employee calendar combining shifts and time off.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Shift, TimeOffRequest, TimeOffStatus, TimeOffType};

use super::auth::Caller;
use super::shifts::ShiftService;
use super::time_off::TimeOffWorkflow;
use super::validate_range;

/// Longest span one calendar query may cover.
pub const MAX_CALENDAR_DAYS: i64 = 366;

/// Time off shown on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffMarker {
    /// The request occupying the day.
    pub request_id: Uuid,
    /// Vacation, sick or unpaid.
    pub request_type: TimeOffType,
    /// Approved days are blocked; pending days are only marked.
    pub status: TimeOffStatus,
    /// Partial-day hours, absent for full days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<Decimal>,
}

impl From<&TimeOffRequest> for TimeOffMarker {
    fn from(request: &TimeOffRequest) -> Self {
        Self {
            request_id: request.id,
            request_type: request.request_type,
            status: request.status,
            hours: request.hours,
        }
    }
}

/// One date on an employee's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// The date.
    pub date: NaiveDate,
    /// Every shift on the date in any state, ordered by start time.
    pub shifts: Vec<Shift>,
    /// Approved time off if any, otherwise pending time off if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_off: Option<TimeOffMarker>,
}

/// Reconciles shifts and time off into day-by-day views.
pub struct Calendar {
    shifts: Arc<ShiftService>,
    time_off: Arc<TimeOffWorkflow>,
}

impl Calendar {
    /// Creates a calendar over the given stores.
    pub fn new(shifts: Arc<ShiftService>, time_off: Arc<TimeOffWorkflow>) -> Self {
        Self { shifts, time_off }
    }

    /// One entry per date from `from` to `to` inclusive.
    ///
    /// Rejected requests occupy no dates. Where approved and pending
    /// requests overlap, the approved one is shown.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is the employee or an admin
    /// - `InvalidRange` if `to` precedes `from`
    /// - `Validation` if the span exceeds [`MAX_CALENDAR_DAYS`]
    pub fn days(&self, caller: &Caller, employee_id: &str, from: NaiveDate, to: NaiveDate) -> EngineResult<Vec<CalendarDay>> {
        caller.require_owner_or_admin(employee_id, "read calendars")?;
        validate_range(Some(from), Some(to))?;
        let span = (to - from).num_days() + 1;
        if span > MAX_CALENDAR_DAYS {
            return Err(EngineError::validation(
                "date range",
                format!("{} days requested, at most {} allowed", span, MAX_CALENDAR_DAYS),
            ));
        }

        let shifts = self.shifts.between(Some(employee_id), from, to);
        let mut requests = self.time_off.occupying(employee_id, from, to);
        requests.sort_by_key(|r| (r.status != TimeOffStatus::Approved, r.start_date));

        let days = (0..span)
            .map(|offset| {
                let date = from + Duration::days(offset);
                CalendarDay {
                    date,
                    shifts: shifts.iter().filter(|s| s.date == date).cloned().collect(),
                    time_off: requests
                        .iter()
                        .find(|r| r.covers(date))
                        .map(TimeOffMarker::from),
                }
            })
            .collect();
        Ok(days)
    }
}
