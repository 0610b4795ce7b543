//! Shift conflict detection.
//!
//! Two time ranges conflict under half-open semantics: a shift ending at
//! 12:00 and another starting at 12:00 do not overlap. Declined shifts free
//! their slot and never conflict; approved time off blocks the whole day.
//!
//! Detection is advisory. A [`Conflict`] is a value handed back to the
//! caller, never an error.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Shift, TimeOffRequest, TimeOffStatus};

/// A proposed time slot for one employee on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSlot {
    /// The employee the slot would be assigned to.
    pub employee_id: String,
    /// The date of the slot.
    pub date: NaiveDate,
    /// Start of the slot.
    pub start_time: NaiveTime,
    /// End of the slot.
    pub end_time: NaiveTime,
}

/// Something already on the calendar that a proposed slot collides with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// An overlapping pending or accepted shift.
    Shift(Shift),
    /// An approved time-off request covering the date.
    TimeOff(TimeOffRequest),
}

/// Returns true if `[a_start, a_end)` and `[b_start, b_end)` overlap.
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::ranges_overlap;
/// use chrono::NaiveTime;
///
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
///
/// assert!(!ranges_overlap(t(9), t(12), t(12), t(15))); // touching
/// assert!(ranges_overlap(t(9), t(12), t(11), t(13)));
/// ```
pub fn ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Finds the first existing shift that conflicts with `slot`.
///
/// Only shifts for the same employee on the same date are considered, and
/// declined shifts are skipped. `ignore` excludes one shift by id, so a
/// shift being edited does not conflict with itself.
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::{find_conflicting_shift, ShiftSlot};
/// use roster_engine::models::{Shift, ShiftStatus};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
/// let existing = Shift {
///     id: Uuid::new_v4(),
///     employee_id: "emp_001".to_string(),
///     date,
///     start_time: t(9),
///     end_time: t(12),
///     hours: Decimal::new(3, 0),
///     status: ShiftStatus::Accepted,
///     decline_type: None,
///     decline_reason: None,
///     was_previously_accepted: false,
///     notes: String::new(),
///     recurring_rule_id: None,
/// };
///
/// let slot = ShiftSlot {
///     employee_id: "emp_001".to_string(),
///     date,
///     start_time: t(11),
///     end_time: t(13),
/// };
/// let conflict = find_conflicting_shift(&slot, [&existing], None);
/// assert_eq!(conflict.map(|s| s.id), Some(existing.id));
/// ```
pub fn find_conflicting_shift<'a, I>(slot: &ShiftSlot, existing: I, ignore: Option<Uuid>) -> Option<&'a Shift>
where
    I: IntoIterator<Item = &'a Shift>,
{
    existing.into_iter().find(|shift| {
        Some(shift.id) != ignore
            && shift.is_active()
            && shift.employee_id == slot.employee_id
            && shift.date == slot.date
            && ranges_overlap(slot.start_time, slot.end_time, shift.start_time, shift.end_time)
    })
}

/// Finds an approved time-off request for the slot's employee covering its date.
///
/// Pending requests are shown on the calendar but do not block assignment;
/// rejected requests occupy no dates.
pub fn find_blocking_time_off<'a, I>(slot: &ShiftSlot, requests: I) -> Option<&'a TimeOffRequest>
where
    I: IntoIterator<Item = &'a TimeOffRequest>,
{
    requests.into_iter().find(|request| {
        request.status == TimeOffStatus::Approved
            && request.employee_id == slot.employee_id
            && request.covers(slot.date)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ShiftStatus, TimeOffType};
    use rust_decimal::Decimal;

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_shift(employee: &str, day: &str, start: &str, end: &str, status: ShiftStatus) -> Shift {
        Shift {
            id: Uuid::new_v4(),
            employee_id: employee.to_string(),
            date: date(day),
            start_time: time(start),
            end_time: time(end),
            hours: Decimal::ZERO,
            status,
            decline_type: None,
            decline_reason: None,
            was_previously_accepted: false,
            notes: String::new(),
            recurring_rule_id: None,
        }
    }

    fn slot(employee: &str, day: &str, start: &str, end: &str) -> ShiftSlot {
        ShiftSlot {
            employee_id: employee.to_string(),
            date: date(day),
            start_time: time(start),
            end_time: time(end),
        }
    }

    fn make_time_off(status: TimeOffStatus) -> TimeOffRequest {
        TimeOffRequest {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            start_date: date("2026-03-02"),
            end_date: date("2026-03-04"),
            request_type: TimeOffType::Vacation,
            hours: None,
            status,
            reason: "trip".to_string(),
            decided_by: None,
            decision_note: None,
        }
    }

    // ==========================================================================
    // CD-001: touching endpoints do not conflict
    // ==========================================================================
    #[test]
    fn test_cd_001_touching_endpoints_do_not_conflict() {
        let a = make_shift("emp_001", "2026-03-02", "09:00", "12:00", ShiftStatus::Accepted);
        let b = slot("emp_001", "2026-03-02", "12:00", "15:00");
        assert!(find_conflicting_shift(&b, [&a], None).is_none());

        let before = slot("emp_001", "2026-03-02", "06:00", "09:00");
        assert!(find_conflicting_shift(&before, [&a], None).is_none());
    }

    // ==========================================================================
    // CD-002: partial overlap conflicts
    // ==========================================================================
    #[test]
    fn test_cd_002_partial_overlap_conflicts() {
        let a = make_shift("emp_001", "2026-03-02", "09:00", "12:00", ShiftStatus::Accepted);
        let c = slot("emp_001", "2026-03-02", "11:00", "13:00");
        assert_eq!(find_conflicting_shift(&c, [&a], None).map(|s| s.id), Some(a.id));
    }

    #[test]
    fn test_cd_003_containment_conflicts_both_ways() {
        let outer = make_shift("emp_001", "2026-03-02", "08:00", "18:00", ShiftStatus::Pending);
        let inner = slot("emp_001", "2026-03-02", "10:00", "11:00");
        assert!(find_conflicting_shift(&inner, [&outer], None).is_some());

        let small = make_shift("emp_001", "2026-03-02", "10:00", "11:00", ShiftStatus::Pending);
        let wide = slot("emp_001", "2026-03-02", "08:00", "18:00");
        assert!(find_conflicting_shift(&wide, [&small], None).is_some());
    }

    // ==========================================================================
    // CD-004: declined, other employees and other dates never conflict
    // ==========================================================================
    #[test]
    fn test_cd_004_declined_shift_is_ignored() {
        let declined = make_shift("emp_001", "2026-03-02", "09:00", "12:00", ShiftStatus::Declined);
        let candidate = slot("emp_001", "2026-03-02", "09:00", "12:00");
        assert!(find_conflicting_shift(&candidate, [&declined], None).is_none());
    }

    #[test]
    fn test_cd_005_other_employee_or_date_is_ignored() {
        let other_employee = make_shift("emp_002", "2026-03-02", "09:00", "12:00", ShiftStatus::Accepted);
        let other_date = make_shift("emp_001", "2026-03-03", "09:00", "12:00", ShiftStatus::Accepted);
        let candidate = slot("emp_001", "2026-03-02", "09:00", "12:00");
        assert!(find_conflicting_shift(&candidate, [&other_employee, &other_date], None).is_none());
    }

    #[test]
    fn test_cd_006_returns_first_conflict_in_order() {
        let first = make_shift("emp_001", "2026-03-02", "09:00", "11:00", ShiftStatus::Pending);
        let second = make_shift("emp_001", "2026-03-02", "10:00", "12:00", ShiftStatus::Accepted);
        let candidate = slot("emp_001", "2026-03-02", "10:30", "10:45");
        assert_eq!(
            find_conflicting_shift(&candidate, [&first, &second], None).map(|s| s.id),
            Some(first.id)
        );
    }

    #[test]
    fn test_cd_007_ignored_shift_does_not_conflict_with_itself() {
        let shift = make_shift("emp_001", "2026-03-02", "09:00", "12:00", ShiftStatus::Pending);
        let candidate = slot("emp_001", "2026-03-02", "10:00", "13:00");
        assert!(find_conflicting_shift(&candidate, [&shift], Some(shift.id)).is_none());
    }

    // ==========================================================================
    // CD-008: time off
    // ==========================================================================
    #[test]
    fn test_cd_008_only_approved_time_off_blocks() {
        let candidate = slot("emp_001", "2026-03-03", "09:00", "12:00");

        let approved = make_time_off(TimeOffStatus::Approved);
        assert!(find_blocking_time_off(&candidate, [&approved]).is_some());

        let pending = make_time_off(TimeOffStatus::Pending);
        let rejected = make_time_off(TimeOffStatus::Rejected);
        assert!(find_blocking_time_off(&candidate, [&pending, &rejected]).is_none());
    }

    #[test]
    fn test_cd_009_time_off_outside_date_does_not_block() {
        let candidate = slot("emp_001", "2026-03-05", "09:00", "12:00");
        let approved = make_time_off(TimeOffStatus::Approved);
        assert!(find_blocking_time_off(&candidate, [&approved]).is_none());
    }

    #[test]
    fn test_conflict_serializes_with_kind_tag() {
        let shift = make_shift("emp_001", "2026-03-02", "09:00", "12:00", ShiftStatus::Pending);
        let json = serde_json::to_value(Conflict::Shift(shift)).unwrap();
        assert_eq!(json["kind"], "shift");
        assert_eq!(json["employee_id"], "emp_001");
    }
}
