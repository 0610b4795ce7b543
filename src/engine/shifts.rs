//! Shift lifecycle.
//!
//! A shift starts PENDING when assigned or generated and moves to ACCEPTED
//! or DECLINED. An accepted shift may still be declined ("cancel after
//! accept"). Declining as a sick or vacation day charges the shift's hours
//! to the ledger while the shift's own lock is held, so two concurrent
//! declines of one shift cannot both succeed.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{Conflict, ShiftSlot, calculate_shift_hours, find_conflicting_shift};
use crate::error::{EngineError, EngineResult};
use crate::models::{DeclineType, Shift, ShiftStatus};

use super::auth::Caller;
use super::directory::EmployeeDirectory;
use super::ledger::LeaveLedger;
use super::store::{Record, Store, lock};
use super::time_off::TimeOffWorkflow;
use super::validate_range;

/// A shift to be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShift {
    /// The employee being rostered.
    pub employee_id: String,
    /// The day of the shift.
    pub date: NaiveDate,
    /// Start time.
    pub start_time: NaiveTime,
    /// End time, after the start time on the same day.
    pub end_time: NaiveTime,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl NewShift {
    /// The slot this shift would occupy.
    pub fn slot(&self) -> ShiftSlot {
        ShiftSlot {
            employee_id: self.employee_id.clone(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Replacement times for a pending shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftUpdate {
    /// New date.
    pub date: NaiveDate,
    /// New start time.
    pub start_time: NaiveTime,
    /// New end time.
    pub end_time: NaiveTime,
    /// New notes; unchanged when absent.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Criteria for listing shifts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftFilter {
    /// Only this employee's shifts.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only shifts on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only shifts on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Only shifts in this state.
    #[serde(default)]
    pub status: Option<ShiftStatus>,
}

/// Owns shifts and drives their state machine.
pub struct ShiftService {
    shifts: Store<Uuid, Shift>,
    directory: Arc<dyn EmployeeDirectory>,
    ledger: Arc<LeaveLedger>,
    time_off: Arc<TimeOffWorkflow>,
}

impl ShiftService {
    /// Creates an empty shift store.
    pub fn new(
        directory: Arc<dyn EmployeeDirectory>,
        ledger: Arc<LeaveLedger>,
        time_off: Arc<TimeOffWorkflow>,
    ) -> Self {
        Self {
            shifts: Store::new(),
            directory,
            ledger,
            time_off,
        }
    }

    /// Reports what a proposed slot collides with.
    ///
    /// The result holds the first overlapping pending or accepted shift (by
    /// start time) and any approved time off covering the date. An empty
    /// result means the slot is free. `ignore` excludes one shift, so an
    /// edited shift does not collide with itself.
    pub fn check_conflicts(&self, slot: &ShiftSlot, ignore: Option<Uuid>) -> Vec<Conflict> {
        let mut existing = self
            .shifts
            .snapshot(|s| s.employee_id == slot.employee_id && s.date == slot.date);
        existing.sort_by_key(|s| (s.start_time, s.end_time));
        self.conflicts_against(slot, &existing, ignore)
    }

    /// Assigns a new pending shift.
    ///
    /// Conflicts are not checked here; callers consult
    /// [`ShiftService::check_conflicts`] first and decide.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is an admin
    /// - `NotFound` if the employee is not in the directory
    /// - `Validation` if the end time is not after the start time
    pub fn assign(&self, caller: &Caller, new_shift: NewShift) -> EngineResult<Shift> {
        caller.require_admin("assign shifts")?;
        self.directory.require(&new_shift.employee_id)?;
        let hours = calculate_shift_hours(new_shift.start_time, new_shift.end_time)?;

        let shift = Shift {
            id: Uuid::new_v4(),
            employee_id: new_shift.employee_id,
            date: new_shift.date,
            start_time: new_shift.start_time,
            end_time: new_shift.end_time,
            hours,
            status: ShiftStatus::Pending,
            decline_type: None,
            decline_reason: None,
            was_previously_accepted: false,
            notes: new_shift.notes,
            recurring_rule_id: None,
        };
        self.shifts.insert(shift.id, shift.clone());

        info!(
            shift_id = %shift.id,
            employee_id = %shift.employee_id,
            date = %shift.date,
            hours = %shift.hours,
            assigned_by = %caller.employee_id,
            "Assigned shift"
        );
        Ok(shift)
    }

    /// Accepts a pending shift on behalf of its employee.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is the rostered employee
    /// - `InvalidState` unless the shift is pending
    pub fn accept(&self, caller: &Caller, shift_id: Uuid) -> EngineResult<Shift> {
        let record = self.record(shift_id)?;
        let mut shift = lock(&record);
        caller.require_owner(&shift.employee_id, "accept shifts")?;
        if shift.status != ShiftStatus::Pending {
            return Err(invalid_state(&shift, "accept"));
        }

        shift.status = ShiftStatus::Accepted;
        info!(shift_id = %shift_id, employee_id = %shift.employee_id, "Accepted shift");
        Ok(shift.clone())
    }

    /// Declines a pending or accepted shift.
    ///
    /// `SickDay` and `VacationDay` charge the shift's hours to the matching
    /// leave bucket; `Unpaid` leaves balances alone. Declining an accepted
    /// shift marks it `was_previously_accepted`.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is the rostered employee or an admin
    /// - `InvalidState` if the shift is already declined
    /// - `Validation` if `reason` is blank
    /// - `InsufficientBalance` if the ledger refuses the charge; the shift
    ///   is then left unchanged
    pub fn decline(
        &self,
        caller: &Caller,
        shift_id: Uuid,
        decline_type: DeclineType,
        reason: &str,
    ) -> EngineResult<Shift> {
        let record = self.record(shift_id)?;
        let mut shift = lock(&record);
        caller.require_owner_or_admin(&shift.employee_id, "decline shifts")?;
        if shift.status == ShiftStatus::Declined {
            return Err(invalid_state(&shift, "decline"));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::validation(
                "decline_reason",
                "a reason is required to decline a shift",
            ));
        }

        if let Some(bucket) = decline_type.bucket() {
            self.ledger.debit(&shift.employee_id, bucket, shift.hours)?;
        }

        shift.was_previously_accepted = shift.status == ShiftStatus::Accepted;
        shift.status = ShiftStatus::Declined;
        shift.decline_type = Some(decline_type);
        shift.decline_reason = Some(reason.to_string());
        info!(
            shift_id = %shift_id,
            employee_id = %shift.employee_id,
            decline_type = ?decline_type,
            after_accept = shift.was_previously_accepted,
            declined_by = %caller.employee_id,
            "Declined shift"
        );
        Ok(shift.clone())
    }

    /// Reads one shift visible to the caller.
    pub fn get(&self, caller: &Caller, shift_id: Uuid) -> EngineResult<Shift> {
        let record = self.record(shift_id)?;
        let shift = lock(&record).clone();
        caller.require_owner_or_admin(&shift.employee_id, "read shifts")?;
        Ok(shift)
    }

    /// Lists shifts matching `filter`, ordered by date and start time.
    ///
    /// Employees only ever see their own shifts.
    pub fn list(&self, caller: &Caller, filter: &ShiftFilter) -> EngineResult<Vec<Shift>> {
        let employee_id = caller.visible_employee(filter.employee_id.as_deref(), "list shifts")?;
        validate_range(filter.from, filter.to)?;

        let mut shifts = self.shifts.snapshot(|s| {
            employee_id.as_deref().is_none_or(|id| s.employee_id == id)
                && filter.from.is_none_or(|from| s.date >= from)
                && filter.to.is_none_or(|to| s.date <= to)
                && filter.status.is_none_or(|status| s.status == status)
        });
        sort_shifts(&mut shifts);
        Ok(shifts)
    }

    /// Moves or retimes a pending shift, recomputing its hours.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is an admin
    /// - `InvalidState` unless the shift is pending
    /// - `Validation` if the end time is not after the start time
    pub fn update(&self, caller: &Caller, shift_id: Uuid, update: ShiftUpdate) -> EngineResult<Shift> {
        caller.require_admin("edit shifts")?;
        let record = self.record(shift_id)?;
        let mut shift = lock(&record);
        if shift.status != ShiftStatus::Pending {
            return Err(invalid_state(&shift, "edit"));
        }
        let hours = calculate_shift_hours(update.start_time, update.end_time)?;

        shift.date = update.date;
        shift.start_time = update.start_time;
        shift.end_time = update.end_time;
        shift.hours = hours;
        if let Some(notes) = update.notes {
            shift.notes = notes;
        }
        info!(shift_id = %shift_id, date = %shift.date, hours = %hours, "Updated shift");
        Ok(shift.clone())
    }

    /// Deletes a pending or declined shift. Accepted shifts must be
    /// declined instead.
    pub fn delete(&self, caller: &Caller, shift_id: Uuid) -> EngineResult<Shift> {
        caller.require_admin("delete shifts")?;
        let removed = self
            .shifts
            .remove_if(&shift_id, |shift| {
                if shift.status == ShiftStatus::Accepted {
                    Err(invalid_state(shift, "delete"))
                } else {
                    Ok(())
                }
            })
            .ok_or_else(|| EngineError::not_found("shift", shift_id))??;

        info!(shift_id = %shift_id, employee_id = %removed.employee_id, "Deleted shift");
        Ok(removed)
    }

    /// Stores generated shifts in one batch, reporting what each collides
    /// with at insertion time.
    ///
    /// The store's write lock is held across the conflict scan and every
    /// insert, so no other assignment interleaves with the batch.
    pub(crate) fn insert_batch(&self, batch: &[Shift]) -> Vec<Conflict> {
        let keys = batch_keys(batch);
        let mut records = self.shifts.write();

        let mut existing: Vec<Shift> = records
            .values()
            .filter_map(|record| {
                let shift = lock(record);
                keys.contains(&(shift.employee_id.as_str(), shift.date))
                    .then(|| shift.clone())
            })
            .collect();
        existing.sort_by_key(|s| (s.date, s.start_time, s.end_time));

        let mut conflicts = Vec::new();
        for shift in batch {
            conflicts.extend(self.conflicts_against(&slot_of(shift), &existing, None));
            records.insert(shift.id, Arc::new(Mutex::new(shift.clone())));
        }
        conflicts
    }

    /// Reports what each shift in `batch` would collide with, without
    /// storing anything.
    ///
    /// The store is read once for every employee and date in the batch.
    pub(crate) fn check_batch_conflicts(&self, batch: &[Shift]) -> Vec<Conflict> {
        let keys = batch_keys(batch);
        let mut existing = self
            .shifts
            .snapshot(|s| keys.contains(&(s.employee_id.as_str(), s.date)));
        existing.sort_by_key(|s| (s.date, s.start_time, s.end_time));

        batch
            .iter()
            .flat_map(|shift| self.conflicts_against(&slot_of(shift), &existing, None))
            .collect()
    }

    /// Every shift dated between `from` and `to` inclusive, in any state.
    pub(crate) fn between(&self, employee_id: Option<&str>, from: NaiveDate, to: NaiveDate) -> Vec<Shift> {
        let mut shifts = self.shifts.snapshot(|s| {
            employee_id.is_none_or(|id| s.employee_id == id) && s.date >= from && s.date <= to
        });
        sort_shifts(&mut shifts);
        shifts
    }

    fn conflicts_against(&self, slot: &ShiftSlot, existing: &[Shift], ignore: Option<Uuid>) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        if let Some(shift) = find_conflicting_shift(slot, existing, ignore) {
            conflicts.push(Conflict::Shift(shift.clone()));
        }
        if let Some(request) = self.time_off.approved_blocking(slot) {
            conflicts.push(Conflict::TimeOff(request));
        }
        conflicts
    }

    fn record(&self, shift_id: Uuid) -> EngineResult<Record<Shift>> {
        self.shifts
            .get(&shift_id)
            .ok_or_else(|| EngineError::not_found("shift", shift_id))
    }
}

fn slot_of(shift: &Shift) -> ShiftSlot {
    ShiftSlot {
        employee_id: shift.employee_id.clone(),
        date: shift.date,
        start_time: shift.start_time,
        end_time: shift.end_time,
    }
}

fn batch_keys(batch: &[Shift]) -> HashSet<(&str, NaiveDate)> {
    batch.iter().map(|s| (s.employee_id.as_str(), s.date)).collect()
}

fn sort_shifts(shifts: &mut [Shift]) {
    shifts.sort_by(|a, b| {
        (a.date, a.start_time, &a.employee_id, a.id).cmp(&(b.date, b.start_time, &b.employee_id, b.id))
    });
}

fn invalid_state(shift: &Shift, action: &str) -> EngineError {
    EngineError::InvalidState {
        entity: "shift".to_string(),
        id: shift.id.to_string(),
        state: shift.status.to_string(),
        action: action.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NegativeBalancePolicy;
    use crate::engine::testing::{date, dec, directory_with_staff, time};
    use crate::engine::time_off::TimeOffSubmission;
    use crate::models::{DayPortion, DaySelection, TimeOffType};

    struct Fixture {
        shifts: ShiftService,
        ledger: Arc<LeaveLedger>,
        time_off: Arc<TimeOffWorkflow>,
    }

    fn fixture(policy: NegativeBalancePolicy) -> Fixture {
        let directory = directory_with_staff();
        let ledger = Arc::new(LeaveLedger::new(policy));
        for employee in directory.list() {
            ledger.provision(&employee, dec("8")).unwrap();
        }
        let time_off = Arc::new(TimeOffWorkflow::new(
            Arc::clone(&directory),
            Arc::clone(&ledger),
            dec("8"),
        ));
        let shifts = ShiftService::new(directory, Arc::clone(&ledger), Arc::clone(&time_off));
        Fixture {
            shifts,
            ledger,
            time_off,
        }
    }

    fn admin() -> Caller {
        Caller::admin("adm_001")
    }

    fn owner() -> Caller {
        Caller::employee("emp_001")
    }

    fn new_shift(day: &str, start: &str, end: &str) -> NewShift {
        NewShift {
            employee_id: "emp_001".to_string(),
            date: date(day),
            start_time: time(start),
            end_time: time(end),
            notes: "Babies room".to_string(),
        }
    }

    // ==========================================================================
    // SL-001: assignment
    // ==========================================================================
    #[test]
    fn test_sl_001_assign_creates_pending_with_derived_hours() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f
            .shifts
            .assign(&admin(), new_shift("2026-03-02", "07:00", "11:20"))
            .unwrap();

        assert_eq!(shift.status, ShiftStatus::Pending);
        assert_eq!(shift.hours, dec("4.33"));
        assert_eq!(f.shifts.get(&admin(), shift.id).unwrap(), shift);
    }

    #[test]
    fn test_sl_002_assign_rejects_inverted_times() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let result = f.shifts.assign(&admin(), new_shift("2026-03-02", "17:00", "09:00"));
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_sl_003_assign_unknown_employee_is_not_found() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let mut shift = new_shift("2026-03-02", "09:00", "17:00");
        shift.employee_id = "ghost".to_string();
        assert!(matches!(
            f.shifts.assign(&admin(), shift),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_sl_004_employee_cannot_assign() {
        let f = fixture(NegativeBalancePolicy::Allow);
        assert!(matches!(
            f.shifts.assign(&owner(), new_shift("2026-03-02", "09:00", "17:00")),
            Err(EngineError::Forbidden { .. })
        ));
    }

    // ==========================================================================
    // SL-005: accept
    // ==========================================================================
    #[test]
    fn test_sl_005_accept_pending() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();

        let accepted = f.shifts.accept(&owner(), shift.id).unwrap();
        assert_eq!(accepted.status, ShiftStatus::Accepted);

        assert!(matches!(
            f.shifts.accept(&owner(), shift.id),
            Err(EngineError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_sl_006_accept_declined_is_invalid_state() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();
        f.shifts.decline(&owner(), shift.id, DeclineType::Unpaid, "appointment").unwrap();

        match f.shifts.accept(&owner(), shift.id) {
            Err(EngineError::InvalidState { state, action, .. }) => {
                assert_eq!(state, "declined");
                assert_eq!(action, "accept");
            }
            other => panic!("Expected InvalidState, got {:?}", other),
        }
    }

    #[test]
    fn test_sl_007_only_owner_accepts() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();
        assert!(matches!(
            f.shifts.accept(&Caller::employee("emp_002"), shift.id),
            Err(EngineError::Forbidden { .. })
        ));
        assert!(matches!(
            f.shifts.accept(&admin(), shift.id),
            Err(EngineError::Forbidden { .. })
        ));
    }

    // ==========================================================================
    // SL-008: decline and the ledger
    // ==========================================================================
    #[test]
    fn test_sl_008_sick_decline_debits_shift_hours() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "13:00")).unwrap();

        let declined = f.shifts.decline(&owner(), shift.id, DeclineType::SickDay, "flu").unwrap();

        assert_eq!(declined.status, ShiftStatus::Declined);
        assert_eq!(declined.decline_type, Some(DeclineType::SickDay));
        assert_eq!(declined.decline_reason.as_deref(), Some("flu"));
        assert!(!declined.was_previously_accepted);
        assert_eq!(f.ledger.balance("emp_001").unwrap().sick_hours_remaining, dec("36"));
    }

    #[test]
    fn test_sl_009_unpaid_decline_leaves_balances() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let before = f.ledger.balance("emp_001").unwrap();
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "13:00")).unwrap();

        f.shifts.decline(&owner(), shift.id, DeclineType::Unpaid, "errand").unwrap();
        assert_eq!(f.ledger.balance("emp_001").unwrap(), before);
    }

    #[test]
    fn test_sl_010_vacation_decline_after_accept() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();
        f.shifts.accept(&owner(), shift.id).unwrap();

        let declined = f
            .shifts
            .decline(&admin(), shift.id, DeclineType::VacationDay, "family visit")
            .unwrap();

        assert!(declined.was_previously_accepted);
        assert_eq!(f.ledger.balance("emp_001").unwrap().vacation_hours_remaining, dec("72"));
    }

    #[test]
    fn test_sl_011_blank_reason_is_validation_error() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();

        for reason in ["", "   "] {
            assert!(matches!(
                f.shifts.decline(&owner(), shift.id, DeclineType::SickDay, reason),
                Err(EngineError::Validation { .. })
            ));
        }
        assert_eq!(f.shifts.get(&owner(), shift.id).unwrap().status, ShiftStatus::Pending);
    }

    #[test]
    fn test_sl_012_second_decline_is_invalid_state() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();
        f.shifts.decline(&owner(), shift.id, DeclineType::SickDay, "flu").unwrap();

        assert!(matches!(
            f.shifts.decline(&owner(), shift.id, DeclineType::SickDay, "flu"),
            Err(EngineError::InvalidState { .. })
        ));
        // charged once
        assert_eq!(f.ledger.balance("emp_001").unwrap().sick_hours_remaining, dec("32"));
    }

    #[test]
    fn test_sl_013_rejected_debit_leaves_shift_unchanged() {
        let f = fixture(NegativeBalancePolicy::Reject);
        f.ledger.debit("emp_001", crate::models::LeaveBucket::Sick, dec("38")).unwrap();
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();

        let result = f.shifts.decline(&owner(), shift.id, DeclineType::SickDay, "flu");
        assert!(matches!(result, Err(EngineError::InsufficientBalance { .. })));
        assert_eq!(f.shifts.get(&owner(), shift.id).unwrap().status, ShiftStatus::Pending);
        assert_eq!(f.ledger.balance("emp_001").unwrap().sick_hours_remaining, dec("2"));
    }

    #[test]
    fn test_sl_014_concurrent_declines_charge_once() {
        let f = Arc::new(fixture(NegativeBalancePolicy::Allow));
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let f = Arc::clone(&f);
                std::thread::spawn(move || {
                    f.shifts
                        .decline(&owner(), shift.id, DeclineType::SickDay, "flu")
                        .is_ok()
                })
            })
            .collect();
        let succeeded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(succeeded, 1);
        assert_eq!(f.ledger.balance("emp_001").unwrap().sick_hours_remaining, dec("32"));
    }

    // ==========================================================================
    // SL-015: conflicts
    // ==========================================================================
    #[test]
    fn test_sl_015_check_conflicts_half_open() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let a = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "12:00")).unwrap();

        let touching = new_shift("2026-03-02", "12:00", "15:00").slot();
        assert!(f.shifts.check_conflicts(&touching, None).is_empty());

        let overlapping = new_shift("2026-03-02", "11:00", "13:00").slot();
        assert_eq!(
            f.shifts.check_conflicts(&overlapping, None),
            vec![Conflict::Shift(a.clone())]
        );
        assert!(f.shifts.check_conflicts(&overlapping, Some(a.id)).is_empty());
    }

    #[test]
    fn test_sl_016_declined_shift_frees_slot() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let a = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "12:00")).unwrap();
        f.shifts.decline(&owner(), a.id, DeclineType::Unpaid, "swap").unwrap();

        let same = new_shift("2026-03-02", "09:00", "12:00").slot();
        assert!(f.shifts.check_conflicts(&same, None).is_empty());
    }

    #[test]
    fn test_sl_017_approved_time_off_conflicts() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let requests = f
            .time_off
            .submit(
                &owner(),
                TimeOffSubmission {
                    request_type: TimeOffType::Vacation,
                    selections: vec![DaySelection {
                        date: date("2026-03-02"),
                        portion: DayPortion::Full,
                    }],
                    reason: String::new(),
                },
            )
            .unwrap();
        let slot = new_shift("2026-03-02", "09:00", "12:00").slot();

        // pending does not block
        assert!(f.shifts.check_conflicts(&slot, None).is_empty());

        f.time_off.approve(&admin(), requests[0].id, None).unwrap();
        let conflicts = f.shifts.check_conflicts(&slot, None);
        assert!(matches!(conflicts.as_slice(), [Conflict::TimeOff(r)] if r.id == requests[0].id));
    }

    // ==========================================================================
    // SL-018: edit, delete, list
    // ==========================================================================
    #[test]
    fn test_sl_018_update_pending_recomputes_hours() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();

        let updated = f
            .shifts
            .update(
                &admin(),
                shift.id,
                ShiftUpdate {
                    date: date("2026-03-03"),
                    start_time: time("10:00"),
                    end_time: time("14:30"),
                    notes: None,
                },
            )
            .unwrap();

        assert_eq!(updated.date, date("2026-03-03"));
        assert_eq!(updated.hours, dec("4.5"));
        assert_eq!(updated.notes, "Babies room");
    }

    #[test]
    fn test_sl_019_update_accepted_is_invalid_state() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let shift = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "17:00")).unwrap();
        f.shifts.accept(&owner(), shift.id).unwrap();

        let result = f.shifts.update(
            &admin(),
            shift.id,
            ShiftUpdate {
                date: date("2026-03-02"),
                start_time: time("10:00"),
                end_time: time("14:00"),
                notes: None,
            },
        );
        assert!(matches!(result, Err(EngineError::InvalidState { .. })));
    }

    #[test]
    fn test_sl_020_delete_refuses_accepted() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let accepted = f.shifts.assign(&admin(), new_shift("2026-03-02", "09:00", "12:00")).unwrap();
        f.shifts.accept(&owner(), accepted.id).unwrap();
        let pending = f.shifts.assign(&admin(), new_shift("2026-03-03", "09:00", "12:00")).unwrap();

        assert!(matches!(
            f.shifts.delete(&admin(), accepted.id),
            Err(EngineError::InvalidState { .. })
        ));
        f.shifts.delete(&admin(), pending.id).unwrap();
        assert!(matches!(
            f.shifts.get(&admin(), pending.id),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_sl_021_list_filters_and_orders() {
        let f = fixture(NegativeBalancePolicy::Allow);
        let late = f.shifts.assign(&admin(), new_shift("2026-03-04", "09:00", "12:00")).unwrap();
        let early = f.shifts.assign(&admin(), new_shift("2026-03-02", "13:00", "15:00")).unwrap();
        let mut other = new_shift("2026-03-02", "09:00", "12:00");
        other.employee_id = "emp_002".to_string();
        f.shifts.assign(&admin(), other).unwrap();

        let own = f.shifts.list(&owner(), &ShiftFilter::default()).unwrap();
        assert_eq!(own.iter().map(|s| s.id).collect::<Vec<_>>(), vec![early.id, late.id]);

        let windowed = f
            .shifts
            .list(
                &admin(),
                &ShiftFilter {
                    from: Some(date("2026-03-03")),
                    ..ShiftFilter::default()
                },
            )
            .unwrap();
        assert_eq!(windowed.len(), 1);

        assert!(matches!(
            f.shifts.list(
                &owner(),
                &ShiftFilter {
                    employee_id: Some("emp_002".to_string()),
                    ..ShiftFilter::default()
                }
            ),
            Err(EngineError::Forbidden { .. })
        ));
        assert!(matches!(
            f.shifts.list(
                &admin(),
                &ShiftFilter {
                    from: Some(date("2026-03-05")),
                    to: Some(date("2026-03-01")),
                    ..ShiftFilter::default()
                }
            ),
            Err(EngineError::InvalidRange { .. })
        ));
    }
}
