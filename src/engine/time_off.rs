//! Time-off request workflow.
//!
//! Requests move PENDING → APPROVED | REJECTED. A pending request can be
//! withdrawn by its owner, which deletes it. Approving a sick or vacation
//! request debits the ledger; rejecting an approved request is not possible,
//! so there is no refund path.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{ShiftSlot, batch_day_selections, find_blocking_time_off, round_hours};
use crate::error::{EngineError, EngineResult};
use crate::models::{DayPortion, DaySelection, TimeOffRequest, TimeOffStatus, TimeOffType};

use super::auth::Caller;
use super::directory::EmployeeDirectory;
use super::ledger::LeaveLedger;
use super::store::{Record, Store, lock};
use super::validate_range;

/// A batch of selected days submitted by one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffSubmission {
    /// Vacation, sick or unpaid.
    pub request_type: TimeOffType,
    /// The selected calendar days, in any order.
    pub selections: Vec<DaySelection>,
    /// Free-text reason shown to the approver.
    #[serde(default)]
    pub reason: String,
}

/// Criteria for listing time-off requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffFilter {
    /// Only this employee's requests.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Only requests in this state.
    #[serde(default)]
    pub status: Option<TimeOffStatus>,
    /// Only requests ending on or after this date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Only requests starting on or before this date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Owns time-off requests and their decisions.
pub struct TimeOffWorkflow {
    requests: Store<Uuid, TimeOffRequest>,
    directory: Arc<dyn EmployeeDirectory>,
    ledger: Arc<LeaveLedger>,
    full_day_hours: Decimal,
}

impl TimeOffWorkflow {
    /// Creates an empty workflow charging `full_day_hours` per full day.
    pub fn new(directory: Arc<dyn EmployeeDirectory>, ledger: Arc<LeaveLedger>, full_day_hours: Decimal) -> Self {
        Self {
            requests: Store::new(),
            directory,
            ledger,
            full_day_hours,
        }
    }

    /// Submits the caller's selected days as one or more pending requests.
    ///
    /// Contiguous full days become one request; each half day and each
    /// isolated full day becomes its own. Half-day requests carry half of
    /// the full-day hours.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the caller is not in the directory
    /// - `Validation` if no days are selected or a date repeats
    pub fn submit(&self, caller: &Caller, submission: TimeOffSubmission) -> EngineResult<Vec<TimeOffRequest>> {
        self.directory.require(&caller.employee_id)?;
        let spans = batch_day_selections(&submission.selections)?;

        let half_day = round_hours(self.full_day_hours / Decimal::TWO);
        let created: Vec<TimeOffRequest> = spans
            .into_iter()
            .map(|span| TimeOffRequest {
                id: Uuid::new_v4(),
                employee_id: caller.employee_id.clone(),
                start_date: span.start_date,
                end_date: span.end_date,
                request_type: submission.request_type,
                hours: (span.portion == DayPortion::Half).then_some(half_day),
                status: TimeOffStatus::Pending,
                reason: submission.reason.clone(),
                decided_by: None,
                decision_note: None,
            })
            .collect();

        for request in &created {
            self.requests.insert(request.id, request.clone());
        }

        info!(
            employee_id = %caller.employee_id,
            request_type = ?submission.request_type,
            selected_days = submission.selections.len(),
            requests = created.len(),
            "Submitted time off"
        );
        Ok(created)
    }

    /// Deletes one of the caller's pending requests.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such request exists
    /// - `Forbidden` if the caller does not own it
    /// - `InvalidState` if it has already been decided
    pub fn withdraw(&self, caller: &Caller, request_id: Uuid) -> EngineResult<TimeOffRequest> {
        let removed = self
            .requests
            .remove_if(&request_id, |request| {
                caller.require_owner(&request.employee_id, "withdraw time off")?;
                require_pending(request, "withdraw")
            })
            .ok_or_else(|| EngineError::not_found("time-off request", request_id))??;

        info!(
            request_id = %request_id,
            employee_id = %removed.employee_id,
            "Withdrew time off"
        );
        Ok(removed)
    }

    /// Approves a pending request, debiting the ledger for sick and
    /// vacation requests.
    ///
    /// The debit is the request's `hours` when set, otherwise
    /// `full_day_hours` for every day in the range. If the ledger refuses
    /// the debit the request stays pending.
    pub fn approve(&self, caller: &Caller, request_id: Uuid, note: Option<String>) -> EngineResult<TimeOffRequest> {
        caller.require_admin("approve time off")?;
        let record = self.record(request_id)?;
        let mut request = lock(&record);
        require_pending(&request, "approve")?;

        if let Some(bucket) = request.request_type.bucket() {
            let hours = self.charged_hours(&request);
            self.ledger.debit(&request.employee_id, bucket, hours)?;
        }

        request.status = TimeOffStatus::Approved;
        request.decided_by = Some(caller.employee_id.clone());
        request.decision_note = note;
        info!(
            request_id = %request_id,
            employee_id = %request.employee_id,
            approved_by = %caller.employee_id,
            "Approved time off"
        );
        Ok(request.clone())
    }

    /// Rejects a pending request. The ledger is untouched.
    pub fn reject(&self, caller: &Caller, request_id: Uuid, note: Option<String>) -> EngineResult<TimeOffRequest> {
        caller.require_admin("reject time off")?;
        let record = self.record(request_id)?;
        let mut request = lock(&record);
        require_pending(&request, "reject")?;

        request.status = TimeOffStatus::Rejected;
        request.decided_by = Some(caller.employee_id.clone());
        request.decision_note = note;
        info!(
            request_id = %request_id,
            employee_id = %request.employee_id,
            rejected_by = %caller.employee_id,
            "Rejected time off"
        );
        Ok(request.clone())
    }

    /// Reads one request visible to the caller.
    pub fn get(&self, caller: &Caller, request_id: Uuid) -> EngineResult<TimeOffRequest> {
        let record = self.record(request_id)?;
        let request = lock(&record).clone();
        caller.require_owner_or_admin(&request.employee_id, "read time off")?;
        Ok(request)
    }

    /// Lists requests matching `filter`, ordered by start date.
    ///
    /// Employees only ever see their own requests.
    pub fn list(&self, caller: &Caller, filter: &TimeOffFilter) -> EngineResult<Vec<TimeOffRequest>> {
        let employee_id = caller.visible_employee(filter.employee_id.as_deref(), "list time off")?;
        validate_range(filter.from, filter.to)?;

        let mut requests = self.requests.snapshot(|r| {
            employee_id.as_deref().is_none_or(|id| r.employee_id == id)
                && filter.status.is_none_or(|s| r.status == s)
                && filter.from.is_none_or(|from| r.end_date >= from)
                && filter.to.is_none_or(|to| r.start_date <= to)
        });
        requests.sort_by(|a, b| (a.start_date, &a.employee_id, a.id).cmp(&(b.start_date, &b.employee_id, b.id)));
        Ok(requests)
    }

    /// The approved request blocking `slot`, if any.
    pub(crate) fn approved_blocking(&self, slot: &ShiftSlot) -> Option<TimeOffRequest> {
        let approved = self.requests.snapshot(|r| {
            r.employee_id == slot.employee_id && r.status == TimeOffStatus::Approved
        });
        find_blocking_time_off(slot, &approved).cloned()
    }

    /// Pending and approved requests for one employee touching `[from, to]`.
    pub(crate) fn occupying(&self, employee_id: &str, from: NaiveDate, to: NaiveDate) -> Vec<TimeOffRequest> {
        self.requests.snapshot(|r| {
            r.employee_id == employee_id
                && r.status != TimeOffStatus::Rejected
                && r.end_date >= from
                && r.start_date <= to
        })
    }

    fn charged_hours(&self, request: &TimeOffRequest) -> Decimal {
        request
            .hours
            .unwrap_or_else(|| round_hours(self.full_day_hours * Decimal::from(request.day_count())))
    }

    fn record(&self, request_id: Uuid) -> EngineResult<Record<TimeOffRequest>> {
        self.requests
            .get(&request_id)
            .ok_or_else(|| EngineError::not_found("time-off request", request_id))
    }
}

fn require_pending(request: &TimeOffRequest, action: &str) -> EngineResult<()> {
    if request.status == TimeOffStatus::Pending {
        Ok(())
    } else {
        Err(EngineError::InvalidState {
            entity: "time-off request".to_string(),
            id: request.id.to_string(),
            state: request.status.to_string(),
            action: action.to_string(),
        })
    }
}
