//! Pay periods and payroll.
//!
//! A period is OPEN until an admin closes it. Closing is one-way and
//! freezes the payroll report computed at that moment; later shift changes
//! never alter a closed period's totals.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::aggregate_payroll;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PayPeriodStatus, PayrollReport};

use super::auth::Caller;
use super::directory::EmployeeDirectory;
use super::shifts::ShiftService;
use super::store::{Record, Store, lock};

/// A pay period to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayPeriod {
    /// Display name, e.g. "March fortnight 1".
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period, inclusive.
    pub end_date: NaiveDate,
}

/// Owns pay periods and produces their payroll.
pub struct PayPeriodService {
    periods: Store<Uuid, PayPeriod>,
    shifts: Arc<ShiftService>,
    directory: Arc<dyn EmployeeDirectory>,
}

impl PayPeriodService {
    /// Creates an empty period store reading shifts from `shifts`.
    pub fn new(shifts: Arc<ShiftService>, directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self {
            periods: Store::new(),
            shifts,
            directory,
        }
    }

    /// Creates an open period.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is an admin
    /// - `Validation` if the name is blank or the range overlaps another period
    /// - `InvalidRange` if the end date precedes the start date
    pub fn create(&self, caller: &Caller, new_period: NewPayPeriod) -> EngineResult<PayPeriod> {
        caller.require_admin("create pay periods")?;
        let name = new_period.name.trim();
        if name.is_empty() {
            return Err(EngineError::validation("name", "a pay period needs a name"));
        }
        if new_period.end_date < new_period.start_date {
            return Err(EngineError::InvalidRange {
                start: new_period.start_date,
                end: new_period.end_date,
            });
        }

        let period = PayPeriod {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_date: new_period.start_date,
            end_date: new_period.end_date,
            status: PayPeriodStatus::Open,
            closed_payroll: None,
        };

        let mut records = self.periods.write();
        for record in records.values() {
            let existing = lock(record);
            if existing.overlaps(period.start_date, period.end_date) {
                return Err(EngineError::validation(
                    "date range",
                    format!(
                        "{} to {} overlaps pay period '{}' ({} to {})",
                        period.start_date,
                        period.end_date,
                        existing.name,
                        existing.start_date,
                        existing.end_date
                    ),
                ));
            }
        }
        records.insert(period.id, Arc::new(Mutex::new(period.clone())));

        info!(
            period_id = %period.id,
            name = %period.name,
            start_date = %period.start_date,
            end_date = %period.end_date,
            "Created pay period"
        );
        Ok(period)
    }

    /// Reads one period.
    pub fn get(&self, period_id: Uuid) -> EngineResult<PayPeriod> {
        let record = self.record(period_id)?;
        let period = lock(&record).clone();
        Ok(period)
    }

    /// Lists every period ordered by start date.
    pub fn list(&self) -> Vec<PayPeriod> {
        let mut periods = self.periods.snapshot(|_| true);
        periods.sort_by_key(|p| p.start_date);
        periods
    }

    /// Computes the period's payroll from current shifts without closing it.
    pub fn preview(&self, caller: &Caller, period_id: Uuid) -> EngineResult<PayrollReport> {
        caller.require_admin("preview payroll")?;
        let period = self.get(period_id)?;
        self.compute(&period)
    }

    /// The period's payroll: frozen for a closed period, live otherwise.
    pub fn payroll(&self, caller: &Caller, period_id: Uuid) -> EngineResult<PayrollReport> {
        caller.require_admin("read payroll")?;
        let period = self.get(period_id)?;
        match period.closed_payroll {
            Some(report) => Ok(report),
            None => self.compute(&period),
        }
    }

    /// Closes an open period and freezes its payroll.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is an admin
    /// - `InvalidState` if the period is already closed
    pub fn close(&self, caller: &Caller, period_id: Uuid) -> EngineResult<PayPeriod> {
        caller.require_admin("close pay periods")?;
        let record = self.record(period_id)?;
        let mut period = lock(&record);
        if period.status == PayPeriodStatus::Closed {
            return Err(EngineError::InvalidState {
                entity: "pay period".to_string(),
                id: period_id.to_string(),
                state: period.status.to_string(),
                action: "close".to_string(),
            });
        }

        let mut report = self.compute(&period)?;
        report.is_final = true;

        info!(
            period_id = %period_id,
            closed_by = %caller.employee_id,
            employees = report.totals.employee_count,
            gross_pay = %report.totals.gross_pay,
            "Closed pay period"
        );
        period.status = PayPeriodStatus::Closed;
        period.closed_payroll = Some(report);
        Ok(period.clone())
    }

    fn compute(&self, period: &PayPeriod) -> EngineResult<PayrollReport> {
        let shifts = self
            .shifts
            .between(None, period.start_date, period.end_date);
        let employees = self.directory.list();
        aggregate_payroll(period, &employees, &shifts)
    }

    fn record(&self, period_id: Uuid) -> EngineResult<Record<PayPeriod>> {
        self.periods
            .get(&period_id)
            .ok_or_else(|| EngineError::not_found("pay period", period_id))
    }
}
