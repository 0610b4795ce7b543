//! Stateful scheduling services.
//!
//! Each service owns one kind of record behind per-record locks and checks
//! the [`Caller`] before acting. [`Engine`] wires them together over one
//! employee directory and one leave ledger:
//!
//! ```text
//! ShiftService ──► LeaveLedger ◄── TimeOffWorkflow
//!      ▲   └──────────────────────────────┘ (approved time off blocks slots)
//!      ├── RecurringRuleService
//!      ├── PayPeriodService
//!      └── Calendar
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use roster_engine::config::EngineConfig;
//! use roster_engine::engine::{Caller, Engine, InMemoryDirectory, NewShift};
//! use roster_engine::models::{Employee, EmploymentType, PayFrequency, ShiftStatus};
//! use chrono::{NaiveDate, NaiveTime};
//! use rust_decimal::Decimal;
//!
//! let directory = InMemoryDirectory::from_employees([Employee {
//!     id: "emp_001".to_string(),
//!     display_name: "Ada".to_string(),
//!     employment_type: EmploymentType::Hourly,
//!     hourly_rate: Some(Decimal::new(20, 0)),
//!     salary_per_period: None,
//!     pay_frequency: PayFrequency::Weekly,
//!     annual_sick_days: 5,
//!     annual_vacation_days: 10,
//!     carryover: false,
//! }]);
//! let engine = Engine::new(EngineConfig::default(), Arc::new(directory));
//! engine.provision_all().unwrap();
//!
//! let shift = engine
//!     .shifts()
//!     .assign(
//!         &Caller::admin("adm_001"),
//!         NewShift {
//!             employee_id: "emp_001".to_string(),
//!             date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
//!             start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
//!             end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
//!             notes: String::new(),
//!         },
//!     )
//!     .unwrap();
//!
//! let accepted = engine.shifts().accept(&Caller::employee("emp_001"), shift.id).unwrap();
//! assert_eq!(accepted.status, ShiftStatus::Accepted);
//! ```

mod auth;
mod calendar;
mod directory;
mod ledger;
mod pay_periods;
mod recurring;
mod shifts;
mod store;
#[cfg(test)]
pub(crate) mod testing;
mod time_off;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::config::{ConfigLoader, EngineConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::LeaveBalance;

pub use auth::{Caller, Role};
pub use calendar::{Calendar, CalendarDay, MAX_CALENDAR_DAYS, TimeOffMarker};
pub use directory::{EmployeeDirectory, InMemoryDirectory};
pub use ledger::LeaveLedger;
pub use pay_periods::{NewPayPeriod, PayPeriodService};
pub use recurring::{GeneratedShifts, NewRecurringRule, RecurringRuleService};
pub use shifts::{NewShift, ShiftFilter, ShiftService, ShiftUpdate};
pub use time_off::{TimeOffFilter, TimeOffSubmission, TimeOffWorkflow};

/// The assembled scheduling engine.
pub struct Engine {
    config: EngineConfig,
    directory: Arc<dyn EmployeeDirectory>,
    ledger: Arc<LeaveLedger>,
    time_off: Arc<TimeOffWorkflow>,
    shifts: Arc<ShiftService>,
    recurring: RecurringRuleService,
    pay_periods: PayPeriodService,
    calendar: Calendar,
}

impl Engine {
    /// Wires every service over `directory` using `config`.
    ///
    /// Balances are not provisioned; call [`Engine::provision_all`].
    pub fn new(config: EngineConfig, directory: Arc<dyn EmployeeDirectory>) -> Self {
        let ledger = Arc::new(LeaveLedger::new(config.negative_balance_policy()));
        let time_off = Arc::new(TimeOffWorkflow::new(
            Arc::clone(&directory),
            Arc::clone(&ledger),
            config.full_day_hours(),
        ));
        let shifts = Arc::new(ShiftService::new(
            Arc::clone(&directory),
            Arc::clone(&ledger),
            Arc::clone(&time_off),
        ));
        let recurring = RecurringRuleService::new(
            Arc::clone(&shifts),
            Arc::clone(&directory),
            config.recurrence().clone(),
        );
        let pay_periods = PayPeriodService::new(Arc::clone(&shifts), Arc::clone(&directory));
        let calendar = Calendar::new(Arc::clone(&shifts), Arc::clone(&time_off));

        Self {
            config,
            directory,
            ledger,
            time_off,
            shifts,
            recurring,
            pay_periods,
            calendar,
        }
    }

    /// Builds an engine from loaded configuration, seeding an in-memory
    /// directory and provisioning every seeded employee.
    pub fn from_loader(loader: ConfigLoader) -> EngineResult<Self> {
        let (config, employees) = loader.into_parts();
        let engine = Self::new(config, Arc::new(InMemoryDirectory::from_employees(employees)));
        engine.provision_all()?;
        Ok(engine)
    }

    /// Provisions a balance for every directory employee that lacks one.
    ///
    /// Returns how many balances were created.
    pub fn provision_all(&self) -> EngineResult<usize> {
        let mut provisioned = 0;
        for employee in self.directory.list() {
            if self.ledger.is_provisioned(&employee.id) {
                continue;
            }
            self.ledger.provision(&employee, self.config.full_day_hours())?;
            provisioned += 1;
        }
        info!(provisioned, "Provisioned leave balances");
        Ok(provisioned)
    }

    /// Applies the annual leave boundary to every provisioned employee.
    pub fn roll_over_year(&self, caller: &Caller) -> EngineResult<Vec<LeaveBalance>> {
        caller.require_admin("roll over leave years")?;
        let balances = self
            .directory
            .list()
            .iter()
            .filter(|e| self.ledger.is_provisioned(&e.id))
            .map(|e| self.ledger.roll_over_year(e, self.config.full_day_hours()))
            .collect::<EngineResult<Vec<_>>>()?;
        info!(employees = balances.len(), "Rolled over leave year");
        Ok(balances)
    }

    /// Reads an employee's balance on behalf of the employee or an admin.
    pub fn balance(&self, caller: &Caller, employee_id: &str) -> EngineResult<LeaveBalance> {
        caller.require_owner_or_admin(employee_id, "read leave balances")?;
        self.ledger.balance(employee_id)
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The employee directory.
    pub fn directory(&self) -> &dyn EmployeeDirectory {
        self.directory.as_ref()
    }

    /// The leave ledger.
    pub fn ledger(&self) -> &LeaveLedger {
        &self.ledger
    }

    /// The shift lifecycle service.
    pub fn shifts(&self) -> &ShiftService {
        &self.shifts
    }

    /// The recurring rule service.
    pub fn recurring(&self) -> &RecurringRuleService {
        &self.recurring
    }

    /// The time-off workflow.
    pub fn time_off(&self) -> &TimeOffWorkflow {
        &self.time_off
    }

    /// The pay period service.
    pub fn pay_periods(&self) -> &PayPeriodService {
        &self.pay_periods
    }

    /// The calendar view.
    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }
}

/// Fails with `InvalidRange` when both bounds are given and `to < from`.
pub(crate) fn validate_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> EngineResult<()> {
    match (from, to) {
        (Some(start), Some(end)) if end < start => Err(EngineError::InvalidRange { start, end }),
        _ => Ok(()),
    }
}
