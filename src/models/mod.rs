//! Core data models for the Roster Engine.
//!
//! This module contains all the domain records used throughout the engine.
//! They serialize to the JSON shapes exchanged with external collaborators.

mod employee;
mod leave_balance;
mod pay_period;
mod payroll;
mod recurring_rule;
mod shift;
mod time_off;

pub use employee::{Employee, EmploymentType, PayFrequency};
pub use leave_balance::{LeaveBalance, LeaveBucket};
pub use pay_period::{PayPeriod, PayPeriodStatus};
pub use payroll::{
    AuditStep, AuditTrace, AuditWarning, PayrollLine, PayrollReport, PayrollTotals,
};
pub use recurring_rule::{RecurringRule, weekday_from_sunday};
pub use shift::{DeclineType, Shift, ShiftStatus};
pub use time_off::{DayPortion, DaySelection, TimeOffRequest, TimeOffStatus, TimeOffType};
