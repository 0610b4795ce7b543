//! Pure scheduling and payroll calculations.
//!
//! Everything in this module is a function of its inputs: shift duration
//! and rounding, recurring rule expansion, conflict detection, time-off
//! batching and pay period aggregation. State and locking live in
//! [`crate::engine`].

mod conflict;
mod payroll;
mod recurrence;
mod shift_hours;
mod time_off_batching;

pub use conflict::{
    Conflict, ShiftSlot, find_blocking_time_off, find_conflicting_shift, ranges_overlap,
};
pub use payroll::{EmployeeGrossResult, aggregate_payroll, calculate_employee_gross};
pub use recurrence::{expand_recurring_rule, occurrence_dates, resolve_end_date};
pub use shift_hours::{calculate_shift_hours, round_hours, round_money};
pub use time_off_batching::{RequestSpan, batch_day_selections};
