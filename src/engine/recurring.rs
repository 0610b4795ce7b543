//! Recurring rule storage and generation.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{Conflict, calculate_shift_hours, expand_recurring_rule};
use crate::config::RecurrenceConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{RecurringRule, Shift};

use super::auth::Caller;
use super::directory::EmployeeDirectory;
use super::shifts::ShiftService;
use super::store::Store;

/// A weekly rule to be stored and expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecurringRule {
    /// The employee being rostered.
    pub employee_id: String,
    /// Weekday number, 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    /// Start time of every generated shift.
    pub start_time: NaiveTime,
    /// End time of every generated shift.
    pub end_time: NaiveTime,
    /// First date the rule may generate on.
    pub start_date: NaiveDate,
    /// Last date the rule may generate on; the configured horizon when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Notes copied onto every generated shift.
    #[serde(default)]
    pub notes: String,
}

/// The outcome of generating a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedShifts {
    /// The stored rule.
    pub rule: RecurringRule,
    /// The shifts created from it, in date order.
    pub shifts: Vec<Shift>,
    /// What the created shifts collided with when inserted.
    pub conflicts: Vec<Conflict>,
}

/// Stores weekly rules and expands them into shifts.
pub struct RecurringRuleService {
    rules: Store<Uuid, RecurringRule>,
    shifts: Arc<ShiftService>,
    directory: Arc<dyn EmployeeDirectory>,
    limits: RecurrenceConfig,
}

impl RecurringRuleService {
    /// Creates an empty rule store generating into `shifts`.
    pub fn new(shifts: Arc<ShiftService>, directory: Arc<dyn EmployeeDirectory>, limits: RecurrenceConfig) -> Self {
        Self {
            rules: Store::new(),
            shifts,
            directory,
            limits,
        }
    }

    /// Checks every date the rule would generate on without storing anything.
    ///
    /// Returns all conflicts across all dates, in date order.
    pub fn check_conflicts(&self, draft: &NewRecurringRule) -> EngineResult<Vec<Conflict>> {
        let rule = build_rule(draft)?;
        let shifts = expand_recurring_rule(&rule, &self.limits)?;
        Ok(self.shifts.check_batch_conflicts(&shifts))
    }

    /// Stores the rule and creates every shift it expands to in one batch.
    ///
    /// Conflicts do not stop generation; they are reported alongside the
    /// created shifts.
    ///
    /// # Errors
    ///
    /// - `Forbidden` unless the caller is an admin
    /// - `NotFound` if the employee is not in the directory
    /// - `Validation` for a weekday above 6, an end time not after the start,
    ///   or a span longer than the configured maximum
    /// - `InvalidRange` if the end date precedes the start date
    pub fn generate(&self, caller: &Caller, draft: NewRecurringRule) -> EngineResult<GeneratedShifts> {
        caller.require_admin("create recurring rules")?;
        self.directory.require(&draft.employee_id)?;
        let rule = build_rule(&draft)?;
        let shifts = expand_recurring_rule(&rule, &self.limits)?;

        self.rules.insert(rule.id, rule.clone());
        let conflicts = self.shifts.insert_batch(&shifts);

        info!(
            rule_id = %rule.id,
            employee_id = %rule.employee_id,
            day_of_week = rule.day_of_week,
            generated = shifts.len(),
            conflicts = conflicts.len(),
            "Generated recurring shifts"
        );
        Ok(GeneratedShifts {
            rule,
            shifts,
            conflicts,
        })
    }

    /// Lists rules, optionally for one employee, ordered by start date.
    pub fn list(&self, caller: &Caller, employee_id: Option<&str>) -> EngineResult<Vec<RecurringRule>> {
        let employee_id = caller.visible_employee(employee_id, "list recurring rules")?;
        let mut rules = self
            .rules
            .snapshot(|r| employee_id.as_deref().is_none_or(|id| r.employee_id == id));
        rules.sort_by(|a, b| (a.start_date, &a.employee_id, a.id).cmp(&(b.start_date, &b.employee_id, b.id)));
        Ok(rules)
    }

    /// Deletes a rule. Shifts it generated are kept.
    pub fn delete(&self, caller: &Caller, rule_id: Uuid) -> EngineResult<RecurringRule> {
        caller.require_admin("delete recurring rules")?;
        let removed = self
            .rules
            .remove(&rule_id)
            .ok_or_else(|| EngineError::not_found("recurring rule", rule_id))?;

        info!(rule_id = %rule_id, employee_id = %removed.employee_id, "Deleted recurring rule");
        Ok(removed)
    }
}

fn build_rule(draft: &NewRecurringRule) -> EngineResult<RecurringRule> {
    Ok(RecurringRule {
        id: Uuid::new_v4(),
        employee_id: draft.employee_id.clone(),
        day_of_week: draft.day_of_week,
        start_time: draft.start_time,
        end_time: draft.end_time,
        hours: calculate_shift_hours(draft.start_time, draft.end_time)?,
        start_date: draft.start_date,
        end_date: draft.end_date,
        notes: draft.notes.clone(),
    })
}
