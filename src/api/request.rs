//! Request types for the Roster Engine API.
//!
//! Bodies reuse the engine's input types, flattened alongside the
//! API-only `confirm_conflicts` switch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{NewRecurringRule, NewShift, ShiftUpdate};
use crate::models::DeclineType;

/// Body for `POST /shifts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignShiftRequest {
    /// The shift to assign.
    #[serde(flatten)]
    pub shift: NewShift,
    /// Assign even when the slot conflicts.
    #[serde(default)]
    pub confirm_conflicts: bool,
}

/// Body for `PUT /shifts/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShiftRequest {
    /// The replacement date and times.
    #[serde(flatten)]
    pub update: ShiftUpdate,
    /// Apply even when the new slot conflicts.
    #[serde(default)]
    pub confirm_conflicts: bool,
}

/// Body for `POST /shifts/:id/decline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclineRequest {
    /// Which balance, if any, the shift is charged to.
    pub decline_type: DeclineType,
    /// Why the shift will not be worked.
    #[serde(default)]
    pub reason: String,
}

/// Body for `POST /recurring-rules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRuleRequest {
    /// The rule to store and expand.
    #[serde(flatten)]
    pub rule: NewRecurringRule,
    /// Generate even when some dates conflict.
    #[serde(default)]
    pub confirm_conflicts: bool,
}

/// Optional body for time-off approve and reject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Note recorded with the decision.
    #[serde(default)]
    pub note: Option<String>,
}

/// Query for `GET /recurring-rules`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleQuery {
    /// Only this employee's rules.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Query for `GET /employees/:id/calendar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarQuery {
    /// First date shown.
    pub from: NaiveDate,
    /// Last date shown, inclusive.
    pub to: NaiveDate,
}
