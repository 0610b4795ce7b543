//! Payroll report models for the Roster Engine.
//!
//! This module contains the [`PayrollReport`] type and its associated structures
//! that capture the output of pay period aggregation: one line per employee,
//! the period totals, and an audit trace of every aggregation decision.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EmploymentType;

/// Gross pay for one employee over one pay period.
///
/// # Example
///
/// ```
/// use roster_engine::models::{EmploymentType, PayrollLine};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let line = PayrollLine {
///     employee_id: "emp_001".to_string(),
///     display_name: "Ada Lovelace".to_string(),
///     employment_type: EmploymentType::Hourly,
///     shift_count: 2,
///     total_hours: Decimal::from_str("16.00").unwrap(),
///     rate: Some(Decimal::from_str("20.00").unwrap()),
///     gross_amount: Decimal::from_str("320.00").unwrap(),
/// };
/// assert_eq!(line.gross_amount, line.total_hours * line.rate.unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// The employee being paid.
    pub employee_id: String,
    /// The employee's display name, for payslips.
    pub display_name: String,
    /// Hourly or salaried.
    pub employment_type: EmploymentType,
    /// Number of counted (non-declined) shifts in the period.
    pub shift_count: u32,
    /// Sum of counted shift hours.
    pub total_hours: Decimal,
    /// Hourly rate applied; `None` for salaried employees.
    pub rate: Option<Decimal>,
    /// Gross pay for the period, rounded to cents.
    pub gross_amount: Decimal,
}

/// Aggregated totals across every line of a payroll report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Sum of all gross amounts.
    pub gross_pay: Decimal,
    /// Sum of all counted hours.
    pub total_hours: Decimal,
    /// Number of payroll lines.
    pub employee_count: u32,
}

/// A single step in the audit trace recording an aggregation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during aggregation.
///
/// Warnings indicate potential issues that don't prevent payroll
/// but may require attention (e.g. shifts still pending at close).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of aggregation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during aggregation.
    pub warnings: Vec<AuditWarning>,
    /// The total aggregation duration in microseconds.
    pub duration_us: u64,
}

/// The payroll output for one pay period, handed to the document generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// Unique identifier for this report.
    pub report_id: Uuid,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that produced the report.
    pub engine_version: String,
    /// The pay period the report covers.
    pub period_id: Uuid,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// True when the report was frozen by closing the period.
    pub is_final: bool,
    /// One line per paid employee, ordered by employee id.
    pub lines: Vec<PayrollLine>,
    /// Totals across all lines.
    pub totals: PayrollTotals,
    /// Complete audit trace of aggregation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollReport {
    /// Finds the line for `employee_id`, if the employee was paid in this period.
    pub fn line_for(&self, employee_id: &str) -> Option<&PayrollLine> {
        self.lines.iter().find(|l| l.employee_id == employee_id)
    }
}
