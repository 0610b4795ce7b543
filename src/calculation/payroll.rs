//! Pay period aggregation.
//!
//! This module sums shift hours per employee within a pay period and prices
//! them: hourly employees are paid `total_hours × hourly_rate`, salaried
//! employees their flat per-period amount regardless of hours. Declined
//! shifts were not worked and are excluded; pending and accepted shifts
//! are counted.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Employee, EmploymentType, PayPeriod, PayrollLine,
    PayrollReport, PayrollTotals, Shift, ShiftStatus,
};

use super::{round_hours, round_money};

/// The result of pricing one employee's shifts, including the audit step.
#[derive(Debug, Clone)]
pub struct EmployeeGrossResult {
    /// The payroll line for the employee.
    pub line: PayrollLine,
    /// The audit step recording how the line was derived.
    pub audit_step: AuditStep,
}

/// Prices one employee's counted shifts for a period.
///
/// `shifts` must already be filtered to the period and to non-declined
/// shifts belonging to `employee`.
///
/// # Errors
///
/// Returns `Validation` if an hourly employee has no hourly rate or a
/// salaried employee has no per-period salary.
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::calculate_employee_gross;
/// use roster_engine::models::{Employee, EmploymentType, PayFrequency};
/// use rust_decimal::Decimal;
///
/// let salaried = Employee {
///     id: "adm_001".to_string(),
///     display_name: "Centre Director".to_string(),
///     employment_type: EmploymentType::Salary,
///     hourly_rate: None,
///     salary_per_period: Some(Decimal::new(215000, 2)),
///     pay_frequency: PayFrequency::Biweekly,
///     annual_sick_days: 8,
///     annual_vacation_days: 20,
///     carryover: true,
/// };
///
/// let result = calculate_employee_gross(&salaried, &[], 1).unwrap();
/// assert_eq!(result.line.gross_amount, Decimal::new(215000, 2));
/// ```
pub fn calculate_employee_gross(
    employee: &Employee,
    shifts: &[&Shift],
    step_number: u32,
) -> EngineResult<EmployeeGrossResult> {
    let total_hours = round_hours(shifts.iter().map(|s| s.hours).sum::<Decimal>());
    let shift_count = u32::try_from(shifts.len()).unwrap_or(u32::MAX);

    let (rate, gross_amount, rule_id, rule_name, reasoning) = match employee.employment_type {
        EmploymentType::Hourly => {
            let rate = employee.hourly_rate.ok_or_else(|| {
                EngineError::validation(
                    "hourly_rate",
                    format!("hourly employee '{}' has no hourly rate", employee.id),
                )
            })?;
            let gross = round_money(total_hours * rate);
            (
                Some(rate),
                gross,
                "hourly_gross",
                "Hourly Gross Pay",
                format!(
                    "{} hours across {} shifts at ${}/hour = ${}",
                    total_hours.normalize(),
                    shift_count,
                    rate,
                    gross
                ),
            )
        }
        EmploymentType::Salary => {
            let salary = employee.salary_per_period.ok_or_else(|| {
                EngineError::validation(
                    "salary_per_period",
                    format!("salaried employee '{}' has no per-period salary", employee.id),
                )
            })?;
            let gross = round_money(salary);
            (
                None,
                gross,
                "salary_gross",
                "Salaried Gross Pay",
                format!(
                    "Flat per-period salary ${} paid regardless of {} hours worked",
                    gross,
                    total_hours.normalize()
                ),
            )
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "employment_type": employee.employment_type,
            "shift_count": shift_count,
            "total_hours": total_hours.normalize().to_string(),
            "rate": rate.map(|r| r.to_string()),
            "salary_per_period": employee.salary_per_period.map(|s| s.to_string())
        }),
        output: serde_json::json!({
            "gross_amount": gross_amount.to_string()
        }),
        reasoning,
    };

    Ok(EmployeeGrossResult {
        line: PayrollLine {
            employee_id: employee.id.clone(),
            display_name: employee.display_name.clone(),
            employment_type: employee.employment_type,
            shift_count,
            total_hours,
            rate,
            gross_amount,
        },
        audit_step,
    })
}

/// Aggregates shifts into a payroll report for `period`.
///
/// Lines are produced for every hourly employee with counted shifts in the
/// period and for every salaried employee in `employees`, ordered by
/// employee id. Shifts belonging to employees missing from `employees` are
/// skipped with a warning, as are pending shifts (counted, but flagged).
///
/// The returned report is never final; closing the period marks it so.
pub fn aggregate_payroll(
    period: &PayPeriod,
    employees: &[Employee],
    shifts: &[Shift],
) -> EngineResult<PayrollReport> {
    let started = Instant::now();
    let directory: HashMap<&str, &Employee> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let mut step_number: u32 = 1;

    let in_period: Vec<&Shift> = shifts
        .iter()
        .filter(|s| period.contains_date(s.date))
        .collect();
    let declined = in_period.iter().filter(|s| !s.is_active()).count();
    let pending = in_period
        .iter()
        .filter(|s| s.status == ShiftStatus::Pending)
        .count();

    let mut by_employee: BTreeMap<&str, Vec<&Shift>> = BTreeMap::new();
    let mut unknown: BTreeSet<&str> = BTreeSet::new();
    for shift in in_period.iter().copied().filter(|s| s.is_active()) {
        if directory.contains_key(shift.employee_id.as_str()) {
            by_employee
                .entry(shift.employee_id.as_str())
                .or_default()
                .push(shift);
        } else {
            unknown.insert(shift.employee_id.as_str());
        }
    }

    steps.push(AuditStep {
        step_number,
        rule_id: "shift_selection".to_string(),
        rule_name: "Shift Selection".to_string(),
        input: serde_json::json!({
            "start_date": period.start_date.to_string(),
            "end_date": period.end_date.to_string(),
            "shifts_in_range": in_period.len()
        }),
        output: serde_json::json!({
            "counted": in_period.len() - declined,
            "excluded_declined": declined,
            "pending": pending
        }),
        reasoning: format!(
            "{} shifts fall within {} to {}; {} declined shifts excluded as not worked",
            in_period.len(),
            period.start_date,
            period.end_date,
            declined
        ),
    });
    step_number += 1;

    if pending > 0 {
        warnings.push(AuditWarning {
            code: "PENDING_SHIFTS_COUNTED".to_string(),
            message: format!(
                "{} shifts in the period are still pending and were counted as worked",
                pending
            ),
            severity: "low".to_string(),
        });
    }

    for employee_id in &unknown {
        warnings.push(AuditWarning {
            code: "UNKNOWN_EMPLOYEE".to_string(),
            message: format!(
                "Shifts for '{}' were skipped: employee is not in the directory",
                employee_id
            ),
            severity: "high".to_string(),
        });
    }

    for employee in employees {
        if employee.employment_type == EmploymentType::Salary {
            by_employee.entry(employee.id.as_str()).or_default();
        }
    }

    let mut lines = Vec::with_capacity(by_employee.len());
    for (employee_id, employee_shifts) in &by_employee {
        let Some(employee) = directory.get(employee_id) else {
            continue;
        };
        let result = calculate_employee_gross(employee, employee_shifts, step_number)?;
        steps.push(result.audit_step);
        lines.push(result.line);
        step_number += 1;
    }

    let totals = PayrollTotals {
        gross_pay: lines.iter().map(|l| l.gross_amount).sum(),
        total_hours: lines.iter().map(|l| l.total_hours).sum(),
        employee_count: u32::try_from(lines.len()).unwrap_or(u32::MAX),
    };

    Ok(PayrollReport {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        period_id: period.id,
        start_date: period.start_date,
        end_date: period.end_date,
        is_final: false,
        lines,
        totals,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeclineType, PayFrequency, PayPeriodStatus};
    use chrono::{NaiveDate, NaiveTime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hourly(id: &str, rate: &str) -> Employee {
        Employee {
            id: id.to_string(),
            display_name: format!("Hourly {}", id),
            employment_type: EmploymentType::Hourly,
            hourly_rate: Some(dec(rate)),
            salary_per_period: None,
            pay_frequency: PayFrequency::Biweekly,
            annual_sick_days: 5,
            annual_vacation_days: 10,
            carryover: false,
        }
    }

    fn salaried(id: &str, salary: &str) -> Employee {
        Employee {
            id: id.to_string(),
            display_name: format!("Salaried {}", id),
            employment_type: EmploymentType::Salary,
            hourly_rate: None,
            salary_per_period: Some(dec(salary)),
            pay_frequency: PayFrequency::Biweekly,
            annual_sick_days: 5,
            annual_vacation_days: 10,
            carryover: false,
        }
    }

    fn shift(employee: &str, day: &str, hours: &str, status: ShiftStatus) -> Shift {
        Shift {
            id: Uuid::new_v4(),
            employee_id: employee.to_string(),
            date: date(day),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            hours: dec(hours),
            status,
            decline_type: (status == ShiftStatus::Declined).then_some(DeclineType::Unpaid),
            decline_reason: (status == ShiftStatus::Declined).then(|| "away".to_string()),
            was_previously_accepted: false,
            notes: String::new(),
            recurring_rule_id: None,
        }
    }

    fn period() -> PayPeriod {
        PayPeriod {
            id: Uuid::new_v4(),
            name: "Fortnight 5".to_string(),
            start_date: date("2026-03-01"),
            end_date: date("2026-03-14"),
            status: PayPeriodStatus::Open,
            closed_payroll: None,
        }
    }

    // ==========================================================================
    // PA-001: two accepted 8h shifts at $20
    // ==========================================================================
    #[test]
    fn test_pa_001_two_accepted_eight_hour_shifts() {
        let employees = vec![hourly("emp_001", "20")];
        let shifts = vec![
            shift("emp_001", "2026-03-02", "8", ShiftStatus::Accepted),
            shift("emp_001", "2026-03-03", "8", ShiftStatus::Accepted),
        ];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        let line = report.line_for("emp_001").unwrap();

        assert_eq!(line.total_hours, dec("16"));
        assert_eq!(line.gross_amount, dec("320.00"));
        assert_eq!(line.shift_count, 2);
        assert_eq!(report.totals.gross_pay, dec("320.00"));
        assert!(!report.is_final);
    }

    // ==========================================================================
    // PA-002: declined excluded, pending counted
    // ==========================================================================
    #[test]
    fn test_pa_002_declined_excluded_pending_counted() {
        let employees = vec![hourly("emp_001", "20")];
        let shifts = vec![
            shift("emp_001", "2026-03-02", "8", ShiftStatus::Accepted),
            shift("emp_001", "2026-03-03", "4", ShiftStatus::Pending),
            shift("emp_001", "2026-03-04", "8", ShiftStatus::Declined),
        ];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        let line = report.line_for("emp_001").unwrap();

        assert_eq!(line.total_hours, dec("12"));
        assert_eq!(line.gross_amount, dec("240.00"));
        assert!(
            report
                .audit_trace
                .warnings
                .iter()
                .any(|w| w.code == "PENDING_SHIFTS_COUNTED")
        );
    }

    #[test]
    fn test_pa_003_shifts_outside_period_ignored() {
        let employees = vec![hourly("emp_001", "20")];
        let shifts = vec![
            shift("emp_001", "2026-02-28", "8", ShiftStatus::Accepted),
            shift("emp_001", "2026-03-14", "8", ShiftStatus::Accepted),
            shift("emp_001", "2026-03-15", "8", ShiftStatus::Accepted),
        ];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        assert_eq!(report.line_for("emp_001").unwrap().total_hours, dec("8"));
    }

    // ==========================================================================
    // PA-004: salaried employees
    // ==========================================================================
    #[test]
    fn test_pa_004_salary_is_flat_regardless_of_hours() {
        let employees = vec![salaried("adm_001", "2150.00")];
        let shifts = vec![
            shift("adm_001", "2026-03-02", "10", ShiftStatus::Accepted),
            shift("adm_001", "2026-03-03", "11", ShiftStatus::Accepted),
        ];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        let line = report.line_for("adm_001").unwrap();
        assert_eq!(line.gross_amount, dec("2150.00"));
        assert_eq!(line.total_hours, dec("21"));
        assert_eq!(line.rate, None);
    }

    #[test]
    fn test_pa_005_salaried_without_shifts_still_paid() {
        let employees = vec![hourly("emp_001", "20"), salaried("adm_001", "2150.00")];
        let report = aggregate_payroll(&period(), &employees, &[]).unwrap();

        assert!(report.line_for("emp_001").is_none());
        assert_eq!(report.line_for("adm_001").unwrap().shift_count, 0);
        assert_eq!(report.totals.employee_count, 1);
    }

    #[test]
    fn test_pa_006_lines_ordered_by_employee_id() {
        let employees = vec![hourly("emp_b", "20"), hourly("emp_a", "25")];
        let shifts = vec![
            shift("emp_b", "2026-03-02", "8", ShiftStatus::Accepted),
            shift("emp_a", "2026-03-02", "8", ShiftStatus::Accepted),
        ];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        let ids: Vec<_> = report.lines.iter().map(|l| l.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["emp_a", "emp_b"]);
        assert_eq!(report.totals.gross_pay, dec("360.00"));
        assert_eq!(report.totals.total_hours, dec("16"));
    }

    #[test]
    fn test_pa_007_gross_rounded_to_cents() {
        let employees = vec![hourly("emp_001", "21.37")];
        let shifts = vec![shift("emp_001", "2026-03-02", "7.33", ShiftStatus::Accepted)];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        // 7.33 * 21.37 = 156.6421
        assert_eq!(report.line_for("emp_001").unwrap().gross_amount, dec("156.64"));
    }

    // ==========================================================================
    // PA-008: directory problems
    // ==========================================================================
    #[test]
    fn test_pa_008_unknown_employee_skipped_with_warning() {
        let employees = vec![hourly("emp_001", "20")];
        let shifts = vec![shift("ghost", "2026-03-02", "8", ShiftStatus::Accepted)];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        assert!(report.lines.is_empty());
        let warning = &report.audit_trace.warnings[0];
        assert_eq!(warning.code, "UNKNOWN_EMPLOYEE");
        assert!(warning.message.contains("ghost"));
    }

    #[test]
    fn test_pa_009_hourly_without_rate_is_validation_error() {
        let mut employee = hourly("emp_001", "20");
        employee.hourly_rate = None;
        let shifts = vec![shift("emp_001", "2026-03-02", "8", ShiftStatus::Accepted)];

        let result = aggregate_payroll(&period(), &[employee], &shifts);
        assert!(matches!(result, Err(EngineError::Validation { field, .. }) if field == "hourly_rate"));
    }

    #[test]
    fn test_pa_010_audit_trace_records_selection_and_each_employee() {
        let employees = vec![hourly("emp_001", "20"), salaried("adm_001", "1000")];
        let shifts = vec![shift("emp_001", "2026-03-02", "8", ShiftStatus::Accepted)];

        let report = aggregate_payroll(&period(), &employees, &shifts).unwrap();
        let rule_ids: Vec<_> = report
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(rule_ids, vec!["shift_selection", "salary_gross", "hourly_gross"]);
        let numbers: Vec<_> = report.audit_trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
