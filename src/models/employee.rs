//! Employee model and related types.
//!
//! Employees are owned by an external directory; the engine only reads
//! them to price shifts and to provision leave balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Paid per hour worked.
    Hourly,
    /// Paid a flat amount per pay period regardless of hours.
    Salary,
}

/// How often an employee is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Every week.
    Weekly,
    /// Every two weeks.
    Biweekly,
    /// Twice a month.
    Semimonthly,
    /// Once a month.
    Monthly,
}

/// Represents a staff member as seen by the scheduling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Name shown on rosters and payslips.
    pub display_name: String,
    /// Whether the employee is hourly or salaried.
    pub employment_type: EmploymentType,
    /// Hourly rate, used when `employment_type` is hourly.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// Flat amount per pay period, used when `employment_type` is salary.
    #[serde(default)]
    pub salary_per_period: Option<Decimal>,
    /// How often the employee is paid.
    pub pay_frequency: PayFrequency,
    /// Sick days granted per year.
    #[serde(default)]
    pub annual_sick_days: u32,
    /// Vacation days granted per year.
    #[serde(default)]
    pub annual_vacation_days: u32,
    /// Whether unused leave carries over into the next year.
    #[serde(default)]
    pub carryover: bool,
}

impl Employee {
    /// Returns true if the employee is paid by the hour.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_engine::models::{Employee, EmploymentType, PayFrequency};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     display_name: "Ada Lovelace".to_string(),
    ///     employment_type: EmploymentType::Hourly,
    ///     hourly_rate: Some(Decimal::new(20, 0)),
    ///     salary_per_period: None,
    ///     pay_frequency: PayFrequency::Biweekly,
    ///     annual_sick_days: 5,
    ///     annual_vacation_days: 10,
    ///     carryover: false,
    /// };
    /// assert!(employee.is_hourly());
    /// ```
    pub fn is_hourly(&self) -> bool {
        self.employment_type == EmploymentType::Hourly
    }
}
