//! Shared fixtures for the engine's unit tests.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::models::{Employee, EmploymentType, PayFrequency};

use super::directory::{EmployeeDirectory, InMemoryDirectory};

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub(crate) fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn hourly(id: &str, rate: &str) -> Employee {
    Employee {
        id: id.to_string(),
        display_name: format!("Educator {}", id),
        employment_type: EmploymentType::Hourly,
        hourly_rate: Some(dec(rate)),
        salary_per_period: None,
        pay_frequency: PayFrequency::Biweekly,
        annual_sick_days: 5,
        annual_vacation_days: 10,
        carryover: false,
    }
}

/// emp_001 and emp_002 are hourly at $20 and $24.50; adm_001 is salaried.
pub(crate) fn staff() -> Vec<Employee> {
    vec![
        hourly("emp_001", "20"),
        hourly("emp_002", "24.50"),
        Employee {
            id: "adm_001".to_string(),
            display_name: "Centre Director".to_string(),
            employment_type: EmploymentType::Salary,
            hourly_rate: None,
            salary_per_period: Some(dec("2150.00")),
            pay_frequency: PayFrequency::Biweekly,
            annual_sick_days: 8,
            annual_vacation_days: 20,
            carryover: true,
        },
    ]
}

pub(crate) fn directory_with_staff() -> Arc<dyn EmployeeDirectory> {
    Arc::new(InMemoryDirectory::from_employees(staff()))
}
