//! Employee directory seam.
//!
//! Employees are owned by an external directory service. The engine reads
//! them through [`EmployeeDirectory`]; [`InMemoryDirectory`] backs the
//! server binary and the tests.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

/// Read access to employee records.
pub trait EmployeeDirectory: Send + Sync {
    /// Looks up one employee.
    fn get(&self, employee_id: &str) -> Option<Employee>;

    /// Lists every employee, ordered by id.
    fn list(&self) -> Vec<Employee>;

    /// Looks up one employee, failing with `NotFound` if absent.
    fn require(&self, employee_id: &str) -> EngineResult<Employee> {
        self.get(employee_id)
            .ok_or_else(|| EngineError::not_found("employee", employee_id))
    }
}

/// A directory held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    employees: RwLock<BTreeMap<String, Employee>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory seeded with `employees`.
    pub fn from_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let directory = Self::new();
        for employee in employees {
            directory.upsert(employee);
        }
        directory
    }

    /// Inserts or replaces an employee, returning the previous record.
    pub fn upsert(&self, employee: Employee) -> Option<Employee> {
        self.employees
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(employee.id.clone(), employee)
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn get(&self, employee_id: &str) -> Option<Employee> {
        self.employees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(employee_id)
            .cloned()
    }

    fn list(&self) -> Vec<Employee> {
        self.employees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentType, PayFrequency};
    use rust_decimal::Decimal;

    fn employee(id: &str) -> Employee {
        Employee {
            id: id.to_string(),
            display_name: id.to_uppercase(),
            employment_type: EmploymentType::Hourly,
            hourly_rate: Some(Decimal::new(20, 0)),
            salary_per_period: None,
            pay_frequency: PayFrequency::Weekly,
            annual_sick_days: 5,
            annual_vacation_days: 10,
            carryover: false,
        }
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let directory = InMemoryDirectory::from_employees([employee("emp_b"), employee("emp_a")]);
        let ids: Vec<_> = directory.list().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["emp_a", "emp_b"]);
    }

    #[test]
    fn test_require_unknown_is_not_found() {
        let directory = InMemoryDirectory::new();
        match directory.require("ghost") {
            Err(EngineError::NotFound { entity, id }) => {
                assert_eq!(entity, "employee");
                assert_eq!(id, "ghost");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_upsert_replaces() {
        let directory = InMemoryDirectory::new();
        assert!(directory.upsert(employee("emp_a")).is_none());

        let mut updated = employee("emp_a");
        updated.hourly_rate = Some(Decimal::new(25, 0));
        let previous = directory.upsert(updated).unwrap();

        assert_eq!(previous.hourly_rate, Some(Decimal::new(20, 0)));
        assert_eq!(
            directory.get("emp_a").unwrap().hourly_rate,
            Some(Decimal::new(25, 0))
        );
    }
}
