//! Leave balance ledger.
//!
//! The ledger is the only writer of [`LeaveBalance`] records. Debits and
//! credits on the same employee are serialized by the record's mutex, so
//! two concurrent declines charge the balance one after the other.
//!
//! Under [`NegativeBalancePolicy::Allow`] a debit may take a bucket below
//! zero and a warning is logged; under [`NegativeBalancePolicy::Reject`]
//! such a debit fails with `InsufficientBalance` and nothing changes.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::calculation::round_hours;
use crate::config::NegativeBalancePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeaveBalance, LeaveBucket};

use super::store::{Record, Store, lock};

/// Owns every employee's sick and vacation hour balances.
pub struct LeaveLedger {
    balances: Store<String, LeaveBalance>,
    policy: NegativeBalancePolicy,
}

impl LeaveLedger {
    /// Creates an empty ledger applying `policy` to overdrawing debits.
    pub fn new(policy: NegativeBalancePolicy) -> Self {
        Self {
            balances: Store::new(),
            policy,
        }
    }

    /// The policy applied to overdrawing debits.
    pub fn policy(&self) -> NegativeBalancePolicy {
        self.policy
    }

    /// Creates the employee's balance at their annual allotment.
    ///
    /// Each bucket starts at `annual_days × full_day_hours`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the employee already has a balance.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster_engine::config::NegativeBalancePolicy;
    /// use roster_engine::engine::LeaveLedger;
    /// use roster_engine::models::{Employee, EmploymentType, PayFrequency};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     display_name: "Ada".to_string(),
    ///     employment_type: EmploymentType::Hourly,
    ///     hourly_rate: Some(Decimal::new(20, 0)),
    ///     salary_per_period: None,
    ///     pay_frequency: PayFrequency::Biweekly,
    ///     annual_sick_days: 5,
    ///     annual_vacation_days: 10,
    ///     carryover: false,
    /// };
    ///
    /// let ledger = LeaveLedger::new(NegativeBalancePolicy::Allow);
    /// let balance = ledger.provision(&employee, Decimal::new(8, 0)).unwrap();
    /// assert_eq!(balance.sick_hours_remaining, Decimal::new(40, 0));
    /// assert_eq!(balance.vacation_hours_remaining, Decimal::new(80, 0));
    /// ```
    pub fn provision(&self, employee: &Employee, full_day_hours: Decimal) -> EngineResult<LeaveBalance> {
        let balance = LeaveBalance {
            employee_id: employee.id.clone(),
            sick_hours_remaining: allotment(employee.annual_sick_days, full_day_hours),
            vacation_hours_remaining: allotment(employee.annual_vacation_days, full_day_hours),
        };

        if !self.balances.insert_new(employee.id.clone(), balance.clone()) {
            return Err(EngineError::InvalidState {
                entity: "leave balance".to_string(),
                id: employee.id.clone(),
                state: "provisioned".to_string(),
                action: "provision".to_string(),
            });
        }

        info!(
            employee_id = %employee.id,
            sick_hours = %balance.sick_hours_remaining,
            vacation_hours = %balance.vacation_hours_remaining,
            "Provisioned leave balance"
        );
        Ok(balance)
    }

    /// Returns true if the employee has a balance.
    pub fn is_provisioned(&self, employee_id: &str) -> bool {
        self.balances.get(employee_id).is_some()
    }

    /// Reads a snapshot of the employee's balance.
    pub fn balance(&self, employee_id: &str) -> EngineResult<LeaveBalance> {
        let record = self.record(employee_id)?;
        let balance = lock(&record).clone();
        Ok(balance)
    }

    /// Subtracts `hours` from one bucket.
    ///
    /// # Errors
    ///
    /// - `Validation` if `hours` is negative
    /// - `NotFound` if the employee has no balance
    /// - `InsufficientBalance` if the debit overdraws the bucket under the
    ///   reject policy
    pub fn debit(&self, employee_id: &str, bucket: LeaveBucket, hours: Decimal) -> EngineResult<LeaveBalance> {
        require_non_negative(hours)?;
        let record = self.record(employee_id)?;
        let mut balance = lock(&record);

        let available = balance.remaining(bucket);
        let remaining = available - hours;
        if remaining < Decimal::ZERO {
            match self.policy {
                NegativeBalancePolicy::Reject => {
                    return Err(EngineError::InsufficientBalance {
                        employee_id: employee_id.to_string(),
                        bucket: bucket.to_string(),
                        requested: hours,
                        available,
                    });
                }
                NegativeBalancePolicy::Allow => {
                    warn!(
                        employee_id = %employee_id,
                        bucket = %bucket,
                        requested = %hours,
                        available = %available,
                        "Leave balance going negative"
                    );
                }
            }
        }

        *balance.remaining_mut(bucket) = remaining;
        info!(
            employee_id = %employee_id,
            bucket = %bucket,
            hours = %hours,
            remaining = %remaining,
            "Debited leave balance"
        );
        Ok(balance.clone())
    }

    /// Adds `hours` to one bucket.
    ///
    /// # Errors
    ///
    /// - `Validation` if `hours` is negative
    /// - `NotFound` if the employee has no balance
    pub fn credit(&self, employee_id: &str, bucket: LeaveBucket, hours: Decimal) -> EngineResult<LeaveBalance> {
        require_non_negative(hours)?;
        let record = self.record(employee_id)?;
        let mut balance = lock(&record);

        let remaining = balance.remaining(bucket) + hours;
        *balance.remaining_mut(bucket) = remaining;
        info!(
            employee_id = %employee_id,
            bucket = %bucket,
            hours = %hours,
            remaining = %remaining,
            "Credited leave balance"
        );
        Ok(balance.clone())
    }

    /// Applies the annual boundary to one employee's balance.
    ///
    /// With carryover, the new allotment is added to whatever remains (a
    /// negative remainder is forgiven, not carried). Without carryover, each
    /// bucket resets to the allotment.
    pub fn roll_over_year(&self, employee: &Employee, full_day_hours: Decimal) -> EngineResult<LeaveBalance> {
        let record = self.record(&employee.id)?;
        let mut balance = lock(&record);

        let buckets = [
            (LeaveBucket::Sick, allotment(employee.annual_sick_days, full_day_hours)),
            (LeaveBucket::Vacation, allotment(employee.annual_vacation_days, full_day_hours)),
        ];
        for (bucket, annual) in buckets {
            let carried = if employee.carryover {
                balance.remaining(bucket).max(Decimal::ZERO)
            } else {
                Decimal::ZERO
            };
            *balance.remaining_mut(bucket) = carried + annual;
        }

        info!(
            employee_id = %employee.id,
            carryover = employee.carryover,
            sick_hours = %balance.sick_hours_remaining,
            vacation_hours = %balance.vacation_hours_remaining,
            "Rolled over leave year"
        );
        Ok(balance.clone())
    }

    fn record(&self, employee_id: &str) -> EngineResult<Record<LeaveBalance>> {
        self.balances
            .get(employee_id)
            .ok_or_else(|| EngineError::not_found("leave balance", employee_id))
    }
}

fn allotment(days: u32, full_day_hours: Decimal) -> Decimal {
    round_hours(Decimal::from(days) * full_day_hours)
}

fn require_non_negative(hours: Decimal) -> EngineResult<()> {
    if hours < Decimal::ZERO {
        return Err(EngineError::validation(
            "hours",
            format!("{} is negative", hours),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmploymentType, PayFrequency};
    use std::str::FromStr;
    use std::sync::Arc;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(carryover: bool) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            display_name: "Ada".to_string(),
            employment_type: EmploymentType::Hourly,
            hourly_rate: Some(dec("20")),
            salary_per_period: None,
            pay_frequency: PayFrequency::Biweekly,
            annual_sick_days: 5,
            annual_vacation_days: 10,
            carryover,
        }
    }

    fn provisioned(policy: NegativeBalancePolicy) -> LeaveLedger {
        let ledger = LeaveLedger::new(policy);
        ledger.provision(&employee(false), dec("8")).unwrap();
        ledger
    }

    // ==========================================================================
    // LL-001: provisioning
    // ==========================================================================
    #[test]
    fn test_ll_001_provision_twice_is_invalid_state() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        let result = ledger.provision(&employee(false), dec("8"));
        assert!(matches!(result, Err(EngineError::InvalidState { .. })));
        assert!(ledger.is_provisioned("emp_001"));
    }

    // ==========================================================================
    // LL-002: debit and credit
    // ==========================================================================
    #[test]
    fn test_ll_002_debit_reduces_only_the_bucket() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        let balance = ledger.debit("emp_001", LeaveBucket::Sick, dec("4")).unwrap();
        assert_eq!(balance.sick_hours_remaining, dec("36"));
        assert_eq!(balance.vacation_hours_remaining, dec("80"));
    }

    #[test]
    fn test_ll_003_credit_increases_bucket() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        let balance = ledger.credit("emp_001", LeaveBucket::Vacation, dec("2.5")).unwrap();
        assert_eq!(balance.vacation_hours_remaining, dec("82.5"));
    }

    #[test]
    fn test_ll_004_negative_hours_rejected() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        assert!(matches!(
            ledger.debit("emp_001", LeaveBucket::Sick, dec("-1")),
            Err(EngineError::Validation { .. })
        ));
        assert!(matches!(
            ledger.credit("emp_001", LeaveBucket::Sick, dec("-1")),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_ll_005_unknown_employee_not_found() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        assert!(matches!(
            ledger.debit("ghost", LeaveBucket::Sick, dec("1")),
            Err(EngineError::NotFound { .. })
        ));
    }

    // ==========================================================================
    // LL-006: negative balance policy
    // ==========================================================================
    #[test]
    fn test_ll_006_allow_policy_goes_negative() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        let balance = ledger.debit("emp_001", LeaveBucket::Sick, dec("50")).unwrap();
        assert_eq!(balance.sick_hours_remaining, dec("-10"));
    }

    #[test]
    fn test_ll_007_reject_policy_refuses_and_leaves_balance() {
        let ledger = provisioned(NegativeBalancePolicy::Reject);
        match ledger.debit("emp_001", LeaveBucket::Sick, dec("50")) {
            Err(EngineError::InsufficientBalance {
                requested,
                available,
                bucket,
                ..
            }) => {
                assert_eq!(requested, dec("50"));
                assert_eq!(available, dec("40"));
                assert_eq!(bucket, "sick");
            }
            other => panic!("Expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(ledger.balance("emp_001").unwrap().sick_hours_remaining, dec("40"));
    }

    #[test]
    fn test_ll_008_reject_policy_allows_exact_drain() {
        let ledger = provisioned(NegativeBalancePolicy::Reject);
        let balance = ledger.debit("emp_001", LeaveBucket::Sick, dec("40")).unwrap();
        assert_eq!(balance.sick_hours_remaining, Decimal::ZERO);
    }

    // ==========================================================================
    // LL-009: annual rollover
    // ==========================================================================
    #[test]
    fn test_ll_009_rollover_without_carryover_resets() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        ledger.debit("emp_001", LeaveBucket::Vacation, dec("30")).unwrap();

        let balance = ledger.roll_over_year(&employee(false), dec("8")).unwrap();
        assert_eq!(balance.vacation_hours_remaining, dec("80"));
        assert_eq!(balance.sick_hours_remaining, dec("40"));
    }

    #[test]
    fn test_ll_010_rollover_with_carryover_adds_remainder() {
        let ledger = provisioned(NegativeBalancePolicy::Allow);
        ledger.debit("emp_001", LeaveBucket::Vacation, dec("30")).unwrap();
        ledger.debit("emp_001", LeaveBucket::Sick, dec("45")).unwrap();

        let balance = ledger.roll_over_year(&employee(true), dec("8")).unwrap();
        assert_eq!(balance.vacation_hours_remaining, dec("130"));
        // -5 sick hours are not carried
        assert_eq!(balance.sick_hours_remaining, dec("40"));
    }

    // ==========================================================================
    // LL-011: concurrent debits are applied serially
    // ==========================================================================
    #[test]
    fn test_ll_011_concurrent_debits_all_applied() {
        let ledger = Arc::new(provisioned(NegativeBalancePolicy::Allow));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        ledger.debit("emp_001", LeaveBucket::Vacation, dec("0.5")).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(
            ledger.balance("emp_001").unwrap().vacation_hours_remaining,
            dec("40")
        );
    }

    #[test]
    fn test_ll_012_concurrent_reject_never_overdraws() {
        let ledger = Arc::new(provisioned(NegativeBalancePolicy::Reject));
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.debit("emp_001", LeaveBucket::Sick, dec("8")).is_ok())
            })
            .collect();
        let succeeded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(succeeded, 5);
        assert_eq!(ledger.balance("emp_001").unwrap().sick_hours_remaining, Decimal::ZERO);
    }
}
