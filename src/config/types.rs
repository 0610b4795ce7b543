//! Configuration types for the scheduling engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every structure has a
//! `Default` matching the shipped files, so the engine runs without them.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::Employee;

/// Months a recurring rule without an end date keeps generating for.
pub const DEFAULT_RECURRENCE_HORIZON_MONTHS: u32 = 3;

/// Longest span, in months, a recurring rule may cover.
pub const DEFAULT_MAX_RULE_SPAN_MONTHS: u32 = 24;

/// Hours charged for one full day of leave.
pub const DEFAULT_FULL_DAY_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Decimal places every derived hour value is rounded to.
pub const HOURS_DECIMAL_PLACES: u32 = 2;

/// Recurring generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecurrenceConfig {
    /// Horizon applied when a rule has no end date.
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
    /// Upper bound on `end_date - start_date` for any rule, explicit end or not.
    #[serde(default = "default_max_span_months")]
    pub max_span_months: u32,
}

fn default_horizon_months() -> u32 {
    DEFAULT_RECURRENCE_HORIZON_MONTHS
}

fn default_max_span_months() -> u32 {
    DEFAULT_MAX_RULE_SPAN_MONTHS
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_RECURRENCE_HORIZON_MONTHS,
            max_span_months: DEFAULT_MAX_RULE_SPAN_MONTHS,
        }
    }
}

/// Scheduling configuration from scheduling.yaml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SchedulingConfig {
    /// Recurring generation settings.
    #[serde(default)]
    pub recurrence: RecurrenceConfig,
}

/// What the ledger does when a debit exceeds the remaining balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeBalancePolicy {
    /// Apply the debit anyway and log a warning.
    #[default]
    Allow,
    /// Refuse the debit with an `InsufficientBalance` error.
    Reject,
}

/// Leave configuration from leave.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveConfig {
    /// Hours one full day of leave is worth.
    #[serde(default = "default_full_day_hours")]
    pub full_day_hours: Decimal,
    /// Handling of debits that exceed the remaining balance.
    #[serde(default)]
    pub negative_balance_policy: NegativeBalancePolicy,
}

fn default_full_day_hours() -> Decimal {
    DEFAULT_FULL_DAY_HOURS
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            full_day_hours: DEFAULT_FULL_DAY_HOURS,
            negative_balance_policy: NegativeBalancePolicy::Allow,
        }
    }
}

/// Directory seed from employees.yaml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeesConfig {
    /// Employees to register at startup.
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Scheduling settings.
    scheduling: SchedulingConfig,
    /// Leave settings.
    leave: LeaveConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(scheduling: SchedulingConfig, leave: LeaveConfig) -> Self {
        Self { scheduling, leave }
    }

    /// Returns the scheduling configuration.
    pub fn scheduling(&self) -> &SchedulingConfig {
        &self.scheduling
    }

    /// Returns the leave configuration.
    pub fn leave(&self) -> &LeaveConfig {
        &self.leave
    }

    /// Recurring generation settings.
    pub fn recurrence(&self) -> &RecurrenceConfig {
        &self.scheduling.recurrence
    }

    /// Months generated for rules without an end date.
    pub fn recurrence_horizon_months(&self) -> u32 {
        self.scheduling.recurrence.horizon_months
    }

    /// Longest span a recurring rule may cover, in months.
    pub fn max_rule_span_months(&self) -> u32 {
        self.scheduling.recurrence.max_span_months
    }

    /// Hours one full day of leave is worth.
    pub fn full_day_hours(&self) -> Decimal {
        self.leave.full_day_hours
    }

    /// Handling of debits that exceed the remaining balance.
    pub fn negative_balance_policy(&self) -> NegativeBalancePolicy {
        self.leave.negative_balance_policy
    }

    /// Returns a copy with a different negative balance policy.
    pub fn with_negative_balance_policy(mut self, policy: NegativeBalancePolicy) -> Self {
        self.leave.negative_balance_policy = policy;
        self
    }
}
