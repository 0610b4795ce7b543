//! Configuration loading and management for the Roster Engine.
//!
//! This module provides functionality to load engine policy from YAML files:
//! the recurring generation horizon, the hours a full day of leave is worth,
//! how negative leave balances are handled, and an optional employee seed.
//!
//! # Example
//!
//! ```no_run
//! use roster_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Horizon: {} months", config.config().recurrence_horizon_months());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_FULL_DAY_HOURS, DEFAULT_MAX_RULE_SPAN_MONTHS, DEFAULT_RECURRENCE_HORIZON_MONTHS,
    EmployeesConfig, EngineConfig, HOURS_DECIMAL_PLACES, LeaveConfig, NegativeBalancePolicy,
    RecurrenceConfig, SchedulingConfig,
};
