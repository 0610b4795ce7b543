//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

use super::types::{EmployeesConfig, EngineConfig, LeaveConfig, SchedulingConfig};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── scheduling.yaml  # Recurring generation horizon
/// ├── leave.yaml       # Full-day hours and negative balance policy
/// └── employees.yaml   # Optional directory seed
/// ```
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Full day: {} hours", loader.config().full_day_hours());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    employees: Vec<Employee>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `scheduling.yaml` or `leave.yaml` is missing
    /// - Any file contains invalid YAML
    /// - The recurrence horizon is longer than the maximum rule span
    ///
    /// A missing `employees.yaml` is not an error; the directory starts empty.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let scheduling_path = path.join("scheduling.yaml");
        let scheduling = Self::load_yaml::<SchedulingConfig>(&scheduling_path)?;
        let recurrence = &scheduling.recurrence;
        if recurrence.horizon_months > recurrence.max_span_months {
            return Err(EngineError::ConfigParseError {
                path: scheduling_path.display().to_string(),
                message: format!(
                    "horizon_months ({}) exceeds max_span_months ({})",
                    recurrence.horizon_months, recurrence.max_span_months
                ),
            });
        }
        let leave = Self::load_yaml::<LeaveConfig>(&path.join("leave.yaml"))?;

        let employees_path = path.join("employees.yaml");
        let employees = if employees_path.exists() {
            Self::load_yaml::<EmployeesConfig>(&employees_path)?.employees
        } else {
            Vec::new()
        };

        tracing::debug!(
            path = %path.display(),
            employees = employees.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(scheduling, leave),
            employees,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the employees seeded from `employees.yaml`.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Consumes the loader, returning the configuration and the directory seed.
    pub fn into_parts(self) -> (EngineConfig, Vec<Employee>) {
        (self.config, self.employees)
    }
}
