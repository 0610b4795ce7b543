//! Caller identity and access rules.
//!
//! Authentication happens outside the engine; every operation receives the
//! already authenticated [`Caller`] and checks it against these rules:
//!
//! - admins assign and generate shifts, decide time off and run payroll
//! - the owning employee accepts shifts and submits or withdraws time off
//! - declines and reads are open to the owner or an admin

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The role a caller acts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Centre administrator.
    Admin,
    /// Rostered staff member.
    Employee,
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(EngineError::validation(
                "role",
                format!("'{}' is not one of admin, employee", other),
            )),
        }
    }
}

/// The authenticated identity an operation runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// The caller's employee id.
    pub employee_id: String,
    /// The role the caller acts in.
    pub role: Role,
}

impl Caller {
    /// Creates an admin caller.
    pub fn admin(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            role: Role::Admin,
        }
    }

    /// Creates an employee caller.
    pub fn employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            role: Role::Employee,
        }
    }

    /// Returns true if the caller acts as an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Succeeds only for admins.
    pub fn require_admin(&self, action: &str) -> EngineResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(self.forbidden(action))
        }
    }

    /// Succeeds only if the caller is `owner_id`, whatever their role.
    pub fn require_owner(&self, owner_id: &str, action: &str) -> EngineResult<()> {
        if self.employee_id == owner_id {
            Ok(())
        } else {
            Err(self.forbidden(action))
        }
    }

    /// Succeeds for `owner_id` or any admin.
    pub fn require_owner_or_admin(&self, owner_id: &str, action: &str) -> EngineResult<()> {
        if self.is_admin() || self.employee_id == owner_id {
            Ok(())
        } else {
            Err(self.forbidden(action))
        }
    }

    /// Narrows a listing to the records the caller may see.
    ///
    /// Admins see whatever they ask for. Employees see only their own
    /// records; asking for someone else's is `Forbidden`.
    pub fn visible_employee(&self, requested: Option<&str>, action: &str) -> EngineResult<Option<String>> {
        match requested {
            _ if self.is_admin() => Ok(requested.map(str::to_string)),
            Some(other) if other != self.employee_id => Err(self.forbidden(action)),
            _ => Ok(Some(self.employee_id.clone())),
        }
    }

    fn forbidden(&self, action: &str) -> EngineError {
        EngineError::Forbidden {
            caller: self.employee_id.clone(),
            action: action.to_string(),
        }
    }
}
