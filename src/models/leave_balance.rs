//! Leave balance model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The balance a leave debit or credit is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveBucket {
    /// Sick hours.
    Sick,
    /// Vacation hours.
    Vacation,
}

impl std::fmt::Display for LeaveBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveBucket::Sick => write!(f, "sick"),
            LeaveBucket::Vacation => write!(f, "vacation"),
        }
    }
}

/// Remaining sick and vacation hours for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The employee this balance belongs to.
    pub employee_id: String,
    /// Sick hours left to draw against.
    pub sick_hours_remaining: Decimal,
    /// Vacation hours left to draw against.
    pub vacation_hours_remaining: Decimal,
}

impl LeaveBalance {
    /// Returns the hours remaining in `bucket`.
    pub fn remaining(&self, bucket: LeaveBucket) -> Decimal {
        match bucket {
            LeaveBucket::Sick => self.sick_hours_remaining,
            LeaveBucket::Vacation => self.vacation_hours_remaining,
        }
    }

    /// Returns a mutable reference to the hours remaining in `bucket`.
    pub(crate) fn remaining_mut(&mut self, bucket: LeaveBucket) -> &mut Decimal {
        match bucket {
            LeaveBucket::Sick => &mut self.sick_hours_remaining,
            LeaveBucket::Vacation => &mut self.vacation_hours_remaining,
        }
    }
}
