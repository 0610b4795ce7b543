//! Error types for the Roster Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while scheduling shifts,
//! reconciling leave and closing pay periods.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Roster Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// Conflict detection is deliberately absent: a detected conflict is a
/// result returned to the caller, not a failure.
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "shift".to_string(),
///     id: "b4f1".to_string(),
/// };
/// assert_eq!(error.to_string(), "shift not found: b4f1");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Input was malformed (bad time range, missing reason, bad weekday...).
    #[error("Invalid {field}: {message}")]
    Validation {
        /// The field or input that failed validation.
        field: String,
        /// A description of what made the input invalid.
        message: String,
    },

    /// A date range ended before it started.
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidRange {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// A state transition was attempted from a state that does not permit it.
    #[error("Cannot {action} {entity} '{id}' in state {state}")]
    InvalidState {
        /// The kind of record (e.g. "shift", "pay period").
        entity: String,
        /// The record identifier.
        id: String,
        /// The record's current state.
        state: String,
        /// The transition that was attempted.
        action: String,
    },

    /// A record with the given identifier does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// The caller is not permitted to perform the operation.
    #[error("Caller '{caller}' is not permitted to {action}")]
    Forbidden {
        /// The caller's employee id.
        caller: String,
        /// The operation that was refused.
        action: String,
    },

    /// A debit would take a balance below zero while negative balances are rejected.
    #[error(
        "Insufficient {bucket} balance for employee '{employee_id}': requested {requested}, available {available}"
    )]
    InsufficientBalance {
        /// The employee whose balance was insufficient.
        employee_id: String,
        /// The leave bucket ("sick" or "vacation").
        bucket: String,
        /// The hours requested.
        requested: Decimal,
        /// The hours remaining before the debit.
        available: Decimal,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
