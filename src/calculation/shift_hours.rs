//! Shift duration and rounding helpers.
//!
//! Hours are never taken from input verbatim; they are always derived from
//! the start/end pair and rounded to [`HOURS_DECIMAL_PLACES`].

use chrono::NaiveTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::HOURS_DECIMAL_PLACES;
use crate::error::{EngineError, EngineResult};

/// Calculates the hours between `start` and `end` on the same day.
///
/// # Returns
///
/// The duration in hours rounded to two decimal places, or a
/// `Validation` error if `end` is not after `start`.
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::calculate_shift_hours;
/// use chrono::NaiveTime;
/// use rust_decimal::Decimal;
///
/// let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(12, 20, 0).unwrap();
/// assert_eq!(calculate_shift_hours(start, end).unwrap(), Decimal::new(333, 2)); // 3.33
///
/// assert!(calculate_shift_hours(end, start).is_err());
/// ```
pub fn calculate_shift_hours(start: NaiveTime, end: NaiveTime) -> EngineResult<Decimal> {
    if end <= start {
        return Err(EngineError::validation(
            "time range",
            format!("end time {} must be after start time {}", end, start),
        ));
    }

    let seconds = (end - start).num_seconds();
    Ok(round_hours(Decimal::new(seconds, 0) / Decimal::new(3600, 0)))
}

/// Rounds an hour value to two decimal places, half away from zero.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(HOURS_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a monetary amount to cents, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
