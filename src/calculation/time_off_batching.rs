//! Time-off submission batching.
//!
//! When an employee picks several calendar days at once, contiguous
//! full days are merged into a single request spanning the run. Half days
//! and isolated full days each become their own single-day request.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{DayPortion, DaySelection};

/// One request to be created from a batch of day selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpan {
    /// First day of the request.
    pub start_date: NaiveDate,
    /// Last day of the request, inclusive.
    pub end_date: NaiveDate,
    /// Full days or a single half day.
    pub portion: DayPortion,
}

/// Groups day selections into request spans.
///
/// Selections may arrive in any order; spans are returned sorted by start
/// date.
///
/// # Errors
///
/// - `Validation` if `selections` is empty
/// - `Validation` if the same date is selected twice
///
/// # Examples
///
/// ```
/// use roster_engine::calculation::batch_day_selections;
/// use roster_engine::models::{DayPortion, DaySelection};
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
/// let selections = vec![
///     DaySelection { date: d(2), portion: DayPortion::Full },
///     DaySelection { date: d(3), portion: DayPortion::Full },
///     DaySelection { date: d(4), portion: DayPortion::Full },
/// ];
///
/// let spans = batch_day_selections(&selections).unwrap();
/// assert_eq!(spans.len(), 1);
/// assert_eq!((spans[0].start_date, spans[0].end_date), (d(2), d(4)));
/// ```
pub fn batch_day_selections(selections: &[DaySelection]) -> EngineResult<Vec<RequestSpan>> {
    if selections.is_empty() {
        return Err(EngineError::validation(
            "selections",
            "at least one day must be selected",
        ));
    }

    let mut by_date = BTreeMap::new();
    for selection in selections {
        if by_date.insert(selection.date, selection.portion).is_some() {
            return Err(EngineError::validation(
                "selections",
                format!("{} is selected more than once", selection.date),
            ));
        }
    }

    let mut spans: Vec<RequestSpan> = Vec::new();
    for (date, portion) in by_date {
        if portion == DayPortion::Full {
            if let Some(last) = spans.last_mut() {
                if last.portion == DayPortion::Full && last.end_date + Duration::days(1) == date {
                    last.end_date = date;
                    continue;
                }
            }
        }

        spans.push(RequestSpan {
            start_date: date,
            end_date: date,
            portion,
        });
    }

    Ok(spans)
}
