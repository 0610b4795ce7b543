//! Shift scheduling and leave balance engine for childcare centres.
//!
//! This crate expands recurring weekly rosters into dated shifts, detects
//! overlapping assignments, runs the shift acceptance and time-off
//! workflows against each employee's sick and vacation balances, and
//! aggregates worked hours into payroll when a pay period closes.
//!
//! The pure algorithms live in [`calculation`]; the stateful services that
//! own records and enforce access rules live in [`engine`]; [`api`] serves
//! the engine over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
