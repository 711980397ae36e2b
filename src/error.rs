// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types.
//!
//! | Type | Raised by | Variants |
//! |------|-----------|----------|
//! | [`TimeError`] | civil ↔ Julian conversions | `InvalidDate`, `OutOfRange` |
//! | [`SearchError`] | next-phase search | `BracketingExceeded`, `BisectionExceeded` |
//!
//! The phase model itself is total and never fails.

use thiserror::Error;

use crate::JulianDate;

/// Failure converting between civil timestamps and Julian Dates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeError {
    /// A strictly-constructed timestamp had a field outside its calendar range.
    #[error("invalid civil date {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")]
    InvalidDate {
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
    },
    /// The value cannot be represented as a calendar timestamp.
    #[error("{what} is outside the representable calendar range")]
    OutOfRange { what: String },
}

/// Failure of the bracket-and-bisect next-phase search.
///
/// Both kinds are recoverable: the caller decides how to present an unknown
/// date.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Coarse stepping did not pass the target phase within the step budget.
    #[error("phase {target} not bracketed within {steps} steps from {start}")]
    BracketingExceeded {
        start: JulianDate,
        target: f64,
        steps: usize,
    },
    /// The bracket did not narrow to the required precision in time.
    #[error("phase {target} not resolved within {iterations} bisections of [{low}, {high}]")]
    BisectionExceeded {
        low: JulianDate,
        high: JulianDate,
        target: f64,
        iterations: usize,
    },
}
