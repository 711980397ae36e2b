// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Next-phase search
//!
//! Inverts the [phase model](crate::phase) numerically: given a start time
//! and a target phase fraction, finds the first later instant at which the
//! Moon reaches that phase.
//!
//! The search runs in two bounded stages:
//!
//! 1. **Bracketing** — step forward by [`COARSE_STEP`] until the phase has
//!    advanced past the target, at most [`MAX_BRACKET_STEPS`] times.
//! 2. **Bisection** — halve the bracket until the phase is within
//!    [`PRECISION`] of the target, at most [`MAX_BISECTION_STEPS`] times.
//!
//! Phase lives on a circle, so both stages compare progress with
//! [`forward_distance`] instead of plain subtraction.
//!
//! ```
//! use lunoch::{search, CivilTimestamp};
//!
//! let start = CivilTimestamp::new(2024, 1, 1, 0, 0, 0).unwrap().to_astronomical_time();
//! let full = search::next_full_moon(start).unwrap();
//! let when = CivilTimestamp::from_astronomical_time(full).unwrap();
//! assert_eq!((when.month(), when.day()), (1, 25));
//! ```

use qtty::Days;
use tracing::{debug, trace};

use crate::error::SearchError;
use crate::phase::evaluate;
use crate::JulianDate;

/// Coarse forward step of the bracketing stage.
pub const COARSE_STEP: Days = Days::new(10.0);

/// Bracketing budget; 50 days comfortably exceeds one synodic month.
pub const MAX_BRACKET_STEPS: usize = 5;

/// Bisection budget.
pub const MAX_BISECTION_STEPS: usize = 50;

/// Convergence tolerance as a fraction of a lunation: half a second of a
/// 30-day cycle.
///
/// This is far finer than the phase model's own accuracy; it bounds the
/// numerical search, not the physical error.
pub const PRECISION: f64 = 1.0 / (2.0 * 30.0 * 24.0 * 3600.0);

/// Reduces a phase fraction into `[0, 1)`.
#[inline]
pub fn fix_fraction(x: f64) -> f64 {
    let reduced = x.rem_euclid(1.0);
    if reduced >= 1.0 {
        0.0
    } else {
        reduced
    }
}

/// How far `to` lies ahead of `from` going forward round the cycle, in `[0, 1)`.
#[inline]
pub fn forward_distance(from: f64, to: f64) -> f64 {
    fix_fraction(to - from)
}

/// Shortest distance between two phases in either direction, in `[0, 0.5]`.
#[inline]
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let d = forward_distance(a, b);
    d.min(1.0 - d)
}

/// Search parameters.
///
/// [`PhaseSearch::default`] uses the named module constants; the builders
/// exist for callers that need a different trade-off.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhaseSearch {
    step: Days,
    max_bracket_steps: usize,
    max_bisection_steps: usize,
    precision: f64,
}

impl Default for PhaseSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSearch {
    pub const fn new() -> Self {
        Self {
            step: COARSE_STEP,
            max_bracket_steps: MAX_BRACKET_STEPS,
            max_bisection_steps: MAX_BISECTION_STEPS,
            precision: PRECISION,
        }
    }

    pub const fn with_step(mut self, step: Days) -> Self {
        self.step = step;
        self
    }

    pub const fn with_max_bracket_steps(mut self, steps: usize) -> Self {
        self.max_bracket_steps = steps;
        self
    }

    pub const fn with_max_bisection_steps(mut self, steps: usize) -> Self {
        self.max_bisection_steps = steps;
        self
    }

    pub const fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    pub const fn step(&self) -> Days {
        self.step
    }

    pub const fn precision(&self) -> f64 {
        self.precision
    }

    // NaN never converges.
    #[inline]
    fn converged(&self, phase: f64, target: f64) -> bool {
        circular_distance(phase, target) <= self.precision
    }

    /// First instant at or after `start` whose phase is within the precision
    /// of `target`.
    ///
    /// `target` is reduced into `[0, 1)` first, so `1.0` and `0.0` both ask
    /// for the next new Moon.
    pub fn find_next(&self, start: JulianDate, target: f64) -> Result<JulianDate, SearchError> {
        let target = fix_fraction(target);
        let mut phase = evaluate(start).phase;
        if self.converged(phase, target) {
            return Ok(start);
        }

        // Bracketing: `low` always sits before the crossing, `high` is the
        // latest evaluated instant.
        let mut low_phase = phase;
        let mut low = start;
        let mut high = start;
        let mut steps = 0;
        while forward_distance(low_phase, phase) < forward_distance(low_phase, target) {
            steps += 1;
            if steps > self.max_bracket_steps {
                debug!(%start, target, steps = self.max_bracket_steps, "phase not bracketed");
                return Err(SearchError::BracketingExceeded {
                    start,
                    target,
                    steps: self.max_bracket_steps,
                });
            }
            low = high;
            low_phase = phase;
            high += self.step;
            phase = evaluate(high).phase;
            trace!(%high, phase, "bracketing step");
        }
        debug!(%low, %high, target, steps, "phase crossing bracketed");

        let mut t = high;
        let mut iterations = 0;
        while !self.converged(phase, target) {
            iterations += 1;
            if iterations > self.max_bisection_steps {
                debug!(
                    %low,
                    %high,
                    target,
                    iterations = self.max_bisection_steps,
                    "bisection did not converge"
                );
                return Err(SearchError::BisectionExceeded {
                    low,
                    high,
                    target,
                    iterations: self.max_bisection_steps,
                });
            }
            t = low.mean(high);
            phase = evaluate(t).phase;
            if forward_distance(low_phase, phase) < forward_distance(low_phase, target) {
                low = t;
                low_phase = phase;
            } else {
                high = t;
            }
            trace!(%t, phase, "bisection step");
        }
        debug!(%t, target, iterations, "phase search converged");
        Ok(t)
    }
}

/// Next instant at or after `start` when the Moon reaches `target_phase`.
pub fn find_next_phase(start: JulianDate, target_phase: f64) -> Result<JulianDate, SearchError> {
    PhaseSearch::new().find_next(start, target_phase)
}

/// Next new Moon at or after `start`.
pub fn next_new_moon(start: JulianDate) -> Result<JulianDate, SearchError> {
    find_next_phase(start, 0.0)
}

/// Next full Moon at or after `start`.
pub fn next_full_moon(start: JulianDate) -> Result<JulianDate, SearchError> {
    find_next_phase(start, 0.5)
}

/// The next new and full Moons after a given instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UpcomingPhases {
    pub new_moon: JulianDate,
    pub full_moon: JulianDate,
}

impl UpcomingPhases {
    /// `true` when the new Moon comes before the full Moon.
    #[inline]
    pub fn new_moon_first(&self) -> bool {
        self.new_moon < self.full_moon
    }
}

/// Searches both the next new Moon and the next full Moon from `start`.
pub fn upcoming(start: JulianDate) -> Result<UpcomingPhases, SearchError> {
    Ok(UpcomingPhases {
        new_moon: next_new_moon(start)?,
        full_moon: next_full_moon(start)?,
    })
}

/// Brown lunation number of the lunation beginning with `new_moon`.
///
/// Lunation 1 began on 1923 January 16.  `new_moon` should be a new-Moon
/// instant, e.g. the result of [`next_new_moon`]; the week of slack in the
/// formula absorbs the difference between true and mean new Moons.
pub fn lunation_number(new_moon: JulianDate) -> i64 {
    let months = (new_moon + Days::new(7.0)).synodic_months_since_lunation_base();
    months.floor() as i64 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CivilTimestamp;

    fn jd(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> JulianDate {
        CivilTimestamp::new(y, mo, d, h, mi, 0)
            .unwrap()
            .to_astronomical_time()
    }

    fn hours_between(a: JulianDate, b: JulianDate) -> f64 {
        (a - b).value().abs() * 24.0
    }

    #[test]
    fn forward_distance_wraps_round_the_cycle() {
        assert!((forward_distance(0.9, 0.1) - 0.2).abs() < 1e-12);
        assert!((forward_distance(0.1, 0.9) - 0.8).abs() < 1e-12);
        assert_eq!(forward_distance(0.3, 0.3), 0.0);
        assert!((forward_distance(0.75, 0.0) - 0.25).abs() < 1e-12);
        assert!((circular_distance(0.99, 0.01) - 0.02).abs() < 1e-12);
        assert!((circular_distance(0.01, 0.99) - 0.02).abs() < 1e-12);
        assert_eq!(fix_fraction(1.0), 0.0);
        assert!((fix_fraction(-0.25) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn default_configuration_uses_named_constants() {
        let search = PhaseSearch::default();
        assert_eq!(search, PhaseSearch::new());
        assert_eq!(search.step(), Days::new(10.0));
        assert_eq!(search.precision(), 1.0 / 5_184_000.0);
    }

    #[test]
    fn full_moon_after_reference_new_moon() {
        let start = jd(2000, 1, 7, 0, 0);
        let full = find_next_phase(start, 0.5).unwrap();
        let elapsed = full - start;
        assert!((elapsed - JulianDate::SYNODIC_MONTH / 2.0).abs() < Days::new(1.0));
        // USNO: 2000-01-21 04:40 UTC.
        assert!(hours_between(full, jd(2000, 1, 21, 4, 40)) < 1.0);
        assert!(circular_distance(evaluate(full).phase, 0.5) <= PRECISION);
    }

    #[test]
    fn new_moon_target_one_equals_zero() {
        let start = jd(2000, 1, 7, 0, 0);
        let a = find_next_phase(start, 0.0).unwrap();
        let b = find_next_phase(start, 1.0).unwrap();
        assert_eq!(a, b);
        // USNO: 2000-02-05 13:03 UTC.
        assert!(hours_between(a, jd(2000, 2, 5, 13, 3)) < 1.0);
    }

    #[test]
    fn quarters_land_on_known_dates() {
        let start = jd(2000, 1, 7, 0, 0);
        let first = find_next_phase(start, 0.25).unwrap();
        let last = find_next_phase(start, 0.75).unwrap();
        // USNO: 2000-01-14 13:34 and 2000-01-28 07:57 UTC.
        assert!(hours_between(first, jd(2000, 1, 14, 13, 34)) < 1.0);
        assert!(hours_between(last, jd(2000, 1, 28, 7, 57)) < 1.0);
    }

    #[test]
    fn search_is_not_before_start_and_is_first_crossing() {
        let start = jd(2021, 5, 3, 6, 0);
        for target in [0.0, 0.1, 0.33, 0.5, 0.9] {
            let found = find_next_phase(start, target).unwrap();
            assert!(found >= start);
            assert!(circular_distance(evaluate(found).phase, target) <= PRECISION);

            let mut t = start;
            while t < found - Days::new(0.001) {
                assert!(
                    circular_distance(evaluate(t).phase, target) > PRECISION,
                    "earlier crossing of {target} at {t}"
                );
                t += Days::new(0.01);
            }
        }
    }

    #[test]
    fn start_already_at_target_returns_start() {
        let start = jd(2010, 3, 1, 0, 0);
        let target = evaluate(start).phase;
        assert_eq!(find_next_phase(start, target).unwrap(), start);
    }

    #[test]
    fn target_just_behind_start_waits_a_full_cycle() {
        let start = jd(2010, 3, 1, 0, 0);
        let target = fix_fraction(evaluate(start).phase - 0.01);
        let found = find_next_phase(start, target).unwrap();
        let elapsed = (found - start).value();
        assert!((28.0..30.5).contains(&elapsed), "elapsed {elapsed}");
    }

    #[test]
    fn short_steps_exhaust_the_bracketing_budget() {
        let start = jd(2000, 1, 7, 0, 0);
        let search = PhaseSearch::new().with_step(Days::new(0.5));
        let target = fix_fraction(evaluate(start).phase + 0.5);
        assert_eq!(
            search.find_next(start, target),
            Err(SearchError::BracketingExceeded {
                start,
                target,
                steps: MAX_BRACKET_STEPS,
            })
        );
    }

    #[test]
    fn tight_budget_exhausts_bisection() {
        let start = jd(2000, 1, 7, 0, 0);
        let search = PhaseSearch::new().with_max_bisection_steps(3);
        assert!(matches!(
            search.find_next(start, 0.5),
            Err(SearchError::BisectionExceeded { iterations: 3, .. })
        ));
    }

    #[test]
    fn looser_precision_converges_sooner_and_nearby() {
        let start = jd(2000, 1, 7, 0, 0);
        let coarse = PhaseSearch::new()
            .with_precision(1e-3)
            .with_max_bisection_steps(12)
            .find_next(start, 0.5)
            .unwrap();
        let fine = find_next_phase(start, 0.5).unwrap();
        assert!(hours_between(coarse, fine) < 1.0);
    }

    #[test]
    fn nan_start_fails_instead_of_hanging() {
        assert!(matches!(
            find_next_phase(JulianDate::new(f64::NAN), 0.5),
            Err(SearchError::BisectionExceeded { .. })
        ));
    }

    #[test]
    fn extreme_start_terminates() {
        for t in [1e9, 1e12, 1e15, -1e12] {
            match find_next_phase(JulianDate::new(t), 0.5) {
                Ok(found) => assert!(found >= JulianDate::new(t)),
                Err(SearchError::BracketingExceeded { .. })
                | Err(SearchError::BisectionExceeded { .. }) => {}
            }
        }
    }

    #[test]
    fn upcoming_orders_new_and_full_moon() {
        let after_new = upcoming(jd(2000, 1, 7, 0, 0)).unwrap();
        assert!(!after_new.new_moon_first());
        let after_full = upcoming(jd(2000, 1, 22, 0, 0)).unwrap();
        assert!(after_full.new_moon_first());
        assert!(hours_between(after_full.new_moon, after_new.new_moon) < 0.01);
    }

    #[test]
    fn lunation_numbers_follow_brown_series() {
        // Lunation 953 began with the new Moon of 2000-01-06.
        assert_eq!(lunation_number(jd(2000, 1, 6, 18, 14)), 953);
        let next = next_new_moon(jd(2000, 1, 7, 0, 0)).unwrap();
        assert_eq!(lunation_number(next), 954);
        assert_eq!(lunation_number(JulianDate::LUNATION_BASE), 1);
    }
}
