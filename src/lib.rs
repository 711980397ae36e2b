// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Lunar phase primitives.
//!
//! The crate answers two questions for any instant: *what does the Moon look
//! like now?* and *when does it next reach a given phase?*
//!
//! # Layers
//!
//! | Layer | Module | Entry points |
//! |-------|--------|--------------|
//! | Time conversion | [`civil`], [`instant`](Time) | [`to_astronomical_time`], [`to_civil_timestamp`], [`apply_utc_offset`] |
//! | Phase model | [`phase`] | [`phase::evaluate`] → [`PhaseReport`] |
//! | Phase search | [`search`] | [`search::find_next_phase`] |
//!
//! Data flows one way: civil time → Julian Date → phase report → target
//! Julian Date → civil time.
//!
//! # Core types
//!
//! - [`Time<S>`] — generic instant parameterised by a [`TimeScale`] marker.
//! - [`JulianDate`] — type alias for `Time<JD>`; the continuous day count
//!   every computation runs on.
//! - [`CivilTimestamp`] — normalized UTC calendar date and time.
//! - [`PhaseReport`] — phase, illumination, age, distances and apparent sizes.
//!
//! # Time scales
//!
//! | Marker | Scale |
//! |--------|-------|
//! | [`JD`] | Julian Date |
//! | [`UnixTime`] | Days since 1970-01-01 UTC |
//! | [`E1980`] | Days since 1980 January 0.0 |
//!
//! All three are fixed offsets of one another; UTC is mapped directly onto
//! the Julian Day axis without ΔT.
//!
//! ```
//! use lunoch::{phase, search, CivilTimestamp};
//!
//! let now = CivilTimestamp::new(2000, 1, 7, 0, 0, 0).unwrap().to_astronomical_time();
//! let report = phase::evaluate(now);
//! assert!(report.illuminated < 0.05);
//!
//! let full = search::next_full_moon(now).unwrap();
//! let when = CivilTimestamp::from_astronomical_time(full).unwrap();
//! assert_eq!((when.month(), when.day()), (1, 21));
//! ```

pub mod civil;
mod error;
pub(crate) mod instant;
mod julian_date_ext;
pub mod phase;
pub(crate) mod scales;
pub mod search;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use civil::{
    apply_utc_offset, to_astronomical_time, to_civil_timestamp, CivilField, CivilTimestamp,
};
pub use error::{SearchError, TimeError};
pub use instant::{Time, TimeScale};
pub use phase::{OrbitalElements, PhaseName, PhaseReport, ELEMENTS_1980};
pub use scales::{UnixTime, E1980, JD};
pub use search::{PhaseSearch, UpcomingPhases};

/// Julian Date — continuous count of days, with fractional time of day.
///
/// This is the crate's astronomical time: a type alias for [`Time<JD>`].
pub type JulianDate = Time<JD>;
