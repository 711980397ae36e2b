// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Date (`Time<JD>`) specific extensions.

use qtty::*;

use super::instant::Time;
use super::scales::{E1980, EPOCH_1980_JD, JD, UNIX_EPOCH_JD};

impl Time<JD> {
    /// Unix epoch: 1970-01-01T00:00:00 UTC (JD 2 440 587.5).
    pub const UNIX_EPOCH: Self = Self::from_days(UNIX_EPOCH_JD);

    /// Ephemeris epoch of the phase model: 1980 January 0.0 (JD 2 444 238.5).
    pub const EPOCH_1980: Self = Self::from_days(EPOCH_1980_JD);

    /// Base date for E. W. Brown's numbered series of lunations
    /// (1923 January 16, JD 2 423 436.0).
    pub const LUNATION_BASE: Self = Self::new(2_423_436.0);

    /// Mean synodic month (new Moon to new Moon).
    pub const SYNODIC_MONTH: Days = Days::new(29.530_588_68);

    /// Days elapsed since 1980 January 0.0; negative before the epoch.
    #[inline]
    pub fn days_since_1980(&self) -> Days {
        self.to::<E1980>().quantity()
    }

    /// Number of mean synodic months elapsed since [`Self::LUNATION_BASE`].
    #[inline]
    pub fn synodic_months_since_lunation_base(&self) -> f64 {
        ((*self - Self::LUNATION_BASE) / Self::SYNODIC_MONTH)
            .simplify()
            .value()
    }
}
