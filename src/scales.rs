// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale marker types.
//!
//! Each zero-sized type identifies a day counter and encodes how values on
//! that counter relate to the absolute **Julian Day** used throughout the
//! crate.  All of them are plain epoch offsets on one continuous axis; no
//! ΔT or relativistic correction is applied anywhere.
//!
//! | Marker | Description | Epoch (JD) |
//! |--------|-------------|------------|
//! | [`JD`] | Julian Date | 0.0 |
//! | [`UnixTime`] | Days since 1970-01-01T00:00:00 UTC | 2 440 587.5 |
//! | [`E1980`] | Days since 1980 January 0.0 (ephemeris epoch) | 2 444 238.5 |

use super::instant::TimeScale;
use qtty::Days;

/// Julian Date — the identity scale.
///
/// `to_julian_day(v) = v`, i.e. the quantity *is* a Julian Day number.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    const LABEL: &'static str = "Julian Day:";

    #[inline(always)]
    fn to_julian_day(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_julian_day(jd: Days) -> Days {
        jd
    }
}

/// Unix Time — days since 1970-01-01T00:00:00 UTC.
///
/// Leap seconds are ignored, as POSIX does.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UnixTime;

/// JD of the Unix epoch (1970-01-01T00:00:00Z).
pub(crate) const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

impl TimeScale for UnixTime {
    const LABEL: &'static str = "Unix";

    #[inline(always)]
    fn to_julian_day(value: Days) -> Days {
        value + UNIX_EPOCH_JD
    }

    #[inline(always)]
    fn from_julian_day(jd: Days) -> Days {
        jd - UNIX_EPOCH_JD
    }
}

/// Days since 1980 January 0.0 (1979-12-31T00:00:00 UTC).
///
/// The orbital elements of the phase model are referred to this epoch, so
/// `Time<E1980>` is the natural argument of the mean-motion terms.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct E1980;

/// JD of 1980 January 0.0.
pub(crate) const EPOCH_1980_JD: Days = Days::new(2_444_238.5);

impl TimeScale for E1980 {
    const LABEL: &'static str = "E1980";

    #[inline(always)]
    fn to_julian_day(value: Days) -> Days {
        value + EPOCH_1980_JD
    }

    #[inline(always)]
    fn from_julian_day(jd: Days) -> Days {
        jd - EPOCH_1980_JD
    }
}

/// Generate pairwise `From<Time<A>> for Time<B>` implementations.
macro_rules! impl_time_conversions {
    ($single:ty) => {};

    ($first:ty, $($rest:ty),+ $(,)?) => {
        $(
            impl From<super::instant::Time<$first>> for super::instant::Time<$rest> {
                #[inline]
                fn from(t: super::instant::Time<$first>) -> Self {
                    t.to::<$rest>()
                }
            }

            impl From<super::instant::Time<$rest>> for super::instant::Time<$first> {
                #[inline]
                fn from(t: super::instant::Time<$rest>) -> Self {
                    t.to::<$first>()
                }
            }
        )+

        impl_time_conversions!($($rest),+);
    };
}

impl_time_conversions!(JD, UnixTime, E1980);
