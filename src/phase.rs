// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Phase model — low-precision Moon and Sun ephemeris
//!
//! Closed-form orbital approximation referred to the epoch 1980 January 0.0
//! (Duffett-Smith, *Practical Astronomy with your Calculator*, as used by
//! J. Walker's `moontool`).  One call to [`evaluate`] yields the Moon's phase,
//! illuminated fraction, age, distance and apparent size, plus the Sun's
//! distance and apparent size.
//!
//! ## Algorithm
//!
//! 1. Sun: mean anomaly from a linear rate of `360 / 365.2422` °/day, true
//!    anomaly from a three-term equation of centre (≈1″ against the Kepler
//!    solution), ecliptic longitude, distance and angular size.
//! 2. Moon: mean longitude and anomaly, then in order evection, annual
//!    equation, a third correction, the equation of centre, a fourth
//!    correction and the variation.  Each term feeds the next.
//! 3. Age of the Moon = true lunar longitude − solar longitude.  The phase is
//!    that angle as a fraction of a turn; the illuminated fraction is
//!    `(1 − cos age) / 2`.
//!
//! Every angle is carried in degrees and converted at the trigonometric call.
//!
//! ## Accuracy
//! A few tenths of a degree in elongation near the epoch, i.e. phase events
//! to within some tens of minutes.  Accuracy degrades slowly away from 1980;
//! the series stays finite for every finite input.

use qtty::Days;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

use crate::JulianDate;

/// Orbital elements of the Sun's apparent orbit and the Moon's orbit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitalElements {
    /// Reference epoch of the elements.
    pub epoch: JulianDate,

    /// Ecliptic longitude of the Sun at the epoch (°).
    pub sun_longitude_at_epoch: f64,
    /// Ecliptic longitude of the Sun at perigee (°).
    pub sun_longitude_at_perigee: f64,
    /// Eccentricity of the Earth's orbit.
    pub earth_eccentricity: f64,
    /// Semi-major axis of the Earth's orbit (km).
    pub sun_semi_major_axis_km: f64,
    /// Sun's angular size at semi-major axis distance (°).
    pub sun_angular_size_deg: f64,

    /// Moon's mean longitude at the epoch (°).
    pub moon_mean_longitude: f64,
    /// Mean longitude of the lunar perigee at the epoch (°).
    pub moon_perigee_longitude: f64,
    /// Mean longitude of the ascending node at the epoch (°).
    pub moon_node_longitude: f64,
    /// Inclination of the Moon's orbit (°).
    pub moon_inclination: f64,
    /// Eccentricity of the Moon's orbit.
    pub moon_eccentricity: f64,
    /// Moon's angular size at semi-major axis distance (°).
    pub moon_angular_size_deg: f64,
    /// Semi-major axis of the Moon's orbit (km).
    pub moon_semi_major_axis_km: f64,
    /// Moon's horizontal parallax at semi-major axis distance (°).
    pub moon_parallax_deg: f64,

    /// Mean synodic month.
    pub synodic_month: Days,
}

/// Elements for epoch 1980 January 0.0.
pub const ELEMENTS_1980: OrbitalElements = OrbitalElements {
    epoch: JulianDate::EPOCH_1980,
    sun_longitude_at_epoch: 278.833_540,
    sun_longitude_at_perigee: 282.596_403,
    earth_eccentricity: 0.016_718,
    sun_semi_major_axis_km: 1.495_985e8,
    sun_angular_size_deg: 0.533_128,
    moon_mean_longitude: 64.975_464,
    moon_perigee_longitude: 349.383_063,
    moon_node_longitude: 151.950_429,
    moon_inclination: 5.145_396,
    moon_eccentricity: 0.054_900,
    moon_angular_size_deg: 0.5181,
    moon_semi_major_axis_km: 384_401.0,
    moon_parallax_deg: 0.9507,
    synodic_month: JulianDate::SYNODIC_MONTH,
};

/// Sun's mean motion (°/day).
const SUN_MEAN_MOTION: f64 = 360.0 / 365.2422;
/// Moon's mean motion in longitude (°/day).
const MOON_MEAN_MOTION: f64 = 13.176_396_6;
/// Mean motion of the lunar perigee (°/day).
const MOON_PERIGEE_MOTION: f64 = 0.111_404_1;

/// Reduces an angle in degrees into `[0, 360)`.
///
/// Floor-based, so negative inputs wrap upwards (`-90` → `270`).
#[inline]
pub fn fix_angle(degrees: f64) -> f64 {
    let reduced = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

#[inline]
fn dsin(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

#[inline]
fn dcos(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

/// Named octants of the lunation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl PhaseName {
    const ALL: [PhaseName; 8] = [
        PhaseName::NewMoon,
        PhaseName::WaxingCrescent,
        PhaseName::FirstQuarter,
        PhaseName::WaxingGibbous,
        PhaseName::FullMoon,
        PhaseName::WaningGibbous,
        PhaseName::LastQuarter,
        PhaseName::WaningCrescent,
    ];

    /// Octant nearest to a phase fraction; `0.97` is still a new Moon.
    pub fn from_phase(phase: f64) -> Self {
        let octant = (phase.rem_euclid(1.0) * 8.0 + 0.5).floor() as usize % 8;
        Self::ALL[octant]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhaseName::NewMoon => "New Moon",
            PhaseName::WaxingCrescent => "Waxing Crescent",
            PhaseName::FirstQuarter => "First Quarter",
            PhaseName::WaxingGibbous => "Waxing Gibbous",
            PhaseName::FullMoon => "Full Moon",
            PhaseName::WaningGibbous => "Waning Gibbous",
            PhaseName::LastQuarter => "Last Quarter",
            PhaseName::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one phase-model evaluation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhaseReport {
    /// Terminator phase as a fraction of the lunation, in `[0, 1)`:
    /// 0 new, 0.25 first quarter, 0.5 full, 0.75 last quarter.
    pub phase: f64,
    /// Illuminated fraction of the disc, in `[0, 1]`.
    pub illuminated: f64,
    /// Days since the last new Moon.
    pub age: Days,
    /// Geocentric distance of the Moon (km).
    pub moon_distance_km: f64,
    /// Apparent diameter of the Moon (°).
    pub moon_angular_diameter_deg: f64,
    /// Geocentric distance of the Sun (km).
    pub sun_distance_km: f64,
    /// Apparent diameter of the Sun (°).
    pub sun_angular_diameter_deg: f64,
}

impl PhaseReport {
    #[inline]
    pub fn name(&self) -> PhaseName {
        PhaseName::from_phase(self.phase)
    }

    /// `true` from new to full Moon (inclusive), `false` while waning.
    #[inline]
    pub fn is_waxing(&self) -> bool {
        self.phase <= 0.5
    }
}

/// Evaluates the phase model at `t` with [`ELEMENTS_1980`].
///
/// ```
/// use lunoch::{phase, CivilTimestamp};
///
/// // 2000-01-21 04:40 UTC, full Moon.
/// let t = CivilTimestamp::new(2000, 1, 21, 4, 40, 0).unwrap().to_astronomical_time();
/// let report = phase::evaluate(t);
/// assert!((report.phase - 0.5).abs() < 0.01);
/// assert!(report.illuminated > 0.99);
/// ```
pub fn evaluate(t: JulianDate) -> PhaseReport {
    evaluate_with(&ELEMENTS_1980, t)
}

/// Evaluates the phase model at `t` with an explicit element set.
pub fn evaluate_with(el: &OrbitalElements, t: JulianDate) -> PhaseReport {
    let ecc = el.earth_eccentricity;
    let day = (t - el.epoch).value();

    // ── Sun ───────────────────────────────────────────────────────────────
    let n = fix_angle(SUN_MEAN_MOTION * day);
    // Mean anomaly, from perigee co-ordinates to the epoch.
    let m = fix_angle(n + el.sun_longitude_at_epoch - el.sun_longitude_at_perigee);
    let m_rad = m.to_radians();
    let true_anomaly = (m_rad
        + 2.0 * ecc * m_rad.sin()
        + 1.25 * ecc * ecc * (2.0 * m_rad).sin()
        + ecc * ecc * ecc * (3.0 * m_rad).sin())
    .to_degrees();
    let sun_longitude = fix_angle(true_anomaly + el.sun_longitude_at_perigee);
    // Orbital distance factor.
    let f = (1.0 + ecc * dcos(true_anomaly)) / (1.0 - ecc * ecc);
    let sun_distance_km = el.sun_semi_major_axis_km / f;
    let sun_angular_diameter_deg = f * el.sun_angular_size_deg;

    // ── Moon ──────────────────────────────────────────────────────────────
    let mean_longitude = fix_angle(MOON_MEAN_MOTION * day + el.moon_mean_longitude);
    let mean_anomaly =
        fix_angle(mean_longitude - MOON_PERIGEE_MOTION * day - el.moon_perigee_longitude);

    let evection = 1.2739 * dsin(2.0 * (mean_longitude - sun_longitude) - mean_anomaly);
    let annual_equation = 0.1858 * dsin(m);
    let a3 = 0.37 * dsin(m);
    let corrected_anomaly = mean_anomaly + evection - annual_equation - a3;

    let centre = 6.2886 * dsin(corrected_anomaly);
    let a4 = 0.214 * dsin(2.0 * corrected_anomaly);
    let corrected_longitude = mean_longitude + evection + centre - annual_equation + a4;

    let variation = 0.6583 * dsin(2.0 * (corrected_longitude - sun_longitude));
    let true_longitude = corrected_longitude + variation;

    // ── Phase ─────────────────────────────────────────────────────────────
    // Left unreduced for the cosine.
    let age_deg = true_longitude - sun_longitude;
    let illuminated = (1.0 - dcos(age_deg)) / 2.0;
    let phase = fix_angle(age_deg) / 360.0;

    let moon_ecc = el.moon_eccentricity;
    let moon_distance_km = (el.moon_semi_major_axis_km * (1.0 - moon_ecc * moon_ecc))
        / (1.0 + moon_ecc * dcos(corrected_anomaly + centre));
    let moon_angular_diameter_deg =
        el.moon_angular_size_deg / (moon_distance_km / el.moon_semi_major_axis_km);

    PhaseReport {
        phase,
        illuminated,
        age: Days::new(el.synodic_month.value() * phase),
        moon_distance_km,
        moon_angular_diameter_deg,
        sun_distance_km,
        sun_angular_diameter_deg,
    }
}

// Serialized with flat numeric fields; `age` is written as `age_days`.
#[cfg(feature = "serde")]
impl Serialize for PhaseReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("PhaseReport", 7)?;
        s.serialize_field("phase", &self.phase)?;
        s.serialize_field("illuminated", &self.illuminated)?;
        s.serialize_field("age_days", &self.age.value())?;
        s.serialize_field("moon_distance_km", &self.moon_distance_km)?;
        s.serialize_field("moon_angular_diameter_deg", &self.moon_angular_diameter_deg)?;
        s.serialize_field("sun_distance_km", &self.sun_distance_km)?;
        s.serialize_field("sun_angular_diameter_deg", &self.sun_angular_diameter_deg)?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PhaseReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            phase: f64,
            illuminated: f64,
            age_days: f64,
            moon_distance_km: f64,
            moon_angular_diameter_deg: f64,
            sun_distance_km: f64,
            sun_angular_diameter_deg: f64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(PhaseReport {
            phase: raw.phase,
            illuminated: raw.illuminated,
            age: Days::new(raw.age_days),
            moon_distance_km: raw.moon_distance_km,
            moon_angular_diameter_deg: raw.moon_angular_diameter_deg,
            sun_distance_km: raw.sun_distance_km,
            sun_angular_diameter_deg: raw.sun_angular_diameter_deg,
        })
    }
}
