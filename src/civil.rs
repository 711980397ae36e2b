// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil calendar timestamps and their mapping onto the Julian Day axis.
//!
//! A [`CivilTimestamp`] is a UTC calendar date and time of day at whole-second
//! resolution.  It is always stored normalized: the lenient constructors
//! carry overflowing fields into the next larger one (months into years,
//! days into months, …) with the same contract as C's `mktime`.
//!
//! The mapping onto [`JulianDate`] is the fixed relation
//!
//! ```text
//! JD = unix_seconds / 86 400 + 2 440 587.5
//! ```
//!
//! and its inverse truncates to whole seconds.
//!
//! ```
//! use lunoch::CivilTimestamp;
//!
//! let local = CivilTimestamp::new(2000, 1, 6, 20, 14, 0).unwrap();
//! let utc = local.apply_utc_offset(2.0).unwrap();
//! assert_eq!(utc, CivilTimestamp::new(2000, 1, 6, 18, 14, 0).unwrap());
//!
//! let jd = utc.to_astronomical_time();
//! assert!((jd.value() - 2_451_550.259_722).abs() < 1e-6);
//! ```

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta, Timelike, Utc};
use qtty::Days;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimeError;
use crate::JulianDate;

/// Field selector for [`CivilTimestamp::shift`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CivilField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// A normalized UTC calendar timestamp with whole-second resolution.
///
/// Ordering is chronological.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilTimestamp(NaiveDateTime);

impl CivilTimestamp {
    /// Strict constructor: every field must already be in its calendar range.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, TimeError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(Self)
            .ok_or_else(|| TimeError::InvalidDate {
                year: year.into(),
                month: month.into(),
                day: day.into(),
                hour: hour.into(),
                minute: minute.into(),
                second: second.into(),
            })
    }

    /// Lenient constructor with calendar-arithmetic normalization.
    ///
    /// Out-of-range fields carry into the next larger field and negative
    /// fields borrow from it, so `(2023, 13, 1, ..)` is 2024-01-01 and
    /// `(2023, 2, 31, ..)` is 2023-03-03.  Months are resolved before days.
    ///
    /// Fails only when the result leaves the representable calendar range.
    pub fn normalized(
        year: i64,
        month: i64,
        day: i64,
        hour: i64,
        minute: i64,
        second: i64,
    ) -> Result<Self, TimeError> {
        normalize_fields(year, month, day, hour, minute, second)
            .map(Self)
            .ok_or_else(|| TimeError::OutOfRange {
                what: format!("{year}-{month}-{day} {hour}:{minute}:{second}"),
            })
    }

    /// Adds `amount` to one field and renormalizes the result.
    pub fn shift(&self, field: CivilField, amount: i64) -> Result<Self, TimeError> {
        let mut fields = [
            i64::from(self.year()),
            i64::from(self.month()),
            i64::from(self.day()),
            i64::from(self.hour()),
            i64::from(self.minute()),
            i64::from(self.second()),
        ];
        let index = match field {
            CivilField::Year => 0,
            CivilField::Month => 1,
            CivilField::Day => 2,
            CivilField::Hour => 3,
            CivilField::Minute => 4,
            CivilField::Second => 5,
        };
        fields[index] = fields[index]
            .checked_add(amount)
            .ok_or_else(|| TimeError::OutOfRange {
                what: format!("{self} shifted by {amount} ({field:?})"),
            })?;
        let [year, month, day, hour, minute, second] = fields;
        Self::normalized(year, month, day, hour, minute, second)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, 1–12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, 1–31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Hour of the day, 0–23.
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// The timestamp as a `chrono::DateTime<Utc>`.
    #[inline]
    pub fn to_datetime(&self) -> DateTime<Utc> {
        self.0.and_utc()
    }

    /// Julian Date of this instant; total over every normalized timestamp.
    #[inline]
    pub fn to_astronomical_time(&self) -> JulianDate {
        JulianDate::from_utc(self.to_datetime())
    }

    /// Calendar timestamp of a Julian Date, truncated to whole seconds.
    pub fn from_astronomical_time(t: JulianDate) -> Result<Self, TimeError> {
        t.to_utc()
            .map(Self::from)
            .ok_or_else(|| TimeError::OutOfRange {
                what: t.to_string(),
            })
    }

    /// Shifts a timestamp read at UTC`+offset_hours` back onto UTC.
    ///
    /// The shift goes through the Julian Day axis, so fractional offsets
    /// (e.g. `5.5` or `-3.5`) are exact to the second.
    pub fn apply_utc_offset(&self, offset_hours: f64) -> Result<Self, TimeError> {
        let shifted = self.to_astronomical_time() - Days::new(offset_hours / 24.0);
        Self::from_astronomical_time(shifted)
    }
}

fn normalize_fields(
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
) -> Option<NaiveDateTime> {
    let months = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;

    let offset = TimeDelta::try_days(day.checked_sub(1)?)?
        .checked_add(&TimeDelta::try_hours(hour)?)?
        .checked_add(&TimeDelta::try_minutes(minute)?)?
        .checked_add(&TimeDelta::try_seconds(second)?)?;
    first_of_month.checked_add_signed(offset)
}

/// Converts a civil timestamp into a Julian Date.
#[inline]
pub fn to_astronomical_time(civil: CivilTimestamp) -> JulianDate {
    civil.to_astronomical_time()
}

/// Converts a Julian Date into a civil timestamp, truncating to whole seconds.
#[inline]
pub fn to_civil_timestamp(t: JulianDate) -> Result<CivilTimestamp, TimeError> {
    CivilTimestamp::from_astronomical_time(t)
}

/// Normalizes a timestamp read at UTC`+offset_hours` onto UTC.
#[inline]
pub fn apply_utc_offset(
    civil: CivilTimestamp,
    offset_hours: f64,
) -> Result<CivilTimestamp, TimeError> {
    civil.apply_utc_offset(offset_hours)
}

impl From<DateTime<Utc>> for CivilTimestamp {
    /// Drops the sub-second part.
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime.naive_utc().trunc_subsecs(0))
    }
}

impl From<CivilTimestamp> for DateTime<Utc> {
    fn from(civil: CivilTimestamp) -> Self {
        civil.to_datetime()
    }
}

impl fmt::Display for CivilTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} UTC", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

// Serialized as its calendar fields; deserialization goes through the
// strict constructor.
#[cfg(feature = "serde")]
impl Serialize for CivilTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("CivilTimestamp", 6)?;
        s.serialize_field("year", &self.year())?;
        s.serialize_field("month", &self.month())?;
        s.serialize_field("day", &self.day())?;
        s.serialize_field("hour", &self.hour())?;
        s.serialize_field("minute", &self.minute())?;
        s.serialize_field("second", &self.second())?;
        s.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CivilTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            year: i32,
            month: u32,
            day: u32,
            hour: u32,
            minute: u32,
            second: u32,
        }

        let raw = Raw::deserialize(deserializer)?;
        CivilTimestamp::new(
            raw.year, raw.month, raw.day, raw.hour, raw.minute, raw.second,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> CivilTimestamp {
        CivilTimestamp::new(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn strict_constructor_rejects_out_of_range_fields() {
        assert!(matches!(
            CivilTimestamp::new(2023, 2, 29, 0, 0, 0),
            Err(TimeError::InvalidDate { day: 29, .. })
        ));
        assert!(CivilTimestamp::new(2023, 13, 1, 0, 0, 0).is_err());
        assert!(CivilTimestamp::new(2023, 1, 1, 24, 0, 0).is_err());
        assert!(CivilTimestamp::new(2024, 2, 29, 23, 59, 59).is_ok());
    }

    #[test]
    fn accessors_expose_calendar_fields() {
        let c = civil(1999, 12, 31, 23, 58, 7);
        assert_eq!(
            (c.year(), c.month(), c.day(), c.hour(), c.minute(), c.second()),
            (1999, 12, 31, 23, 58, 7)
        );
    }

    #[test]
    fn month_overflow_rolls_into_year() {
        let c = CivilTimestamp::normalized(2023, 13, 1, 0, 0, 0).unwrap();
        assert_eq!(c, civil(2024, 1, 1, 0, 0, 0));
        let c = CivilTimestamp::normalized(2023, 0, 15, 0, 0, 0).unwrap();
        assert_eq!(c, civil(2022, 12, 15, 0, 0, 0));
        let c = CivilTimestamp::normalized(2023, -12, 15, 0, 0, 0).unwrap();
        assert_eq!(c, civil(2021, 12, 15, 0, 0, 0));
    }

    #[test]
    fn day_overflow_rolls_into_month() {
        let c = CivilTimestamp::normalized(2023, 2, 31, 0, 0, 0).unwrap();
        assert_eq!(c, civil(2023, 3, 3, 0, 0, 0));
        let c = CivilTimestamp::normalized(2024, 2, 31, 0, 0, 0).unwrap();
        assert_eq!(c, civil(2024, 3, 2, 0, 0, 0));
        let c = CivilTimestamp::normalized(2024, 3, 0, 0, 0, 0).unwrap();
        assert_eq!(c, civil(2024, 2, 29, 0, 0, 0));
    }

    #[test]
    fn time_of_day_borrows_and_carries() {
        let c = CivilTimestamp::normalized(2024, 1, 1, 0, 0, -1).unwrap();
        assert_eq!(c, civil(2023, 12, 31, 23, 59, 59));
        let c = CivilTimestamp::normalized(2023, 12, 31, 24, 0, 0).unwrap();
        assert_eq!(c, civil(2024, 1, 1, 0, 0, 0));
        let c = CivilTimestamp::normalized(2023, 6, 1, 10, 125, 0).unwrap();
        assert_eq!(c, civil(2023, 6, 1, 12, 5, 0));
    }

    #[test]
    fn normalized_reports_out_of_range() {
        assert!(matches!(
            CivilTimestamp::normalized(i64::MAX, 1, 1, 0, 0, 0),
            Err(TimeError::OutOfRange { .. })
        ));
        assert!(CivilTimestamp::normalized(3_000_000_000, 1, 1, 0, 0, 0).is_err());
    }

    #[test]
    fn shift_adds_to_one_field_and_renormalizes() {
        let c = civil(2023, 1, 31, 23, 0, 0);
        assert_eq!(c.shift(CivilField::Month, 1).unwrap(), civil(2023, 3, 3, 23, 0, 0));
        assert_eq!(c.shift(CivilField::Hour, 1).unwrap(), civil(2023, 2, 1, 0, 0, 0));
        assert_eq!(c.shift(CivilField::Day, -31).unwrap(), civil(2022, 12, 31, 23, 0, 0));
        assert_eq!(c.shift(CivilField::Minute, -61).unwrap(), civil(2023, 1, 31, 21, 59, 0));
        assert_eq!(c.shift(CivilField::Second, 3600).unwrap(), civil(2023, 2, 1, 0, 0, 0));

        let leap = civil(2024, 2, 29, 12, 0, 0);
        assert_eq!(leap.shift(CivilField::Year, 1).unwrap(), civil(2025, 3, 1, 12, 0, 0));
        assert!(leap.shift(CivilField::Year, i64::MAX).is_err());
    }

    #[test]
    fn reference_new_moon_maps_to_known_julian_day() {
        let jd = civil(2000, 1, 6, 18, 14, 0).to_astronomical_time();
        assert!((jd.value() - 2_451_550.259_722_2).abs() < 1e-6);
        let jd = to_astronomical_time(civil(1970, 1, 1, 0, 0, 0));
        assert_eq!(jd.value(), 2_440_587.5);
    }

    #[test]
    fn civil_roundtrip_is_exact() {
        for c in [
            civil(2000, 1, 6, 18, 14, 0),
            civil(2024, 2, 29, 23, 59, 59),
            civil(1923, 1, 16, 0, 0, 1),
            civil(1601, 7, 4, 6, 30, 45),
            civil(2199, 12, 31, 12, 0, 0),
        ] {
            let back = to_civil_timestamp(c.to_astronomical_time()).unwrap();
            assert_eq!(back, c);
        }
    }

    #[test]
    fn astronomical_time_is_strictly_increasing() {
        let mut c = civil(2023, 12, 31, 23, 59, 57);
        let mut previous = c.to_astronomical_time();
        for _ in 0..6 {
            c = c.shift(CivilField::Second, 1).unwrap();
            let next = c.to_astronomical_time();
            assert!(next > previous, "{c} did not advance");
            previous = next;
        }
    }

    #[test]
    fn inverse_truncates_to_whole_seconds() {
        let base = civil(2022, 5, 5, 12, 0, 0).to_astronomical_time();
        let later = base + Days::new(0.9 / 86_400.0);
        assert_eq!(to_civil_timestamp(later).unwrap(), civil(2022, 5, 5, 12, 0, 0));
    }

    #[test]
    fn inverse_rejects_unrepresentable_values() {
        assert!(matches!(
            to_civil_timestamp(JulianDate::new(f64::NAN)),
            Err(TimeError::OutOfRange { .. })
        ));
        assert!(to_civil_timestamp(JulianDate::new(1e15)).is_err());
    }

    #[test]
    fn utc_offset_shifts_back_onto_utc() {
        let local = civil(2023, 1, 1, 1, 30, 0);
        assert_eq!(local.apply_utc_offset(2.0).unwrap(), civil(2022, 12, 31, 23, 30, 0));
        assert_eq!(
            apply_utc_offset(local, -5.5).unwrap(),
            civil(2023, 1, 1, 7, 0, 0)
        );
        assert_eq!(local.apply_utc_offset(0.0).unwrap(), local);
    }

    #[test]
    fn datetime_conversions_drop_subseconds() {
        let dt = DateTime::from_timestamp(946_728_000, 999_000_000).unwrap();
        let c = CivilTimestamp::from(dt);
        assert_eq!(c, civil(2000, 1, 1, 12, 0, 0));
        let back: DateTime<Utc> = c.into();
        assert_eq!(back.timestamp(), 946_728_000);
    }

    #[test]
    fn display_is_iso_like() {
        assert_eq!(civil(2000, 1, 6, 8, 4, 9).to_string(), "2000-01-06 08:04:09 UTC");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_calendar_fields_and_validates() {
        let c = civil(2024, 2, 29, 1, 2, 3);
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"month\":2"));
        let back: CivilTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let bad = r#"{"year":2023,"month":2,"day":29,"hour":0,"minute":0,"second":0}"#;
        assert!(serde_json::from_str::<CivilTimestamp>(bad).is_err());
    }
}
