//! Julian dates and ΔT for the astronomical engines.
//!
//! Julian date arithmetic follows Meeus, "Astronomical Algorithms" (2nd ed.), ch. 7. ΔT is
//! estimated with the Espenak & Meeus polynomial fits.

#![allow(clippy::unreadable_literal)]

use crate::math::{floor, polynomial};
use crate::{Error, Result};
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

/// Seconds per day (86,400)
pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Day Number for J2000.0 epoch (2000-01-01 12:00:00 TT)
pub(crate) const J2000_JDN: f64 = 2_451_545.0;

/// Julian date of the Unix epoch (1970-01-01 00:00:00 UTC)
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Days per Julian century
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian date paired with the ΔT used to derive ephemeris time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JulianDate {
    /// Julian Date (JD) - referenced to UT
    jd: f64,
    /// Delta T in seconds - difference between TT and UT1
    delta_t: f64,
}

impl JulianDate {
    /// Creates a Julian date from a timezone-aware instant.
    ///
    /// # Errors
    /// Returns error if the calendar components are rejected by [`JulianDate::from_utc`].
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>, delta_t: f64) -> Result<Self> {
        let utc = datetime.with_timezone(&Utc);
        Self::from_utc(
            utc.year(),
            utc.month(),
            utc.day(),
            utc.hour(),
            utc.minute(),
            f64::from(utc.second()) + f64::from(utc.nanosecond().min(999_999_999)) / 1e9,
            delta_t,
        )
    }

    /// Creates a Julian date from UTC calendar components.
    ///
    /// # Errors
    /// Returns `InvalidDate` if any component is outside its calendar range.
    ///
    /// # Example
    /// ```
    /// # use brahma_muhurat::time::JulianDate;
    /// let jd = JulianDate::from_utc(2000, 1, 1, 12, 0, 0.0, 0.0).unwrap();
    /// assert_eq!(jd.julian_date(), 2_451_545.0);
    /// ```
    pub fn from_utc(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
        delta_t: f64,
    ) -> Result<Self> {
        let reason = if !(1..=12).contains(&month) {
            Some("month must be between 1 and 12")
        } else if day == 0 || day > days_in_month(year, month) {
            Some("day is out of range for month")
        } else if hour > 23 {
            Some("hour must be between 0 and 23")
        } else if minute > 59 {
            Some("minute must be between 0 and 59")
        } else if !(0.0..60.0).contains(&second) {
            Some("second must be between 0 and 59.999...")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(Error::invalid_date(
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second}"),
                reason,
            ));
        }

        let jd = calculate_julian_date(year, month, day, hour, minute, second);
        Ok(Self { jd, delta_t })
    }

    /// Wraps a raw Julian date value.
    #[must_use]
    pub const fn from_raw(jd: f64, delta_t: f64) -> Self {
        Self { jd, delta_t }
    }

    /// Gets the Julian Date (JD) value, referenced to UT.
    #[must_use]
    pub const fn julian_date(&self) -> f64 {
        self.jd
    }

    /// Gets the ΔT value in seconds.
    #[must_use]
    pub const fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// Julian Ephemeris Day, JDE = JD + ΔT/86400.
    #[must_use]
    pub fn julian_ephemeris_day(&self) -> f64 {
        self.jd + self.delta_t / SECONDS_PER_DAY
    }

    /// Julian centuries of UT since J2000.0.
    #[must_use]
    pub fn julian_century(&self) -> f64 {
        (self.jd - J2000_JDN) / DAYS_PER_CENTURY
    }

    /// Julian ephemeris centuries since J2000.0.
    #[must_use]
    pub fn julian_ephemeris_century(&self) -> f64 {
        (self.julian_ephemeris_day() - J2000_JDN) / DAYS_PER_CENTURY
    }

    /// Returns a date shifted by a (possibly fractional) number of days, keeping ΔT.
    #[must_use]
    pub const fn add_days(self, days: f64) -> Self {
        Self {
            jd: self.jd + days,
            delta_t: self.delta_t,
        }
    }

    /// Converts the UT Julian date back to a UTC instant, rounded to the millisecond.
    ///
    /// # Errors
    /// Returns `ComputationError` when the value is not finite or outside chrono's range.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        julian_date_to_datetime(self.jd)
    }
}

/// Converts a UT Julian date to a UTC instant with millisecond resolution.
///
/// # Errors
/// Returns `ComputationError` when the value is not finite or outside chrono's range.
pub fn julian_date_to_datetime(jd: f64) -> Result<DateTime<Utc>> {
    if !jd.is_finite() {
        return Err(Error::computation_error("julian date is not finite"));
    }
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round();
    if millis.abs() > 8.0e15 {
        return Err(Error::computation_error("julian date outside supported range"));
    }
    DateTime::from_timestamp_millis(millis as i64)
        .ok_or(Error::computation_error("julian date outside supported range"))
}

/// Converts a UTC instant to a UT Julian date value.
#[must_use]
pub fn datetime_to_julian_date(instant: &DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / (SECONDS_PER_DAY * 1000.0) + UNIX_EPOCH_JD
}

/// Meeus ch. 7, with the Gregorian correction applied after 1582-10-15.
fn calculate_julian_date(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: f64,
) -> f64 {
    let mut y = year;
    let mut m = month as i32;

    if m < 3 {
        y -= 1;
        m += 12;
    }

    let d = f64::from(day) + (f64::from(hour) + (f64::from(minute) + second / 60.0) / 60.0) / 24.0;

    let mut jd =
        floor(365.25 * (f64::from(y) + 4716.0)) + floor(30.6001 * f64::from(m + 1)) + d - 1524.5;

    if jd >= 2_299_161.0 {
        let a = floor(f64::from(y) / 100.0);
        jd += 2.0 - a + floor(a / 4.0);
    }

    jd
}

const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// ΔT (TT − UT1) estimation.
///
/// Polynomial fits from Espenak & Meeus, updated 2014.
/// See: <https://www.eclipsewise.com/help/deltatpoly2014.html>
pub struct DeltaT;

impl DeltaT {
    /// Estimates ΔT in seconds for a decimal year.
    ///
    /// # Errors
    /// Returns error for non-finite years and years beyond 3000.
    ///
    /// # Example
    /// ```
    /// # use brahma_muhurat::time::DeltaT;
    /// let delta_t = DeltaT::estimate(2024.0).unwrap();
    /// assert!(delta_t > 60.0 && delta_t < 80.0);
    /// ```
    #[allow(clippy::too_many_lines)]
    pub fn estimate(decimal_year: f64) -> Result<f64> {
        let year = decimal_year;

        if !year.is_finite() {
            return Err(Error::computation_error("year must be finite"));
        }

        let delta_t = if year < -500.0 {
            let u = (year - 1820.0) / 100.0;
            polynomial(&[-20.0, 0.0, 32.0], u)
        } else if year < 500.0 {
            let u = year / 100.0;
            polynomial(
                &[
                    10583.6,
                    -1014.41,
                    33.78311,
                    -5.952053,
                    -0.1798452,
                    0.022174192,
                    0.0090316521,
                ],
                u,
            )
        } else if year < 1600.0 {
            let u = (year - 1000.0) / 100.0;
            polynomial(
                &[
                    1574.2,
                    -556.01,
                    71.23472,
                    0.319781,
                    -0.8503463,
                    -0.005050998,
                    0.0083572073,
                ],
                u,
            )
        } else if year < 1700.0 {
            let t = year - 1600.0;
            polynomial(&[120.0, -0.9808, -0.01532, 1.0 / 7129.0], t)
        } else if year < 1800.0 {
            let t = year - 1700.0;
            polynomial(
                &[8.83, 0.1603, -0.0059285, 0.00013336, -1.0 / 1_174_000.0],
                t,
            )
        } else if year < 1860.0 {
            let t = year - 1800.0;
            polynomial(
                &[
                    13.72,
                    -0.332447,
                    0.0068612,
                    0.0041116,
                    -0.00037436,
                    0.0000121272,
                    -0.0000001699,
                    0.000000000875,
                ],
                t,
            )
        } else if year < 1900.0 {
            let t = year - 1860.0;
            polynomial(
                &[
                    7.62,
                    0.5737,
                    -0.251754,
                    0.01680668,
                    -0.0004473624,
                    1.0 / 233_174.0,
                ],
                t,
            )
        } else if year < 1920.0 {
            let t = year - 1900.0;
            polynomial(&[-2.79, 1.494119, -0.0598939, 0.0061966, -0.000197], t)
        } else if year < 1941.0 {
            let t = year - 1920.0;
            polynomial(&[21.20, 0.84493, -0.076100, 0.0020936], t)
        } else if year < 1961.0 {
            let t = year - 1950.0;
            polynomial(&[29.07, 0.407, -1.0 / 233.0, 1.0 / 2547.0], t)
        } else if year < 1986.0 {
            let t = year - 1975.0;
            polynomial(&[45.45, 1.067, -1.0 / 260.0, -1.0 / 718.0], t)
        } else if year < 2005.0 {
            let t = year - 2000.0;
            polynomial(
                &[
                    63.86,
                    0.3345,
                    -0.060374,
                    0.0017275,
                    0.000651814,
                    0.00002373599,
                ],
                t,
            )
        } else if year < 2015.0 {
            let t = year - 2005.0;
            polynomial(&[64.69, 0.2930], t)
        } else if year <= 3000.0 {
            let t = year - 2015.0;
            polynomial(&[67.62, 0.3645, 0.0039755], t)
        } else {
            return Err(Error::computation_error(
                "ΔT estimates not available beyond year 3000",
            ));
        };

        Ok(delta_t)
    }

    /// Estimates ΔT for the month containing the given date-like value.
    ///
    /// # Errors
    /// Returns error for years beyond 3000.
    #[allow(clippy::needless_pass_by_value)]
    pub fn estimate_from_date_like<D: Datelike>(date: D) -> Result<f64> {
        Self::estimate(f64::from(date.year()) + (f64::from(date.month()) - 0.5) / 12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_j2000_epoch() {
        let jd = JulianDate::from_utc(2000, 1, 1, 12, 0, 0.0, 0.0).unwrap();
        assert!((jd.julian_date() - J2000_JDN).abs() < EPSILON);
        assert!(jd.julian_century().abs() < EPSILON);
        assert!(jd.julian_ephemeris_century().abs() < EPSILON);
    }

    #[test]
    fn test_calendar_validation() {
        assert!(JulianDate::from_utc(2024, 2, 29, 0, 0, 0.0, 0.0).is_ok());
        assert!(JulianDate::from_utc(2023, 2, 29, 0, 0, 0.0, 0.0).is_err());
        assert!(JulianDate::from_utc(2024, 13, 1, 0, 0, 0.0, 0.0).is_err());
        assert!(JulianDate::from_utc(2024, 1, 32, 0, 0, 0.0, 0.0).is_err());
        assert!(JulianDate::from_utc(2024, 1, 1, 24, 0, 0.0, 0.0).is_err());
        assert!(JulianDate::from_utc(2024, 1, 1, 0, 0, 60.0, 0.0).is_err());
    }

    #[test]
    fn test_ephemeris_day_includes_delta_t() {
        let jd = JulianDate::from_utc(2023, 6, 21, 12, 0, 0.0, 69.0).unwrap();
        let expected = jd.julian_date() + 69.0 / SECONDS_PER_DAY;
        assert!((jd.julian_ephemeris_day() - expected).abs() < EPSILON);
    }

    #[test]
    fn test_datetime_conversions_agree() {
        let instant = "2024-02-18T01:02:03Z".parse::<DateTime<Utc>>().unwrap();
        let jd = JulianDate::from_datetime(&instant, 0.0).unwrap();

        assert!((jd.julian_date() - datetime_to_julian_date(&instant)).abs() < 1e-8);
        assert_eq!(jd.to_datetime().unwrap(), instant);

        let unix_epoch = JulianDate::from_utc(1970, 1, 1, 0, 0, 0.0, 0.0).unwrap();
        assert!((unix_epoch.julian_date() - 2_440_587.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_julian_date_is_rejected() {
        assert!(julian_date_to_datetime(f64::NAN).is_err());
        assert!(julian_date_to_datetime(1e20).is_err());
    }

    #[test]
    fn test_delta_t_estimates() {
        let delta_t_2000 = DeltaT::estimate(2000.0).unwrap();
        let delta_t_2024 =
            DeltaT::estimate_from_date_like(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
                .unwrap();

        assert!(delta_t_2000 > 60.0 && delta_t_2000 < 70.0);
        assert!(delta_t_2024 > delta_t_2000 && delta_t_2024 < 80.0);
        assert!(DeltaT::estimate(1900.0).unwrap() < 0.0);
        assert!(DeltaT::estimate(3001.0).is_err());
        assert!(DeltaT::estimate(f64::NAN).is_err());
    }
}
