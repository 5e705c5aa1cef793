//! High tier: NOAA / Meeus low-precision solar coordinates.
//!
//! Meeus, "Astronomical Algorithms" (2nd ed.), ch. 25 low-accuracy method, as used by the NOAA
//! solar calculator. Around 0.01° in declination for dates within a few centuries of J2000.
//! Rise/set is found by hour-angle iteration against a horizon lowered by the observer's dip.

#![allow(clippy::unreadable_literal)]

use super::{Equatorial, SolarEngine, horizon_dip, hour_angle_events, julian_date_at};
use crate::math::{
    asin, atan2, cos, degrees_to_radians, mul_add, normalize_degrees_0_to_360, polynomial,
    powi, radians_to_degrees, sin,
};
use crate::normalize::LocalDay;
use crate::time::{J2000_JDN, JulianDate};
use crate::types::SUNRISE_ELEVATION_ANGLE;
use crate::{
    AtmosphericConditions, Location, PrecisionTier, Result, SolarGeometry, SunriseResult,
};
use chrono::{DateTime, Utc};

/// Library-grade engine with elevation depression.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighEngine;

impl HighEngine {
    /// Altitude of the sun's centre at rise/set for an observer at `elevation` meters.
    #[must_use]
    pub fn horizon(elevation: f64) -> f64 {
        SUNRISE_ELEVATION_ANGLE - horizon_dip(elevation)
    }
}

impl SolarEngine for HighEngine {
    fn tier(&self) -> PrecisionTier {
        PrecisionTier::High
    }

    fn solar_position(
        &self,
        instant: &DateTime<Utc>,
        location: &Location,
        _conditions: &AtmosphericConditions,
    ) -> Result<SolarGeometry> {
        let sun = apparent_sun(&julian_date_at(instant)?);
        let (azimuth, elevation) = sun.horizontal(location.latitude(), location.longitude());
        Ok(SolarGeometry::new(azimuth, elevation)?
            .with_equatorial(sun.right_ascension, sun.declination))
    }

    fn solar_events(
        &self,
        day: &LocalDay,
        location: &Location,
        _conditions: &AtmosphericConditions,
    ) -> Result<SunriseResult<DateTime<Utc>>> {
        hour_angle_events(
            day,
            location,
            Self::horizon(location.elevation()),
            apparent_sun,
        )
    }
}

fn apparent_sun(jd: &JulianDate) -> Equatorial {
    let t = jd.julian_century();

    let mean_longitude =
        normalize_degrees_0_to_360(polynomial(&[280.46646, 36000.76983, 0.0003032], t));
    let mean_anomaly = degrees_to_radians(polynomial(&[357.52911, 35999.05029, -0.0001537], t));

    let center = sin(mean_anomaly) * polynomial(&[1.914602, -0.004817, -0.000014], t)
        + sin(2.0 * mean_anomaly) * polynomial(&[0.019993, -0.000101], t)
        + sin(3.0 * mean_anomaly) * 0.000289;

    let omega = degrees_to_radians(125.04 - 1934.136 * t);
    let lambda = degrees_to_radians(mean_longitude + center - 0.00569 - 0.00478 * sin(omega));

    let mean_obliquity =
        23.0 + (26.0 + polynomial(&[21.448, -46.815, -0.00059, 0.001813], t) / 60.0) / 60.0;
    let epsilon = degrees_to_radians(mean_obliquity + 0.00256 * cos(omega));

    let right_ascension = normalize_degrees_0_to_360(radians_to_degrees(atan2(
        cos(epsilon) * sin(lambda),
        cos(lambda),
    )));
    let declination = radians_to_degrees(asin(sin(epsilon) * sin(lambda)));

    Equatorial {
        right_ascension,
        declination,
        sidereal_time: mean_sidereal_time(jd),
    }
}

/// Greenwich mean sidereal time in degrees, Meeus eq. 12.4.
pub(crate) fn mean_sidereal_time(jd: &JulianDate) -> f64 {
    let t = jd.julian_century();
    normalize_degrees_0_to_360(mul_add(
        powi(t, 2),
        0.000387933 - t / 38710000.0,
        mul_add(360.98564736629, jd.julian_date() - J2000_JDN, 280.46061837),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::resolve_timezone;
    use chrono::{NaiveDate, Timelike};

    fn local_minutes(instant: &DateTime<Utc>, zone: &str) -> u32 {
        let local = resolve_timezone(zone).unwrap().to_local(instant);
        local.hour() * 60 + local.minute()
    }

    #[test]
    fn test_meeus_example_25a() {
        // 1992-10-13 0h TD: apparent RA 198.378°, declination -7.785°
        let jd = JulianDate::from_raw(2448908.5, 0.0);
        let sun = apparent_sun(&jd);
        assert!((sun.right_ascension - 198.378).abs() < 0.01);
        assert!((sun.declination - -7.785).abs() < 0.01);
    }

    #[test]
    fn test_mean_sidereal_time_example_12a() {
        // 1987-04-10 0h UT: 13h10m46.3668s
        let jd = JulianDate::from_raw(2446895.5, 0.0);
        let expected = (13.0 + 10.0 / 60.0 + 46.3668 / 3600.0) * 15.0;
        assert!((mean_sidereal_time(&jd) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_position_carries_equatorial_coordinates() {
        let instant = "2024-06-21T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let location = Location::new(0.0, 0.0, 0.0).unwrap();
        let geometry = HighEngine
            .solar_position(&instant, &location, &AtmosphericConditions::standard())
            .unwrap();
        let declination = geometry.declination().unwrap();
        assert!((declination - 23.44).abs() < 0.05);
        assert!(geometry.right_ascension().is_some());
        assert!((geometry.elevation_angle() - (90.0 - declination)).abs() < 1.0);
    }

    #[test]
    fn test_elevation_lowers_horizon() {
        assert_eq!(HighEngine::horizon(0.0), SUNRISE_ELEVATION_ANGLE);
        assert!(HighEngine::horizon(2000.0) < HighEngine::horizon(100.0));
    }

    #[test]
    fn test_sunrise_new_york_summer() {
        let zone = resolve_timezone("America/New_York").unwrap();
        let day = zone
            .local_day(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap())
            .unwrap();
        let location = Location::new(40.7128, -74.0060, 10.0).unwrap();
        let events = HighEngine
            .solar_events(&day, &location, &AtmosphericConditions::standard())
            .unwrap();

        // 05:25 EDT
        let sunrise = local_minutes(events.sunrise().unwrap(), "America/New_York");
        assert!((5 * 60 + 21..=5 * 60 + 28).contains(&sunrise), "{sunrise}");
        let sunset = local_minutes(events.sunset().unwrap(), "America/New_York");
        assert!((20 * 60 + 27..=20 * 60 + 35).contains(&sunset), "{sunset}");
    }

    #[test]
    fn test_polar_day_and_night() {
        let location = Location::new(78.22, 15.65, 0.0).unwrap();
        let zone = resolve_timezone("Arctic/Longyearbyen").unwrap();

        let june = zone
            .local_day(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap())
            .unwrap();
        let result = HighEngine
            .solar_events(&june, &location, &AtmosphericConditions::standard())
            .unwrap();
        assert!(matches!(result, SunriseResult::AllDay { .. }));

        let december = zone
            .local_day(NaiveDate::from_ymd_opt(2024, 12, 21).unwrap())
            .unwrap();
        let result = HighEngine
            .solar_events(&december, &location, &AtmosphericConditions::standard())
            .unwrap();
        assert!(matches!(result, SunriseResult::AllNight { .. }));
    }
}
