//! Solar position engines, one per precision tier.
//!
//! Every tier answers the same two questions: where the sun is at an instant, and when it
//! crosses the horizon on a local day. [`for_tier`] maps a [`PrecisionTier`] to its engine.

#![allow(clippy::many_single_char_names)]

use crate::math::{
    acos, asin, atan2, cos, degrees_to_radians, normalize_degrees_0_to_360,
    normalize_degrees_signed, radians_to_degrees, sin, sqrt, tan,
};
use crate::normalize::LocalDay;
use crate::time::{DeltaT, JulianDate, datetime_to_julian_date};
use crate::{
    AtmosphericConditions, Location, PrecisionTier, RefractionModel, Result, SolarGeometry,
    SunriseResult,
};
use chrono::{DateTime, Utc};
use core::fmt;

mod basic;
mod high;
mod maximum;

pub use basic::BasicEngine;
pub use high::HighEngine;
pub use maximum::MaximumEngine;

/// Degrees of solar hour angle per day.
const HOUR_ANGLE_RATE: f64 = 360.0;

/// Iterations of the transit search; each one shrinks the error by a factor of ~400.
const TRANSIT_ITERATIONS: usize = 4;

/// Iterations of the rise/set hour-angle refinement.
const EVENT_ITERATIONS: usize = 5;

/// A solar position algorithm at one precision tier.
pub trait SolarEngine: fmt::Debug + Send + Sync {
    /// The tier this engine implements.
    fn tier(&self) -> PrecisionTier;

    /// Solar geometry for an observer at an instant.
    ///
    /// # Errors
    /// Returns `ComputationError` when the instant is outside the supported range.
    fn solar_position(
        &self,
        instant: &DateTime<Utc>,
        location: &Location,
        conditions: &AtmosphericConditions,
    ) -> Result<SolarGeometry>;

    /// Sunrise, transit and sunset for a local calendar day.
    ///
    /// # Errors
    /// Returns `ComputationError` when no event can be computed.
    fn solar_events(
        &self,
        day: &LocalDay,
        location: &Location,
        conditions: &AtmosphericConditions,
    ) -> Result<SunriseResult<DateTime<Utc>>>;
}

/// Builds the engine for a precision tier.
///
/// The refraction model only affects the maximum tier.
#[must_use]
pub fn for_tier(tier: PrecisionTier, model: RefractionModel) -> Box<dyn SolarEngine> {
    match tier {
        PrecisionTier::Basic => Box::new(BasicEngine),
        PrecisionTier::High => Box::new(HighEngine),
        PrecisionTier::Maximum => Box::new(MaximumEngine::new(model)),
    }
}

/// Julian date of an instant, with ΔT estimated for its month.
pub(crate) fn julian_date_at(instant: &DateTime<Utc>) -> Result<JulianDate> {
    Ok(JulianDate::from_raw(
        datetime_to_julian_date(instant),
        DeltaT::estimate_from_date_like(*instant)?,
    ))
}

/// Dip of the sea horizon for an observer `elevation` meters up, in degrees.
pub(crate) fn horizon_dip(elevation: f64) -> f64 {
    1.76 * sqrt(elevation.max(0.0)) / 60.0
}

/// Apparent equatorial position of the sun together with the sidereal time at Greenwich.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Equatorial {
    /// Right ascension in degrees.
    pub right_ascension: f64,
    /// Declination in degrees.
    pub declination: f64,
    /// Greenwich sidereal time in degrees.
    pub sidereal_time: f64,
}

impl Equatorial {
    /// Local hour angle in degrees, in [-180, 180).
    pub fn local_hour_angle(&self, longitude: f64) -> f64 {
        normalize_degrees_signed(self.sidereal_time + longitude - self.right_ascension)
    }

    /// Geocentric azimuth and elevation in degrees.
    pub fn horizontal(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let h = degrees_to_radians(self.local_hour_angle(longitude));
        let phi = degrees_to_radians(latitude);
        let delta = degrees_to_radians(self.declination);

        let elevation = radians_to_degrees(asin(
            sin(phi) * sin(delta) + cos(phi) * cos(delta) * cos(h),
        ));
        let azimuth = normalize_degrees_0_to_360(
            180.0 + radians_to_degrees(atan2(sin(h), cos(h) * sin(phi) - tan(delta) * cos(phi))),
        );
        (azimuth, elevation)
    }
}

/// Outcome of solving for the hour angle at which the sun reaches a given altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum HourAngle {
    /// The sun reaches the altitude at ± this hour angle, in degrees.
    Crossing(f64),
    /// The sun stays above the altitude all day.
    AlwaysAbove,
    /// The sun stays below the altitude all day.
    AlwaysBelow,
}

impl HourAngle {
    pub fn solve(latitude: f64, declination: f64, altitude: f64) -> Self {
        let phi = degrees_to_radians(latitude);
        let delta = degrees_to_radians(declination);

        let numerator = sin(degrees_to_radians(altitude)) - sin(phi) * sin(delta);
        let denominator = cos(phi) * cos(delta);
        if denominator.abs() < 1e-12 {
            return if numerator < 0.0 {
                Self::AlwaysAbove
            } else {
                Self::AlwaysBelow
            };
        }

        let cos_h0 = numerator / denominator;
        if cos_h0 < -1.0 {
            Self::AlwaysAbove
        } else if cos_h0 > 1.0 {
            Self::AlwaysBelow
        } else {
            Self::Crossing(radians_to_degrees(acos(cos_h0)))
        }
    }
}

/// Rise/set by iterating on the hour angle, seeded with the transit nearest local noon.
///
/// `sun` supplies the equatorial position for any Julian date; `horizon` is the altitude of
/// the sun's centre at the event.
pub(crate) fn hour_angle_events(
    day: &LocalDay,
    location: &Location,
    horizon: f64,
    sun: impl Fn(&JulianDate) -> Equatorial,
) -> Result<SunriseResult<DateTime<Utc>>> {
    let longitude = location.longitude();
    let latitude = location.latitude();

    let mut transit = julian_date_at(&day.midpoint())?;
    for _ in 0..TRANSIT_ITERATIONS {
        let hour_angle = sun(&transit).local_hour_angle(longitude);
        transit = transit.add_days(-hour_angle / HOUR_ANGLE_RATE);
    }

    let transit_time = transit.to_datetime()?;
    let semi_arc = match HourAngle::solve(latitude, sun(&transit).declination, horizon) {
        HourAngle::Crossing(semi_arc) => semi_arc,
        HourAngle::AlwaysAbove => {
            return Ok(SunriseResult::AllDay {
                transit: transit_time,
            });
        }
        HourAngle::AlwaysBelow => {
            return Ok(SunriseResult::AllNight {
                transit: transit_time,
            });
        }
    };

    let event = |direction: f64| {
        let mut estimate = transit.add_days(direction * semi_arc / HOUR_ANGLE_RATE);
        for _ in 0..EVENT_ITERATIONS {
            let position = sun(&estimate);
            let target = match HourAngle::solve(latitude, position.declination, horizon) {
                HourAngle::Crossing(semi_arc) => direction * semi_arc,
                HourAngle::AlwaysAbove => direction * 180.0,
                HourAngle::AlwaysBelow => 0.0,
            };
            let correction =
                normalize_degrees_signed(target - position.local_hour_angle(longitude));
            estimate = estimate.add_days(correction / HOUR_ANGLE_RATE);
        }
        estimate.to_datetime()
    };

    Ok(SunriseResult::RegularDay {
        sunrise: event(-1.0)?,
        transit: transit_time,
        sunset: event(1.0)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hour_angle_solve() {
        // equinox at the equator: twelve hours of day
        match HourAngle::solve(0.0, 0.0, 0.0) {
            HourAngle::Crossing(h0) => assert!((h0 - 90.0).abs() < 1e-9),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(HourAngle::solve(80.0, 23.0, -0.833), HourAngle::AlwaysAbove);
        assert_eq!(HourAngle::solve(80.0, -23.0, -0.833), HourAngle::AlwaysBelow);
        assert_eq!(HourAngle::solve(90.0, 10.0, -0.833), HourAngle::AlwaysAbove);
        assert_eq!(HourAngle::solve(-90.0, 10.0, -0.833), HourAngle::AlwaysBelow);
    }

    #[test]
    fn test_horizontal_at_transit() {
        let sun = Equatorial {
            right_ascension: 0.0,
            declination: 0.0,
            sidereal_time: 0.0,
        };
        let (azimuth, elevation) = sun.horizontal(45.0, 0.0);
        assert!((elevation - 45.0).abs() < 1e-9);
        assert!((azimuth - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizon_dip() {
        assert_eq!(horizon_dip(0.0), 0.0);
        assert_eq!(horizon_dip(-400.0), 0.0);
        assert!((horizon_dip(100.0) - 17.6 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_for_tier_dispatch() {
        for tier in PrecisionTier::ALL {
            assert_eq!(for_tier(*tier, RefractionModel::Bennett).tier(), *tier);
        }
    }
}
