//! Basic tier: Grena's algorithm no. 3.
//!
//! Grena, 'Five new algorithms for the computation of sun position from 2010 to 2110',
//! Solar Energy 86 (2012) pp. 1323-1337. Maximum error 0.01° within that range; usable with
//! growing error outside it. No atmospheric corrections are applied and rise/set uses the
//! fixed -0.833° horizon.

#![allow(clippy::unreadable_literal)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::suboptimal_flops)]

use super::{Equatorial, SolarEngine, hour_angle_events, julian_date_at};
use crate::math::{
    PI, asin, atan2, cos, degrees_to_radians, normalize_degrees_0_to_360, radians_to_degrees,
    sin, sqrt,
};
use crate::normalize::LocalDay;
use crate::time::JulianDate;
use crate::types::SUNRISE_ELEVATION_ANGLE;
use crate::{
    AtmosphericConditions, Location, PrecisionTier, Result, SolarGeometry, SunriseResult,
};
use chrono::{DateTime, Utc};

/// Julian date of the algorithm's epoch, 2060-01-01 00:00 UT.
const GRENA_EPOCH_JD: f64 = 2_473_459.5;

/// Low-order engine without atmospheric corrections.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEngine;

impl SolarEngine for BasicEngine {
    fn tier(&self) -> PrecisionTier {
        PrecisionTier::Basic
    }

    fn solar_position(
        &self,
        instant: &DateTime<Utc>,
        location: &Location,
        _conditions: &AtmosphericConditions,
    ) -> Result<SolarGeometry> {
        let jd = julian_date_at(instant)?;
        let sun = apparent_sun(&jd);

        let h = degrees_to_radians(sun.local_hour_angle(location.longitude()));
        let s_phi = sin(degrees_to_radians(location.latitude()));
        let c_phi = sqrt(1.0 - s_phi * s_phi);
        let s_delta = sin(degrees_to_radians(sun.declination));
        let c_delta = sqrt(1.0 - s_delta * s_delta);
        let s_h = sin(h);
        let c_h = cos(h);

        // parallax folded into the elevation
        let s_epsilon0 = s_phi * s_delta + c_phi * c_delta * c_h;
        let e_p = asin(s_epsilon0) - 4.26e-5 * sqrt(1.0 - s_epsilon0 * s_epsilon0);
        let gamma = atan2(s_h, c_h * s_phi - s_delta * c_phi / c_delta);

        SolarGeometry::new(
            normalize_degrees_0_to_360(radians_to_degrees(gamma + PI)),
            radians_to_degrees(e_p),
        )
    }

    fn solar_events(
        &self,
        day: &LocalDay,
        location: &Location,
        _conditions: &AtmosphericConditions,
    ) -> Result<SunriseResult<DateTime<Utc>>> {
        hour_angle_events(day, location, SUNRISE_ELEVATION_ANGLE, apparent_sun)
    }
}

/// Apparent right ascension, declination and Greenwich sidereal time.
fn apparent_sun(jd: &JulianDate) -> Equatorial {
    let t = jd.julian_date() - GRENA_EPOCH_JD;
    let t_e = t + 1.1574e-5 * jd.delta_t();
    let omega_at_e = 0.0172019715 * t_e;

    let lambda = -1.388803
        + 1.720279216e-2 * t_e
        + 3.3366e-2 * sin(omega_at_e - 0.06172)
        + 3.53e-4 * sin(2.0 * omega_at_e - 0.1163);
    let epsilon = 4.089567e-1 - 6.19e-9 * t_e;

    let s_lambda = sin(lambda);
    let c_lambda = cos(lambda);
    let s_epsilon = sin(epsilon);
    let c_epsilon = sqrt(1.0 - s_epsilon * s_epsilon);

    let alpha = atan2(s_lambda * c_epsilon, c_lambda);
    let delta = asin(s_lambda * s_epsilon);

    Equatorial {
        right_ascension: normalize_degrees_0_to_360(radians_to_degrees(alpha)),
        declination: radians_to_degrees(delta),
        sidereal_time: normalize_degrees_0_to_360(radians_to_degrees(
            1.7528311 + 6.300388099 * t,
        )),
    }
}
