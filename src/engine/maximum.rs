//! Maximum tier: apparent sun with nutation, aberration and topocentric parallax.
//!
//! The sun's coordinates follow Meeus, "Astronomical Algorithms" (2nd ed.), ch. 22 and 25,
//! evaluated at ephemeris time. Rise and set are first estimated with the three-day
//! interpolation of the NREL SPA report (Reda & Andreas 2003, Appendix A.2) for the UTC dates
//! around local noon, then refined by bisection on the topocentric elevation against a horizon
//! built from the configured refraction model, the solar semidiameter and the observer's dip.
//! Sunrise is the crossing before the transit nearest local noon and sunset the one after it.

#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]

use super::{SolarEngine, horizon_dip, julian_date_at};
use crate::math::{
    acos, asin, atan, atan2, cos, degrees_to_radians, floor, mul_add,
    normalize_degrees_0_to_360, polynomial, powi, radians_to_degrees, sin, tan,
};
use crate::normalize::LocalDay;
use crate::refraction::{SUNRISE_DEPRESSION, refraction_at, sunrise_refraction};
use crate::time::{DeltaT, JulianDate, datetime_to_julian_date, julian_date_to_datetime};
use crate::types::PolarCondition;
use crate::{
    AtmosphericConditions, Error, Location, PrecisionTier, RefractionModel, Result,
    SolarGeometry, SunriseResult,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Aberration constant in arcseconds.
const ABERRATION_CONSTANT: f64 = -20.4898;

/// Earth flattening factor (WGS84).
const EARTH_FLATTENING_FACTOR: f64 = 0.99664719;

/// Earth equatorial radius in meters.
const EARTH_RADIUS_METERS: f64 = 6378140.0;

/// Equatorial horizontal parallax of the sun at 1 AU, arcseconds.
const SOLAR_PARALLAX: f64 = 8.794;

/// Mean angular semidiameter of the sun in degrees.
const SOLAR_SEMIDIAMETER: f64 = 0.2666;

/// Half-width of the bisection bracket around the A.2 estimate, in days (20 minutes).
const BRACKET_DAYS: f64 = 20.0 / 1440.0;

/// Bisection stops once the bracket is narrower than this, in days (0.1 s).
const BISECTION_TOLERANCE_DAYS: f64 = 0.1 / 86_400.0;

const MAX_BISECTIONS: usize = 64;

/// Transit to culmination, in days.
const HALF_DAY: f64 = 0.5;

/// Full-model engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaximumEngine {
    model: RefractionModel,
}

impl MaximumEngine {
    /// Creates an engine refracting with `model`.
    #[must_use]
    pub const fn new(model: RefractionModel) -> Self {
        Self { model }
    }

    /// The refraction model used for the horizon and apparent elevations.
    #[must_use]
    pub const fn refraction_model(&self) -> RefractionModel {
        self.model
    }

    /// Topocentric altitude of the sun's centre at rise/set, in degrees.
    #[must_use]
    pub fn horizon(&self, location: &Location, conditions: &AtmosphericConditions) -> f64 {
        -(sunrise_refraction(self.model, conditions) / 60.0
            + SOLAR_SEMIDIAMETER
            + horizon_dip(location.elevation()))
    }
}

impl SolarEngine for MaximumEngine {
    fn tier(&self) -> PrecisionTier {
        PrecisionTier::Maximum
    }

    fn solar_position(
        &self,
        instant: &DateTime<Utc>,
        location: &Location,
        conditions: &AtmosphericConditions,
    ) -> Result<SolarGeometry> {
        let ephemeris = SunEphemeris::at(&julian_date_at(instant)?);
        let position = topocentric(&ephemeris, location);

        let elevation = if position.elevation > SUNRISE_DEPRESSION {
            position.elevation + refraction_at(self.model, position.elevation, conditions) / 60.0
        } else {
            position.elevation
        };

        Ok(SolarGeometry::new(position.azimuth, elevation.min(90.0))?
            .with_equatorial(position.right_ascension, position.declination))
    }

    fn solar_events(
        &self,
        day: &LocalDay,
        location: &Location,
        conditions: &AtmosphericConditions,
    ) -> Result<SunriseResult<DateTime<Utc>>> {
        let noon = day.midpoint();
        let delta_t = DeltaT::estimate_from_date_like(noon)?;
        let horizon = self.horizon(location, conditions);

        // the local day may straddle two UTC dates
        let noon_date = noon.date_naive();
        let out_of_range = || Error::computation_error("date outside supported range");
        let dates = [
            noon_date.pred_opt().ok_or_else(out_of_range)?,
            noon_date,
            noon_date.succ_opt().ok_or_else(out_of_range)?,
        ];
        let estimates = dates
            .iter()
            .map(|date| estimate_for_date(*date, location, horizon, delta_t))
            .collect::<Result<Vec<_>>>()?;

        let noon_jd = datetime_to_julian_date(&noon);
        let nearest = estimates
            .iter()
            .min_by(|a, b| (a.transit - noon_jd).abs().total_cmp(&(b.transit - noon_jd).abs()))
            .ok_or_else(|| Error::computation_error("no transit estimate"))?;
        let transit_jd = nearest.transit;
        let transit = julian_date_to_datetime(transit_jd)?;

        match nearest.polar {
            Some(PolarCondition::PolarDay) => return Ok(SunriseResult::AllDay { transit }),
            Some(PolarCondition::PolarNight) => return Ok(SunriseResult::AllNight { transit }),
            None => {}
        }

        // rise before and set after this transit, one of each per UTC date
        let regular = || estimates.iter().filter(|estimate| estimate.polar.is_none());
        let sunrise_estimate = regular()
            .map(|estimate| estimate.sunrise)
            .filter(|jd| *jd < transit_jd && *jd > transit_jd - 1.0)
            .max_by(f64::total_cmp);
        let sunset_estimate = regular()
            .map(|estimate| estimate.sunset)
            .filter(|jd| *jd > transit_jd && *jd < transit_jd + 1.0)
            .min_by(f64::total_cmp);

        let crossing = Crossing {
            location,
            horizon,
            delta_t,
        };
        let sunrise = crossing.refine(sunrise_estimate, transit_jd - HALF_DAY, transit_jd, true)?;
        let sunset = crossing.refine(sunset_estimate, transit_jd, transit_jd + HALF_DAY, false)?;

        Ok(SunriseResult::RegularDay {
            sunrise,
            transit,
            sunset,
        })
    }
}

fn estimate_for_date(
    date: NaiveDate,
    location: &Location,
    horizon: f64,
    delta_t: f64,
) -> Result<RiseSetEstimate> {
    let midnight = JulianDate::from_utc(date.year(), date.month(), date.day(), 0, 0, 0.0, 0.0)?;
    Ok(rise_set_estimate(midnight, location, horizon, delta_t))
}

/// Horizon crossing search for one observer and horizon.
struct Crossing<'a> {
    location: &'a Location,
    horizon: f64,
    delta_t: f64,
}

impl Crossing<'_> {
    /// Topocentric elevation above the horizon at `jd`, degrees.
    fn above(&self, jd: f64) -> f64 {
        let ephemeris = SunEphemeris::at(&JulianDate::from_raw(jd, self.delta_t));
        topocentric(&ephemeris, self.location).elevation - self.horizon
    }

    fn brackets(&self, low: f64, high: f64, rising: bool) -> bool {
        let (at_low, at_high) = (self.above(low), self.above(high));
        if rising {
            at_low < 0.0 && at_high > 0.0
        } else {
            at_low > 0.0 && at_high < 0.0
        }
    }

    /// Bisects for the crossing, first within 20 minutes of `estimate`, then over the
    /// half day `[earliest, latest]` between a culmination and the transit, where the
    /// elevation is monotonic.
    fn refine(
        &self,
        estimate: Option<f64>,
        earliest: f64,
        latest: f64,
        rising: bool,
    ) -> Result<DateTime<Utc>> {
        let (mut low, mut high) = match estimate {
            Some(jd) if self.brackets(jd - BRACKET_DAYS, jd + BRACKET_DAYS, rising) => {
                (jd - BRACKET_DAYS, jd + BRACKET_DAYS)
            }
            _ if self.brackets(earliest, latest, rising) => (earliest, latest),
            _ => {
                return Err(Error::computation_error(
                    "no horizon crossing between culmination and transit",
                ));
            }
        };

        for _ in 0..MAX_BISECTIONS {
            if high - low < BISECTION_TOLERANCE_DAYS {
                break;
            }
            let middle = 0.5 * (low + high);
            if (self.above(middle) < 0.0) == rising {
                low = middle;
            } else {
                high = middle;
            }
        }
        julian_date_to_datetime(0.5 * (low + high))
    }
}

/// Location-independent solar quantities for one instant.
#[derive(Debug, Clone, Copy)]
struct SunEphemeris {
    /// Earth-sun distance in AU
    radius: f64,
    /// Apparent sidereal time at Greenwich (degrees)
    nu_degrees: f64,
    /// Geocentric apparent right ascension (degrees)
    alpha_degrees: f64,
    /// Geocentric apparent declination (degrees)
    delta_degrees: f64,
}

impl SunEphemeris {
    fn at(jd: &JulianDate) -> Self {
        let t = jd.julian_ephemeris_century();

        // geometric longitude and anomaly, Meeus 25.2-25.7
        let mean_longitude = polynomial(&[280.46646, 36000.76983, 0.0003032], t);
        let mean_anomaly = degrees_to_radians(polynomial(&[357.52911, 35999.05029, -0.0001537], t));
        let eccentricity = polynomial(&[0.016708634, -0.000042037, -0.0000001267], t);
        let center = sin(mean_anomaly) * polynomial(&[1.914602, -0.004817, -0.000014], t)
            + sin(2.0 * mean_anomaly) * polynomial(&[0.019993, -0.000101], t)
            + sin(3.0 * mean_anomaly) * 0.000289;
        let theta_degrees = normalize_degrees_0_to_360(mean_longitude + center);
        let true_anomaly = mean_anomaly + degrees_to_radians(center);
        let radius = 1.000001018 * (1.0 - powi(eccentricity, 2))
            / mul_add(eccentricity, cos(true_anomaly), 1.0);

        let nutation = Nutation::at(t);

        // Meeus 22.2, arcseconds
        let epsilon0 = polynomial(&[84381.448, -46.8150, -0.00059, 0.001813], t) / 3600.0;
        let epsilon_degrees = epsilon0 + nutation.delta_epsilon;

        let delta_tau = ABERRATION_CONSTANT / (3600.0 * radius);
        let lambda_degrees = theta_degrees + nutation.delta_psi + delta_tau;

        let epsilon = degrees_to_radians(epsilon_degrees);
        let lambda = degrees_to_radians(lambda_degrees);
        let alpha_degrees = normalize_degrees_0_to_360(radians_to_degrees(atan2(
            sin(lambda) * cos(epsilon),
            cos(lambda),
        )));
        let delta_degrees = radians_to_degrees(asin(sin(epsilon) * sin(lambda)));

        Self {
            radius,
            nu_degrees: apparent_sidereal_time(jd, nutation.delta_psi, epsilon_degrees),
            alpha_degrees,
            delta_degrees,
        }
    }
}

/// Nutation in longitude and obliquity, degrees.
#[derive(Debug, Clone, Copy)]
struct Nutation {
    delta_psi: f64,
    delta_epsilon: f64,
}

impl Nutation {
    /// Four-term series, Meeus ch. 22 (accurate to 0.5" in longitude).
    fn at(t: f64) -> Self {
        let omega = degrees_to_radians(polynomial(&[125.04452, -1934.136261], t));
        let sun = degrees_to_radians(polynomial(&[280.4665, 36000.7698], t));
        let moon = degrees_to_radians(polynomial(&[218.3165, 481267.8813], t));

        let delta_psi = -17.20 * sin(omega) - 1.32 * sin(2.0 * sun) - 0.23 * sin(2.0 * moon)
            + 0.21 * sin(2.0 * omega);
        let delta_epsilon = 9.20 * cos(omega) + 0.57 * cos(2.0 * sun) + 0.10 * cos(2.0 * moon)
            - 0.09 * cos(2.0 * omega);

        Self {
            delta_psi: delta_psi / 3600.0,
            delta_epsilon: delta_epsilon / 3600.0,
        }
    }
}

fn apparent_sidereal_time(jd: &JulianDate, delta_psi: f64, epsilon_degrees: f64) -> f64 {
    let mean = super::high::mean_sidereal_time(jd);
    normalize_degrees_0_to_360(mul_add(
        delta_psi,
        cos(degrees_to_radians(epsilon_degrees)),
        mean,
    ))
}

/// Sun as seen from the observer's position on the ellipsoid.
#[derive(Debug, Clone, Copy)]
struct Topocentric {
    azimuth: f64,
    elevation: f64,
    right_ascension: f64,
    declination: f64,
}

/// SPA steps 3.9-3.14.
fn topocentric(ephemeris: &SunEphemeris, location: &Location) -> Topocentric {
    let latitude = location.latitude();
    let elevation = location.elevation();

    let h_degrees = normalize_degrees_0_to_360(
        ephemeris.nu_degrees + location.longitude() - ephemeris.alpha_degrees,
    );
    let h = degrees_to_radians(h_degrees);

    let xi = degrees_to_radians(SOLAR_PARALLAX / (3600.0 * ephemeris.radius));
    let phi = degrees_to_radians(latitude);
    let delta = degrees_to_radians(ephemeris.delta_degrees);

    let u = atan(EARTH_FLATTENING_FACTOR * tan(phi));
    let y = mul_add(
        EARTH_FLATTENING_FACTOR,
        sin(u),
        (elevation / EARTH_RADIUS_METERS) * sin(phi),
    );
    let x = mul_add(elevation / EARTH_RADIUS_METERS, cos(phi), cos(u));

    let delta_alpha = atan2(
        -x * sin(xi) * sin(h),
        mul_add(x * sin(xi), -cos(h), cos(delta)),
    );
    let delta_prime = atan2(
        mul_add(y, -sin(xi), sin(delta)) * cos(delta_alpha),
        mul_add(x * sin(xi), -cos(h), cos(delta)),
    );

    let h_prime = h - delta_alpha;
    let zenith = acos(mul_add(
        sin(phi),
        sin(delta_prime),
        cos(phi) * cos(delta_prime) * cos(h_prime),
    ));
    let azimuth = normalize_degrees_0_to_360(
        180.0
            + radians_to_degrees(atan2(
                sin(h_prime),
                cos(h_prime) * sin(phi) - tan(delta_prime) * cos(phi),
            )),
    );

    Topocentric {
        azimuth,
        elevation: 90.0 - radians_to_degrees(zenith),
        right_ascension: normalize_degrees_0_to_360(
            ephemeris.alpha_degrees + radians_to_degrees(delta_alpha),
        ),
        declination: radians_to_degrees(delta_prime),
    }
}

/// A.2 estimate for one UTC date, as Julian dates.
#[derive(Debug, Clone, Copy)]
struct RiseSetEstimate {
    transit: f64,
    sunrise: f64,
    sunset: f64,
    polar: Option<PolarCondition>,
}

#[derive(Debug, Clone, Copy)]
struct AlphaDelta {
    alpha: f64,
    delta: f64,
}

/// SPA Appendix A.2 for the UTC date starting at `midnight`.
fn rise_set_estimate(
    midnight: JulianDate,
    location: &Location,
    horizon: f64,
    delta_t: f64,
) -> RiseSetEstimate {
    let latitude = location.latitude();
    let longitude = location.longitude();

    // A.2.1-2. sidereal time at 0 UT, alpha/delta at 0 TT for the day before, of and after
    let nu_degrees = SunEphemeris::at(&midnight).nu_degrees;
    let alpha_deltas = [-1.0, 0.0, 1.0].map(|offset| {
        let ephemeris = SunEphemeris::at(&midnight.add_days(offset));
        AlphaDelta {
            alpha: ephemeris.alpha_degrees,
            delta: ephemeris.delta_degrees,
        }
    });

    // A.2.3. approximate transit
    let m0 = (alpha_deltas[1].alpha - longitude - nu_degrees) / 360.0;
    let polar = polar_condition(latitude, horizon, alpha_deltas[1].delta);
    let m_values = approximate_times(m0, latitude, horizon, alpha_deltas[1].delta);
    let [transit, sunrise, sunset] = corrected_times(
        m_values,
        nu_degrees,
        delta_t,
        latitude,
        longitude,
        horizon,
        &alpha_deltas,
    );

    let day_start = midnight.julian_date();
    RiseSetEstimate {
        transit: day_start + transit,
        sunrise: day_start + sunrise,
        sunset: day_start + sunset,
        polar,
    }
}

fn rise_cosine(latitude: f64, horizon: f64, delta: f64) -> f64 {
    let phi = degrees_to_radians(latitude);
    let delta_rad = degrees_to_radians(delta);
    mul_add(sin(phi), -sin(delta_rad), sin(degrees_to_radians(horizon)))
        / (cos(phi) * cos(delta_rad))
}

fn polar_condition(latitude: f64, horizon: f64, delta: f64) -> Option<PolarCondition> {
    let cosine = rise_cosine(latitude, horizon, delta);
    if cosine < -1.0 {
        Some(PolarCondition::PolarDay)
    } else if cosine > 1.0 {
        Some(PolarCondition::PolarNight)
    } else {
        None
    }
}

/// A.2.4-7. Day fractions of transit, sunrise and sunset.
fn approximate_times(m0: f64, latitude: f64, horizon: f64, delta: f64) -> [f64; 3] {
    let h0_degrees = radians_to_degrees(acos(rise_cosine(latitude, horizon, delta))).min(180.0);
    [
        unit_fraction(m0),
        unit_fraction(m0 - h0_degrees / 360.0),
        unit_fraction(m0 + h0_degrees / 360.0),
    ]
}

/// A.2.8-15. Corrected day fractions of transit, sunrise and sunset.
fn corrected_times(
    m_values: [f64; 3],
    nu_degrees: f64,
    delta_t: f64,
    latitude: f64,
    longitude: f64,
    horizon: f64,
    alpha_deltas: &[AlphaDelta; 3],
) -> [f64; 3] {
    let phi = degrees_to_radians(latitude);

    let a = wrap_large(alpha_deltas[1].alpha - alpha_deltas[0].alpha);
    let a_prime = wrap_large(alpha_deltas[1].delta - alpha_deltas[0].delta);
    let b = wrap_large(alpha_deltas[2].alpha - alpha_deltas[1].alpha);
    let b_prime = wrap_large(alpha_deltas[2].delta - alpha_deltas[1].delta);
    let c = b - a;
    let c_prime = b_prime - a_prime;

    let mut local_hour_angle = [0.0; 3];
    let mut altitude = [0.0; 3];
    let mut declination = [0.0; 3];
    for i in 0..3 {
        let nu = mul_add(360.985647, m_values[i], nu_degrees);
        let n = m_values[i] + delta_t / 86_400.0;

        let alpha_prime = alpha_deltas[1].alpha + n * mul_add(c, n, a + b) / 2.0;
        let delta_prime = alpha_deltas[1].delta + n * mul_add(c_prime, n, a_prime + b_prime) / 2.0;

        local_hour_angle[i] = signed_hour_angle(nu + longitude - alpha_prime);
        declination[i] = degrees_to_radians(delta_prime);
        altitude[i] = radians_to_degrees(asin(mul_add(
            sin(phi),
            sin(declination[i]),
            cos(phi) * cos(declination[i]) * cos(degrees_to_radians(local_hour_angle[i])),
        )));
    }

    let event = |i: usize| {
        m_values[i]
            + (altitude[i] - horizon)
                / (360.0
                    * cos(declination[i])
                    * cos(phi)
                    * sin(degrees_to_radians(local_hour_angle[i])))
    };

    [
        m_values[0] - local_hour_angle[0] / 360.0,
        event(1),
        event(2),
    ]
}

/// Fractional part in [0, 1).
fn unit_fraction(value: f64) -> f64 {
    value - floor(value)
}

/// Wraps day-to-day differences that jumped across 0°/360°.
fn wrap_large(value: f64) -> f64 {
    if value.abs() > 2.0 {
        unit_fraction(value)
    } else {
        value
    }
}

/// A.2.11. Hour angle limited to [-180, 180].
fn signed_hour_angle(degrees: f64) -> f64 {
    let limited = 360.0 * unit_fraction(degrees / 360.0);
    if limited > 180.0 {
        limited - 360.0
    } else {
        limited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::resolve_timezone;
    use crate::time::J2000_JDN;
    use chrono::Timelike;

    fn events(
        latitude: f64,
        longitude: f64,
        zone: &str,
        date: (i32, u32, u32),
    ) -> Result<SunriseResult<DateTime<Utc>>> {
        let zone = resolve_timezone(zone).unwrap();
        let day = zone
            .local_day(NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap())
            .unwrap();
        let location = Location::new(latitude, longitude, 0.0).unwrap();
        MaximumEngine::new(RefractionModel::Bennett).solar_events(
            &day,
            &location,
            &AtmosphericConditions::standard(),
        )
    }

    #[test]
    fn test_ephemeris_meeus_example_25a() {
        // 1992-10-13 0h TD: apparent RA 198.38083°, declination -7.78507°, R 0.99766 AU
        let ephemeris = SunEphemeris::at(&JulianDate::from_raw(2448908.5, 0.0));
        assert!((ephemeris.alpha_degrees - 198.38083).abs() < 0.003);
        assert!((ephemeris.delta_degrees - -7.78507).abs() < 0.003);
        assert!((ephemeris.radius - 0.99766).abs() < 1e-4);
    }

    #[test]
    fn test_nutation_meeus_example_22a() {
        // 1987-04-10 0h TD: Δψ = -3.788", Δε = +9.443"
        let t = (2446895.5 - J2000_JDN) / 36525.0;
        let nutation = Nutation::at(t);
        assert!((nutation.delta_psi * 3600.0 - -3.788).abs() < 0.5);
        assert!((nutation.delta_epsilon * 3600.0 - 9.443).abs() < 0.1);
    }

    #[test]
    fn test_signed_hour_angle() {
        for (degrees, expected) in [(190.0, -170.0), (-90.0, -90.0), (725.0, 5.0), (180.0, 180.0)] {
            let limited = signed_hour_angle(degrees);
            assert!((limited - expected).abs() < 1e-9, "{degrees}: {limited}");
        }
    }

    #[test]
    fn test_horizon_includes_refraction_semidiameter_and_dip() {
        let engine = MaximumEngine::new(RefractionModel::Bennett);
        let sea_level = Location::new(0.0, 0.0, 0.0).unwrap();
        let horizon = engine.horizon(&sea_level, &AtmosphericConditions::standard());
        assert!((horizon - -0.829).abs() < 0.01, "{horizon}");

        let mountain = Location::new(0.0, 0.0, 3000.0).unwrap();
        assert!(engine.horizon(&mountain, &AtmosphericConditions::standard()) < horizon - 1.0);
    }

    #[test]
    fn test_sunrise_within_local_day_east_of_utc() {
        // Sydney winter: 07:00 AEST, a UTC date earlier than the local date
        let result = events(-33.8688, 151.2093, "Australia/Sydney", (2024, 6, 21)).unwrap();
        let zone = resolve_timezone("Australia/Sydney").unwrap();
        let sunrise = zone.to_local(result.sunrise().unwrap());
        assert_eq!(sunrise.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        let minutes = sunrise.hour() * 60 + sunrise.minute();
        assert!((6 * 60 + 56..=7 * 60 + 4).contains(&minutes), "{sunrise}");
    }

    #[test]
    fn test_refined_event_sits_on_horizon() {
        let engine = MaximumEngine::new(RefractionModel::Saemundsson);
        let location = Location::new(51.5074, -0.1278, 0.0).unwrap();
        let zone = resolve_timezone("Europe/London").unwrap();
        let day = zone
            .local_day(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap())
            .unwrap();
        let conditions = AtmosphericConditions::standard();
        let sunrise = *engine
            .solar_events(&day, &location, &conditions)
            .unwrap()
            .sunrise()
            .unwrap();

        let jd = julian_date_at(&sunrise).unwrap();
        let elevation = topocentric(&SunEphemeris::at(&jd), &location).elevation;
        assert!((elevation - engine.horizon(&location, &conditions)).abs() < 0.005);
    }

    #[test]
    fn test_crossings_far_from_estimate_are_found() {
        // grazing midsummer sunrise and high-latitude days where the estimate misses by >20 min
        let engine = MaximumEngine::new(RefractionModel::Bennett);
        let conditions = AtmosphericConditions::standard();
        for (latitude, longitude, date) in [
            (66.0, 0.0, (2024, 6, 11)),
            (65.0, -60.0, (2024, 8, 21)),
            (-65.5, 30.0, (2024, 11, 21)),
        ] {
            let location = Location::new(latitude, longitude, 0.0).unwrap();
            let result = events(latitude, longitude, "UTC", date).unwrap();
            let SunriseResult::RegularDay {
                sunrise,
                transit,
                sunset,
            } = result
            else {
                panic!("{latitude} {longitude}: {result:?}");
            };
            assert!(sunrise < transit && transit < sunset);

            let horizon = engine.horizon(&location, &conditions);
            for event in [sunrise, sunset] {
                let jd = julian_date_at(&event).unwrap();
                let elevation = topocentric(&SunEphemeris::at(&jd), &location).elevation;
                assert!((elevation - horizon).abs() < 0.005, "{latitude}: {elevation}");
            }
        }
    }

    #[test]
    fn test_polar_day() {
        let result = events(78.22, 15.65, "Arctic/Longyearbyen", (2024, 6, 21)).unwrap();
        assert!(matches!(result, SunriseResult::AllDay { .. }));
    }

    #[test]
    fn test_apparent_elevation_is_refracted() {
        let engine = MaximumEngine::new(RefractionModel::Bennett);
        let location = Location::new(25.317644, 83.005495, 80.0).unwrap();
        let instant = "2024-02-18T04:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let geometry = engine
            .solar_position(&instant, &location, &AtmosphericConditions::standard())
            .unwrap();

        let jd = julian_date_at(&instant).unwrap();
        let geometric = topocentric(&SunEphemeris::at(&jd), &location).elevation;
        assert!(geometry.elevation_angle() > geometric);
        assert!(geometry.declination().is_some());
    }
}
