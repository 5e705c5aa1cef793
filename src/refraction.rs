//! Atmospheric refraction models.
//!
//! All results are in arc-minutes. Altitudes are clamped to 0.01° before any trigonometry so
//! the cotangent terms stay finite at and below the horizon; below -2° the horizon value is
//! extrapolated linearly down to zero.

#![allow(clippy::unreadable_literal)]

use crate::error::check_altitude;
use crate::math::{cos, degrees_to_radians, exp, tan};
use crate::{AtmosphericConditions, RefractionModel, Result};

/// Lowest altitude passed to the trigonometric formulas, in degrees.
const MIN_ALTITUDE: f64 = 0.01;

/// Below this apparent altitude the horizon refraction is extrapolated.
const EXTRAPOLATION_LIMIT: f64 = -2.0;

/// Fractional change of the extrapolated refraction per degree.
const EXTRAPOLATION_GRADIENT: f64 = 0.1;

/// Geometric depression of the sun's centre at standard sunrise, in degrees.
pub const SUNRISE_DEPRESSION: f64 = -0.833;

/// Reference pressure for the empirical formulas, hPa.
const REFERENCE_PRESSURE: f64 = 1013.25;

/// Reference temperature for the empirical formulas, K.
const REFERENCE_TEMPERATURE: f64 = 283.15;

/// Degrees of hour angle per second of time.
const DEGREES_PER_SECOND: f64 = 360.0 / 86_400.0;

const ARCMINUTES_PER_RADIAN: f64 = 60.0 * 180.0 / core::f64::consts::PI;

/// Computes refraction for an apparent altitude.
///
/// # Errors
/// Returns `NotANumber` or `InvalidAltitude` when the altitude is NaN or outside [-90, 90].
///
/// # Example
/// ```
/// # use brahma_muhurat::refraction::refraction_arcminutes;
/// # use brahma_muhurat::{AtmosphericConditions, RefractionModel};
/// let standard = AtmosphericConditions::standard();
/// let horizon = refraction_arcminutes(RefractionModel::Bennett, 0.0, &standard).unwrap();
/// assert!((horizon - 33.75).abs() < 0.05);
///
/// let zenith = refraction_arcminutes(RefractionModel::Bennett, 90.0, &standard).unwrap();
/// assert!(zenith < 0.01);
/// ```
pub fn refraction_arcminutes(
    model: RefractionModel,
    apparent_altitude: f64,
    conditions: &AtmosphericConditions,
) -> Result<f64> {
    check_altitude(apparent_altitude)?;
    Ok(refraction_at(model, apparent_altitude, conditions))
}

/// Refraction at the standard sunrise depression of -0.833°.
#[must_use]
pub fn sunrise_refraction(model: RefractionModel, conditions: &AtmosphericConditions) -> f64 {
    refraction_at(model, SUNRISE_DEPRESSION, conditions)
}

/// Converts a refraction angle to the shift it causes in the rise time, in seconds.
///
/// `seconds = (degrees / (360 / 86400)) · cos(declination) · cos(latitude)`
#[must_use]
pub fn refraction_time_correction(
    refraction_arcminutes: f64,
    latitude: f64,
    declination: f64,
) -> f64 {
    let degrees = refraction_arcminutes / 60.0;
    (degrees / DEGREES_PER_SECOND)
        * cos(degrees_to_radians(declination))
        * cos(degrees_to_radians(latitude))
}

/// Unchecked refraction, for callers that have already validated the altitude.
pub(crate) fn refraction_at(
    model: RefractionModel,
    apparent_altitude: f64,
    conditions: &AtmosphericConditions,
) -> f64 {
    let h = apparent_altitude.max(MIN_ALTITUDE);
    let refraction = match model {
        RefractionModel::Bennett => bennett(h) * empirical_scale(conditions),
        RefractionModel::Saemundsson => saemundsson(h) * empirical_scale(conditions),
        RefractionModel::Rigorous => rigorous(h, conditions),
    };

    if apparent_altitude < EXTRAPOLATION_LIMIT {
        let factor = 1.0 + EXTRAPOLATION_GRADIENT * (apparent_altitude - EXTRAPOLATION_LIMIT);
        (refraction * factor).max(0.0)
    } else {
        refraction.max(0.0)
    }
}

fn empirical_scale(conditions: &AtmosphericConditions) -> f64 {
    (conditions.pressure() / REFERENCE_PRESSURE)
        * (REFERENCE_TEMPERATURE / conditions.temperature_kelvin())
}

/// Bennett (1982), arc-minutes.
fn bennett(h: f64) -> f64 {
    1.0 / tan(degrees_to_radians(h + 7.31 / (h + 4.4)))
}

/// Sæmundsson (1986), arc-minutes.
fn saemundsson(h: f64) -> f64 {
    1.02 / tan(degrees_to_radians(h + 10.3 / (h + 5.11)))
}

/// Refraction from the refractive index of moist air.
fn rigorous(h: f64, conditions: &AtmosphericConditions) -> f64 {
    let temperature = conditions.temperature();
    let kelvin = conditions.temperature_kelvin();

    // Magnus formula, hPa
    let saturation = 6.1078 * exp(17.27 * temperature / (temperature + 237.3));
    let vapour = conditions.humidity() * saturation;
    let dry = conditions.pressure() - vapour;

    let refractivity = (77.6 * dry / kelvin + 64.8 * vapour / kelvin) * 1e-6;
    let bending = refractivity / tan(degrees_to_radians(h + 7.31 / (h + 4.4)));

    (bending * ARCMINUTES_PER_RADIAN).max(0.0)
}

/// Input of the standalone refraction calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefractionRequest {
    /// Apparent altitude in degrees.
    pub altitude: f64,
    /// Station pressure in hPa, standard when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pressure: Option<f64>,
    /// Temperature in °C, standard when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temperature: Option<f64>,
    /// Relative humidity fraction, standard when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: Option<f64>,
}

impl RefractionRequest {
    /// A request at standard atmospheric conditions.
    #[must_use]
    pub const fn at_altitude(altitude: f64) -> Self {
        Self {
            altitude,
            pressure: None,
            temperature: None,
            humidity: None,
        }
    }
}

/// Output of the standalone refraction calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefractionReport {
    /// The refraction angle.
    pub refraction: RefractionAngle,
}

/// A refraction angle in two units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefractionAngle {
    /// Arc-minutes.
    pub arcminutes: f64,
    /// Degrees.
    pub degrees: f64,
}

impl RefractionReport {
    /// Validates the request and evaluates `model`.
    ///
    /// # Errors
    /// Returns the validation error for the altitude or any atmospheric value.
    pub fn compute(model: RefractionModel, request: &RefractionRequest) -> Result<Self> {
        let conditions = AtmosphericConditions::from_options(
            request.pressure,
            request.temperature,
            request.humidity,
        )?;
        let arcminutes = refraction_arcminutes(model, request.altitude, &conditions)?;
        Ok(Self {
            refraction: RefractionAngle {
                arcminutes,
                degrees: arcminutes / 60.0,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD: AtmosphericConditions = AtmosphericConditions::standard();

    fn all_models() -> [RefractionModel; 3] {
        [
            RefractionModel::Bennett,
            RefractionModel::Saemundsson,
            RefractionModel::Rigorous,
        ]
    }

    #[test]
    fn test_horizon_values() {
        let bennett = refraction_arcminutes(RefractionModel::Bennett, 0.0, &STANDARD).unwrap();
        let saemundsson =
            refraction_arcminutes(RefractionModel::Saemundsson, 0.0, &STANDARD).unwrap();
        let rigorous = refraction_arcminutes(RefractionModel::Rigorous, 0.0, &STANDARD).unwrap();

        assert!((bennett - 33.75).abs() < 0.1, "bennett {bennett}");
        assert!((saemundsson - 28.40).abs() < 0.1, "saemundsson {saemundsson}");
        assert!((rigorous - 32.2).abs() < 0.3, "rigorous {rigorous}");
    }

    #[test]
    fn test_models_agree_near_horizon() {
        for altitude in [0.0, 0.5, 1.0, 5.0, 10.0] {
            let values = all_models()
                .map(|model| refraction_arcminutes(model, altitude, &STANDARD).unwrap());
            let max = values.iter().copied().fold(f64::MIN, f64::max);
            let min = values.iter().copied().fold(f64::MAX, f64::min);
            assert!(max - min < 6.0, "spread {} at {altitude}°", max - min);
        }
    }

    #[test]
    fn test_never_negative_and_decreasing() {
        for model in all_models() {
            let mut previous = f64::MAX;
            for step in 0..=90 {
                let altitude = f64::from(step);
                let value = refraction_arcminutes(model, altitude, &STANDARD).unwrap();
                assert!(value >= 0.0);
                assert!(value <= previous, "{model} not decreasing at {altitude}");
                previous = value;
            }
        }
    }

    #[test]
    fn test_clamped_below_horizon_and_extrapolated() {
        for model in all_models() {
            let horizon = refraction_arcminutes(model, MIN_ALTITUDE, &STANDARD).unwrap();
            let clamped = refraction_arcminutes(model, -1.0, &STANDARD).unwrap();
            assert_eq!(clamped, horizon);

            let below = refraction_arcminutes(model, -7.0, &STANDARD).unwrap();
            assert!((below - horizon * 0.5).abs() < 1e-9);
            assert_eq!(refraction_arcminutes(model, -15.0, &STANDARD).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_pressure_and_temperature_scaling() {
        let thin = AtmosphericConditions::new(506.625, 15.0, 0.5).unwrap();
        let standard = refraction_arcminutes(RefractionModel::Bennett, 0.0, &STANDARD).unwrap();
        let halved = refraction_arcminutes(RefractionModel::Bennett, 0.0, &thin).unwrap();
        assert!((halved - standard / 2.0).abs() < 1e-9);

        let cold = AtmosphericConditions::new(1013.25, -20.0, 0.5).unwrap();
        assert!(
            refraction_arcminutes(RefractionModel::Saemundsson, 0.0, &cold).unwrap()
                > refraction_arcminutes(RefractionModel::Saemundsson, 0.0, &STANDARD).unwrap()
        );
    }

    #[test]
    fn test_rigorous_humidity_sensitivity() {
        let dry = AtmosphericConditions::new(1013.25, 30.0, 0.0).unwrap();
        let humid = AtmosphericConditions::new(1013.25, 30.0, 1.0).unwrap();
        let dry_value = refraction_arcminutes(RefractionModel::Rigorous, 0.0, &dry).unwrap();
        let humid_value = refraction_arcminutes(RefractionModel::Rigorous, 0.0, &humid).unwrap();
        assert!(dry_value != humid_value);
        assert!((dry_value - humid_value).abs() < 1.0);
    }

    #[test]
    fn test_altitude_validation() {
        assert!(refraction_arcminutes(RefractionModel::Bennett, 91.0, &STANDARD).is_err());
        assert!(refraction_arcminutes(RefractionModel::Bennett, f64::NAN, &STANDARD).is_err());
    }

    #[test]
    fn test_sunrise_refraction_uses_standard_depression() {
        for model in all_models() {
            assert_eq!(
                sunrise_refraction(model, &STANDARD),
                refraction_arcminutes(model, SUNRISE_DEPRESSION, &STANDARD).unwrap()
            );
        }
    }

    #[test]
    fn test_time_correction() {
        // 15 arc-minutes is one minute of hour angle
        assert!((refraction_time_correction(15.0, 0.0, 0.0) - 60.0).abs() < 1e-9);
        let varanasi = refraction_time_correction(34.0, 25.3, -12.0);
        assert!(varanasi > 110.0 && varanasi < 125.0, "{varanasi}");
        assert!(refraction_time_correction(34.0, 90.0, 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_compute() {
        let report = RefractionReport::compute(
            RefractionModel::Bennett,
            &RefractionRequest::at_altitude(0.0),
        )
        .unwrap();
        assert!((report.refraction.degrees * 60.0 - report.refraction.arcminutes).abs() < 1e-12);

        let request = RefractionRequest {
            humidity: Some(2.0),
            ..RefractionRequest::at_altitude(0.0)
        };
        assert!(RefractionReport::compute(RefractionModel::Rigorous, &request).is_err());
    }
}
