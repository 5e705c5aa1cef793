//! Core data types shared by the engines, the resolver and the calculator.

use crate::error::{
    check_azimuth, check_elevation_angle, check_humidity, check_pressure, check_temperature,
};
use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;

/// Standard sunrise/sunset elevation angle in degrees.
///
/// Accounts for 34' of horizon refraction and the 16' solar semidiameter.
pub const SUNRISE_ELEVATION_ANGLE: f64 = -0.833;

/// Atmospheric conditions at the observer.
///
/// # Example
/// ```
/// # use brahma_muhurat::AtmosphericConditions;
/// let standard = AtmosphericConditions::standard();
/// assert_eq!(standard.pressure(), 1013.25);
/// assert_eq!(standard.temperature(), 15.0);
/// assert_eq!(standard.humidity(), 0.5);
///
/// let alpine = AtmosphericConditions::new(780.0, -5.0, 0.3).unwrap();
/// assert_eq!(alpine.pressure(), 780.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtmosphericConditions {
    /// Station pressure in hPa
    pressure: f64,
    /// Air temperature in degrees Celsius
    temperature: f64,
    /// Relative humidity as a fraction
    humidity: f64,
}

impl AtmosphericConditions {
    /// Creates validated atmospheric conditions.
    ///
    /// # Errors
    /// Returns `InvalidPressure`, `InvalidTemperature` or `InvalidHumidity` for out-of-range
    /// values.
    pub fn new(pressure: f64, temperature: f64, humidity: f64) -> Result<Self> {
        check_pressure(pressure)?;
        check_temperature(temperature)?;
        check_humidity(humidity)?;
        Ok(Self {
            pressure,
            temperature,
            humidity,
        })
    }

    /// Builds conditions from optional inputs, filling the standard values for omitted ones.
    ///
    /// # Errors
    /// Returns the validation error of the first out-of-range value.
    pub fn from_options(
        pressure: Option<f64>,
        temperature: Option<f64>,
        humidity: Option<f64>,
    ) -> Result<Self> {
        let standard = Self::standard();
        Self::new(
            pressure.unwrap_or(standard.pressure),
            temperature.unwrap_or(standard.temperature),
            humidity.unwrap_or(standard.humidity),
        )
    }

    /// Standard sea-level conditions: 1013.25 hPa, 15 °C, 50 % humidity.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            pressure: 1013.25,
            temperature: 15.0,
            humidity: 0.5,
        }
    }

    /// Station pressure in hPa.
    #[must_use]
    pub const fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Air temperature in °C.
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Relative humidity as a fraction in [0, 1].
    #[must_use]
    pub const fn humidity(&self) -> f64 {
        self.humidity
    }

    /// Air temperature in kelvin.
    #[must_use]
    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature + 273.15
    }
}

impl Default for AtmosphericConditions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Solar geometry for one observer and instant.
///
/// - Azimuth: 0° = North, measured clockwise to 360°
/// - Elevation: 90° = zenith, 0° = horizon, -90° = nadir
///
/// Equatorial coordinates are present for the high and maximum tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SolarGeometry {
    azimuth: f64,
    elevation: f64,
    right_ascension: Option<f64>,
    declination: Option<f64>,
}

impl SolarGeometry {
    /// Creates horizontal solar geometry.
    ///
    /// # Errors
    /// Returns error if azimuth is not finite or the elevation is outside [-90, 90].
    pub fn new(azimuth: f64, elevation: f64) -> Result<Self> {
        Ok(Self {
            azimuth: check_azimuth(azimuth)?,
            elevation: check_elevation_angle(elevation)?,
            right_ascension: None,
            declination: None,
        })
    }

    /// Attaches geocentric (or topocentric) right ascension and declination in degrees.
    #[must_use]
    pub const fn with_equatorial(mut self, right_ascension: f64, declination: f64) -> Self {
        self.right_ascension = Some(right_ascension);
        self.declination = Some(declination);
        self
    }

    /// Azimuth in degrees (0° to 360°, 0° = North).
    #[must_use]
    pub const fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Elevation angle in degrees.
    #[must_use]
    pub const fn elevation_angle(&self) -> f64 {
        self.elevation
    }

    /// Right ascension in degrees, when the tier provides it.
    #[must_use]
    pub const fn right_ascension(&self) -> Option<f64> {
        self.right_ascension
    }

    /// Declination in degrees, when the tier provides it.
    #[must_use]
    pub const fn declination(&self) -> Option<f64> {
        self.declination
    }
}

/// Result of a rise/set search for one day.
///
/// Polar days and nights carry only the transit instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SunriseResult<T> {
    /// Regular day with distinct sunrise, transit (noon), and sunset times
    RegularDay {
        /// Time of sunrise
        sunrise: T,
        /// Time of solar transit
        transit: T,
        /// Time of sunset
        sunset: T,
    },
    /// Polar day - sun remains above the horizon all day
    AllDay {
        /// Time of solar transit
        transit: T,
    },
    /// Polar night - sun remains below the horizon all day
    AllNight {
        /// Time of solar transit (sun highest, though still below the horizon)
        transit: T,
    },
}

impl<T> SunriseResult<T> {
    /// Gets the transit time (solar noon) for any sunrise result.
    pub const fn transit(&self) -> &T {
        match self {
            Self::RegularDay { transit, .. }
            | Self::AllDay { transit }
            | Self::AllNight { transit } => transit,
        }
    }

    /// Gets sunrise time if this is a regular day.
    pub const fn sunrise(&self) -> Option<&T> {
        if let Self::RegularDay { sunrise, .. } = self {
            Some(sunrise)
        } else {
            None
        }
    }

    /// Gets sunset time if this is a regular day.
    pub const fn sunset(&self) -> Option<&T> {
        if let Self::RegularDay { sunset, .. } = self {
            Some(sunset)
        } else {
            None
        }
    }
}

/// Why a day has no true sunrise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum PolarCondition {
    /// The sun stays above the horizon.
    PolarDay,
    /// The sun stays below the horizon.
    PolarNight,
}

/// Declares a configuration enum with stable lowercase names for `FromStr`/`Display`.
///
/// The `#[default]` variant backs the derived `Default`.
macro_rules! named_options {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The lowercase name used in configuration text.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| Error::UnknownOption {
                        kind: $kind,
                        value: s.to_owned(),
                        expected: concat!($($text, " "),+),
                    })
            }
        }
    };
}

named_options! {
    /// Accuracy/cost trade-off for the solar position engine.
    PrecisionTier, "precision tier" {
        /// Low-order formula, no atmospheric corrections.
        Basic => "basic",
        /// Library-grade formula with elevation depression and a coarse refraction term.
        #[default]
        High => "high",
        /// Rise/set search with the full refraction model; degrades to `High` on failure.
        Maximum => "maximum",
    }
}

named_options! {
    /// Atmospheric refraction formula.
    RefractionModel, "refraction model" {
        /// Bennett (1982).
        #[default]
        Bennett => "bennett",
        /// Sæmundsson (1986), tighter near the horizon.
        Saemundsson => "saemundsson",
        /// Refractive index from dry-air and water-vapour partial pressures.
        Rigorous => "rigorous",
    }
}

named_options! {
    /// Rule for the muhurat window duration.
    TraditionType, "tradition" {
        /// Two muhurtas, 96 minutes.
        #[default]
        Standard => "standard",
        /// 120 minutes.
        Extended => "extended",
        /// Smarta reckoning, 96 minutes.
        Smarta => "smarta",
        /// One fifteenth of the preceding night.
        Dynamic => "dynamic",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atmospheric_conditions() {
        let standard = AtmosphericConditions::default();
        assert_eq!(standard, AtmosphericConditions::standard());
        assert!((standard.temperature_kelvin() - 288.15).abs() < 1e-12);

        let partial = AtmosphericConditions::from_options(Some(950.0), None, Some(0.9)).unwrap();
        assert_eq!(partial.pressure(), 950.0);
        assert_eq!(partial.temperature(), 15.0);
        assert_eq!(partial.humidity(), 0.9);

        assert!(AtmosphericConditions::new(-1.0, 15.0, 0.5).is_err());
        assert!(AtmosphericConditions::new(1013.25, 80.0, 0.5).is_err());
        assert!(AtmosphericConditions::new(1013.25, 15.0, 1.5).is_err());
    }

    #[test]
    fn test_solar_geometry() {
        let geometry = SolarGeometry::new(-90.0, 30.0).unwrap();
        assert_eq!(geometry.azimuth(), 270.0);
        assert_eq!(geometry.elevation_angle(), 30.0);
        assert_eq!(geometry.declination(), None);

        let geometry = geometry.with_equatorial(330.0, -12.0);
        assert_eq!(geometry.right_ascension(), Some(330.0));
        assert_eq!(geometry.declination(), Some(-12.0));

        assert!(SolarGeometry::new(0.0, 91.0).is_err());
        assert!(SolarGeometry::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_sunrise_result_accessors() {
        let regular = SunriseResult::RegularDay {
            sunrise: 6,
            transit: 12,
            sunset: 18,
        };
        assert_eq!(regular.sunrise(), Some(&6));
        assert_eq!(regular.sunset(), Some(&18));
        assert_eq!(regular.transit(), &12);

        let polar = SunriseResult::AllDay { transit: 12 };
        assert_eq!(polar.sunrise(), None);
        assert_eq!(polar.sunset(), None);
        assert_eq!(polar.transit(), &12);
    }

    #[test]
    fn test_option_defaults() {
        assert_eq!(PrecisionTier::default(), PrecisionTier::High);
        assert_eq!(RefractionModel::default(), RefractionModel::Bennett);
        assert_eq!(TraditionType::default(), TraditionType::Standard);
    }

    #[test]
    fn test_option_names_round_trip() {
        for tier in PrecisionTier::ALL {
            assert_eq!(tier.as_str().parse::<PrecisionTier>().unwrap(), *tier);
        }
        assert_eq!(
            " Saemundsson ".parse::<RefractionModel>().unwrap(),
            RefractionModel::Saemundsson
        );
        assert_eq!(TraditionType::Dynamic.to_string(), "dynamic");

        let err = "vedic".parse::<TraditionType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown tradition \"vedic\" (expected one of standard extended smarta dynamic )"
        );
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PrecisionTier::default(), PrecisionTier::High);
        assert_eq!(RefractionModel::default(), RefractionModel::Bennett);
        assert_eq!(TraditionType::default(), TraditionType::Standard);
    }
}
