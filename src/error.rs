//! Error types and input validation.

use crate::math::normalize_degrees_0_to_360;
use core::fmt;

/// Result type alias for operations in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Lowest supported observer elevation in meters (Dead Sea shore is about -430 m).
pub const MIN_ELEVATION: f64 = -500.0;
/// Highest supported observer elevation in meters.
pub const MAX_ELEVATION: f64 = 9000.0;
/// Lowest supported station pressure in hPa.
pub const MIN_PRESSURE: f64 = 500.0;
/// Highest supported station pressure in hPa.
pub const MAX_PRESSURE: f64 = 1100.0;
/// Lowest supported air temperature in °C.
pub const MIN_TEMPERATURE: f64 = -50.0;
/// Highest supported air temperature in °C.
pub const MAX_TEMPERATURE: f64 = 50.0;

/// Errors that can occur while computing sunrise and muhurat windows.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A numeric input was NaN.
    NotANumber {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Invalid latitude value (must be between -90 and +90 degrees).
    InvalidLatitude {
        /// The invalid latitude value provided.
        value: f64,
    },
    /// Invalid longitude value (must be between -180 and +180 degrees).
    InvalidLongitude {
        /// The invalid longitude value provided.
        value: f64,
    },
    /// Invalid observer elevation (must be between -500 and 9000 meters).
    InvalidElevation {
        /// The invalid elevation value provided.
        value: f64,
    },
    /// Invalid apparent altitude for refraction calculations.
    InvalidAltitude {
        /// The invalid altitude value provided.
        value: f64,
    },
    /// Invalid pressure value for atmospheric refraction calculations.
    InvalidPressure {
        /// The invalid pressure value provided.
        value: f64,
    },
    /// Invalid temperature value for atmospheric refraction calculations.
    InvalidTemperature {
        /// The invalid temperature value provided.
        value: f64,
    },
    /// Invalid relative humidity (must be a fraction between 0 and 1).
    InvalidHumidity {
        /// The invalid humidity value provided.
        value: f64,
    },
    /// A date input could not be turned into a calendar date.
    InvalidDate {
        /// The raw input.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The timezone identifier is not a known IANA zone or fixed offset.
    UnknownTimeZone {
        /// The rejected identifier.
        name: String,
    },
    /// A configuration name that matches no known option.
    UnknownOption {
        /// What kind of option was being parsed.
        kind: &'static str,
        /// The rejected text.
        value: String,
        /// The accepted spellings.
        expected: &'static str,
    },
    /// The dynamic tradition needs a night length that was not supplied.
    MissingNightLength,
    /// A night length that cannot produce a window.
    InvalidNightLength {
        /// The rejected night length in minutes.
        minutes: f64,
    },
    /// Numerical computation error (e.g., convergence failure).
    ComputationError {
        /// Description of the computation error.
        message: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber { field } => write!(f, "{field} must be a number, got NaN"),
            Self::InvalidLatitude { value } => {
                write!(
                    f,
                    "invalid latitude {value}° (must be between -90° and +90°)"
                )
            }
            Self::InvalidLongitude { value } => {
                write!(
                    f,
                    "invalid longitude {value}° (must be between -180° and +180°)"
                )
            }
            Self::InvalidElevation { value } => {
                write!(
                    f,
                    "invalid elevation {value} m \
                     (must be between {MIN_ELEVATION} m and {MAX_ELEVATION} m)"
                )
            }
            Self::InvalidAltitude { value } => {
                write!(
                    f,
                    "invalid altitude {value}° (must be between -90° and +90°)"
                )
            }
            Self::InvalidPressure { value } => {
                write!(
                    f,
                    "invalid pressure {value} hPa \
                     (must be between {MIN_PRESSURE} and {MAX_PRESSURE} hPa)"
                )
            }
            Self::InvalidTemperature { value } => {
                write!(
                    f,
                    "invalid temperature {value}°C \
                     (must be between {MIN_TEMPERATURE}°C and {MAX_TEMPERATURE}°C)"
                )
            }
            Self::InvalidHumidity { value } => {
                write!(
                    f,
                    "invalid humidity {value} (must be a fraction between 0 and 1)"
                )
            }
            Self::InvalidDate { input, reason } => {
                write!(f, "invalid date {input:?}: {reason}")
            }
            Self::UnknownTimeZone { name } => {
                write!(f, "unknown timezone {name:?}")
            }
            Self::UnknownOption {
                kind,
                value,
                expected,
            } => {
                write!(f, "unknown {kind} {value:?} (expected one of {expected})")
            }
            Self::MissingNightLength => {
                write!(f, "the dynamic tradition requires the night length in minutes")
            }
            Self::InvalidNightLength { minutes } => {
                write!(
                    f,
                    "invalid night length {minutes} min (must be positive and shorter than a day)"
                )
            }
            Self::ComputationError { message } => {
                write!(f, "computation error: {message}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Creates an invalid latitude error.
    #[must_use]
    pub const fn invalid_latitude(value: f64) -> Self {
        Self::InvalidLatitude { value }
    }

    /// Creates an invalid longitude error.
    #[must_use]
    pub const fn invalid_longitude(value: f64) -> Self {
        Self::InvalidLongitude { value }
    }

    /// Creates an invalid elevation error.
    #[must_use]
    pub const fn invalid_elevation(value: f64) -> Self {
        Self::InvalidElevation { value }
    }

    /// Creates an invalid pressure error.
    #[must_use]
    pub const fn invalid_pressure(value: f64) -> Self {
        Self::InvalidPressure { value }
    }

    /// Creates an invalid temperature error.
    #[must_use]
    pub const fn invalid_temperature(value: f64) -> Self {
        Self::InvalidTemperature { value }
    }

    /// Creates an invalid humidity error.
    #[must_use]
    pub const fn invalid_humidity(value: f64) -> Self {
        Self::InvalidHumidity { value }
    }

    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason,
        }
    }

    /// Creates an unknown timezone error.
    #[must_use]
    pub fn unknown_time_zone(name: impl Into<String>) -> Self {
        Self::UnknownTimeZone { name: name.into() }
    }

    /// Creates a computation error.
    #[must_use]
    pub const fn computation_error(message: &'static str) -> Self {
        Self::ComputationError { message }
    }

    /// Whether the error is a value-out-of-range error rather than a type or format error.
    #[must_use]
    pub const fn is_range_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLatitude { .. }
                | Self::InvalidLongitude { .. }
                | Self::InvalidElevation { .. }
                | Self::InvalidAltitude { .. }
                | Self::InvalidPressure { .. }
                | Self::InvalidTemperature { .. }
                | Self::InvalidHumidity { .. }
                | Self::InvalidNightLength { .. }
        )
    }
}

fn check_number(field: &'static str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(Error::NotANumber { field });
    }
    Ok(())
}

/// Validates latitude is within the valid range (-90 to +90 degrees).
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidLatitude` outside -90 to +90 degrees.
pub fn check_latitude(latitude: f64) -> Result<()> {
    check_number("latitude", latitude)?;
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::invalid_latitude(latitude));
    }
    Ok(())
}

/// Validates longitude is within the valid range (-180 to +180 degrees).
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidLongitude` outside -180 to +180 degrees.
pub fn check_longitude(longitude: f64) -> Result<()> {
    check_number("longitude", longitude)?;
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::invalid_longitude(longitude));
    }
    Ok(())
}

/// Validates both latitude and longitude are within valid ranges.
///
/// # Errors
/// Returns the first latitude or longitude error.
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    check_latitude(latitude)?;
    check_longitude(longitude)?;
    Ok(())
}

/// Validates observer elevation is within -500 to 9000 meters.
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidElevation` outside the supported range.
pub fn check_elevation(elevation: f64) -> Result<()> {
    check_number("elevation", elevation)?;
    if !(MIN_ELEVATION..=MAX_ELEVATION).contains(&elevation) {
        return Err(Error::invalid_elevation(elevation));
    }
    Ok(())
}

/// Validates an apparent altitude is within -90 to +90 degrees.
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidAltitude` outside the range.
pub fn check_altitude(altitude: f64) -> Result<()> {
    check_number("altitude", altitude)?;
    if !(-90.0..=90.0).contains(&altitude) {
        return Err(Error::InvalidAltitude { value: altitude });
    }
    Ok(())
}

/// Validates station pressure is within 500 to 1100 hPa.
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidPressure` outside the range.
pub fn check_pressure(pressure: f64) -> Result<()> {
    check_number("pressure", pressure)?;
    if !(MIN_PRESSURE..=MAX_PRESSURE).contains(&pressure) {
        return Err(Error::invalid_pressure(pressure));
    }
    Ok(())
}

/// Validates air temperature is within -50 to 50 °C.
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidTemperature` outside the range.
pub fn check_temperature(temperature: f64) -> Result<()> {
    check_number("temperature", temperature)?;
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(Error::invalid_temperature(temperature));
    }
    Ok(())
}

/// Validates relative humidity is a fraction between 0 and 1.
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidHumidity` outside the range.
pub fn check_humidity(humidity: f64) -> Result<()> {
    check_number("humidity", humidity)?;
    if !(0.0..=1.0).contains(&humidity) {
        return Err(Error::invalid_humidity(humidity));
    }
    Ok(())
}

/// Validates and normalizes an azimuth angle to the range [0, 360) degrees.
///
/// # Errors
/// Returns `ComputationError` if azimuth is not finite.
pub fn check_azimuth(azimuth: f64) -> Result<f64> {
    if !azimuth.is_finite() {
        return Err(Error::computation_error("azimuth is not finite"));
    }
    Ok(normalize_degrees_0_to_360(azimuth))
}

/// Validates a solar elevation angle to be within the range [-90, 90] degrees.
///
/// # Errors
/// Returns `ComputationError` if the angle is not finite or outside the valid range.
pub fn check_elevation_angle(elevation_angle: f64) -> Result<f64> {
    if !elevation_angle.is_finite() {
        return Err(Error::computation_error("elevation angle is not finite"));
    }
    if !(-90.0..=90.0).contains(&elevation_angle) {
        return Err(Error::computation_error(
            "elevation angle must be between -90° and 90°",
        ));
    }
    Ok(elevation_angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_validation() {
        assert!(check_latitude(0.0).is_ok());
        assert!(check_latitude(90.0).is_ok());
        assert!(check_latitude(-90.0).is_ok());

        assert_eq!(check_latitude(91.0), Err(Error::invalid_latitude(91.0)));
        assert_eq!(check_latitude(-91.0), Err(Error::invalid_latitude(-91.0)));
        assert_eq!(
            check_latitude(f64::NAN),
            Err(Error::NotANumber { field: "latitude" })
        );
        assert!(check_latitude(f64::INFINITY).unwrap_err().is_range_error());
    }

    #[test]
    fn test_longitude_validation() {
        assert!(check_longitude(180.0).is_ok());
        assert!(check_longitude(-180.0).is_ok());

        assert!(check_longitude(181.0).unwrap_err().is_range_error());
        assert!(check_longitude(-181.0).unwrap_err().is_range_error());
        assert!(!check_longitude(f64::NAN).unwrap_err().is_range_error());
    }

    #[test]
    fn test_elevation_validation() {
        assert!(check_elevation(-500.0).is_ok());
        assert!(check_elevation(9000.0).is_ok());
        assert!(check_elevation(0.0).is_ok());

        assert_eq!(check_elevation(-501.0), Err(Error::invalid_elevation(-501.0)));
        assert_eq!(check_elevation(9001.0), Err(Error::invalid_elevation(9001.0)));
    }

    #[test]
    fn test_atmosphere_validation() {
        assert!(check_pressure(1013.25).is_ok());
        assert!(check_pressure(500.0).is_ok());
        assert!(check_pressure(1100.0).is_ok());
        assert!(check_pressure(499.0).is_err());
        assert!(check_pressure(f64::NAN).is_err());

        assert!(check_temperature(-50.0).is_ok());
        assert!(check_temperature(50.0).is_ok());
        assert!(check_temperature(51.0).is_err());

        assert!(check_humidity(0.0).is_ok());
        assert!(check_humidity(1.0).is_ok());
        assert!(check_humidity(1.2).is_err());
        assert!(check_humidity(-0.1).is_err());
    }

    #[test]
    fn test_error_display_names_field_and_range() {
        assert_eq!(
            Error::invalid_latitude(95.0).to_string(),
            "invalid latitude 95° (must be between -90° and +90°)"
        );
        assert_eq!(
            Error::invalid_elevation(9001.0).to_string(),
            "invalid elevation 9001 m (must be between -500 m and 9000 m)"
        );
        assert_eq!(
            Error::unknown_time_zone("Mars/Olympus").to_string(),
            "unknown timezone \"Mars/Olympus\""
        );
        assert_eq!(
            Error::NotANumber { field: "longitude" }.to_string(),
            "longitude must be a number, got NaN"
        );
    }

    #[test]
    fn test_check_azimuth() {
        assert_eq!(check_azimuth(-90.0).unwrap(), 270.0);
        assert_eq!(check_azimuth(450.0).unwrap(), 90.0);
        assert!(check_azimuth(f64::NAN).is_err());
    }

    #[test]
    fn test_check_elevation_angle() {
        assert!(check_elevation_angle(-90.0).is_ok());
        assert!(check_elevation_angle(90.0).is_ok());
        assert!(check_elevation_angle(90.5).is_err());
        assert!(check_elevation_angle(f64::INFINITY).is_err());
    }
}
