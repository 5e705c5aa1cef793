//! Observer location, coordinate validation and coordinate formatting.

use crate::error::{check_coordinates, check_elevation};
use crate::math::round;
use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;

/// A validated observer position.
///
/// # Example
/// ```
/// # use brahma_muhurat::Location;
/// let varanasi = Location::new(25.317644, 83.005495, 80.0).unwrap();
/// assert_eq!(varanasi.elevation(), 80.0);
///
/// assert!(Location::new(91.0, 0.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    elevation: f64,
}

impl Location {
    /// Creates a location after range-checking every component.
    ///
    /// # Errors
    /// Returns `NotANumber` for NaN and `InvalidLatitude`, `InvalidLongitude` or
    /// `InvalidElevation` for out-of-range values.
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Result<Self> {
        validate_coordinates(latitude, longitude)?;
        validate_elevation(elevation)?;
        Ok(Self {
            latitude,
            longitude,
            elevation,
        })
    }

    /// Latitude in degrees, positive north.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, positive east.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Elevation above sea level in meters.
    #[must_use]
    pub const fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Formats both coordinates, latitude first.
    #[must_use]
    pub fn format(&self, format: CoordinateFormat) -> String {
        format_coordinates(self.latitude, self.longitude, format)
    }
}

/// Validates a latitude/longitude pair.
///
/// Exact bounds are accepted.
///
/// # Errors
/// Returns `NotANumber` for NaN, `InvalidLatitude` or `InvalidLongitude` when out of range.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    check_coordinates(latitude, longitude)
}

/// Validates an observer elevation in meters against [-500, 9000].
///
/// # Errors
/// Returns `NotANumber` for NaN and `InvalidElevation` when out of range.
pub fn validate_elevation(elevation: f64) -> Result<()> {
    check_elevation(elevation)
}

/// Text representation of an angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoordinateFormat {
    /// `25.317644° N`
    #[default]
    Decimal,
    /// `25° 19' 3.52" N`
    #[cfg_attr(feature = "serde", serde(rename = "dms"))]
    DegreesMinutesSeconds,
    /// `25° 19.0586' N`
    #[cfg_attr(feature = "serde", serde(rename = "ddm"))]
    DegreesDecimalMinutes,
}

impl fmt::Display for CoordinateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Decimal => "decimal",
            Self::DegreesMinutesSeconds => "dms",
            Self::DegreesDecimalMinutes => "ddm",
        })
    }
}

impl FromStr for CoordinateFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimal" => Ok(Self::Decimal),
            "dms" => Ok(Self::DegreesMinutesSeconds),
            "ddm" => Ok(Self::DegreesDecimalMinutes),
            _ => Err(Error::UnknownOption {
                kind: "coordinate format",
                value: s.to_owned(),
                expected: "decimal dms ddm",
            }),
        }
    }
}

/// Which hemisphere letters an angle takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// N/S
    Latitude,
    /// E/W
    Longitude,
}

/// Formats a latitude/longitude pair as `"<lat>, <lon>"`.
///
/// # Example
/// ```
/// # use brahma_muhurat::{format_coordinates, CoordinateFormat};
/// assert_eq!(
///     format_coordinates(25.317644, 83.005495, CoordinateFormat::Decimal),
///     "25.317644° N, 83.005495° E"
/// );
/// assert_eq!(
///     format_coordinates(25.317644, -0.5, CoordinateFormat::DegreesMinutesSeconds),
///     "25° 19' 3.52\" N, 0° 30' 0.00\" W"
/// );
/// ```
#[must_use]
pub fn format_coordinates(latitude: f64, longitude: f64, format: CoordinateFormat) -> String {
    format!(
        "{}, {}",
        format_angle(latitude, Axis::Latitude, format),
        format_angle(longitude, Axis::Longitude, format)
    )
}

/// Formats a single angle with its hemisphere letter.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn format_angle(value: f64, axis: Axis, format: CoordinateFormat) -> String {
    let hemisphere = match (axis, value < 0.0) {
        (Axis::Latitude, false) => 'N',
        (Axis::Latitude, true) => 'S',
        (Axis::Longitude, false) => 'E',
        (Axis::Longitude, true) => 'W',
    };
    let magnitude = value.abs();

    match format {
        CoordinateFormat::Decimal => format!("{magnitude:.6}° {hemisphere}"),
        CoordinateFormat::DegreesMinutesSeconds => {
            // hundredths of an arc-second, so rounding carries into minutes and degrees
            let total = round(magnitude * 360_000.0) as u64;
            let degrees = total / 360_000;
            let minutes = (total % 360_000) / 6_000;
            let hundredths = total % 6_000;
            format!(
                "{degrees}° {minutes}' {}.{:02}\" {hemisphere}",
                hundredths / 100,
                hundredths % 100
            )
        }
        CoordinateFormat::DegreesDecimalMinutes => {
            let total = round(magnitude * 600_000.0) as u64;
            let degrees = total / 600_000;
            let ten_thousandths = total % 600_000;
            format!(
                "{degrees}° {}.{:04}' {hemisphere}",
                ten_thousandths / 10_000,
                ten_thousandths % 10_000
            )
        }
    }
}
