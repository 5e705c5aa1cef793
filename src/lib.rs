//! # Brahma Muhurat
//!
//! Computes the Brahma Muhurat window, the span that ends at sunrise, for a location, a
//! calendar date and a timezone.
//!
//! The core is a sunrise pipeline: validated coordinates and atmosphere go into a solar
//! engine at one of three precision tiers, the crossing is corrected for refraction, and a
//! tradition rule turns the sunrise into a window.
//!
//! - **Basic**: Grena (2012) algorithm no. 3, fixed -0.833° horizon
//! - **High** (default): NOAA / Meeus low-precision coordinates with horizon dip
//! - **Maximum**: apparent sun with nutation, aberration and topocentric parallax, rise/set from
//!   the NREL SPA three-day interpolation refined against a refracted horizon; falls back to
//!   **High** when it cannot find a crossing
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for requests, reports and configuration
//! - `libm`: use pure Rust math for bit-reproducible results across platforms
//!
//! ## References
//!
//! - Meeus, J. (1998). Astronomical Algorithms, 2nd ed. Willmann-Bell.
//! - Reda, I.; Andreas, A. (2003). Solar position algorithm for solar radiation applications.
//!   Solar Energy, 76(5), 577-589. DOI: <http://dx.doi.org/10.1016/j.solener.2003.12.003>
//! - Grena, R. (2012). Five new algorithms for the computation of sun position from 2010 to 2110.
//!   Solar Energy, 86(5), 1323-1337. DOI: <http://dx.doi.org/10.1016/j.solener.2012.01.024>
//! - Bennett, G. G. (1982). The calculation of astronomical refraction in marine navigation.
//!   Journal of Navigation, 35(2), 255-259.
//!
//! ## Quick Start
//!
//! ```rust
//! use brahma_muhurat::{
//!     CalculationRequest, CalculatorConfig, MuhuratCalculator, PrecisionTier, TraditionType,
//! };
//!
//! let calculator = MuhuratCalculator::new(
//!     CalculatorConfig::default()
//!         .with_precision(PrecisionTier::Maximum)
//!         .with_tradition(TraditionType::Standard),
//! );
//!
//! // Varanasi, 18 February 2024
//! let request = CalculationRequest::new(25.317644, 83.005495, "2024-02-18", "Asia/Kolkata")
//!     .with_elevation(80.0);
//! let report = calculator.calculate(&request).unwrap();
//!
//! println!("Sunrise: {}", report.sunrise.local_time);
//! println!(
//!     "Brahma Muhurat: {} - {} ({} min)",
//!     report.muhurat.start.local_time,
//!     report.muhurat.end.local_time,
//!     report.muhurat.duration.minutes
//! );
//! assert_eq!(report.muhurat.duration.minutes, 96);
//! ```
//!
//! ### Batch
//! ```rust
//! use brahma_muhurat::{BatchRequest, CalculatorConfig, MuhuratCalculator};
//!
//! let calculator = MuhuratCalculator::new(CalculatorConfig::default());
//! let batch = BatchRequest::new(51.5074, -0.1278, ["2024-06-20", "2024-13-01"], "Europe/London");
//! let items = calculator.calculate_batch(&batch);
//!
//! assert!(items[0].report().is_some());
//! assert!(items[1].error().is_some());
//! ```
//!
//! ### Refraction only
//! ```rust
//! use brahma_muhurat::{refraction_arcminutes, AtmosphericConditions, RefractionModel};
//!
//! let conditions = AtmosphericConditions::new(1000.0, 25.0, 0.7).unwrap();
//! let arcminutes = refraction_arcminutes(RefractionModel::Rigorous, 0.0, &conditions).unwrap();
//! assert!(arcminutes > 25.0 && arcminutes < 40.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery, clippy::cargo, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cargo_common_metadata,
    clippy::multiple_crate_versions, // Acceptable for dev-dependencies
    clippy::float_cmp, // Exact comparisons of mathematical constants in tests
)]

// Public API exports
pub use crate::calculator::{
    AstronomicalData, BatchItem, BatchRequest, CalculationRequest, CalculatorConfig,
    LocationReport, MuhuratCalculator, MuhuratReport, ReportTime, WindowDuration, WindowReport,
};
pub use crate::engine::{SolarEngine, for_tier};
pub use crate::error::{Error, Result};
pub use crate::geo::{
    Axis, CoordinateFormat, Location, format_angle, format_coordinates, validate_coordinates,
    validate_elevation,
};
pub use crate::muhurat::{MuhuratWindow, MuhuratWindowCalculator};
pub use crate::normalize::{DateInput, Zone, parse_date, resolve_timezone};
pub use crate::observe::{LogObserver, Observer};
pub use crate::refraction::{
    RefractionReport, RefractionRequest, refraction_arcminutes, refraction_time_correction,
    sunrise_refraction,
};
pub use crate::sunrise::{ResolvedSunrise, SunriseResolver};
pub use crate::types::{
    AtmosphericConditions, PolarCondition, PrecisionTier, RefractionModel, SolarGeometry,
    SunriseResult, TraditionType,
};

// Pipeline modules
pub mod calculator;
pub mod engine;
pub mod muhurat;
pub mod refraction;
pub mod sunrise;

// Core modules
pub mod error;
pub mod geo;
pub mod normalize;
pub mod types;

// Supporting modules
pub mod lunar;
pub mod observe;
pub mod time;

// Internal modules
mod math;
