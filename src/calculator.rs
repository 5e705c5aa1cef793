//! Public entry points: single, batch and refraction-only calculations.

use crate::geo::{Location, validate_coordinates};
use crate::lunar::MoonPhase;
use crate::muhurat::{MuhuratWindow, MuhuratWindowCalculator};
use crate::normalize::{DateInput, Zone, local_time_string, resolve_timezone};
use crate::observe::{
    CalculationTrace, DegradedEvent, DegradedReason, LogObserver, Observer,
};
use crate::refraction::{RefractionReport, RefractionRequest};
use crate::sunrise::{HorizonEvent, ResolvedSunrise, SunriseResolver};
use crate::{
    AtmosphericConditions, PolarCondition, PrecisionTier, RefractionModel, Result,
    TraditionType,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// The three choices fixed for a calculator's lifetime.
///
/// # Example
/// ```
/// # use brahma_muhurat::{CalculatorConfig, PrecisionTier, TraditionType};
/// let config = CalculatorConfig::default()
///     .with_precision("maximum".parse().unwrap())
///     .with_tradition(TraditionType::Dynamic);
/// assert_eq!(config.precision, PrecisionTier::Maximum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct CalculatorConfig {
    /// Solar engine tier.
    pub precision: PrecisionTier,
    /// Refraction formula.
    pub refraction_model: RefractionModel,
    /// Window duration rule.
    pub tradition: TraditionType,
}

impl CalculatorConfig {
    /// Replaces the precision tier.
    #[must_use]
    pub const fn with_precision(mut self, precision: PrecisionTier) -> Self {
        self.precision = precision;
        self
    }

    /// Replaces the refraction model.
    #[must_use]
    pub const fn with_refraction_model(mut self, refraction_model: RefractionModel) -> Self {
        self.refraction_model = refraction_model;
        self
    }

    /// Replaces the tradition.
    #[must_use]
    pub const fn with_tradition(mut self, tradition: TraditionType) -> Self {
        self.tradition = tradition;
        self
    }
}

/// One location, one date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalculationRequest {
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// Calendar date, interpreted in `timezone`.
    pub date: DateInput,
    /// IANA name or fixed offset.
    pub timezone: String,
    /// Meters above sea level, 0 when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: Option<f64>,
    /// Station pressure in hPa.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pressure: Option<f64>,
    /// Air temperature in °C.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temperature: Option<f64>,
    /// Relative humidity fraction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: Option<f64>,
}

impl CalculationRequest {
    /// A request at sea level under standard conditions.
    #[must_use]
    pub fn new(
        latitude: f64,
        longitude: f64,
        date: impl Into<DateInput>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            date: date.into(),
            timezone: timezone.into(),
            elevation: None,
            pressure: None,
            temperature: None,
            humidity: None,
        }
    }

    /// Sets the observer's elevation.
    #[must_use]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Sets pressure, temperature and humidity.
    #[must_use]
    pub fn with_atmosphere(mut self, pressure: f64, temperature: f64, humidity: f64) -> Self {
        self.pressure = Some(pressure);
        self.temperature = Some(temperature);
        self.humidity = Some(humidity);
        self
    }
}

/// One location, many dates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BatchRequest {
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// Dates in output order.
    pub dates: Vec<DateInput>,
    /// IANA name or fixed offset.
    pub timezone: String,
    /// Meters above sea level, 0 when omitted.
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: Option<f64>,
    /// Station pressure in hPa.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pressure: Option<f64>,
    /// Air temperature in °C.
    #[cfg_attr(feature = "serde", serde(default))]
    pub temperature: Option<f64>,
    /// Relative humidity fraction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub humidity: Option<f64>,
}

impl BatchRequest {
    /// A batch at sea level under standard conditions.
    #[must_use]
    pub fn new<D: Into<DateInput>>(
        latitude: f64,
        longitude: f64,
        dates: impl IntoIterator<Item = D>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            dates: dates.into_iter().map(Into::into).collect(),
            timezone: timezone.into(),
            elevation: None,
            pressure: None,
            temperature: None,
            humidity: None,
        }
    }

    /// Sets the observer's elevation.
    #[must_use]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    fn request_for(&self, date: &DateInput) -> CalculationRequest {
        CalculationRequest {
            latitude: self.latitude,
            longitude: self.longitude,
            date: date.clone(),
            timezone: self.timezone.clone(),
            elevation: self.elevation,
            pressure: self.pressure,
            temperature: self.temperature,
            humidity: self.humidity,
        }
    }
}

/// Outcome of one batch date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum BatchItem {
    /// The date was calculated.
    Success(Box<MuhuratReport>),
    /// The date failed; other items are unaffected.
    Failure {
        /// The date as given.
        date: String,
        /// Error message.
        error: String,
    },
}

impl BatchItem {
    /// The report, if this item succeeded.
    #[must_use]
    pub fn report(&self) -> Option<&MuhuratReport> {
        match self {
            Self::Success(report) => Some(report.as_ref()),
            Self::Failure { .. } => None,
        }
    }

    /// The error message, if this item failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error, .. } => Some(error),
        }
    }
}

/// Everything computed for one date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MuhuratReport {
    /// Where.
    pub location: LocationReport,
    /// Local calendar date.
    pub date: NaiveDate,
    /// Corrected sunrise.
    pub sunrise: ReportTime,
    /// The window.
    pub muhurat: WindowReport,
    /// How the result was obtained.
    pub astronomical_data: AstronomicalData,
}

/// Observer position and zone as used.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LocationReport {
    /// Degrees.
    pub latitude: f64,
    /// Degrees.
    pub longitude: f64,
    /// Meters.
    pub elevation: f64,
    /// Resolved zone name.
    pub timezone: String,
}

/// An instant with its wall-clock rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ReportTime {
    /// UTC instant.
    pub time: DateTime<Utc>,
    /// `HH:MM:SS` in the request's zone.
    pub local_time: String,
}

impl ReportTime {
    fn new(time: DateTime<Utc>, zone: &Zone) -> Self {
        Self {
            time,
            local_time: local_time_string(&time, zone),
        }
    }
}

/// Window bounds and length.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WindowReport {
    /// Start of the window.
    pub start: ReportTime,
    /// End of the window, equal to sunrise.
    pub end: ReportTime,
    /// Length.
    pub duration: WindowDuration,
}

/// A whole number of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowDuration {
    /// Minutes.
    pub minutes: i64,
}

/// Diagnostics and context for a report.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AstronomicalData {
    /// Tier that produced the sunrise.
    pub precision: PrecisionTier,
    /// Configured refraction model.
    pub refraction_model: RefractionModel,
    /// Configured tradition.
    pub tradition: TraditionType,
    /// Whether a fallback was used anywhere in the result.
    pub degraded: bool,
    /// Set when the sun does not rise that day.
    pub polar_condition: Option<PolarCondition>,
    /// Degrees at sunrise, when the tier reports it.
    pub solar_declination: Option<f64>,
    /// Degrees at sunrise, when the tier reports it.
    pub right_ascension: Option<f64>,
    /// Degrees at sunrise.
    pub sunrise_azimuth: f64,
    /// Horizon refraction, arc-minutes.
    pub refraction_arcminutes: f64,
    /// Seconds subtracted from the engine's sunrise.
    pub time_correction_seconds: f64,
    /// Offset in force at sunrise, e.g. `+05:30`.
    pub utc_offset: String,
    /// Sunrise to sunset, minutes.
    pub day_length_minutes: Option<f64>,
    /// Previous sunset to sunrise, minutes.
    pub night_length_minutes: Option<f64>,
    /// Moon at sunrise.
    pub moon_phase: MoonPhase,
}

/// Brahma Muhurat calculator with fixed precision, refraction model and tradition.
///
/// Stateless between calls; share it freely across threads.
///
/// # Example
/// ```
/// # use brahma_muhurat::{CalculationRequest, CalculatorConfig, MuhuratCalculator};
/// let calculator = MuhuratCalculator::new(CalculatorConfig::default());
/// let request = CalculationRequest::new(25.317644, 83.005495, "2024-02-18", "Asia/Kolkata")
///     .with_elevation(80.0);
/// let report = calculator.calculate(&request).unwrap();
/// assert_eq!(report.muhurat.duration.minutes, 96);
/// assert_eq!(report.muhurat.end.time, report.sunrise.time);
/// ```
#[derive(Debug)]
pub struct MuhuratCalculator {
    config: CalculatorConfig,
    resolver: SunriseResolver,
    window: MuhuratWindowCalculator,
    observer: Arc<dyn Observer>,
}

impl MuhuratCalculator {
    /// Creates a calculator reporting to [`LogObserver`].
    #[must_use]
    pub fn new(config: CalculatorConfig) -> Self {
        Self::with_observer(config, Arc::new(LogObserver))
    }

    /// Creates a calculator reporting to `observer`.
    #[must_use]
    pub fn with_observer(config: CalculatorConfig, observer: Arc<dyn Observer>) -> Self {
        Self {
            config,
            resolver: SunriseResolver::with_observer(
                config.precision,
                config.refraction_model,
                Arc::clone(&observer),
            ),
            window: MuhuratWindowCalculator,
            observer,
        }
    }

    /// The configuration this calculator was built with.
    #[must_use]
    pub const fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Calculates the window for one date.
    ///
    /// All inputs are validated before any astronomy runs. Polar days and engine failures
    /// produce a degraded report instead of an error.
    ///
    /// # Errors
    /// Returns the validation error for the first bad input (coordinates, elevation,
    /// atmosphere, timezone, date), or `ComputationError` for dates the engines cannot handle.
    pub fn calculate(&self, request: &CalculationRequest) -> Result<MuhuratReport> {
        validate_coordinates(request.latitude, request.longitude)?;
        let location = Location::new(
            request.latitude,
            request.longitude,
            request.elevation.unwrap_or(0.0),
        )?;
        let conditions = AtmosphericConditions::from_options(
            request.pressure,
            request.temperature,
            request.humidity,
        )?;
        let zone = resolve_timezone(&request.timezone)?;
        let date = request.date.local_date(&zone)?;

        let sunrise = self.resolver.resolve(&location, date, &zone, &conditions)?;
        let night_length =
            self.resolver
                .night_length_minutes(&sunrise, &location, &zone, &conditions)?;
        let day_length =
            self.resolver
                .day_length_minutes(&sunrise, &location, &zone, &conditions)?;

        let (window, window_degraded) = self.window_for(&sunrise, night_length)?;
        let degraded = sunrise.is_degraded() || window_degraded;

        self.observer.calculated(&CalculationTrace {
            date,
            tier_used: sunrise.tier_used(),
            tradition: self.config.tradition,
            sunrise: sunrise.instant(),
            duration_minutes: window.duration_minutes(),
            degraded,
        });

        Ok(MuhuratReport {
            location: LocationReport {
                latitude: location.latitude(),
                longitude: location.longitude(),
                elevation: location.elevation(),
                timezone: zone.to_string(),
            },
            date,
            sunrise: ReportTime::new(sunrise.instant(), &zone),
            muhurat: WindowReport {
                start: ReportTime::new(window.start(), &zone),
                end: ReportTime::new(window.end(), &zone),
                duration: WindowDuration {
                    minutes: window.duration_minutes(),
                },
            },
            astronomical_data: AstronomicalData {
                precision: sunrise.tier_used(),
                refraction_model: self.config.refraction_model,
                tradition: self.config.tradition,
                degraded,
                polar_condition: sunrise.polar(),
                solar_declination: sunrise.declination(),
                right_ascension: sunrise.right_ascension(),
                sunrise_azimuth: sunrise.azimuth(),
                refraction_arcminutes: sunrise.refraction_arcminutes(),
                time_correction_seconds: sunrise.time_correction_seconds(),
                utc_offset: zone.offset_at(&sunrise.instant()).to_string(),
                day_length_minutes: day_length,
                night_length_minutes: night_length,
                moon_phase: MoonPhase::at(&sunrise.instant()),
            },
        })
    }

    /// Calculates every date of `request` in order.
    ///
    /// A failing date becomes a [`BatchItem::Failure`]; the rest are still calculated.
    #[must_use]
    pub fn calculate_batch(&self, request: &BatchRequest) -> Vec<BatchItem> {
        request
            .dates
            .iter()
            .map(|date| match self.calculate(&request.request_for(date)) {
                Ok(report) => BatchItem::Success(Box::new(report)),
                Err(error) => BatchItem::Failure {
                    date: date.to_string(),
                    error: error.to_string(),
                },
            })
            .collect()
    }

    /// Refraction at an apparent altitude using the configured model.
    ///
    /// # Errors
    /// Returns the validation error for the altitude or any atmospheric value.
    pub fn calculate_refraction(&self, request: &RefractionRequest) -> Result<RefractionReport> {
        RefractionReport::compute(self.config.refraction_model, request)
    }

    fn window_for(
        &self,
        sunrise: &ResolvedSunrise,
        night_length: Option<f64>,
    ) -> Result<(MuhuratWindow, bool)> {
        let tradition = self.config.tradition;
        if tradition == TraditionType::Dynamic && night_length.is_none() {
            self.observer.degraded(&DegradedEvent {
                date: sunrise.date(),
                event: HorizonEvent::Sunrise,
                requested: self.config.precision,
                used: sunrise.tier_used(),
                reason: DegradedReason::NightLengthUnavailable,
            });
            let window = self
                .window
                .calculate(sunrise.instant(), TraditionType::Standard, None)?;
            return Ok((window, true));
        }
        let window = self
            .window
            .calculate(sunrise.instant(), tradition, night_length)?;
        Ok((window, false))
    }
}
