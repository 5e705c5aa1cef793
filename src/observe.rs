//! Hooks for reporting degraded results and per-calculation traces.
//!
//! The calculator never logs on its own; it hands events to an [`Observer`]. The default
//! [`LogObserver`] forwards them to the `log` facade, so any logger the application installs
//! (`env_logger`, `tracing-log`, ...) picks them up.

use crate::sunrise::HorizonEvent;
use crate::{Error, PolarCondition, PrecisionTier, TraditionType};
use chrono::{DateTime, NaiveDate, Utc};
use core::fmt;

/// Receives diagnostics from a [`MuhuratCalculator`](crate::MuhuratCalculator).
///
/// Implementations must be cheap and must not panic; they run inline with the calculation.
pub trait Observer: fmt::Debug + Send + Sync {
    /// A result was recovered from a failure or a polar edge case.
    fn degraded(&self, event: &DegradedEvent);

    /// A calculation finished successfully.
    fn calculated(&self, trace: &CalculationTrace) {
        let _ = trace;
    }
}

/// Why a result is flagged as degraded.
#[derive(Debug, Clone, PartialEq)]
pub enum DegradedReason {
    /// The maximum-tier engine failed and the high tier was used instead.
    EngineFailure(Error),
    /// No horizon crossing exists on that day.
    Polar(PolarCondition),
    /// The dynamic tradition had no night length and used the standard duration.
    NightLengthUnavailable,
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngineFailure(error) => write!(f, "engine failure: {error}"),
            Self::Polar(PolarCondition::PolarDay) => f.write_str("polar day, sun never sets"),
            Self::Polar(PolarCondition::PolarNight) => f.write_str("polar night, sun never rises"),
            Self::NightLengthUnavailable => {
                f.write_str("night length unavailable, standard duration used")
            }
        }
    }
}

/// A degraded sunrise, sunset or window.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedEvent {
    /// Local calendar date of the event.
    pub date: NaiveDate,
    /// Which crossing was being resolved.
    pub event: HorizonEvent,
    /// Tier the calculator was configured with.
    pub requested: PrecisionTier,
    /// Tier that produced the returned value.
    pub used: PrecisionTier,
    /// What went wrong.
    pub reason: DegradedReason,
}

/// Summary of one successful calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationTrace {
    /// Local calendar date.
    pub date: NaiveDate,
    /// Tier that produced the sunrise.
    pub tier_used: PrecisionTier,
    /// Tradition the window was built with.
    pub tradition: TraditionType,
    /// Corrected sunrise.
    pub sunrise: DateTime<Utc>,
    /// Window length in minutes.
    pub duration_minutes: i64,
    /// Whether any part of the result was degraded.
    pub degraded: bool,
}

/// Forwards events to the `log` crate: warnings for degraded results, debug for traces.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn degraded(&self, event: &DegradedEvent) {
        log::warn!(
            "degraded {} for {}: {} (requested {}, used {})",
            event.event,
            event.date,
            event.reason,
            event.requested,
            event.used
        );
    }

    fn calculated(&self, trace: &CalculationTrace) {
        log::debug!(
            "{} sunrise {} via {} tier, {} window of {} min{}",
            trace.date,
            trace.sunrise.format("%H:%M:%SZ"),
            trace.tier_used,
            trace.tradition,
            trace.duration_minutes,
            if trace.degraded { " (degraded)" } else { "" }
        );
    }
}
