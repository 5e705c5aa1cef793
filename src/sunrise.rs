//! Corrected sunrise and sunset for a local calendar day.
//!
//! [`SunriseResolver`] runs the configured engine, applies the tier's refraction time
//! correction and recovers from maximum-tier failures and polar days without erroring.

use crate::engine::{HighEngine, SolarEngine, for_tier};
use crate::math::{cos, degrees_to_radians};
use crate::normalize::{LocalDay, Zone};
use crate::observe::{DegradedEvent, DegradedReason, LogObserver, Observer};
use crate::refraction::{refraction_time_correction, sunrise_refraction};
use crate::{
    AtmosphericConditions, Error, Location, PolarCondition, PrecisionTier, RefractionModel,
    Result, SunriseResult,
};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use core::fmt;
use std::sync::Arc;

/// Seconds of rise-time shift per unit of `sec φ − 1` in the high tier's latitude correction.
const COARSE_CORRECTION_SECONDS: f64 = 136.0;

/// Latitude beyond which the coarse correction stops growing.
const COARSE_CORRECTION_LATITUDE_CAP: f64 = 80.0;

/// Which horizon crossing is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HorizonEvent {
    /// Upper limb clears the horizon in the morning.
    Sunrise,
    /// Upper limb drops below the horizon in the evening.
    Sunset,
}

impl HorizonEvent {
    /// Refraction lifts the sun, so it rises earlier and sets later.
    const fn correction_sign(self) -> f64 {
        match self {
            Self::Sunrise => -1.0,
            Self::Sunset => 1.0,
        }
    }
}

impl fmt::Display for HorizonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sunrise => "sunrise",
            Self::Sunset => "sunset",
        })
    }
}

/// A corrected horizon crossing with the data needed to explain it.
///
/// [`SunriseResolver::resolve_sunset`] returns the same shape for sunset.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSunrise {
    date: NaiveDate,
    solar_date: NaiveDate,
    instant: DateTime<Utc>,
    tier_used: PrecisionTier,
    degraded: bool,
    polar: Option<PolarCondition>,
    declination: Option<f64>,
    right_ascension: Option<f64>,
    azimuth: f64,
    refraction_arcminutes: f64,
    time_correction_seconds: f64,
}

impl ResolvedSunrise {
    /// Local calendar date the crossing belongs to.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Local date whose midday anchored the engine.
    ///
    /// Differs from [`date`](Self::date) when the zone is far enough from solar time that the
    /// crossing belongs to the neighbouring solar day.
    #[must_use]
    pub const fn solar_date(&self) -> NaiveDate {
        self.solar_date
    }

    /// The corrected instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// Tier whose engine produced the instant.
    #[must_use]
    pub const fn tier_used(&self) -> PrecisionTier {
        self.tier_used
    }

    /// Whether the instant came from a fallback path.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Set when the sun does not cross the horizon that day.
    ///
    /// The instant is then the lower culmination for polar day and the upper culmination for
    /// polar night.
    #[must_use]
    pub const fn polar(&self) -> Option<PolarCondition> {
        self.polar
    }

    /// Solar declination at the instant in degrees, where the engine reports it.
    #[must_use]
    pub const fn declination(&self) -> Option<f64> {
        self.declination
    }

    /// Solar right ascension at the instant in degrees, where the engine reports it.
    #[must_use]
    pub const fn right_ascension(&self) -> Option<f64> {
        self.right_ascension
    }

    /// Solar azimuth at the instant in degrees.
    #[must_use]
    pub const fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Horizon refraction under the given atmosphere, arc-minutes.
    #[must_use]
    pub const fn refraction_arcminutes(&self) -> f64 {
        self.refraction_arcminutes
    }

    /// Seconds the engine's crossing was moved by (earlier for sunrise, later for sunset).
    #[must_use]
    pub const fn time_correction_seconds(&self) -> f64 {
        self.time_correction_seconds
    }
}

enum Outcome {
    Crossing(ResolvedSunrise),
    Polar(PolarCondition, DateTime<Utc>),
}

/// Turns an engine's rise/set into a corrected instant for one precision tier.
#[derive(Debug)]
pub struct SunriseResolver {
    engine: Box<dyn SolarEngine>,
    fallback: HighEngine,
    model: RefractionModel,
    observer: Arc<dyn Observer>,
}

impl SunriseResolver {
    /// Creates a resolver reporting to [`LogObserver`].
    #[must_use]
    pub fn new(tier: PrecisionTier, model: RefractionModel) -> Self {
        Self::with_observer(tier, model, Arc::new(LogObserver))
    }

    /// Creates a resolver reporting degraded results to `observer`.
    #[must_use]
    pub fn with_observer(
        tier: PrecisionTier,
        model: RefractionModel,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self::from_engine(for_tier(tier, model), model, observer)
    }

    /// Creates a resolver around an arbitrary engine.
    ///
    /// An engine reporting [`PrecisionTier::Maximum`] gets the high-tier fallback.
    #[must_use]
    pub fn from_engine(
        engine: Box<dyn SolarEngine>,
        model: RefractionModel,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            engine,
            fallback: HighEngine,
            model,
            observer,
        }
    }

    /// The configured tier.
    #[must_use]
    pub fn tier(&self) -> PrecisionTier {
        self.engine.tier()
    }

    /// The configured refraction model.
    #[must_use]
    pub const fn refraction_model(&self) -> RefractionModel {
        self.model
    }

    /// Corrected sunrise on the local calendar day `date` in `zone`.
    ///
    /// When the zone is far from solar time, the crossing nearest local midday can fall on a
    /// neighbouring date; the matching crossing of the adjacent solar day is used instead. A
    /// date without a crossing of its own keeps the nearest one.
    ///
    /// Polar days and maximum-tier failures yield a degraded result rather than an error.
    ///
    /// # Errors
    /// Returns `ComputationError` when the date lies outside the engines' range, or
    /// `InvalidDate` when the local day cannot be built.
    pub fn resolve(
        &self,
        location: &Location,
        date: NaiveDate,
        zone: &Zone,
        conditions: &AtmosphericConditions,
    ) -> Result<ResolvedSunrise> {
        self.resolve_on_date(location, date, zone, conditions, HorizonEvent::Sunrise)
    }

    /// Corrected sunset on the local calendar day `date` in `zone`.
    ///
    /// # Errors
    /// As for [`resolve`](Self::resolve).
    pub fn resolve_sunset(
        &self,
        location: &Location,
        date: NaiveDate,
        zone: &Zone,
        conditions: &AtmosphericConditions,
    ) -> Result<ResolvedSunrise> {
        self.resolve_on_date(location, date, zone, conditions, HorizonEvent::Sunset)
    }

    /// Minutes from the sunset preceding `sunrise` to `sunrise`.
    ///
    /// `None` when either crossing does not exist.
    ///
    /// # Errors
    /// As for [`resolve`](Self::resolve).
    pub fn night_length_minutes(
        &self,
        sunrise: &ResolvedSunrise,
        location: &Location,
        zone: &Zone,
        conditions: &AtmosphericConditions,
    ) -> Result<Option<f64>> {
        if sunrise.polar.is_some() {
            return Ok(None);
        }
        let previous = sunrise
            .solar_date
            .pred_opt()
            .ok_or_else(|| Error::computation_error("date outside supported range"))?;
        let sunset =
            self.resolve_solar_day(location, previous, zone, conditions, HorizonEvent::Sunset)?;
        if sunset.polar.is_some() {
            return Ok(None);
        }
        Ok(Some(minutes_between(sunset.instant, sunrise.instant)))
    }

    /// Minutes from `sunrise` to the sunset that follows it.
    ///
    /// `None` when either crossing does not exist.
    ///
    /// # Errors
    /// As for [`resolve`](Self::resolve).
    pub fn day_length_minutes(
        &self,
        sunrise: &ResolvedSunrise,
        location: &Location,
        zone: &Zone,
        conditions: &AtmosphericConditions,
    ) -> Result<Option<f64>> {
        if sunrise.polar.is_some() {
            return Ok(None);
        }
        let sunset = self.resolve_solar_day(
            location,
            sunrise.solar_date,
            zone,
            conditions,
            HorizonEvent::Sunset,
        )?;
        if sunset.polar.is_some() {
            return Ok(None);
        }
        Ok(Some(minutes_between(sunrise.instant, sunset.instant)))
    }

    fn resolve_on_date(
        &self,
        location: &Location,
        date: NaiveDate,
        zone: &Zone,
        conditions: &AtmosphericConditions,
        event: HorizonEvent,
    ) -> Result<ResolvedSunrise> {
        let day = zone.local_day(date)?;
        let (nearest, reason) = self.resolve_event(&day, location, conditions, event)?;

        let neighbour = if nearest.polar.is_some() {
            None
        } else if nearest.instant < day.start() {
            date.succ_opt()
        } else if nearest.instant >= day.end() {
            date.pred_opt()
        } else {
            None
        };

        let (mut resolved, reason) = match neighbour {
            Some(neighbour) => {
                let adjacent = zone.local_day(neighbour)?;
                let (shifted, shifted_reason) =
                    self.resolve_event(&adjacent, location, conditions, event)?;
                if shifted.polar.is_none() && day.contains(&shifted.instant) {
                    (shifted, shifted_reason)
                } else {
                    (nearest, reason)
                }
            }
            None => (nearest, reason),
        };
        resolved.date = date;
        Ok(self.report(resolved, reason, event))
    }

    /// The crossing of the solar day centred on local midday of `date`.
    fn resolve_solar_day(
        &self,
        location: &Location,
        date: NaiveDate,
        zone: &Zone,
        conditions: &AtmosphericConditions,
        event: HorizonEvent,
    ) -> Result<ResolvedSunrise> {
        let day = zone.local_day(date)?;
        let (resolved, reason) = self.resolve_event(&day, location, conditions, event)?;
        Ok(self.report(resolved, reason, event))
    }

    fn report(
        &self,
        mut resolved: ResolvedSunrise,
        reason: Option<DegradedReason>,
        event: HorizonEvent,
    ) -> ResolvedSunrise {
        if let Some(reason) = reason {
            resolved.degraded = true;
            self.observer.degraded(&DegradedEvent {
                date: resolved.date,
                event,
                requested: self.engine.tier(),
                used: resolved.tier_used,
                reason,
            });
        }
        resolved
    }

    fn resolve_event(
        &self,
        day: &LocalDay,
        location: &Location,
        conditions: &AtmosphericConditions,
        event: HorizonEvent,
    ) -> Result<(ResolvedSunrise, Option<DegradedReason>)> {
        let engine = self.engine.as_ref();

        let (outcome, reason) = if engine.tier() == PrecisionTier::Maximum {
            let reason = match self.crossing(engine, day, location, conditions, event) {
                Ok(Outcome::Crossing(resolved)) => return Ok((resolved, None)),
                Ok(Outcome::Polar(condition, _)) => DegradedReason::Polar(condition),
                Err(error) => DegradedReason::EngineFailure(error),
            };
            let outcome = self.crossing(&self.fallback, day, location, conditions, event)?;
            (outcome, Some(reason))
        } else {
            let outcome = self.crossing(engine, day, location, conditions, event)?;
            (outcome, None)
        };

        let resolved = match outcome {
            Outcome::Crossing(resolved) => resolved,
            Outcome::Polar(condition, transit) => {
                self.culmination(day, location, conditions, condition, transit)?
            }
        };
        let reason = reason.or_else(|| resolved.polar.map(DegradedReason::Polar));
        Ok((resolved, reason))
    }

    fn crossing(
        &self,
        engine: &dyn SolarEngine,
        day: &LocalDay,
        location: &Location,
        conditions: &AtmosphericConditions,
        event: HorizonEvent,
    ) -> Result<Outcome> {
        let crossing = match engine.solar_events(day, location, conditions)? {
            SunriseResult::RegularDay {
                sunrise, sunset, ..
            } => match event {
                HorizonEvent::Sunrise => sunrise,
                HorizonEvent::Sunset => sunset,
            },
            SunriseResult::AllDay { transit } => {
                return Ok(Outcome::Polar(PolarCondition::PolarDay, transit));
            }
            SunriseResult::AllNight { transit } => {
                return Ok(Outcome::Polar(PolarCondition::PolarNight, transit));
            }
        };

        let geometry = engine.solar_position(&crossing, location, conditions)?;
        let refraction = sunrise_refraction(self.model, conditions);
        let correction = match engine.tier() {
            PrecisionTier::Basic => 0.0,
            PrecisionTier::High => coarse_refraction_seconds(location.latitude()),
            PrecisionTier::Maximum => geometry.declination().map_or(0.0, |declination| {
                refraction_time_correction(refraction, location.latitude(), declination)
            }),
        };

        Ok(Outcome::Crossing(ResolvedSunrise {
            date: day.date(),
            solar_date: day.date(),
            instant: crossing + seconds(event.correction_sign() * correction),
            tier_used: engine.tier(),
            degraded: false,
            polar: None,
            declination: geometry.declination(),
            right_ascension: geometry.right_ascension(),
            azimuth: geometry.azimuth(),
            refraction_arcminutes: refraction,
            time_correction_seconds: correction,
        }))
    }

    /// Best-effort instant for a day without a crossing, from the high tier.
    fn culmination(
        &self,
        day: &LocalDay,
        location: &Location,
        conditions: &AtmosphericConditions,
        condition: PolarCondition,
        transit: DateTime<Utc>,
    ) -> Result<ResolvedSunrise> {
        // lowest point of a polar day, highest point of a polar night
        let instant = match condition {
            PolarCondition::PolarDay => transit - TimeDelta::hours(12),
            PolarCondition::PolarNight => transit,
        };
        let geometry = self.fallback.solar_position(&instant, location, conditions)?;

        Ok(ResolvedSunrise {
            date: day.date(),
            solar_date: day.date(),
            instant,
            tier_used: self.fallback.tier(),
            degraded: true,
            polar: Some(condition),
            declination: geometry.declination(),
            right_ascension: geometry.right_ascension(),
            azimuth: geometry.azimuth(),
            refraction_arcminutes: sunrise_refraction(self.model, conditions),
            time_correction_seconds: 0.0,
        })
    }
}

/// Latitude-only refraction time correction of the high tier, seconds.
///
/// `136 s · (sec φ − 1)` with `|φ|` capped at 80°.
#[must_use]
pub fn coarse_refraction_seconds(latitude: f64) -> f64 {
    let phi = degrees_to_radians(latitude.abs().min(COARSE_CORRECTION_LATITUDE_CAP));
    COARSE_CORRECTION_SECONDS * (1.0 / cos(phi) - 1.0)
}

fn seconds(value: f64) -> TimeDelta {
    TimeDelta::milliseconds((value * 1000.0).round() as i64)
}

fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
