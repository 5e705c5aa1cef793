//! Simplified moon phase from the mean synodic month.
//!
//! Ignores the moon's orbital inequalities, so the age can be off by up to about half a day.
//! Good enough to name the phase; not for eclipse or tithi work.

use crate::math::{PI, cos, floor};
use crate::time::datetime_to_julian_date;
use chrono::{DateTime, Utc};
use core::fmt;

/// Mean length of a lunation in days.
pub const SYNODIC_MONTH: f64 = 29.530588853;

/// Julian date of a mean new moon, 2000-01-06 14:24 UT.
const REFERENCE_NEW_MOON: f64 = 2_451_550.1;

/// One of the eight conventional phase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum LunarPhase {
    /// Age near 0 days.
    NewMoon,
    /// Less than half lit, growing.
    WaxingCrescent,
    /// Half lit, growing.
    FirstQuarter,
    /// More than half lit, growing.
    WaxingGibbous,
    /// Age near 14.8 days.
    FullMoon,
    /// More than half lit, shrinking.
    WaningGibbous,
    /// Half lit, shrinking.
    LastQuarter,
    /// Less than half lit, shrinking.
    WaningCrescent,
}

impl LunarPhase {
    const ORDER: [Self; 8] = [
        Self::NewMoon,
        Self::WaxingCrescent,
        Self::FirstQuarter,
        Self::WaxingGibbous,
        Self::FullMoon,
        Self::WaningGibbous,
        Self::LastQuarter,
        Self::WaningCrescent,
    ];

    /// Phase whose octant contains `fraction` of the lunation (0 = new, 0.5 = full).
    fn from_fraction(fraction: f64) -> Self {
        let octant = floor(fraction * 8.0 + 0.5) as usize % 8;
        Self::ORDER[octant]
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        })
    }
}

/// Age, illuminated fraction and name of the moon's phase at an instant.
///
/// # Example
/// ```
/// # use brahma_muhurat::lunar::{LunarPhase, MoonPhase};
/// # use chrono::{DateTime, Utc};
/// let instant = "2024-04-08T18:21:00Z".parse::<DateTime<Utc>>().unwrap();
/// let moon = MoonPhase::at(&instant);
/// assert_eq!(moon.phase(), LunarPhase::NewMoon);
/// assert!(moon.illumination() < 0.02);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MoonPhase {
    age_days: f64,
    illumination: f64,
    phase: LunarPhase,
}

impl MoonPhase {
    /// Mean phase at `instant`.
    #[must_use]
    pub fn at(instant: &DateTime<Utc>) -> Self {
        let elapsed = datetime_to_julian_date(instant) - REFERENCE_NEW_MOON;
        let age_days = elapsed - SYNODIC_MONTH * floor(elapsed / SYNODIC_MONTH);
        let fraction = age_days / SYNODIC_MONTH;

        Self {
            age_days,
            illumination: (1.0 - cos(2.0 * PI * fraction)) / 2.0,
            phase: LunarPhase::from_fraction(fraction),
        }
    }

    /// Days since the last mean new moon, in [0, 29.53).
    #[must_use]
    pub const fn age_days(&self) -> f64 {
        self.age_days
    }

    /// Illuminated fraction of the disk, 0 to 1.
    #[must_use]
    pub const fn illumination(&self) -> f64 {
        self.illumination
    }

    /// Named phase.
    #[must_use]
    pub const fn phase(&self) -> LunarPhase {
        self.phase
    }
}
