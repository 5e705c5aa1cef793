//! The muhurat window: a span of fixed or night-derived length that ends at sunrise.

use crate::{Error, Result, TraditionType};
use chrono::{DateTime, TimeDelta, Utc};

/// Two muhurtas of 48 minutes.
pub const STANDARD_MINUTES: i64 = 96;
/// Window length of the extended reckoning.
pub const EXTENDED_MINUTES: i64 = 120;
/// Smarta reckoning; numerically the same as the standard window.
pub const SMARTA_MINUTES: i64 = 96;
/// The night is divided into this many muhurtas under the dynamic tradition.
pub const MUHURTAS_PER_NIGHT: f64 = 15.0;

const MINUTES_PER_DAY: f64 = 1440.0;

/// A window `[start, end)` with `end` equal to sunrise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MuhuratWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_minutes: i64,
}

impl MuhuratWindow {
    /// Start of the window.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window, the sunrise it was built from.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length in whole minutes.
    #[must_use]
    pub const fn duration_minutes(&self) -> i64 {
        self.duration_minutes
    }
}

/// Applies a tradition's duration rule to a sunrise.
///
/// # Example
/// ```
/// # use brahma_muhurat::{MuhuratWindowCalculator, TraditionType};
/// # use chrono::{DateTime, Utc};
/// let sunrise = "2024-02-18T01:02:00Z".parse::<DateTime<Utc>>().unwrap();
/// let window = MuhuratWindowCalculator
///     .calculate(sunrise, TraditionType::Dynamic, Some(750.0))
///     .unwrap();
/// assert_eq!(window.duration_minutes(), 50);
/// assert_eq!(window.end(), sunrise);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MuhuratWindowCalculator;

impl MuhuratWindowCalculator {
    /// Duration in minutes for `tradition`.
    ///
    /// # Errors
    /// Returns `MissingNightLength` when the dynamic tradition has no night length, and
    /// `InvalidNightLength` when it is not positive, not shorter than a day, or rounds to an
    /// empty window.
    pub fn duration_minutes(
        tradition: TraditionType,
        night_length_minutes: Option<f64>,
    ) -> Result<i64> {
        match tradition {
            TraditionType::Standard => Ok(STANDARD_MINUTES),
            TraditionType::Extended => Ok(EXTENDED_MINUTES),
            TraditionType::Smarta => Ok(SMARTA_MINUTES),
            TraditionType::Dynamic => {
                let night = night_length_minutes.ok_or(Error::MissingNightLength)?;
                if !(night > 0.0 && night < MINUTES_PER_DAY) {
                    return Err(Error::InvalidNightLength { minutes: night });
                }
                let minutes = (night / MUHURTAS_PER_NIGHT).round() as i64;
                if minutes <= 0 {
                    return Err(Error::InvalidNightLength { minutes: night });
                }
                Ok(minutes)
            }
        }
    }

    /// The window ending at `sunrise`.
    ///
    /// # Errors
    /// As for [`duration_minutes`](Self::duration_minutes).
    pub fn calculate(
        &self,
        sunrise: DateTime<Utc>,
        tradition: TraditionType,
        night_length_minutes: Option<f64>,
    ) -> Result<MuhuratWindow> {
        let duration_minutes = Self::duration_minutes(tradition, night_length_minutes)?;
        Ok(MuhuratWindow {
            start: sunrise - TimeDelta::minutes(duration_minutes),
            end: sunrise,
            duration_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sunrise() -> DateTime<Utc> {
        "2024-02-18T01:02:17Z".parse().unwrap()
    }

    #[test]
    fn test_fixed_traditions() {
        for (tradition, minutes) in [
            (TraditionType::Standard, 96),
            (TraditionType::Extended, 120),
            (TraditionType::Smarta, 96),
        ] {
            let window = MuhuratWindowCalculator
                .calculate(sunrise(), tradition, None)
                .unwrap();
            assert_eq!(window.duration_minutes(), minutes);
            assert_eq!(window.end(), sunrise());
            assert_eq!((window.end() - window.start()).num_seconds(), minutes * 60);
        }
    }

    #[test]
    fn test_fixed_traditions_ignore_night_length() {
        let window = MuhuratWindowCalculator
            .calculate(sunrise(), TraditionType::Standard, Some(10.0))
            .unwrap();
        assert_eq!(window.duration_minutes(), 96);
    }

    #[test]
    fn test_dynamic_rounds_night_fifteenth() {
        let duration = |night| {
            MuhuratWindowCalculator::duration_minutes(TraditionType::Dynamic, Some(night)).unwrap()
        };
        assert_eq!(duration(720.0), 48);
        assert_eq!(duration(757.4), 50);
        assert_eq!(duration(757.5), 51);
        assert_eq!(duration(480.0), 32);
    }

    #[test]
    fn test_dynamic_requires_night_length() {
        assert_eq!(
            MuhuratWindowCalculator.calculate(sunrise(), TraditionType::Dynamic, None),
            Err(Error::MissingNightLength)
        );
    }

    #[test]
    fn test_dynamic_rejects_degenerate_nights() {
        for night in [0.0, -30.0, 5.0, 1440.0, f64::NAN] {
            let result =
                MuhuratWindowCalculator::duration_minutes(TraditionType::Dynamic, Some(night));
            assert!(
                matches!(result, Err(Error::InvalidNightLength { .. })),
                "{night}: {result:?}"
            );
        }
    }
}
