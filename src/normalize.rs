//! Date and timezone normalization.
//!
//! Turns the heterogeneous date inputs a caller may hold into a local calendar day, and a zone
//! name into the offsets in force during that day.

use crate::{Error, Result};
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use core::fmt;
use core::str::FromStr;

/// Date-only formats, tried in order after RFC 3339.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

/// Formats tried in order once the ISO forms have failed.
const NUMERIC_FORMATS: &[&str] = &["%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Free-form fallbacks with a time component.
const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Free-form fallbacks without a time component.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%A, %B %d, %Y",
    "%a, %d %b %Y",
    "%Y%m%d",
    "%Y.%m.%d",
    "%d.%m.%Y",
];

/// A date as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum DateInput {
    /// An instant; its calendar date is taken in the requested zone.
    Instant(DateTime<Utc>),
    /// A calendar date.
    Date(NaiveDate),
    /// Text in one of the accepted formats.
    Text(String),
}

impl DateInput {
    /// Resolves the input to the local calendar date it denotes in `zone`.
    ///
    /// Text carrying its own UTC offset keeps the date as written.
    ///
    /// # Errors
    /// Returns `InvalidDate` for text that matches no format or names an impossible date.
    pub fn local_date(&self, zone: &Zone) -> Result<NaiveDate> {
        match self {
            Self::Instant(instant) => Ok(zone.to_local(instant).date_naive()),
            Self::Date(date) => Ok(*date),
            Self::Text(text) => parse_date(text),
        }
    }
}

impl fmt::Display for DateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            Self::Date(date) => write!(f, "{date}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Parses a textual date into a calendar date.
///
/// Order: RFC 3339, `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `DD/MM/YYYY`, `MM/DD/YYYY`,
/// `DD-MM-YYYY`, `YYYY/MM/DD`, then free-form fallbacks (RFC 2822, `T`-separated local times,
/// month names). Ambiguous slashed dates resolve day-first.
///
/// # Errors
/// Returns `InvalidDate` naming the input. The reason is "impossible calendar date" when the
/// text has the shape of a numeric date but no such day exists.
///
/// # Example
/// ```
/// # use brahma_muhurat::normalize::parse_date;
/// # use chrono::NaiveDate;
/// let expected = NaiveDate::from_ymd_opt(2024, 2, 18).unwrap();
/// assert_eq!(parse_date("2024-02-18").unwrap(), expected);
/// assert_eq!(parse_date("18/02/2024").unwrap(), expected);
/// assert_eq!(parse_date("02/18/2024").unwrap(), expected);
/// assert_eq!(parse_date("February 18, 2024").unwrap(), expected);
/// assert!(parse_date("2024-13-01").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    if let Some(date) = first_date(trimmed, DATE_FORMATS) {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(datetime.date());
    }
    if let Some(date) = first_date(trimmed, NUMERIC_FORMATS) {
        return Ok(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(datetime.date_naive());
    }
    if let Some(datetime) = FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Ok(datetime.date());
    }
    if let Some(date) = first_date(trimmed, FALLBACK_DATE_FORMATS) {
        return Ok(date);
    }

    let reason = if has_numeric_date_shape(trimmed) {
        "impossible calendar date"
    } else {
        "unrecognized date format"
    };
    Err(Error::invalid_date(text, reason))
}

fn first_date(text: &str, formats: &[&str]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Three digit groups separated by `-`, `/` or `.`, optionally followed by a time.
fn has_numeric_date_shape(text: &str) -> bool {
    let date_part = text
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    let groups: Vec<&str> = date_part.split(['-', '/', '.']).collect();
    groups.len() == 3
        && groups
            .iter()
            .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()))
}

/// A timezone: an IANA zone or a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// IANA zone from the bundled tz database.
    Named(Tz),
    /// Fixed offset such as `UTC+5:30`.
    Fixed(FixedOffset),
}

impl Zone {
    /// UTC offset in force at `instant`.
    #[must_use]
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            Self::Fixed(offset) => *offset,
        }
    }

    /// Converts an instant to local wall-clock time.
    #[must_use]
    pub fn to_local(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(instant))
    }

    /// UTC bounds of the local calendar day `date`.
    ///
    /// Days whose local midnight falls in a DST gap start at the first existing local instant.
    ///
    /// # Errors
    /// Returns `InvalidDate` when the day or its successor is outside the supported range.
    pub fn local_day(&self, date: NaiveDate) -> Result<LocalDay> {
        let next = date
            .succ_opt()
            .ok_or_else(|| Error::invalid_date(date.to_string(), "date outside supported range"))?;
        Ok(LocalDay {
            date,
            start: self.start_of_day(date)?,
            end: self.start_of_day(next)?,
        })
    }

    fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        match self {
            Self::Fixed(offset) => first_existing_instant(offset, date),
            Self::Named(tz) => first_existing_instant(tz, date),
        }
    }
}

fn first_existing_instant<T: TimeZone>(zone: &T, date: NaiveDate) -> Result<DateTime<Utc>> {
    // Gaps are at most a few hours long; scan forward in quarter hours.
    for quarter in 0..=16 {
        let local = date.and_time(NaiveTime::MIN) + TimeDelta::minutes(15 * quarter);
        match zone.from_local_datetime(&local) {
            LocalResult::Single(instant) | LocalResult::Ambiguous(instant, _) => {
                return Ok(instant.with_timezone(&Utc));
            }
            LocalResult::None => {}
        }
    }
    Err(Error::invalid_date(
        date.to_string(),
        "no local midnight in this timezone",
    ))
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => write!(f, "UTC{offset}"),
        }
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve_timezone(s)
    }
}

/// Resolves a zone identifier.
///
/// Accepts IANA names (`Asia/Kolkata`) and fixed offsets: `UTC`, `Z`, `UTC+5:30`, `GMT-03`,
/// `+05:30`, `-0800`.
///
/// # Errors
/// Returns `UnknownTimeZone` carrying the rejected name.
///
/// # Example
/// ```
/// # use brahma_muhurat::normalize::{resolve_timezone, Zone};
/// # use chrono::FixedOffset;
/// let ist = resolve_timezone("UTC+5:30").unwrap();
/// assert_eq!(ist, Zone::Fixed(FixedOffset::east_opt(19_800).unwrap()));
/// assert!(resolve_timezone("Asia/Kolkata").is_ok());
/// assert!(resolve_timezone("Mars/Olympus").is_err());
/// ```
pub fn resolve_timezone(name: &str) -> Result<Zone> {
    let trimmed = name.trim();
    if let Ok(tz) = trimmed.parse::<Tz>() {
        return Ok(Zone::Named(tz));
    }
    parse_fixed_offset(trimmed)
        .map(Zone::Fixed)
        .ok_or_else(|| Error::unknown_time_zone(name))
}

fn parse_fixed_offset(text: &str) -> Option<FixedOffset> {
    if text.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let upper = text.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);
    if rest.is_empty() {
        return if upper.is_empty() {
            None
        } else {
            FixedOffset::east_opt(0)
        };
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    if !digits.is_ascii() {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None if digits.len() <= 2 => (digits, "0"),
        None if digits.len() <= 4 => digits.split_at(digits.len() - 2),
        None => return None,
    };
    if hours.is_empty()
        || minutes.is_empty()
        || !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// A local calendar day and its UTC bounds, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDay {
    date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl LocalDay {
    /// The local calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// First instant of the day.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// First instant of the following day.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Instant halfway through the day, close to local noon.
    #[must_use]
    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }

    /// Whether `instant` falls on this day.
    #[must_use]
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        (self.start..self.end).contains(instant)
    }
}

/// Formats an instant as local `HH:MM:SS`.
#[must_use]
pub fn local_time_string(instant: &DateTime<Utc>, zone: &Zone) -> String {
    zone.to_local(instant).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats_in_order() {
        let expected = date(2024, 2, 18);
        for text in [
            "2024-02-18T05:30:00+05:30",
            "2024-02-18",
            "2024-02-18 06:31:00",
            "18/02/2024",
            "02/18/2024",
            "18-02-2024",
            "2024/02/18",
            "Sun, 18 Feb 2024 06:00:00 +0530",
            "2024-02-18T06:00:00",
            "February 18, 2024",
            "18 Feb 2024",
            "  2024-02-18  ",
        ] {
            assert_eq!(parse_date(text).unwrap(), expected, "{text}");
        }
    }

    #[test]
    fn test_parse_date_day_first_for_ambiguous_slashes() {
        assert_eq!(parse_date("03/04/2024").unwrap(), date(2024, 4, 3));
    }

    #[test]
    fn test_parse_date_keeps_written_date_for_offsets() {
        assert_eq!(
            parse_date("2024-06-21T00:30:00-04:00").unwrap(),
            date(2024, 6, 21)
        );
    }

    #[test]
    fn test_impossible_dates() {
        for text in ["2024-13-01", "2024-01-32", "2023-02-29", "32/01/2024"] {
            assert_eq!(
                parse_date(text),
                Err(Error::invalid_date(text, "impossible calendar date")),
                "{text}"
            );
        }
        assert_eq!(
            parse_date("not-a-date"),
            Err(Error::invalid_date("not-a-date", "unrecognized date format"))
        );
    }

    #[test]
    fn test_date_input_local_date() {
        let ist = resolve_timezone("Asia/Kolkata").unwrap();
        let instant = "2024-02-17T20:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            DateInput::from(instant).local_date(&ist).unwrap(),
            date(2024, 2, 18)
        );
        assert_eq!(
            DateInput::from(date(2024, 2, 18)).local_date(&ist).unwrap(),
            date(2024, 2, 18)
        );
        assert!(DateInput::from("2024-02-30").local_date(&ist).is_err());
    }

    #[test]
    fn test_resolve_fixed_offsets() {
        let cases = [
            ("UTC", 0),
            ("Z", 0),
            ("utc+5:30", 19_800),
            ("UTC+05:30", 19_800),
            ("GMT-03", -10_800),
            ("+05:30", 19_800),
            ("-0800", -28_800),
            ("+0545", 20_700),
        ];
        for (name, seconds) in cases {
            let zone = resolve_timezone(name).unwrap();
            let offset = zone.offset_at(&Utc::now());
            assert_eq!(offset.local_minus_utc(), seconds, "{name}");
        }
    }

    #[test]
    fn test_resolve_rejects_unknown_zone() {
        for name in ["Mars/Olympus", "UTC+25", "+5:75", "", "GMT+ab", "+é1", "UTC+1é", "-1é30"] {
            assert_eq!(
                resolve_timezone(name),
                Err(Error::unknown_time_zone(name)),
                "{name:?}"
            );
        }
    }

    #[test]
    fn test_named_zone_follows_dst() {
        let london = resolve_timezone("Europe/London").unwrap();
        let winter = "2024-01-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let summer = "2024-07-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(london.offset_at(&winter).local_minus_utc(), 0);
        assert_eq!(london.offset_at(&summer).local_minus_utc(), 3600);
        assert_eq!(london.to_string(), "Europe/London");
    }

    #[test]
    fn test_local_day_bounds() {
        let ist = resolve_timezone("UTC+5:30").unwrap();
        let day = ist.local_day(date(2024, 2, 18)).unwrap();
        assert_eq!(
            day.start(),
            "2024-02-17T18:30:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert_eq!(day.end() - day.start(), TimeDelta::hours(24));
        assert!(day.contains(&day.midpoint()));
        assert!(!day.contains(&day.end()));
    }

    #[test]
    fn test_local_day_across_dst_change() {
        let new_york = resolve_timezone("America/New_York").unwrap();
        let day = new_york.local_day(date(2024, 3, 10)).unwrap();
        assert_eq!(day.end() - day.start(), TimeDelta::hours(23));
    }

    #[test]
    fn test_local_day_without_midnight() {
        // Chile springs forward at local midnight
        let santiago = resolve_timezone("America/Santiago").unwrap();
        let day = santiago.local_day(date(2024, 9, 8)).unwrap();
        assert_eq!(santiago.to_local(&day.start()).format("%H:%M").to_string(), "01:00");
    }

    #[test]
    fn test_local_time_string() {
        let ist = resolve_timezone("+05:30").unwrap();
        let instant = "2024-02-18T01:02:03Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(local_time_string(&instant, &ist), "06:32:03");
    }
}
