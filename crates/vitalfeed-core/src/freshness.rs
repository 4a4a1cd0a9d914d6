//! # Freshness Labels
//!
//! Formats how long ago a record was updated ("3 days ago", "Just now").
//!
//! Tiers use fixed divisors: a month is 30 days and a year is 365 days. The
//! labels are approximate on purpose and never consult a calendar.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// Label used for anything under a minute old, in the future, or undated.
pub const JUST_NOW: &str = "Just now";

/// The coarsest unit that describes an elapsed duration.
///
/// Variants are declared in increasing order of age, so comparing two tiers
/// with `<` tells which label describes the older record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeTier {
    JustNow,
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Weeks(i64),
    Months(i64),
    Years(i64),
}

impl fmt::Display for AgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (count, unit) = match *self {
            AgeTier::JustNow => return f.write_str(JUST_NOW),
            AgeTier::Minutes(n) => (n, "minute"),
            AgeTier::Hours(n) => (n, "hour"),
            AgeTier::Days(n) => (n, "day"),
            AgeTier::Weeks(n) => (n, "week"),
            AgeTier::Months(n) => (n, "month"),
            AgeTier::Years(n) => (n, "year"),
        };
        write!(f, "{} {}{} ago", count, unit, if count == 1 { "" } else { "s" })
    }
}

/// Classify the age of `updated_at` as seen from `now`.
///
/// A timestamp in the future (clock skew) is treated as [`AgeTier::JustNow`].
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use vitalfeed_core::freshness::{relative_age, AgeTier};
///
/// let updated = Utc.with_ymd_and_hms(2024, 11, 15, 10, 0, 0).unwrap();
/// let now = updated + Duration::minutes(125);
/// assert_eq!(relative_age(now, updated), AgeTier::Hours(2));
/// ```
pub fn relative_age(now: DateTime<Utc>, updated_at: DateTime<Utc>) -> AgeTier {
    let elapsed = now.signed_duration_since(updated_at);
    if elapsed < chrono::Duration::zero() {
        return AgeTier::JustNow;
    }

    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return AgeTier::JustNow;
    }
    if minutes < 60 {
        return AgeTier::Minutes(minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return AgeTier::Hours(hours);
    }

    let days = hours / 24;
    if days < 7 {
        return AgeTier::Days(days);
    }

    let weeks = days / 7;
    if weeks < 5 {
        return AgeTier::Weeks(weeks);
    }

    let months = days / 30;
    if months < 12 {
        return AgeTier::Months(months);
    }

    AgeTier::Years(days / 365)
}

/// Format a timestamp as relative time (e.g., "3 days ago", "Just now").
///
/// # Arguments
///
/// * `now` - The reference instant, usually the last clock tick
/// * `updated_at` - When the record was last updated
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use vitalfeed_core::freshness::format_relative_time;
///
/// let now = Utc::now();
/// assert_eq!(format_relative_time(now, now - Duration::days(3)), "3 days ago");
/// assert_eq!(format_relative_time(now, now - Duration::seconds(59)), "Just now");
/// ```
pub fn format_relative_time(now: DateTime<Utc>, updated_at: DateTime<Utc>) -> String {
    relative_age(now, updated_at).to_string()
}

/// Like [`format_relative_time`], but an undated record reads "Just now".
pub fn format_relative_time_opt(now: DateTime<Utc>, updated_at: Option<DateTime<Utc>>) -> String {
    match updated_at {
        Some(ts) => format_relative_time(now, ts),
        None => JUST_NOW.to_string(),
    }
}

/// Format a raw timestamp string. Unparsable input reads "Just now".
pub fn format_relative_time_str(now: DateTime<Utc>, updated_at: &str) -> String {
    format_relative_time_opt(now, parse_timestamp(updated_at))
}

/// Parse a catalog timestamp.
///
/// Accepts RFC 3339 (`2024-11-15T10:00:00.000Z`), date-times without an
/// offset (`2024-11-15T10:00:00`, `2024-11-15 10:00:00`) and bare `YYYY-MM-DD`
/// dates. Anything without an offset is taken as UTC; dates as midnight.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 15, 10, 0, 0).unwrap()
    }

    fn label_after(elapsed: Duration) -> String {
        format_relative_time(base() + elapsed, base())
    }

    #[test]
    fn test_just_now_under_a_minute() {
        assert_eq!(label_after(Duration::zero()), "Just now");
        assert_eq!(label_after(Duration::seconds(1)), "Just now");
        assert_eq!(label_after(Duration::milliseconds(59_999)), "Just now");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(label_after(Duration::seconds(-1)), "Just now");
        assert_eq!(label_after(Duration::days(-400)), "Just now");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(label_after(Duration::seconds(60)), "1 minute ago");
        assert_eq!(label_after(Duration::seconds(119)), "1 minute ago");
        assert_eq!(label_after(Duration::minutes(2)), "2 minutes ago");
        assert_eq!(label_after(Duration::seconds(3599)), "59 minutes ago");
    }

    #[test]
    fn test_minutes_follow_floor_of_elapsed() {
        for secs in (60..3600).step_by(37) {
            let expected_n = secs / 60;
            let expected = if expected_n == 1 {
                "1 minute ago".to_string()
            } else {
                format!("{} minutes ago", expected_n)
            };
            assert_eq!(label_after(Duration::seconds(secs)), expected, "at {secs}s");
        }
    }

    #[test]
    fn test_hours() {
        assert_eq!(label_after(Duration::minutes(60)), "1 hour ago");
        assert_eq!(label_after(Duration::minutes(125)), "2 hours ago");
        assert_eq!(label_after(Duration::minutes(24 * 60 - 1)), "23 hours ago");
    }

    #[test]
    fn test_days() {
        assert_eq!(label_after(Duration::hours(24)), "1 day ago");
        assert_eq!(label_after(Duration::hours(47)), "1 day ago");
        assert_eq!(label_after(Duration::days(6)), "6 days ago");
    }

    #[test]
    fn test_weeks() {
        assert_eq!(label_after(Duration::days(7)), "1 week ago");
        assert_eq!(label_after(Duration::days(13)), "1 week ago");
        assert_eq!(label_after(Duration::days(34)), "4 weeks ago");
    }

    #[test]
    fn test_months() {
        assert_eq!(label_after(Duration::days(35)), "1 month ago");
        assert_eq!(label_after(Duration::days(40)), "1 month ago");
        assert_eq!(label_after(Duration::days(60)), "2 months ago");
        assert_eq!(label_after(Duration::days(359)), "11 months ago");
    }

    #[test]
    fn test_years() {
        assert_eq!(label_after(Duration::days(365)), "1 year ago");
        assert_eq!(label_after(Duration::days(729)), "1 year ago");
        assert_eq!(label_after(Duration::days(730)), "2 years ago");
    }

    #[test]
    fn test_gap_between_twelve_months_and_one_year() {
        // 360..365 days: too old for months, fewer than 365 days for a year.
        assert_eq!(relative_age(base() + Duration::days(360), base()), AgeTier::Years(0));
        assert_eq!(label_after(Duration::days(364)), "0 years ago");
    }

    #[test]
    fn test_tiers_never_shrink_as_now_advances() {
        let mut previous = AgeTier::JustNow;
        let mut elapsed = Duration::zero();
        while elapsed < Duration::days(800) {
            let tier = relative_age(base() + elapsed, base());
            assert!(tier >= previous, "{previous:?} -> {tier:?} at {elapsed:?}");
            previous = tier;
            elapsed = elapsed + Duration::minutes(97);
        }
    }

    #[test]
    fn test_format_opt_and_str() {
        let now = base() + Duration::days(3);
        assert_eq!(format_relative_time_opt(now, None), "Just now");
        assert_eq!(format_relative_time_opt(now, Some(base())), "3 days ago");
        assert_eq!(format_relative_time_str(now, "2024-11-15T10:00:00.000Z"), "3 days ago");
        assert_eq!(format_relative_time_str(now, "2024-11-15T10:00:00"), "3 days ago");
        assert_eq!(format_relative_time_str(now, "yesterday-ish"), "Just now");
        assert_eq!(format_relative_time_str(now, ""), "Just now");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-11-15T10:00:00.000Z"), Some(base()));
        assert_eq!(parse_timestamp("2024-11-15T11:00:00+01:00"), Some(base()));
        assert_eq!(
            parse_timestamp("2024-11-15"),
            Some(Utc.with_ymd_and_hms(2024, 11, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("2024-11-15T10:00:00"), Some(base()));
        assert_eq!(parse_timestamp("2024-11-15T10:00:00.000"), Some(base()));
        assert_eq!(parse_timestamp("2024-11-15 10:00:00"), Some(base()));
        assert!(parse_timestamp("2024-13-45").is_none());
        assert!(parse_timestamp("invalid").is_none());
    }
}
