//! Last modification date normalization.
//!
//! `<lastmod>` values are stored on [`Url`](crate::Url) as free-form strings
//! and converted to W3C datetime (ISO 8601 with a numeric UTC offset) when the
//! sitemap is rendered:
//!
//! ```text
//! "2024-01-15 10:30:00" + Africa/Maputo  ->  2024-01-15T10:30:00+02:00
//! ```
//!
//! Values without an offset are anchored to the sitemap timezone. Values that
//! carry their own offset keep it. Recognized inputs:
//!
//! - Keywords: `now`, `today`, `yesterday`, `tomorrow`
//! - Unix timestamps: `@1705307400` (rendered in UTC)
//! - RFC 3339 / RFC 2822, or `YYYY-MM-DD HH:MM:SS` with a trailing offset
//! - Any naive form below followed by ` UTC` or ` GMT` (rendered in UTC)
//! - Naive date-times: `YYYY-MM-DD HH:MM[:SS[.fff]]` (space or `T`),
//!   `YYYY/MM/DD HH:MM[:SS]`
//! - Naive dates (midnight): `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`,
//!   `DD-MM-YYYY`, `DD.MM.YYYY`, `January 15, 2024`, `15 January 2024`,
//!   and `YY-MM-DD` (`00`-`68` is 20xx, `69`-`99` is 19xx)
//!
//! Four-digit years are required everywhere except `YY-MM-DD`. Other zone
//! abbreviations (`CET`, `EST`, ...) are not recognized.

use std::sync::LazyLock;

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::Regex;

use crate::SitemapError;

/// Output format for `<lastmod>` values.
pub const LASTMOD_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// `%Y` accepts any digit count, so year-first formats are gated on this.
static YEAR_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}[-/]").expect("invalid year regex"));

static YEAR_LAST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}$").expect("invalid year regex"));

static SHORT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d{2}-\d{2}$").expect("invalid short date regex"));

/// Trailing zone names read as UTC.
const UTC_SUFFIXES: &[&str] = &[" UTC", " GMT"];

/// Formats carrying an explicit UTC offset, tried after RFC 3339 and RFC 2822.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Naive date-time formats. `%.f` also matches a missing fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Naive date formats, anchored at midnight.
const YEAR_FIRST_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const YEAR_LAST_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Resolve an IANA timezone name.
///
/// # Errors
///
/// Returns [`SitemapError::UnknownTimezone`] if `name` is not in the timezone
/// database.
pub fn parse_timezone(name: &str) -> Result<Tz, SitemapError> {
    name.parse::<Tz>()
        .map_err(|_| SitemapError::UnknownTimezone(name.to_owned()))
}

/// Normalize a date/time string to [`LASTMOD_FORMAT`] in timezone `tz`.
///
/// # Errors
///
/// Returns [`SitemapError::InvalidDate`] if `value` is not a recognized
/// date/time.
pub fn normalize(value: &str, tz: Tz) -> Result<String, SitemapError> {
    normalize_at(value, tz, Utc::now())
}

/// Like [`normalize`], with an explicit clock for the relative keywords.
fn normalize_at(value: &str, tz: Tz, now: DateTime<Utc>) -> Result<String, SitemapError> {
    let parsed = parse(value.trim(), tz, now)
        .ok_or_else(|| SitemapError::InvalidDate(value.to_owned()))?;
    Ok(parsed.format(LASTMOD_FORMAT).to_string())
}

fn parse(value: &str, tz: Tz, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
    if value.is_empty() {
        return None;
    }
    parse_keyword(value, tz, now)
        .or_else(|| parse_timestamp(value))
        .or_else(|| parse_with_offset(value))
        .or_else(|| parse_utc_suffixed(value))
        .or_else(|| parse_naive(value).and_then(|naive| anchor(naive, tz)))
}

fn parse_keyword(value: &str, tz: Tz, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
    let local_now = now.with_timezone(&tz);
    let today = local_now.date_naive();
    let day = match value.to_ascii_lowercase().as_str() {
        "now" => return Some(local_now.fixed_offset()),
        "today" | "midnight" => today,
        "yesterday" => today.pred_opt()?,
        "tomorrow" => today.succ_opt()?,
        _ => return None,
    };
    anchor(day.and_hms_opt(0, 0, 0)?, tz)
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let secs: i64 = value.strip_prefix('@')?.parse().ok()?;
    DateTime::from_timestamp(secs, 0).map(|dt| dt.fixed_offset())
}

fn parse_with_offset(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .or_else(|| {
            if !YEAR_FIRST.is_match(value) {
                return None;
            }
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        })
}

/// `2024-01-15 10:30:00 UTC` and friends.
fn parse_utc_suffixed(value: &str) -> Option<DateTime<FixedOffset>> {
    let stem = UTC_SUFFIXES.iter().find_map(|suffix| {
        let split = value.len().checked_sub(suffix.len())?;
        if !value.get(split..)?.eq_ignore_ascii_case(suffix) {
            return None;
        }
        value.get(..split)
    })?;
    parse_naive(stem.trim_end()).map(|naive| naive.and_utc().fixed_offset())
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    if YEAR_FIRST.is_match(value) {
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .or_else(|| parse_date(value, YEAR_FIRST_DATE_FORMATS))
    } else if YEAR_LAST.is_match(value) {
        parse_date(value, YEAR_LAST_DATE_FORMATS)
    } else if SHORT_DATE.is_match(value) {
        parse_date(value, &["%y-%m-%d"])
    } else {
        None
    }
}

fn parse_date(value: &str, formats: &[&str]) -> Option<NaiveDateTime> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Attach `tz` to a wall-clock time.
///
/// A time repeated by a DST fold resolves to the earlier instant. A time
/// skipped by a DST gap is moved forward by one hour.
fn anchor(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<FixedOffset>> {
    let local = match tz.from_local_datetime(&naive).earliest() {
        Some(local) => local,
        None => {
            let shifted = naive.checked_add_signed(TimeDelta::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()?
        }
    };
    Some(local.fixed_offset())
}
