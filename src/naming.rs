//! Output naming: free-text date extraction + title slugification.
//!
//! Generated artifacts are named `YYYY-MM-DD-<slug>.<ext>` so a directory of
//! banners sorts chronologically. The date prefix comes from whatever the user
//! typed into the date field — "Dec 31, 2025", "2025-06-15 at Mexico City",
//! "31 Dec" — and falls back to the literal prefix `banner` when nothing in
//! the text looks like a date. The slug is derived from the first title field.
//!
//! ## Date extraction
//!
//! [`parse_event_date`] runs an explicit, ordered chain of parser attempts and
//! short-circuits on the first success. The order is part of the contract: a
//! string matching two patterns must always resolve the same way.
//!
//! 1. `YYYY-M-D` anywhere in the text
//! 2. `M/D/YYYY` (month-first, US reading)
//! 3. `Dec 31, 2025` / `December 31st 2025` (month name, with year)
//! 4. `31 Dec 2025` / `31st December 2025` (day first, with year)
//! 5. `Dec 31` (no year — guessed, see below)
//! 6. `31 Dec` (no year — guessed)
//!
//! A candidate only counts as a success if it forms a real calendar date;
//! `2025-13-40` falls through to the next attempt instead of producing a
//! nonsense filename.
//!
//! Year-less dates take the current year if the month/day is today or later,
//! otherwise next year — event banners are made for upcoming events. The
//! reference date is an explicit argument, so every function here is a pure,
//! deterministic function of its inputs; the CLI passes today's local date.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NamingError {
    #[error("title {0:?} contains no usable filename characters")]
    EmptySlug(String),
}

/// Maximum number of title characters (code points) that feed the slug.
const SLUG_MAX_CHARS: usize = 10;

/// Prefix used when no date can be extracted from the date field.
const FALLBACK_PREFIX: &str = "banner";

const MONTH_NAMES: &str = "january|february|march|april|may|june|july|august|september|october|\
                           november|december|jan|feb|mar|apr|jun|jul|aug|sep|oct|nov|dec";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap());

static SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap());

static NAME_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_NAMES})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static DAY_NAME_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTH_NAMES})\.?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static NAME_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_NAMES})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\b"
    ))
    .unwrap()
});

static DAY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTH_NAMES})\b"
    ))
    .unwrap()
});

/// Month number from a matched month name ("Dec", "december", "Sep.").
///
/// The first three characters are unambiguous across all English month names.
fn month_number(name: &str) -> u32 {
    match name[..3].to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        _ => 12,
    }
}

/// Guess the year for a year-less month/day.
///
/// Today or later this year → this year; already past → next year. Invalid
/// combinations (Feb 30) keep the current year and let the caller's validity
/// check reject them.
fn guess_year(month: u32, day: u32, today: NaiveDate) -> i32 {
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(candidate) if candidate >= today => today.year(),
        Some(_) => today.year() + 1,
        None => today.year(),
    }
}

fn valid_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract a calendar date from free-form text.
///
/// Runs the ordered attempt chain documented in the [module docs](self);
/// the first attempt producing a valid calendar date wins. Returns `None`
/// when nothing in the text parses ("Next Tuesday", "TBD", "").
pub fn parse_event_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Some(c) = ISO_DATE.captures(text) {
        let parsed = valid_date(c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?);
        if parsed.is_some() {
            return parsed;
        }
    }

    if let Some(c) = SLASH_DATE.captures(text) {
        let parsed = valid_date(c[3].parse().ok()?, c[1].parse().ok()?, c[2].parse().ok()?);
        if parsed.is_some() {
            return parsed;
        }
    }

    if let Some(c) = NAME_DAY_YEAR.captures(text) {
        let parsed = valid_date(c[3].parse().ok()?, month_number(&c[1]), c[2].parse().ok()?);
        if parsed.is_some() {
            return parsed;
        }
    }

    if let Some(c) = DAY_NAME_YEAR.captures(text) {
        let parsed = valid_date(c[3].parse().ok()?, month_number(&c[2]), c[1].parse().ok()?);
        if parsed.is_some() {
            return parsed;
        }
    }

    if let Some(c) = NAME_DAY.captures(text) {
        let month = month_number(&c[1]);
        let day: u32 = c[2].parse().ok()?;
        let parsed = valid_date(guess_year(month, day, today), month, day);
        if parsed.is_some() {
            return parsed;
        }
    }

    if let Some(c) = DAY_NAME.captures(text) {
        let month = month_number(&c[2]);
        let day: u32 = c[1].parse().ok()?;
        let parsed = valid_date(guess_year(month, day, today), month, day);
        if parsed.is_some() {
            return parsed;
        }
    }

    None
}

/// Derive a filename slug from a banner title.
///
/// Takes the first ten characters (code points, not bytes),
/// lower-cases them, replaces everything outside `[a-z0-9]` with dashes,
/// collapses runs of dashes, and strips leading/trailing dashes. A title
/// whose head contains no usable characters is an error — a banner must
/// never silently get an empty filename.
pub fn slugify(title: &str) -> Result<String, NamingError> {
    let head: String = title.chars().take(SLUG_MAX_CHARS).collect();

    let mut slug = String::with_capacity(head.len());
    let mut prev_dash = false;
    for c in head.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }

    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        return Err(NamingError::EmptySlug(title.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Compute the output base name (no extension) for a generation request.
///
/// `<YYYY-MM-DD>-<slug>` when the date field parses, `banner-<slug>` when it
/// doesn't. Pure and deterministic: same inputs, same name.
pub fn base_name(date_text: &str, title1: &str, today: NaiveDate) -> Result<String, NamingError> {
    let slug = slugify(title1)?;
    let prefix = match parse_event_date(date_text, today) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => FALLBACK_PREFIX.to_string(),
    };
    Ok(format!("{prefix}-{slug}"))
}
