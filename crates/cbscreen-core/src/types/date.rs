//! Calendar date type.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{CoreError, CoreResult};

/// Date layouts seen in upstream exports, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// A calendar date.
///
/// This is a newtype wrapper around `chrono::NaiveDate`. Screening works in
/// whole days, so there is no time-of-day component.
///
/// # Example
///
/// ```rust
/// use cbscreen_core::types::Date;
///
/// let date = Date::parse("2025/09/03").unwrap();
/// assert_eq!(date.add_days(365).to_string(), "2026-09-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses a date cell.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYYMMDD`, and the first two with
    /// a trailing `HH:MM:SS` (the time is discarded).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if no layout matches.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        {
            return Ok(Date(date));
        }
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|dt| Date(dt.date()))
            .ok_or_else(|| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns today's local date.
    #[must_use]
    pub fn today() -> Self {
        Date(chrono::Local::now().date_naive())
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Adds a number of days to the date, clamping at the calendar limits.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        let shifted = chrono::Duration::try_days(days).and_then(|d| self.0.checked_add_signed(d));
        Date(shifted.unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        }))
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Year fraction from `self` to `other` on an ACT/365 basis.
    #[must_use]
    pub fn years_until(&self, other: &Date) -> f64 {
        self.days_between(other) as f64 / 365.0
    }

}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Add<i64> for Date {
    type Output = Self;

    /// Adds days to a date.
    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}
