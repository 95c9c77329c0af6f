//! Canonical calendar dates and the clock used by generation passes.
//!
//! Every date in the board is a plain calendar day rendered as `YYYY-MM-DD`.
//! Values that arrive in other shapes (ISO datetimes, spreadsheet cells with
//! a time part) are normalized once, when they enter the system, so two
//! representations of the same day always compare equal afterwards.
//!
//! ## Usage
//!
//! ```rust
//! use taskboard::libs::date::CalendarDate;
//!
//! let a = CalendarDate::parse("2025-03-01").unwrap();
//! let b = CalendarDate::parse("2025-03-01T00:00:00Z").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "2025-03-01");
//! ```

use chrono::{Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Canonical textual form of a calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("unparseable calendar date: '{0}'")]
    Unparseable(String),
    #[error("empty calendar date")]
    Empty,
}

/// A calendar day with no time-of-day and no timezone.
///
/// The derived ordering matches lexicographic ordering of the zero-padded
/// `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a date from its components, `None` when the day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Normalizes any accepted textual representation to a calendar date.
    ///
    /// Accepted shapes: `YYYY-MM-DD`, ISO datetimes (`2025-03-01T10:00:00Z`,
    /// only the part before `T` is kept) and `YYYY-MM-DD HH:MM:SS`.
    pub fn parse(value: &str) -> Result<Self, DateError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DateError::Empty);
        }

        let date_part = match value.split_once('T') {
            Some((date, _)) => date,
            None => value.split_whitespace().next().unwrap_or(value),
        };

        NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map(Self)
            .map_err(|_| DateError::Unparseable(value.to_string()))
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Weekday index with Sunday as 0 and Saturday as 6.
    pub fn weekday_index(&self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// Day of the month, 1..=31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn succ(&self) -> Self {
        Self(self.0.succ_opt().unwrap_or(self.0))
    }

    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + chrono::Duration::days(days))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CalendarDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// How "today" is determined. Applied uniformly by every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarPolicy {
    /// Calendar date of the host's local timezone.
    #[default]
    HostLocal,
    /// Calendar date at a fixed offset from UTC, in whole hours.
    FixedOffset(i32),
}

impl CalendarPolicy {
    pub fn from_offset(utc_offset_hours: Option<i32>) -> Self {
        match utc_offset_hours {
            Some(hours) => CalendarPolicy::FixedOffset(hours),
            None => CalendarPolicy::HostLocal,
        }
    }

    /// Wall-clock time under this policy, without zone information.
    pub fn now(&self) -> NaiveDateTime {
        match self {
            CalendarPolicy::HostLocal => Local::now().naive_local(),
            CalendarPolicy::FixedOffset(hours) => match FixedOffset::east_opt(hours * 3600) {
                Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
                None => Utc::now().naive_utc(),
            },
        }
    }
}

/// Single source of "what day is it" for a pass.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    policy: CalendarPolicy,
}

impl SystemClock {
    pub fn new(policy: CalendarPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CalendarPolicy {
        self.policy
    }
}

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate(self.policy.now().date())
    }
}

/// Clock pinned to one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
