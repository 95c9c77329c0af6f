//! Recurrence rules for mother tasks and the pure rule evaluator.
//!
//! Rules reach the board in several historical shapes: weekday names under
//! `daysOfWeek`, a numeric `days` array, missing `enabled` or `dayOfMonth`
//! fields. [`RawRecurrence`] accepts all of them and is converted once into
//! the canonical [`RecurrenceRule`], which is the only shape the evaluator and
//! the generator ever see.
//!
//! ## Usage
//!
//! ```rust
//! use taskboard::libs::date::CalendarDate;
//! use taskboard::libs::recurrence::{should_generate_on, RecurrenceRule, Weekday};
//!
//! let rule = RecurrenceRule::weekly(&[Weekday::Monday, Weekday::Wednesday]);
//! let monday = CalendarDate::parse("2025-01-06").unwrap();
//! assert!(should_generate_on(monday, &rule));
//! ```

use super::date::CalendarDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// 0 = Sunday .. 6 = Saturday.
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Some(Weekday::Sunday),
            "monday" | "mon" => Some(Weekday::Monday),
            "tuesday" | "tue" => Some(Weekday::Tuesday),
            "wednesday" | "wed" => Some(Weekday::Wednesday),
            "thursday" | "thu" => Some(Weekday::Thursday),
            "friday" | "fri" => Some(Weekday::Friday),
            "saturday" | "sat" => Some(Weekday::Saturday),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }
}

/// Set of weekdays stored as a 7-bit mask (bit 0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.index();
    }

    pub fn contains_index(&self, index: u8) -> bool {
        index < 7 && self.0 & (1 << index) != 0
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.contains_index(day.index())
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        Weekday::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::default();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Daily,
    Weekly(WeekdaySet),
    Monthly { day_of_month: u32 },
    /// A frequency the board does not know. Never generates.
    Unrecognized(String),
}

impl Pattern {
    pub fn frequency(&self) -> &str {
        match self {
            Pattern::Daily => "daily",
            Pattern::Weekly(_) => "weekly",
            Pattern::Monthly { .. } => "monthly",
            Pattern::Unrecognized(name) => name,
        }
    }
}

/// Canonical recurrence rule of a mother task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRecurrence", into = "RawRecurrence")]
pub struct RecurrenceRule {
    pub enabled: bool,
    pub pattern: Pattern,
    /// Last day a child may be generated for. Falls back to the mother's due date.
    pub end_date: Option<CalendarDate>,
}

impl RecurrenceRule {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            enabled: true,
            pattern,
            end_date: None,
        }
    }

    pub fn daily() -> Self {
        Self::new(Pattern::Daily)
    }

    pub fn weekly(days: &[Weekday]) -> Self {
        Self::new(Pattern::Weekly(days.iter().copied().collect()))
    }

    pub fn monthly(day_of_month: u32) -> Self {
        Self::new(Pattern::Monthly { day_of_month })
    }

    pub fn until(mut self, end_date: CalendarDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self.pattern, Pattern::Unrecognized(_))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pattern {
            Pattern::Daily => write!(f, "daily")?,
            Pattern::Weekly(days) => {
                let names: Vec<&str> = days.iter().map(|d| d.name()).collect();
                write!(f, "weekly:{}", names.join(","))?
            }
            Pattern::Monthly { day_of_month } => write!(f, "monthly:{}", day_of_month)?,
            Pattern::Unrecognized(name) => write!(f, "{}?", name)?,
        }
        if let Some(end) = self.end_date {
            write!(f, " until {}", end)?;
        }
        if !self.enabled {
            write!(f, " (disabled)")?;
        }
        Ok(())
    }
}

/// Every shape a stored recurrence object has been written in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecurrence {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub days_of_week: Vec<String>,
    /// Legacy numeric weekday list, 0 = Sunday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl From<RawRecurrence> for RecurrenceRule {
    fn from(raw: RawRecurrence) -> Self {
        let pattern = match raw.frequency.trim().to_lowercase().as_str() {
            "daily" => Pattern::Daily,
            "weekly" => {
                let mut days: WeekdaySet = raw.days_of_week.iter().filter_map(|name| Weekday::from_name(name)).collect();
                if days.is_empty() {
                    if let Some(legacy) = &raw.days {
                        days = legacy.iter().filter_map(|i| Weekday::from_index(*i)).collect();
                    }
                }
                Pattern::Weekly(days)
            }
            "monthly" => Pattern::Monthly {
                day_of_month: raw.day_of_month.unwrap_or(1),
            },
            _ => Pattern::Unrecognized(raw.frequency.clone()),
        };

        RecurrenceRule {
            enabled: raw.enabled.unwrap_or(true),
            pattern,
            end_date: raw.end_date.as_deref().and_then(|d| CalendarDate::parse(d).ok()),
        }
    }
}

impl From<RecurrenceRule> for RawRecurrence {
    fn from(rule: RecurrenceRule) -> Self {
        let (days_of_week, day_of_month) = match &rule.pattern {
            Pattern::Weekly(days) => (days.iter().map(|d| d.name().to_string()).collect(), None),
            Pattern::Monthly { day_of_month } => (Vec::new(), Some(*day_of_month)),
            _ => (Vec::new(), None),
        };

        RawRecurrence {
            enabled: Some(rule.enabled),
            frequency: rule.pattern.frequency().to_string(),
            days_of_week,
            days: None,
            day_of_month,
            end_date: rule.end_date.map(|d| d.to_string()),
        }
    }
}

/// Answers whether `date` matches the rule's weekday/day-of-month pattern.
///
/// The active window and the `enabled` flag are the caller's concern.
pub fn should_generate_on(date: CalendarDate, rule: &RecurrenceRule) -> bool {
    match &rule.pattern {
        Pattern::Daily => true,
        Pattern::Weekly(days) => days.contains_index(date.weekday_index()),
        Pattern::Monthly { day_of_month } => date.day() == *day_of_month,
        Pattern::Unrecognized(_) => false,
    }
}
