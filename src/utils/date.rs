//! Date argument parsing and wire formatting.
//!
//! The API encodes dates as `YYYY-MM-DD` path segments. Callers may pass a
//! structured [`chrono::NaiveDate`] or a free-form string; strings with
//! missing components are completed from today's date.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};

use crate::error::TimecampError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Start of the default query range when no `from` bound is given.
pub fn epoch_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid calendar date")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A date parameter: either an exact date or a string still to be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateArg {
    Date(NaiveDate),
    Text(String),
}

impl From<NaiveDate> for DateArg {
    fn from(date: NaiveDate) -> Self {
        DateArg::Date(date)
    }
}

impl From<NaiveDateTime> for DateArg {
    fn from(datetime: NaiveDateTime) -> Self {
        DateArg::Date(datetime.date())
    }
}

impl From<&str> for DateArg {
    fn from(text: &str) -> Self {
        DateArg::Text(text.to_string())
    }
}

impl From<String> for DateArg {
    fn from(text: String) -> Self {
        DateArg::Text(text)
    }
}

impl DateArg {
    /// Resolves to a concrete date, completing missing components of a
    /// textual argument from `today`.
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate, TimecampError> {
        match self {
            DateArg::Date(date) => Ok(*date),
            DateArg::Text(text) => parse_loose(text, today),
        }
    }

    /// `YYYY-MM-DD` form used in request paths.
    pub fn to_wire(&self, today: NaiveDate) -> Result<String, TimecampError> {
        Ok(format_date(self.resolve(today)?))
    }
}

/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD`, plus partial forms (`YYYY-MM`,
/// `MM-DD`, bare day-of-month) completed from `today`.
fn parse_loose(text: &str, today: NaiveDate) -> Result<NaiveDate, TimecampError> {
    let trimmed = text.trim();
    for format in [DATE_FORMAT, "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    let numbers: Option<Vec<u32>> = trimmed
        .split(['-', '/'])
        .map(|part| part.parse::<u32>().ok())
        .collect();
    let date = match numbers.as_deref() {
        Some([year, month]) if *year >= 1000 => {
            NaiveDate::from_ymd_opt(*year as i32, *month, today.day())
        }
        Some([month, day]) => NaiveDate::from_ymd_opt(today.year(), *month, *day),
        Some([day]) => NaiveDate::from_ymd_opt(today.year(), today.month(), *day),
        _ => None,
    };
    date.ok_or_else(|| TimecampError::InvalidDate(text.to_string()))
}

/// Week-day names as configuration input: full singular or pluralized names,
/// case-insensitive ("monday", "Mondays"), plus the abbreviations chrono
/// itself accepts.
pub fn parse_week_day(name: &str) -> Result<Weekday, TimecampError> {
    let lowered = name.trim().to_ascii_lowercase();
    let singular = lowered
        .strip_suffix('s')
        .filter(|stem| stem.ends_with("day"))
        .unwrap_or(&lowered);
    singular
        .parse::<Weekday>()
        .map_err(|_| TimecampError::InvalidDay(name.to_string()))
}
