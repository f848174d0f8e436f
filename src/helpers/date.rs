//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

/// Localized names used to spell out a date
#[derive(Debug, Clone, Default)]
pub struct DateNames {
    /// Monday first
    pub weekdays: Vec<String>,
    /// January first
    pub months: Vec<String>,
    /// Long form with `{weekday}`, `{day}`, `{month}` and `{year}` placeholders
    pub pattern: String,
}

impl DateNames {
    pub fn is_complete(&self) -> bool {
        self.weekdays.len() == 7 && self.months.len() == 12 && !self.pattern.is_empty()
    }
}

/// Format a date in long form with weekday, e.g. "lunes, 15 de enero de 2024"
///
/// Falls back to English chrono formatting when `names` is incomplete.
pub fn long_date<Tz: TimeZone>(date: &DateTime<Tz>, names: &DateNames) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if !names.is_complete() {
        return date.format("%A, %B %-d, %Y").to_string();
    }

    let weekday = &names.weekdays[date.weekday().num_days_from_monday() as usize];
    let month = &names.months[date.month0() as usize];

    names
        .pattern
        .replace("{weekday}", weekday)
        .replace("{day}", &date.day().to_string())
        .replace("{month}", month)
        .replace("{year}", &date.year().to_string())
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}
