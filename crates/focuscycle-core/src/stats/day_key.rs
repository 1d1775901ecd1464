use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Calendar-day key used to index persisted statistics.
///
/// Format is `{year}-{month}-{day}` with month and day unpadded
/// (`2024-3-5`), matching data written by earlier releases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{}-{}-{}", date.year(), date.month(), date.day()))
    }

    /// Wrap a key read back from storage as-is.
    pub(crate) fn from_stored(key: String) -> Self {
        Self(key)
    }

    /// Key for the local calendar date right now.
    pub fn today() -> Self {
        Self::from_date(local_today())
    }

    /// Parse a user-supplied key. Zero-padded input is normalized.
    pub fn parse(input: &str) -> Result<Self> {
        parse_ymd(input).map(Self::from_date).ok_or_else(|| {
            CoreError::invalid_input("date", format!("'{input}' is not a YYYY-M-D date"))
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Calendar date this key names, `None` for keys that are not dates.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_ymd(&self.0)
    }
}

fn parse_ymd(input: &str) -> Option<NaiveDate> {
    let mut parts = input.trim().splitn(3, '-');
    let mut next = || parts.next().and_then(|p| p.parse::<u32>().ok());
    let (year, month, day) = (next()?, next()?, next()?);
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Local calendar date, the default engine calendar.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_and_day_are_not_padded() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(DayKey::from_date(d).as_str(), "2024-3-5");
        let d = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(DayKey::from_date(d).to_string(), "2023-12-31");
    }

    #[test]
    fn parse_normalizes_padding() {
        assert_eq!(DayKey::parse("2024-03-05").unwrap().as_str(), "2024-3-5");
        assert_eq!(DayKey::parse("2024-3-5").unwrap().as_str(), "2024-3-5");
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        assert!(DayKey::parse("2024-2-30").is_err());
        assert!(DayKey::parse("yesterday").is_err());
        assert!(DayKey::parse("2024-13").is_err());
    }

    #[test]
    fn date_recovers_the_calendar_day() {
        let d = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        assert_eq!(DayKey::from_date(d).date(), Some(d));
        let junk: DayKey = serde_json::from_str("\"someday\"").unwrap();
        assert_eq!(junk.date(), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let json = serde_json::to_string(&DayKey::from_date(d)).unwrap();
        assert_eq!(json, "\"2025-1-9\"");
    }
}
