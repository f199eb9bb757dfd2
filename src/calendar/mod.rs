mod grid;
mod locale;

pub use grid::{Annotation, DayCell, MonthGrid};
pub use locale::{default_locale, locale, Locale, DEFAULT_LOCALE};

use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

/// Number of days of `month` (1-based) in `year`.
pub fn days_of_month(month: u32, year: i32) -> u32 {
    match month {
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// ISO weekday number, Monday = 1 .. Sunday = 7.
pub fn iso_weekday(date: &NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// A displayed month. Always holds the first day of that month and stays
/// one month clear of chrono's date range on both ends, so the adjacent
/// months of any `MonthIndex` are representable as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthIndex {
    first: NaiveDate,
}

impl MonthIndex {
    pub const MIN_YEAR: i32 = -262_142;
    pub const MAX_YEAR: i32 = 262_141;

    fn earliest() -> Self {
        MonthIndex {
            first: NaiveDate::from_ymd_opt(Self::MIN_YEAR, 1, 1).unwrap_or(NaiveDate::MIN),
        }
    }

    fn latest() -> Self {
        MonthIndex {
            first: NaiveDate::from_ymd_opt(Self::MAX_YEAR, 12, 1).unwrap_or(NaiveDate::MAX),
        }
    }

    /// `month0` is 0-based, January = 0.
    pub fn new(year: i32, month0: u32) -> Option<Self> {
        if month0 > 11 || !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month0 + 1, 1).map(|first| MonthIndex { first })
    }

    pub fn of<T: Datelike>(date: &T) -> Option<Self> {
        Self::new(date.year(), date.month0())
    }

    pub fn month0(&self) -> u32 {
        self.first.month0()
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn num_days(&self) -> u32 {
        days_of_month(self.first.month(), self.first.year())
    }

    /// ISO weekday of the 1st.
    pub fn first_weekday(&self) -> u32 {
        iso_weekday(&self.first)
    }

    pub fn checked_next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|first| Self::of(&first))
    }

    pub fn checked_prev(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .and_then(|first| Self::of(&first))
    }

    /// The following month. Saturates at the end of the supported range.
    pub fn next(&self) -> Self {
        self.checked_next().unwrap_or(*self)
    }

    /// The preceding month. Saturates at the start of the supported range.
    pub fn prev(&self) -> Self {
        self.checked_prev().unwrap_or(*self)
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex {
            first: NaiveDate::default(),
        }
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        self.first
            .checked_add_months(Months::new(rhs))
            .and_then(|first| Self::of(&first))
            .unwrap_or_else(Self::latest)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        self.first
            .checked_sub_months(Months::new(rhs))
            .and_then(|first| Self::of(&first))
            .unwrap_or_else(Self::earliest)
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first.format("%Y-%m"))
    }
}

impl FromStr for MonthIndex {
    type Err = Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), DateKey::FORMAT)?;
        Self::of(&first).ok_or_else(|| {
            Error::new(
                ErrorKind::DateParse,
                &format!("month '{}' is out of range", s),
            )
        })
    }
}

/// `YYYY-MM-DD` identifier carried by current-month cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub const FORMAT: &'static str = "%Y-%m-%d";
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(DateKey(NaiveDate::parse_from_str(s, Self::FORMAT)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month0: u32) -> MonthIndex {
        MonthIndex::new(year, month0).expect("valid month")
    }

    #[test]
    fn days_of_month_handles_leap_years() {
        assert_eq!(days_of_month(2, 2024), 29);
        assert_eq!(days_of_month(2, 2023), 28);
        assert_eq!(days_of_month(2, 1900), 28);
        assert_eq!(days_of_month(2, 2000), 29);
        assert_eq!(days_of_month(4, 2025), 30);
        assert_eq!(days_of_month(12, 2025), 31);
    }

    #[test]
    fn iso_weekday_starts_on_monday() {
        // 2025-01-01 is a Wednesday
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(iso_weekday(&date), 3);
        // 2023-01-01 is a Sunday
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(iso_weekday(&date), 7);
    }

    #[test]
    fn rejects_invalid_months() {
        assert!(MonthIndex::new(2024, 12).is_none());
        assert!(MonthIndex::new(MonthIndex::MAX_YEAR + 1, 0).is_none());
    }

    #[test]
    fn next_wraps_into_following_year() {
        assert_eq!(month(2024, 11).next(), month(2025, 0));
        assert_eq!(month(2024, 0).prev(), month(2023, 11));
    }

    #[test]
    fn twelve_times_next_advances_one_year() {
        let start = month(2024, 5);
        let end = (0..12).fold(start, |m, _| m.next());
        assert_eq!(end, month(2025, 5));
        assert_eq!(start + 12, end);
        assert_eq!(end - 12, start);
    }

    #[test]
    fn prev_undoes_next() {
        for month0 in 0..12 {
            let m = month(1999, month0);
            assert_eq!(m.next().prev(), m);
            assert_eq!(m.prev().next(), m);
        }
    }

    #[test]
    fn navigation_saturates_at_range_end() {
        let last = month(MonthIndex::MAX_YEAR, 11);
        assert!(last.checked_next().is_none());
        assert_eq!(last.next(), last);

        let first = month(MonthIndex::MIN_YEAR, 0);
        assert!(first.checked_prev().is_none());
        assert_eq!(first.prev(), first);

        assert_eq!(month(MonthIndex::MAX_YEAR, 5) + 100, last);
        assert_eq!(month(MonthIndex::MIN_YEAR, 5) - 100, first);
    }

    #[test]
    fn month_index_parses_year_and_month() {
        let m: MonthIndex = "2024-02".parse().unwrap();
        assert_eq!(m, month(2024, 1));
        assert_eq!(m.to_string(), "2024-02");
        assert!("2024-13".parse::<MonthIndex>().is_err());
        assert!("february".parse::<MonthIndex>().is_err());
    }

    #[test]
    fn date_key_is_zero_padded() {
        let key = DateKey::from(NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
        assert_eq!(key.to_string(), "2024-02-09");
        assert_eq!("2024-02-09".parse::<DateKey>().unwrap(), key);
        assert!("2024-02-30".parse::<DateKey>().is_err());
    }
}
