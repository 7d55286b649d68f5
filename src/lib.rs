mod boot;
mod consts;
mod convert;
mod preferences;
mod prelude;

pub use boot::{BOOT_KEY, attach_boot_context};
pub use consts::*;
pub use convert::{
    GregorianInput, JalaliInput, days_in_jalali_month, gregorian_to_jalali, is_gregorian_leap,
    is_jalali_leap, jalali_to_gregorian,
};
pub use preferences::{
    Calendar, CalendarSelection, CalendarSource, DEFAULT_CALENDAR, MemoryStore, PreferenceContext,
    PreferenceError, PreferenceStore, Preferences, Scope,
};

use crate::prelude::*;
use std::str::FromStr;

/// An immutable date in the Jalali (Persian solar Hijri) calendar.
///
/// Instances are only constructible through validating entry points, so a
/// held value is always a real calendar date: month in 1..=12 and day within
/// the length of that month for that year (months 1-6 have 31 days, months
/// 7-11 have 30, and Esfand has 30 in a leap year or 29 otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
pub struct JalaliDate {
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date string: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid Jalali year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for Jalali month {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
    #[display(fmt = "Invalid Gregorian date: {_0}")]
    InvalidGregorian(String),
    #[display(fmt = "Internal conversion error: {_0}")]
    Internal(&'static str),
}

impl std::error::Error for DateError {}

impl JalaliDate {
    /// Creates a date from validated integer components.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear`, `InvalidMonth`, or `InvalidDay` when
    /// a component is out of range for the Jalali calendar.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::InvalidYear(year));
        }
        if !(1..=MAX_MONTH).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        let max_day = days_in_jalali_month(year, month);
        if !(MIN_DAY..=max_day).contains(&day) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Converts any accepted Gregorian representation into a Jalali date.
    ///
    /// # Errors
    /// Propagates normalization and validation failures from
    /// [`gregorian_to_jalali`].
    pub fn from_gregorian<'a>(value: impl Into<GregorianInput<'a>>) -> Result<Self, DateError> {
        gregorian_to_jalali(value)
    }

    /// Converts this date to its Gregorian equivalent.
    ///
    /// # Errors
    /// Returns `DateError::InvalidGregorian` for the tail of year
    /// [`MAX_YEAR`] that falls past the host library's civil 9999-12-31
    /// ceiling; the defensive `DateError::Internal` is otherwise
    /// unreachable.
    pub fn to_gregorian(self) -> Result<jiff::civil::Date, DateError> {
        jalali_to_gregorian(self)
    }

    /// Returns the year component
    #[inline]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the month component (1-12)
    #[inline]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the day component
    #[inline]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Formats as zero-padded `YYYY<sep>MM<sep>DD`.
    pub fn format_with(self, sep: char) -> String {
        format!(
            "{:04}{}{:02}{}{:02}",
            self.year, sep, self.month, sep, self.day
        )
    }
}

impl FromStr for JalaliDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month, day) = convert::parse_triple(s)?;
        Self::new(year, month, day)
    }
}

impl TryFrom<(i32, u8, u8)> for JalaliDate {
    type Error = DateError;

    fn try_from(value: (i32, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl serde::Serialize for JalaliDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for JalaliDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
