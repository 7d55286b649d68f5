//! Conversion arithmetic between the Gregorian and Jalali calendars.
//!
//! Both directions run over integer day counts anchored at the same pair of
//! epochs, so they are exact inverses for every supported date. The Jalali
//! leap-year predicate is derived from the same day counts rather than a
//! closed-form astronomical rule, which keeps it consistent with the
//! converters near year boundaries.

use jiff::civil;

use crate::consts::{
    ALT_SEPARATOR, CENTURY_CYCLE, DATE_SEPARATOR, DAYS_PER_4_YEARS, DAYS_PER_400_YEARS,
    DAYS_PER_CENTURY, FIRST_HALF_DAYS, GREGORIAN_CYCLE, GREGORIAN_EPOCH_YEAR,
    GREGORIAN_MONTH_LENGTHS, JALALI_CYCLE_LEAPS, JALALI_CYCLE_YEARS, JALALI_EPOCH_DAY_OFFSET,
    JALALI_EPOCH_YEAR, JALALI_MONTH_LENGTHS, JALALI_YEAR_OFFSET, LEAP_YEAR_CYCLE,
    LONG_MONTH_DAYS, MAX_MONTH, MEDIUM_MONTH_DAYS,
};
use crate::{DateError, JalaliDate};

/// A Gregorian date in any of the shapes the converters accept.
///
/// This is one of the two untrusted-input entry points; everything past
/// normalization works on plain integer triples.
#[derive(Debug, Clone, Copy)]
pub enum GregorianInput<'a> {
    /// A civil date from the host date library
    Date(civil::Date),
    /// A civil datetime; the time component is discarded
    DateTime(civil::DateTime),
    /// `YYYY-MM-DD` or `YYYY/MM/DD`
    Text(&'a str),
    /// A `(year, month, day)` triple
    Parts(i32, u8, u8),
}

impl From<civil::Date> for GregorianInput<'_> {
    fn from(value: civil::Date) -> Self {
        Self::Date(value)
    }
}

impl From<civil::DateTime> for GregorianInput<'_> {
    fn from(value: civil::DateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<'a> From<&'a str> for GregorianInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<(i32, u8, u8)> for GregorianInput<'_> {
    fn from(value: (i32, u8, u8)) -> Self {
        Self::Parts(value.0, value.1, value.2)
    }
}

impl GregorianInput<'_> {
    fn into_parts(self) -> Result<(i32, u8, u8), DateError> {
        match self {
            Self::Date(date) => Ok(date_parts(date)),
            Self::DateTime(datetime) => Ok(date_parts(datetime.date())),
            Self::Text(text) => parse_triple(text),
            Self::Parts(year, month, day) => Ok((year, month, day)),
        }
    }
}

/// A Jalali date in any of the shapes the converters accept.
#[derive(Debug, Clone, Copy)]
pub enum JalaliInput<'a> {
    /// An already validated date
    Date(JalaliDate),
    /// `YYYY-MM-DD` or `YYYY/MM/DD`
    Text(&'a str),
    /// A `(year, month, day)` triple
    Parts(i32, u8, u8),
}

impl From<JalaliDate> for JalaliInput<'_> {
    fn from(value: JalaliDate) -> Self {
        Self::Date(value)
    }
}

impl<'a> From<&'a str> for JalaliInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<(i32, u8, u8)> for JalaliInput<'_> {
    fn from(value: (i32, u8, u8)) -> Self {
        Self::Parts(value.0, value.1, value.2)
    }
}

impl JalaliInput<'_> {
    fn into_date(self) -> Result<JalaliDate, DateError> {
        match self {
            Self::Date(date) => Ok(date),
            Self::Text(text) => text.parse(),
            Self::Parts(year, month, day) => JalaliDate::new(year, month, day),
        }
    }
}

fn date_parts(date: civil::Date) -> (i32, u8, u8) {
    (
        i32::from(date.year()),
        date.month().unsigned_abs(),
        date.day().unsigned_abs(),
    )
}

/// Splits a textual date into a `(year, month, day)` triple.
///
/// Accepts `-` or `/` as separator; anything that does not yield exactly
/// three numeric tokens is an `InvalidFormat` error.
pub(crate) fn parse_triple(value: &str) -> Result<(i32, u8, u8), DateError> {
    let invalid = || DateError::InvalidFormat(value.to_owned());
    let normalized = value.trim().replace(ALT_SEPARATOR, "-");
    let tokens: Vec<&str> = normalized.split(DATE_SEPARATOR).collect();
    if tokens.len() != 3 {
        return Err(invalid());
    }
    let year = tokens[0].parse::<i32>().map_err(|_| invalid())?;
    let month = tokens[1].parse::<u8>().map_err(|_| invalid())?;
    let day = tokens[2].parse::<u8>().map_err(|_| invalid())?;
    Ok((year, month, day))
}

/// Standard proleptic Gregorian leap-year rule.
pub const fn is_gregorian_leap(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || year % GREGORIAN_CYCLE == 0
}

/// Returns `true` when the Jalali year spans 366 days.
///
/// Defined operationally as the gap between the first days of years `year`
/// and `year + 1` under the crate's own day counting.
pub fn is_jalali_leap(year: i32) -> bool {
    jalali_year_start(year + 1) - jalali_year_start(year) == 366
}

/// Length of a Jalali month for a given year.
pub fn days_in_jalali_month(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == MAX_MONTH && is_jalali_leap(year) {
        MEDIUM_MONTH_DAYS
    } else {
        JALALI_MONTH_LENGTHS[usize::from(month - 1)]
    }
}

/// Days since the Jalali day-count epoch for a `(year, month, day)` triple.
///
/// Euclidean division keeps the 33-year cycle arithmetic floor-like for
/// pre-epoch intermediates.
fn jalali_day_number(year: i32, month: u8, day: u8) -> i64 {
    let jy = i64::from(year - JALALI_EPOCH_YEAR);
    let jd = i64::from(day - 1);

    let mut day_no = 365 * jy
        + jy.div_euclid(JALALI_CYCLE_YEARS) * JALALI_CYCLE_LEAPS
        + (jy.rem_euclid(JALALI_CYCLE_YEARS) + 3) / 4;
    for len in &JALALI_MONTH_LENGTHS[..usize::from(month - 1)] {
        day_no += i64::from(*len);
    }
    day_no + jd
}

fn jalali_year_start(year: i32) -> i64 {
    jalali_day_number(year, 1, 1)
}

/// Days since Gregorian 1600-01-01 for a `(year, month, day)` triple.
/// Exact inverse of [`gregorian_from_day_number`].
fn gregorian_day_number(year: i32, month: u8, day: u8) -> i64 {
    let gy = i64::from(year - GREGORIAN_EPOCH_YEAR);
    let gd = i64::from(day - 1);

    let mut day_no = 365 * gy + (gy + 3).div_euclid(4) - (gy + 99).div_euclid(100)
        + (gy + 399).div_euclid(400);
    for len in &GREGORIAN_MONTH_LENGTHS[..usize::from(month - 1)] {
        day_no += i64::from(*len);
    }
    if month > 2 && is_gregorian_leap(year) {
        day_no += 1;
    }
    day_no + gd
}

/// Decomposes a day number back into a Gregorian `(year, month, day)`.
///
/// Nested 400-year, century, and 4-year cycle arithmetic; the `leap` flag
/// starts true and is corrected downward at each non-leap boundary.
fn gregorian_from_day_number(day_no: i64) -> Result<(i32, u8, u8), DateError> {
    let mut gy = i64::from(GREGORIAN_EPOCH_YEAR) + 400 * day_no.div_euclid(DAYS_PER_400_YEARS);
    let mut day_no = day_no.rem_euclid(DAYS_PER_400_YEARS);

    let mut leap = true;
    if day_no >= DAYS_PER_CENTURY + 1 {
        day_no -= 1;
        gy += 100 * (day_no / DAYS_PER_CENTURY);
        day_no %= DAYS_PER_CENTURY;
        if day_no >= 365 {
            day_no += 1;
        } else {
            leap = false;
        }
    }

    gy += 4 * (day_no / DAYS_PER_4_YEARS);
    day_no %= DAYS_PER_4_YEARS;

    if day_no >= 366 {
        leap = false;
        day_no -= 1;
        gy += day_no / 365;
        day_no %= 365;
    }

    for (index, len) in GREGORIAN_MONTH_LENGTHS.iter().enumerate() {
        let mut month_len = i64::from(*len);
        if index == 1 && leap {
            month_len += 1;
        }
        if day_no < month_len {
            return Ok((gy as i32, index as u8 + 1, day_no as u8 + 1));
        }
        day_no -= month_len;
    }

    Err(DateError::Internal(
        "day number does not fall within any Gregorian month",
    ))
}

/// Converts a Jalali date to its Gregorian civil equivalent.
///
/// # Errors
/// `InvalidFormat` for malformed text, `InvalidYear`/`InvalidMonth`/
/// `InvalidDay` for out-of-range components, `InvalidGregorian` when the
/// result falls past the host library's civil 9999-12-31 ceiling (the tail
/// of Jalali year `MAX_YEAR`), and the defensive `Internal` if the
/// day-number decomposition ever failed to land in a month.
pub fn jalali_to_gregorian<'a>(
    value: impl Into<JalaliInput<'a>>,
) -> Result<civil::Date, DateError> {
    let date = value.into().into_date()?;
    let day_no =
        jalali_day_number(date.year(), date.month(), date.day()) + JALALI_EPOCH_DAY_OFFSET;
    let (year, month, day) = gregorian_from_day_number(day_no)?;

    let year = i16::try_from(year).map_err(|_| DateError::Internal("Gregorian year overflow"))?;
    civil::Date::new(year, month as i8, day as i8)
        .map_err(|err| DateError::InvalidGregorian(err.to_string()))
}

/// Converts a Gregorian date to its Jalali equivalent.
///
/// The candidate Jalali year is `gregorian year - 621`; when the target
/// falls before that year's Nowruz the candidate is moved back one year.
///
/// # Errors
/// `InvalidFormat` for malformed text, `InvalidGregorian` when the host
/// date library rejects the triple, and `InvalidYear` when the date precedes
/// Jalali year 1.
pub fn gregorian_to_jalali<'a>(
    value: impl Into<GregorianInput<'a>>,
) -> Result<JalaliDate, DateError> {
    let (gy, gm, gd) = value.into().into_parts()?;
    // Host-side validation only; the arithmetic below is pure integers.
    civil_date(gy, gm, gd)?;
    let target_no = gregorian_day_number(gy, gm, gd);

    let mut jy = gy - JALALI_YEAR_OFFSET;
    if target_no < jalali_year_start(jy) + JALALI_EPOCH_DAY_OFFSET {
        jy -= 1;
    }
    let days = target_no - (jalali_year_start(jy) + JALALI_EPOCH_DAY_OFFSET);

    let long = i64::from(LONG_MONTH_DAYS);
    let medium = i64::from(MEDIUM_MONTH_DAYS);
    let (jm, jd) = if days < FIRST_HALF_DAYS {
        ((1 + days / long) as u8, (1 + days % long) as u8)
    } else {
        let rest = days - FIRST_HALF_DAYS;
        ((7 + rest / medium) as u8, (1 + rest % medium) as u8)
    };

    JalaliDate::new(jy, jm, jd)
}

fn civil_date(year: i32, month: u8, day: u8) -> Result<civil::Date, DateError> {
    let shown = format!("{year:04}-{month:02}-{day:02}");
    let year = i16::try_from(year).map_err(|_| DateError::InvalidGregorian(shown.clone()))?;
    let month = i8::try_from(month).map_err(|_| DateError::InvalidGregorian(shown.clone()))?;
    let day = i8::try_from(day).map_err(|_| DateError::InvalidGregorian(shown.clone()))?;
    civil::Date::new(year, month, day).map_err(|err| DateError::InvalidGregorian(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_YEAR;
    use jiff::civil::date;

    #[test]
    fn test_gregorian_to_jalali_known_values() {
        let cases = [
            ((2024, 3, 20), "1403-01-01"),
            ((2023, 3, 21), "1402-01-01"),
            ((2017, 1, 1), "1395-10-12"),
        ];
        for (gregorian, expected) in cases {
            let jalali = gregorian_to_jalali(gregorian).unwrap();
            assert_eq!(jalali.to_string(), expected, "from {gregorian:?}");
        }
    }

    #[test]
    fn test_jalali_to_gregorian_known_values() {
        assert_eq!(
            jalali_to_gregorian(JalaliDate::new(1403, 1, 1).unwrap()).unwrap(),
            date(2024, 3, 20)
        );
        assert_eq!(jalali_to_gregorian("1402-01-01").unwrap(), date(2023, 3, 21));
        assert_eq!(jalali_to_gregorian((1395, 10, 12)).unwrap(), date(2017, 1, 1));
    }

    #[test]
    fn test_accepts_civil_date_and_datetime() {
        let from_date = gregorian_to_jalali(date(2024, 3, 20)).unwrap();
        let from_datetime = gregorian_to_jalali(date(2024, 3, 20).at(13, 45, 0, 0)).unwrap();
        assert_eq!(from_date, from_datetime);
        assert_eq!(from_date.to_string(), "1403-01-01");
    }

    #[test]
    fn test_string_separators_normalize_identically() {
        assert_eq!(
            gregorian_to_jalali("2024/03/20").unwrap(),
            gregorian_to_jalali("2024-03-20").unwrap()
        );
        assert_eq!(
            jalali_to_gregorian("1403/01/01").unwrap(),
            jalali_to_gregorian("1403-01-01").unwrap()
        );
    }

    #[test]
    fn test_malformed_strings_fail_with_format_error() {
        assert!(matches!(
            gregorian_to_jalali("2024-03"),
            Err(DateError::InvalidFormat(_))
        ));
        assert!(matches!(
            jalali_to_gregorian("1403/01"),
            Err(DateError::InvalidFormat(_))
        ));
        assert!(matches!(
            gregorian_to_jalali("2024-xx-20"),
            Err(DateError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_invalid_gregorian_rejected_by_host_type() {
        assert!(matches!(
            gregorian_to_jalali((2023, 2, 29)),
            Err(DateError::InvalidGregorian(_))
        ));
        assert!(matches!(
            gregorian_to_jalali((2024, 13, 1)),
            Err(DateError::InvalidGregorian(_))
        ));
    }

    #[test]
    fn test_invalid_jalali_rejected_before_arithmetic() {
        assert!(matches!(
            jalali_to_gregorian((1402, 12, 30)),
            Err(DateError::InvalidDay { .. })
        ));
        assert!(matches!(
            jalali_to_gregorian((1403, 0, 1)),
            Err(DateError::InvalidMonth(0))
        ));
    }

    #[test]
    fn test_dates_before_jalali_epoch_fail() {
        // Gregorian 0400-01-01 precedes Jalali year 1.
        assert!(matches!(
            gregorian_to_jalali((400, 1, 1)),
            Err(DateError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_known_leap_years() {
        assert!(is_jalali_leap(1399));
        assert!(!is_jalali_leap(1400));
        assert!(is_jalali_leap(1403));
    }

    #[test]
    fn test_leap_consistency() {
        // Leap iff Esfand has 30 days iff the year spans 366 days.
        for year in 1300..1500 {
            let esfand = days_in_jalali_month(year, 12);
            let gap = jalali_year_start(year + 1) - jalali_year_start(year);
            if is_jalali_leap(year) {
                assert_eq!(esfand, 30, "year {year}");
                assert_eq!(gap, 366, "year {year}");
            } else {
                assert_eq!(esfand, 29, "year {year}");
                assert_eq!(gap, 365, "year {year}");
            }
        }
    }

    #[test]
    fn test_gregorian_leap_rule() {
        assert!(is_gregorian_leap(2000));
        assert!(is_gregorian_leap(2024));
        assert!(!is_gregorian_leap(1900));
        assert!(!is_gregorian_leap(2023));
    }

    #[test]
    fn test_round_trip_every_day_of_four_decades() {
        for year in 1990..=2030 {
            for month in 1..=12u8 {
                let mut len = GREGORIAN_MONTH_LENGTHS[usize::from(month - 1)];
                if month == 2 && is_gregorian_leap(year) {
                    len += 1;
                }
                for day in 1..=len {
                    let original = date(year as i16, month as i8, day as i8);
                    let jalali = gregorian_to_jalali(original).unwrap();
                    let back = jalali_to_gregorian(jalali).unwrap();
                    assert_eq!(back, original, "via {jalali}");
                }
            }
        }
    }

    #[test]
    fn test_round_trip_nowruz_boundary_1800_to_2200() {
        // The candidate-year correction matters most right around Nowruz.
        for year in 1800..=2200i16 {
            for day in 18..=23i8 {
                let original = date(year, 3, day);
                let jalali = gregorian_to_jalali(original).unwrap();
                let back = jalali_to_gregorian(jalali).unwrap();
                assert_eq!(back, original, "via {jalali}");
            }
        }
    }

    #[test]
    fn test_round_trip_every_valid_jalali_date_of_a_century() {
        for year in 1350..=1450 {
            for month in 1..=12u8 {
                for day in 1..=days_in_jalali_month(year, month) {
                    let original = JalaliDate::new(year, month, day).unwrap();
                    let gregorian = jalali_to_gregorian(original).unwrap();
                    let back = gregorian_to_jalali(gregorian).unwrap();
                    assert_eq!(back, original, "via {gregorian}");
                }
            }
        }
    }

    #[test]
    fn test_round_trip_selected_edge_dates() {
        for gregorian in [
            date(2000, 2, 29),
            date(1991, 8, 6),
            date(2010, 12, 31),
            date(2030, 6, 1),
            date(1600, 1, 1),
            date(9000, 7, 15),
        ] {
            let jalali = gregorian_to_jalali(gregorian).unwrap();
            assert_eq!(jalali_to_gregorian(jalali).unwrap(), gregorian);
        }
    }

    #[test]
    fn test_upper_boundary_of_supported_range() {
        // The last representable Gregorian date maps into MAX_YEAR and
        // round-trips.
        let last = gregorian_to_jalali(date(9999, 12, 31)).unwrap();
        assert_eq!(last.year(), MAX_YEAR);
        assert_eq!(jalali_to_gregorian(last).unwrap(), date(9999, 12, 31));

        // The rest of MAX_YEAR is constructible but has no representable
        // Gregorian counterpart.
        let next = JalaliDate::new(MAX_YEAR, last.month(), last.day() + 1).unwrap();
        assert!(matches!(
            jalali_to_gregorian(next),
            Err(DateError::InvalidGregorian(_))
        ));
        let year_end = JalaliDate::new(MAX_YEAR, 12, 29).unwrap();
        assert!(matches!(
            year_end.to_gregorian(),
            Err(DateError::InvalidGregorian(_))
        ));
    }

    #[test]
    fn test_nowruz_lands_on_march_20_or_21() {
        for year in 1380..=1420 {
            let start = jalali_to_gregorian((year, 1, 1)).unwrap();
            assert_eq!(start.month(), 3, "Jalali {year}");
            assert!(
                start.day() == 20 || start.day() == 21,
                "Jalali {year} starts {start}"
            );
        }
    }
}
