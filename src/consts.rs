/// Minimum valid Jalali year (inclusive)
pub const MIN_YEAR: i32 = 1;

/// Maximum valid Jalali year (inclusive).
/// Jalali 9378 contains the last Gregorian date `jiff` can represent
/// (civil 9999-12-31). The tail of that year runs past the civil ceiling,
/// so converting it to Gregorian fails with `InvalidGregorian`.
pub const MAX_YEAR: i32 = 9378;

/// Maximum valid month (Esfand)
pub const MAX_MONTH: u8 = 12;

/// First day of any month
pub const MIN_DAY: u8 = 1;

/// Days covered by the six 31-day months at the start of a Jalali year
pub const FIRST_HALF_DAYS: i64 = 186;

/// Days in Jalali months 1-6
pub const LONG_MONTH_DAYS: u8 = 31;

/// Days in Jalali months 7-11 (and month 12 in a leap year)
pub const MEDIUM_MONTH_DAYS: u8 = 30;

/// Base lengths of the Jalali months (index 0 is Farvardin).
/// Esfand shows 29 days; leap years are adjusted via `is_jalali_leap`.
pub const JALALI_MONTH_LENGTHS: [u8; 12] = [31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];

/// Base lengths of the Gregorian months (index 0 is January).
/// February shows 28 days; leap years are adjusted separately.
pub const GREGORIAN_MONTH_LENGTHS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Gregorian year minus this offset gives the candidate Jalali year
/// containing the same date.
pub(crate) const JALALI_YEAR_OFFSET: i32 = 621;

/// Jalali years are zero-based against this epoch year for day counting.
pub(crate) const JALALI_EPOCH_YEAR: i32 = 979;

/// Offset between the Jalali day-number epoch and the Gregorian one.
pub(crate) const JALALI_EPOCH_DAY_OFFSET: i64 = 79;

/// Gregorian day numbers are anchored at the first day of this year.
pub(crate) const GREGORIAN_EPOCH_YEAR: i32 = 1600;

/// The 33-year Jalali leap cycle contains 8 leap years.
pub(crate) const JALALI_CYCLE_YEARS: i64 = 33;
pub(crate) const JALALI_CYCLE_LEAPS: i64 = 8;

/// Days in a 400-year Gregorian cycle
pub(crate) const DAYS_PER_400_YEARS: i64 = 146_097;

/// Days in a non-leap Gregorian century
pub(crate) const DAYS_PER_CENTURY: i64 = 36_524;

/// Days in a 4-year Gregorian cycle containing one leap year
pub(crate) const DAYS_PER_4_YEARS: i64 = 1_461;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Alternative separator accepted on input (`YYYY/MM/DD`)
pub const ALT_SEPARATOR: char = '/';
