//! Calendar dates as day serial numbers.
//!
//! Serial 1 is January 1, 1900 (a Monday). Valid dates run from
//! 1901-01-01 to 2199-12-31; every constructor and every arithmetic
//! operation checks that range and reports [`Error::Date`] when it is left.

use std::str::FromStr;

use crate::time_unit::TimeUnit;
use crate::weekday::Weekday;
use rk_core::errors::{Error, Result};

/// A calendar date represented as a serial number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Date(i32);

impl Date {
    /// Minimum valid date: January 1, 1901.
    pub const MIN: Date = Date(367);

    /// Maximum valid date: December 31, 2199.
    pub const MAX: Date = Date(109_573);

    // ── Constructors ─────────────────────────────────────────────────────────

    /// Create a date from year, month (1–12), and day-of-month.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self> {
        if !(1901..=2199).contains(&year) {
            return Err(Error::Date(format!(
                "year {year} out of range [1901, 2199]"
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::Date(format!("month {month} out of range [1, 12]")));
        }
        let days_in = days_in_month(year, month);
        if day == 0 || day > days_in {
            return Err(Error::Date(format!(
                "day {day} out of range [1, {days_in}] for {year}-{month:02}"
            )));
        }
        Ok(Date(serial_from_ymd(year, month, day)))
    }

    /// Create a date from its serial number.
    pub fn from_serial(serial: i32) -> Result<Self> {
        let d = Date(serial);
        if d < Self::MIN || d > Self::MAX {
            return Err(Error::Date(format!("serial {serial} out of range")));
        }
        Ok(d)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Return the serial number.
    pub fn serial(&self) -> i32 {
        self.0
    }

    /// Return the year.
    pub fn year(&self) -> u16 {
        ymd_from_serial(self.0).0
    }

    /// Return the month (1–12).
    pub fn month(&self) -> u8 {
        ymd_from_serial(self.0).1
    }

    /// Return the day of the month (1–31).
    pub fn day_of_month(&self) -> u8 {
        ymd_from_serial(self.0).2
    }

    /// Return `(year, month, day)` in one decomposition.
    pub fn ymd(&self) -> (u16, u8, u8) {
        ymd_from_serial(self.0)
    }

    /// Return the weekday.
    pub fn weekday(&self) -> Weekday {
        match (self.0 - 1).rem_euclid(7) {
            0 => Weekday::Monday,
            1 => Weekday::Tuesday,
            2 => Weekday::Wednesday,
            3 => Weekday::Thursday,
            4 => Weekday::Friday,
            5 => Weekday::Saturday,
            _ => Weekday::Sunday,
        }
    }

    /// Return `true` if this is the last calendar day of its month.
    pub fn is_end_of_month(&self) -> bool {
        let (y, m, d) = ymd_from_serial(self.0);
        d == days_in_month(y, m)
    }

    /// Return the last day of the month containing this date.
    pub fn end_of_month(&self) -> Date {
        let (y, m, _) = ymd_from_serial(self.0);
        Date(serial_from_ymd(y, m, days_in_month(y, m)))
    }

    // ── Arithmetic ────────────────────────────────────────────────────────────

    /// Move by `n` calendar days.
    pub fn add_days(self, n: i32) -> Result<Self> {
        Date::from_serial(self.0 + n)
            .map_err(|_| Error::Date(format!("{self:?} + {n} days is out of range")))
    }

    /// Move by `n` units. Month and year steps clamp the day to the end of
    /// the target month (January 31 + 1M = February 28/29).
    pub fn advance(self, n: i32, unit: TimeUnit) -> Result<Self> {
        match unit {
            TimeUnit::Days => self.add_days(n),
            TimeUnit::Weeks => self.add_days(n * 7),
            TimeUnit::Months => {
                let (y, m, d) = ymd_from_serial(self.0);
                let months = y as i32 * 12 + (m as i32 - 1) + n;
                let new_y = months.div_euclid(12);
                let new_m = (months.rem_euclid(12) + 1) as u8;
                if !(1901..=2199).contains(&new_y) {
                    return Err(Error::Date(format!(
                        "{self:?} advanced by {n} months leaves the date range"
                    )));
                }
                let new_y = new_y as u16;
                Ok(Date(serial_from_ymd(
                    new_y,
                    new_m,
                    d.min(days_in_month(new_y, new_m)),
                )))
            }
            TimeUnit::Years => self.advance(n * 12, TimeUnit::Months),
        }
    }

    /// Number of calendar days from `self` to `other`; positive if
    /// `other > self`.
    pub fn days_until(self, other: Date) -> i32 {
        other.0 - self.0
    }

    /// January 1 of `year`, for year-boundary splitting inside the crate.
    pub(crate) fn start_of_year(year: u16) -> Date {
        Date(serial_from_ymd(year, 1, 1))
    }
}

impl std::ops::Sub<Date> for Date {
    type Output = i32;
    fn sub(self, rhs: Date) -> i32 {
        self.0 - rhs.0
    }
}

// ── Parsing and display ───────────────────────────────────────────────────────

impl FromStr for Date {
    type Err = Error;

    /// Parse an ISO `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().splitn(3, '-');
        let mut field = |name: &str| -> Result<u16> {
            parts
                .next()
                .and_then(|p| p.parse::<u16>().ok())
                .ok_or_else(|| Error::Date(format!("cannot parse {name} in date '{s}'")))
        };
        let year = field("year")?;
        let month = field("month")?;
        let day = field("day")?;
        if month > 12 || day > 31 {
            return Err(Error::Date(format!("invalid date '{s}'")));
        }
        Date::from_ymd(year, month as u8, day as u8)
    }
}

impl TryFrom<String> for Date {
    type Error = Error;
    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Date> for String {
    fn from(d: Date) -> String {
        d.to_string()
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (y, m, d) = ymd_from_serial(self.0);
        write!(f, "{y:04}-{m:02}-{d:02}")
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Date({self})")
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Whether a given year is a leap year.
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a given month/year.
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Cumulative day-of-year offset at the start of each month (non-leap).
const MONTH_OFFSET: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

fn serial_from_ymd(year: u16, month: u8, day: u8) -> i32 {
    let y = year as i32;
    // whole years since 1900, plus one day per leap year in [1901, year)
    let mut serial = (y - 1900) * 365 + (y - 1901) / 4 - (y - 1901) / 100 + (y - 1601) / 400;
    serial += MONTH_OFFSET[month as usize - 1];
    if month > 2 && is_leap_year(year) {
        serial += 1;
    }
    serial + day as i32
}

fn ymd_from_serial(serial: i32) -> (u16, u8, u8) {
    let mut y = (serial / 365 + 1900) as u16;
    while serial < serial_from_ymd(y, 1, 1) {
        y -= 1;
    }
    while serial >= serial_from_ymd(y + 1, 1, 1) {
        y += 1;
    }
    let mut remaining = serial - serial_from_ymd(y, 1, 1) + 1;
    let mut m = 1u8;
    while remaining > days_in_month(y, m) as i32 {
        remaining -= days_in_month(y, m) as i32;
        m += 1;
    }
    (y, m, remaining as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn calendar_fields_survive_serialisation() {
        for (y, m, d) in [
            (1901, 1, 1),
            (2000, 2, 29),
            (2100, 2, 28),
            (2014, 3, 4),
            (2199, 12, 31),
        ] {
            assert_eq!(date(y, m, d).ymd(), (y, m, d));
        }
        assert_eq!(date(1901, 1, 1), Date::MIN);
        assert_eq!(date(2199, 12, 31), Date::MAX);
    }

    #[test]
    fn weekday_of_known_dates() {
        assert_eq!(date(2014, 3, 4).weekday(), Weekday::Tuesday);
        assert_eq!(date(2024, 1, 6).weekday(), Weekday::Saturday);
        assert_eq!(date(2024, 1, 1).weekday(), Weekday::Monday);
    }

    #[test]
    fn month_advance_clamps_to_month_end() {
        let d = date(2023, 1, 31);
        assert_eq!(d.advance(1, TimeUnit::Months).unwrap(), date(2023, 2, 28));
        assert_eq!(d.advance(-2, TimeUnit::Months).unwrap(), date(2022, 11, 30));
        assert_eq!(
            date(2024, 2, 29).advance(1, TimeUnit::Years).unwrap(),
            date(2025, 2, 28)
        );
    }

    #[test]
    fn advancing_out_of_range_is_an_error() {
        assert!(Date::MAX.add_days(1).is_err());
        assert!(date(2190, 1, 1).advance(10, TimeUnit::Years).is_err());
    }

    #[test]
    fn parse_and_display() {
        let d: Date = "2014-03-04".parse().unwrap();
        assert_eq!(d, date(2014, 3, 4));
        assert_eq!(d.to_string(), "2014-03-04");
        assert!("2014-02-30".parse::<Date>().is_err());
        assert!("not a date".parse::<Date>().is_err());
    }

    #[test]
    fn day_differences() {
        assert_eq!(date(2023, 2, 1) - date(2023, 1, 1), 31);
        assert_eq!(date(2023, 1, 1).days_until(date(2024, 1, 1)), 365);
    }
}
