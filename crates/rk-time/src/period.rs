//! `Period`: a signed time span expressed in a [`TimeUnit`].
//!
//! Instrument tenors are usually quoted as strings such as `"1W"`, `"3M"`,
//! or `"30Y"`; [`Period`] implements [`FromStr`] for that notation.

use std::str::FromStr;

use crate::date::Date;
use crate::time_unit::TimeUnit;
use rk_core::errors::{Error, Result};

/// A time span made up of an integer length and a [`TimeUnit`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Period {
    /// Number of units.
    pub length: i32,
    /// The unit of time.
    pub unit: TimeUnit,
}

impl Period {
    /// Create a new period.
    pub fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// Shorthand for `n` days.
    pub fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// Shorthand for `n` weeks.
    pub fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// Shorthand for `n` months.
    pub fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// Shorthand for `n` years.
    pub fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Apply this period to `date` without business-day adjustment.
    pub fn add_to(&self, date: Date) -> Result<Date> {
        date.advance(self.length, self.unit)
    }
}

impl std::ops::Neg for Period {
    type Output = Self;
    fn neg(self) -> Self {
        Period::new(-self.length, self.unit)
    }
}

impl std::ops::Mul<i32> for Period {
    type Output = Self;
    fn mul(self, rhs: i32) -> Self {
        Period::new(self.length * rhs, self.unit)
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse a tenor like `"10D"`, `"1W"`, `"6M"` or `"5Y"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .ok_or_else(|| Error::Date("empty tenor".into()))?;
        let (number, code) = s.split_at(split);
        let unit = match code.to_ascii_uppercase().as_str() {
            "D" => TimeUnit::Days,
            "W" => TimeUnit::Weeks,
            "M" => TimeUnit::Months,
            "Y" => TimeUnit::Years,
            other => return Err(Error::Date(format!("unknown tenor unit '{other}' in '{s}'"))),
        };
        let length = number
            .parse::<i32>()
            .map_err(|_| Error::Date(format!("invalid tenor length in '{s}'")))?;
        Ok(Period::new(length, unit))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.unit.code())
    }
}

impl std::fmt::Debug for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Period({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tenors() {
        assert_eq!("1W".parse::<Period>().unwrap(), Period::weeks(1));
        assert_eq!("3m".parse::<Period>().unwrap(), Period::months(3));
        assert_eq!(" 30Y ".parse::<Period>().unwrap(), Period::years(30));
        assert_eq!("10D".parse::<Period>().unwrap(), Period::days(10));
    }

    #[test]
    fn reject_malformed_tenors() {
        for bad in ["", "Y", "5Q", "five years", "1.5Y"] {
            assert!(bad.parse::<Period>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn display() {
        assert_eq!(Period::months(3).to_string(), "3M");
        assert_eq!((-Period::months(6)).to_string(), "-6M");
        assert_eq!((Period::years(1) * 5).to_string(), "5Y");
    }
}
