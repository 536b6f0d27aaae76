//! `Schedule`: the accrual dates of a leg.
//!
//! Dates are generated backward from the termination date in whole
//! multiples of the tenor, so any short stub falls at the front of the
//! schedule. Every date, the first and last included, is rolled with the
//! weekend calendar.

use crate::business_day_convention::BusinessDayConvention;
use crate::calendar::WeekendCalendar;
use crate::date::Date;
use crate::period::Period;
use rk_core::errors::{Error, Result};

/// An ordered sequence of accrual boundary dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    dates: Vec<Date>,
}

impl Schedule {
    /// Generate dates backward from `termination` to `effective`.
    pub fn backward(
        effective: Date,
        termination: Date,
        tenor: Period,
        convention: BusinessDayConvention,
    ) -> Result<Self> {
        if effective >= termination {
            return Err(Error::Configuration(format!(
                "schedule start {effective} must be before end {termination}"
            )));
        }
        if tenor.length <= 0 {
            return Err(Error::Configuration(format!(
                "schedule tenor must be positive, got {tenor}"
            )));
        }
        let cal = WeekendCalendar;
        let mut unadjusted = vec![termination];
        let mut n = 1;
        loop {
            let prev = termination.advance(-n * tenor.length, tenor.unit)?;
            if prev <= effective {
                break;
            }
            unadjusted.push(prev);
            n += 1;
        }
        unadjusted.push(effective);
        unadjusted.reverse();

        let mut dates = Vec::with_capacity(unadjusted.len());
        for d in unadjusted {
            dates.push(cal.adjust(d, convention)?);
        }
        dates.dedup();
        if dates.len() < 2 {
            return Err(Error::Configuration(format!(
                "schedule from {effective} to {termination} collapses to a single date"
            )));
        }
        Ok(Self { dates })
    }

    /// Build a schedule from explicit, strictly increasing dates.
    pub fn from_dates(dates: Vec<Date>) -> Result<Self> {
        if dates.len() < 2 || dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Configuration(
                "schedule needs at least two strictly increasing dates".into(),
            ));
        }
        Ok(Self { dates })
    }

    /// All boundary dates, start first.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of accrual periods.
    pub fn period_count(&self) -> usize {
        self.dates.len() - 1
    }

    /// First (effective) date.
    pub fn start_date(&self) -> Date {
        self.dates[0]
    }

    /// Last (termination) date.
    pub fn end_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Accrual periods as `(start, end)` pairs; each end is a payment date.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn semiannual_backward_schedule() {
        let s = Schedule::backward(
            date(2019, 3, 4),
            date(2024, 3, 4),
            Period::months(6),
            BusinessDayConvention::Following,
        )
        .unwrap();
        assert_eq!(s.period_count(), 10);
        assert_eq!(s.start_date(), date(2019, 3, 4));
        assert_eq!(s.end_date(), date(2024, 3, 4));
        // 2023-09-04 is a Monday; 2021-09-04 is a Saturday and rolls forward.
        assert!(s.dates().contains(&date(2023, 9, 4)));
        assert!(s.dates().contains(&date(2021, 9, 6)));
    }

    #[test]
    fn short_stub_is_at_the_front() {
        let s = Schedule::backward(
            date(2020, 2, 15),
            date(2021, 1, 15),
            Period::months(3),
            BusinessDayConvention::Unadjusted,
        )
        .unwrap();
        assert_eq!(
            s.dates(),
            &[
                date(2020, 2, 15),
                date(2020, 4, 15),
                date(2020, 7, 15),
                date(2020, 10, 15),
                date(2021, 1, 15)
            ]
        );
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(Schedule::backward(
            date(2021, 1, 1),
            date(2020, 1, 1),
            Period::years(1),
            BusinessDayConvention::Following
        )
        .is_err());
    }
}
