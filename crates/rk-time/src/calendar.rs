//! Weekend-only business calendar.
//!
//! Saturdays and Sundays are holidays; every other day is a business day.
//! All instruments in the library roll their dates with this calendar.

use crate::business_day_convention::BusinessDayConvention;
use crate::date::Date;
use crate::period::Period;
use rk_core::errors::Result;

/// A calendar whose only holidays are weekends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekendCalendar;

impl WeekendCalendar {
    /// Return `true` if `date` is a Monday to Friday.
    pub fn is_business_day(&self, date: Date) -> bool {
        !date.weekday().is_weekend()
    }

    /// Adjust `date` according to the given business-day convention.
    pub fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Result<Date> {
        match convention {
            BusinessDayConvention::Unadjusted => Ok(date),
            BusinessDayConvention::Following => self.roll(date, 1),
            BusinessDayConvention::Preceding => self.roll(date, -1),
            BusinessDayConvention::ModifiedFollowing => {
                let adjusted = self.roll(date, 1)?;
                if adjusted.month() != date.month() {
                    self.roll(date, -1)
                } else {
                    Ok(adjusted)
                }
            }
            BusinessDayConvention::ModifiedPreceding => {
                let adjusted = self.roll(date, -1)?;
                if adjusted.month() != date.month() {
                    self.roll(date, 1)
                } else {
                    Ok(adjusted)
                }
            }
        }
    }

    /// Move `date` by `n` business days (backwards for negative `n`).
    pub fn add_business_days(&self, mut date: Date, n: i32) -> Result<Date> {
        let step = n.signum();
        let mut remaining = n.abs();
        while remaining > 0 {
            date = date.add_days(step)?;
            if self.is_business_day(date) {
                remaining -= 1;
            }
        }
        Ok(date)
    }

    /// Apply `period` to `date` and adjust the result. Day and week periods
    /// count calendar days, not business days.
    pub fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
    ) -> Result<Date> {
        self.adjust(period.add_to(date)?, convention)
    }

    fn roll(&self, mut date: Date, step: i32) -> Result<Date> {
        while !self.is_business_day(date) {
            date = date.add_days(step)?;
        }
        Ok(date)
    }
}
