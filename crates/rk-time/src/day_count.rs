//! Day-count conventions.
//!
//! A day count turns a pair of dates into a **year fraction**, the accrual
//! factor used for coupons and the time measure used by curves and models.

use crate::date::{days_in_month, is_leap_year, Date};
use rk_core::{Real, Time};

/// Supported day-count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCount {
    /// Actual days / 365.
    #[default]
    Actual365Fixed,
    /// Actual days / 360.
    Actual360,
    /// 30/360 bond basis (US): a 31st start becomes the 30th; a 31st end
    /// becomes the 30th only when the start is the 30th or later.
    Thirty360Bond,
    /// 30E/360 (Eurobond): every 31st becomes the 30th.
    Thirty360E,
    /// 30E/360 ISDA: every month-end, February included, becomes the 30th,
    /// except a termination date at the end of February (see
    /// [`DayCount::accrual_fraction`]).
    Thirty360EIsda,
    /// Actual/Actual ISDA: days in leap years over 366, others over 365.
    ActualActualIsda,
}

impl DayCount {
    /// Human-readable name of this convention.
    pub fn name(&self) -> &'static str {
        match self {
            DayCount::Actual365Fixed => "Actual/365 (Fixed)",
            DayCount::Actual360 => "Actual/360",
            DayCount::Thirty360Bond => "30/360 (Bond Basis)",
            DayCount::Thirty360E => "30E/360",
            DayCount::Thirty360EIsda => "30E/360 (ISDA)",
            DayCount::ActualActualIsda => "Actual/Actual (ISDA)",
        }
    }

    /// Number of days between `d1` and `d2` under this convention.
    pub fn day_count(&self, d1: Date, d2: Date) -> i64 {
        self.count_days(d1, d2, false)
    }

    fn count_days(&self, d1: Date, d2: Date, february_termination: bool) -> i64 {
        match self {
            DayCount::Actual365Fixed | DayCount::Actual360 | DayCount::ActualActualIsda => {
                (d2 - d1) as i64
            }
            DayCount::Thirty360Bond | DayCount::Thirty360E | DayCount::Thirty360EIsda => {
                let (y1, m1, dd1) = d1.ymd();
                let (y2, m2, dd2) = d2.ymd();
                let (mut dd1, mut dd2) = (dd1 as i64, dd2 as i64);
                match self {
                    DayCount::Thirty360Bond => {
                        if dd1 == 31 {
                            dd1 = 30;
                        }
                        if dd2 == 31 && dd1 == 30 {
                            dd2 = 30;
                        }
                    }
                    DayCount::Thirty360E => {
                        dd1 = dd1.min(30);
                        dd2 = dd2.min(30);
                    }
                    _ => {
                        if dd1 == days_in_month(y1, m1) as i64 {
                            dd1 = 30;
                        }
                        let keeps_day = february_termination && m2 == 2;
                        if dd2 == days_in_month(y2, m2) as i64 && !keeps_day {
                            dd2 = 30;
                        }
                    }
                }
                360 * (y2 as i64 - y1 as i64) + 30 * (m2 as i64 - m1 as i64) + (dd2 - dd1)
            }
        }
    }

    /// Accrual fraction of a period from `d1` to `d2` in a schedule that
    /// ends on `termination`.
    ///
    /// Equal to [`year_fraction`](Self::year_fraction) except under 30E/360
    /// ISDA, where an end date that is both the termination date and the
    /// last day of February keeps its day of month instead of becoming the
    /// 30th.
    pub fn accrual_fraction(&self, d1: Date, d2: Date, termination: Date) -> Time {
        match self {
            DayCount::Thirty360EIsda => self.count_days(d1, d2, d2 == termination) as Real / 360.0,
            _ => self.year_fraction(d1, d2),
        }
    }

    /// Fraction of a year between `d1` and `d2`; negative if `d2 < d1`.
    pub fn year_fraction(&self, d1: Date, d2: Date) -> Time {
        match self {
            DayCount::Actual365Fixed => self.day_count(d1, d2) as Real / 365.0,
            DayCount::Actual360 => self.day_count(d1, d2) as Real / 360.0,
            DayCount::Thirty360Bond | DayCount::Thirty360E | DayCount::Thirty360EIsda => {
                self.day_count(d1, d2) as Real / 360.0
            }
            DayCount::ActualActualIsda => {
                if d2 < d1 {
                    return -self.year_fraction(d2, d1);
                }
                let (y1, y2) = (d1.year(), d2.year());
                let basis = |y: u16| if is_leap_year(y) { 366.0 } else { 365.0 };
                if y1 == y2 {
                    return (d2 - d1) as Real / basis(y1);
                }
                let mut sum = (Date::start_of_year(y1 + 1) - d1) as Real / basis(y1);
                sum += (y2 - y1 - 1) as Real;
                sum + (d2 - Date::start_of_year(y2)) as Real / basis(y2)
            }
        }
    }
}

impl std::fmt::Display for DayCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
