//! Fixed leg of a vanilla swap.
//!
//! The payment schedule is generated backward from maturity with the
//! weekend calendar and the Following convention. The annuity (PV01 per
//! unit rate) and the single-curve par rate are the two quantities every
//! swap-rate computation in the library reduces to.

use crate::yield_term_structure::YieldTermStructure;
use rk_core::errors::Result;
use rk_core::{Rate, Real, Time};
use rk_time::{BusinessDayConvention, Date, DayCount, Frequency, Schedule};

/// Payment schedule and accrual convention of a fixed leg.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedLeg {
    schedule: Schedule,
    frequency: Frequency,
    day_count: DayCount,
}

impl FixedLeg {
    /// Build the leg paying from `start` to `maturity`.
    pub fn new(
        start: Date,
        maturity: Date,
        frequency: Frequency,
        day_count: DayCount,
    ) -> Result<Self> {
        let schedule = Schedule::backward(
            start,
            maturity,
            frequency.period(),
            BusinessDayConvention::Following,
        )?;
        Ok(Self {
            schedule,
            frequency,
            day_count,
        })
    }

    /// The accrual schedule.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Payment frequency.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Accrual day count.
    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Adjusted start of the first accrual period.
    pub fn start_date(&self) -> Date {
        self.schedule.start_date()
    }

    /// Adjusted final payment date.
    pub fn end_date(&self) -> Date {
        self.schedule.end_date()
    }

    /// `(payment date, accrual fraction)` for every period. The last
    /// payment date is the termination date of the leg.
    pub fn accruals(&self) -> impl Iterator<Item = (Date, Time)> + '_ {
        let termination = self.end_date();
        self.schedule
            .periods()
            .map(move |(s, e)| (e, self.day_count.accrual_fraction(s, e, termination)))
    }

    /// `Σ τ_i · P(pay_i)` on `curve`.
    pub fn annuity<C: YieldTermStructure + ?Sized>(&self, curve: &C) -> Real {
        self.accruals()
            .map(|(pay, tau)| tau * curve.discount(pay))
            .sum()
    }

    /// Single-curve par rate `(P(start) − P(end)) / annuity`.
    pub fn par_rate<C: YieldTermStructure + ?Sized>(&self, curve: &C) -> Rate {
        (curve.discount(self.start_date()) - curve.discount(self.end_date())) / self.annuity(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_forward::FlatForward;
    use approx::assert_abs_diff_eq;
    use rk_time::Compounding;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn annual_leg_on_flat_annual_curve_pars_at_the_curve_rate() {
        // With annual compounding, 30E/360 accruals of exactly one year and
        // dates that never hit weekends, the par rate equals the flat rate.
        let today = date(2021, 1, 4);
        let curve = FlatForward::new(
            today,
            0.03,
            Compounding::Compounded(Frequency::Annual),
            DayCount::Thirty360E,
        );
        let leg = FixedLeg::new(today, date(2024, 1, 4), Frequency::Annual, DayCount::Thirty360E)
            .unwrap();
        assert_eq!(leg.schedule().period_count(), 3);
        assert_abs_diff_eq!(leg.par_rate(&curve), 0.03, epsilon = 1e-14);
    }

    #[test]
    fn february_maturity_accrues_to_its_actual_day() {
        // 2024-02-29 is a Thursday, so the final date is not rolled
        let leg = FixedLeg::new(
            date(2023, 2, 28),
            date(2024, 2, 29),
            Frequency::Semiannual,
            DayCount::Thirty360EIsda,
        )
        .unwrap();
        let taus: Vec<Time> = leg.accruals().map(|(_, tau)| tau).collect();
        assert_eq!(leg.end_date(), date(2024, 2, 29));
        assert_eq!(taus.len(), 2);
        // 28 Feb 2023 is a month end: 30 Feb to 29 Aug, then 29 Aug to 29 Feb
        assert_abs_diff_eq!(taus[0], 179.0 / 360.0, epsilon = 1e-15);
        assert_abs_diff_eq!(taus[1], 180.0 / 360.0, epsilon = 1e-15);
    }

    #[test]
    fn annuity_sums_discounted_accruals() {
        let today = date(2020, 6, 1);
        let curve = FlatForward::new(today, 0.02, Compounding::Continuous, DayCount::Actual365Fixed);
        let leg = FixedLeg::new(
            today,
            date(2021, 6, 1),
            Frequency::Semiannual,
            DayCount::Actual360,
        )
        .unwrap();
        let expected: Real = leg
            .accruals()
            .map(|(pay, tau)| tau * (-0.02 * DayCount::Actual365Fixed.year_fraction(today, pay)).exp())
            .sum();
        assert_abs_diff_eq!(leg.annuity(&curve), expected, epsilon = 1e-15);
    }
}
