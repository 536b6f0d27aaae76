//! `YieldTermStructure`: discounting interface.
//!
//! Implementors provide the reference date, the day count that turns dates
//! into curve times, and [`discount_time`](YieldTermStructure::discount_time).
//! Zero rates, forward rates, fixed-leg annuities and forward swap rates are
//! derived from those three.

use crate::fixed_leg::FixedLeg;
use rk_core::errors::Result;
use rk_core::{DiscountFactor, Rate, Real, Time};
use rk_time::{Compounding, Date, DayCount, Frequency};

/// Time step used for the zero-rate limit at `t = 0`.
const ZERO_TIME_LIMIT: Time = 1.0e-6;

/// A yield (interest-rate) term structure.
pub trait YieldTermStructure: std::fmt::Debug + Send + Sync {
    /// The date at which every discount factor equals one.
    fn reference_date(&self) -> Date;

    /// Day count converting dates to curve times.
    fn day_count(&self) -> DayCount;

    /// Discount factor for curve time `t` (years from the reference date).
    fn discount_time(&self, t: Time) -> DiscountFactor;

    /// Continuously-compounded zero rate for curve time `t`.
    ///
    /// At `t = 0` the short-end limit is returned.
    fn zero_rate_time(&self, t: Time) -> Rate {
        let t = if t == 0.0 { ZERO_TIME_LIMIT } else { t };
        -self.discount_time(t).ln() / t
    }

    // ── Date-based interface ─────────────────────────────────────────────

    /// Curve time of `date`.
    fn time_from_reference(&self, date: Date) -> Time {
        self.day_count().year_fraction(self.reference_date(), date)
    }

    /// Discount factor for a date.
    fn discount(&self, date: Date) -> DiscountFactor {
        self.discount_time(self.time_from_reference(date))
    }

    /// Continuously-compounded zero rate to `date`.
    fn zero_rate(&self, date: Date) -> Rate {
        self.zero_rate_time(self.time_from_reference(date))
    }

    /// Zero rate to `date` under the given compounding convention.
    fn zero_rate_with(&self, date: Date, compounding: Compounding) -> Result<Rate> {
        let t = self.time_from_reference(date);
        if t == 0.0 {
            return Ok(self.zero_rate_time(0.0));
        }
        compounding.implied_rate(self.discount_time(t), t)
    }

    /// Simple forward rate between two dates, accrued under `day_count`.
    fn forward_rate(&self, d1: Date, d2: Date, day_count: DayCount) -> Result<Rate> {
        rk_core::ensure!(d1 < d2, "forward period {d1} to {d2} is empty");
        let tau = day_count.year_fraction(d1, d2);
        Ok((self.discount(d1) / self.discount(d2) - 1.0) / tau)
    }

    // ── Swap-rate interface ──────────────────────────────────────────────

    /// Fixed-leg annuity `Σ τ_i · P(t_i)` of a swap from `start` to
    /// `maturity`.
    fn annuity(
        &self,
        start: Date,
        maturity: Date,
        fixed_frequency: Frequency,
        fixed_day_count: DayCount,
    ) -> Result<Real> {
        Ok(FixedLeg::new(start, maturity, fixed_frequency, fixed_day_count)?.annuity(self))
    }

    /// Par rate of a swap from `start` to `maturity`:
    /// `(P(start) − P(end)) / annuity`.
    fn forward_swap_rate(
        &self,
        start: Date,
        maturity: Date,
        fixed_frequency: Frequency,
        fixed_day_count: DayCount,
    ) -> Result<Rate> {
        let leg = FixedLeg::new(start, maturity, fixed_frequency, fixed_day_count)?;
        Ok(leg.par_rate(self))
    }
}
