//! `DiscountCurve`: an interpolated discount curve on pillar dates.
//!
//! The curve stores `(time, discount factor)` pillars, the first of which is
//! always `(0, 1)` at the reference date. Between pillars it follows an
//! [`InterpolationPolicy`]:
//!
//! * **FlatForward**: `ln P` linear in time, i.e. a constant instantaneous
//!   forward rate on every segment.
//! * **LinearZeroRate**: the continuously-compounded zero rate linear in
//!   time; on the first segment `(0, t₁]` the zero rate is flat at `z(t₁)`.
//!
//! Both policies agree on the first segment. Extrapolation:
//!
//! * beyond the last pillar, FlatForward continues the forward rate of the
//!   last segment and LinearZeroRate holds the last zero rate;
//! * before the reference date (negative times) the first-segment rule
//!   applies.

use crate::yield_term_structure::YieldTermStructure;
use rk_core::errors::Result;
use rk_core::{DiscountFactor, Rate, Time};
use rk_time::{Compounding, Date, DayCount};

/// How discount factors are interpolated between pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationPolicy {
    /// Piecewise-constant instantaneous forward rates.
    FlatForward,
    /// Piecewise-linear continuously-compounded zero rates.
    #[default]
    LinearZeroRate,
}

impl std::fmt::Display for InterpolationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationPolicy::FlatForward => write!(f, "flat forward"),
            InterpolationPolicy::LinearZeroRate => write!(f, "linear zero rate"),
        }
    }
}

/// An immutable interpolated discount curve.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountCurve {
    reference_date: Date,
    day_count: DayCount,
    policy: InterpolationPolicy,
    dates: Vec<Date>,
    times: Vec<Time>,
    discounts: Vec<DiscountFactor>,
    /// Continuously-compounded zero rate at each pillar; entry 0 holds the
    /// short-end limit `z(t₁)`.
    zeros: Vec<Rate>,
}

impl DiscountCurve {
    /// Build a curve from discount factors on dates after `reference_date`.
    ///
    /// Dates must be strictly increasing and discount factors strictly
    /// positive. A leading entry on the reference date itself is accepted
    /// only with a discount factor of one.
    pub fn from_discount_factors(
        reference_date: Date,
        dates: &[Date],
        discounts: &[DiscountFactor],
        day_count: DayCount,
        policy: InterpolationPolicy,
    ) -> Result<Self> {
        rk_core::ensure!(
            dates.len() == discounts.len(),
            "{} dates but {} discount factors",
            dates.len(),
            discounts.len()
        );
        let mut curve = Self::anchor(reference_date, day_count, policy);
        for (&date, &df) in dates.iter().zip(discounts) {
            if date == reference_date {
                rk_core::ensure!(
                    (df - 1.0).abs() < 1e-15 && curve.dates.len() == 1,
                    "discount factor on the reference date must be 1, got {df}"
                );
                continue;
            }
            curve.push_pillar(date, df)?;
        }
        rk_core::ensure!(
            curve.dates.len() > 1,
            "a discount curve needs at least one pillar after {reference_date}"
        );
        Ok(curve)
    }

    /// Build a curve from zero rates quoted under `compounding`.
    pub fn from_zero_rates(
        reference_date: Date,
        dates: &[Date],
        rates: &[Rate],
        compounding: Compounding,
        day_count: DayCount,
        policy: InterpolationPolicy,
    ) -> Result<Self> {
        rk_core::ensure!(
            dates.len() == rates.len(),
            "{} dates but {} zero rates",
            dates.len(),
            rates.len()
        );
        let discounts = dates
            .iter()
            .zip(rates)
            .map(|(&d, &r)| {
                let t = day_count.year_fraction(reference_date, d);
                compounding.discount_factor(r, t)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_discount_factors(reference_date, dates, &discounts, day_count, policy)
    }

    /// A curve holding only the `(reference date, 1)` anchor. Used by the
    /// bootstrapper, which appends pillars one at a time.
    pub(crate) fn anchor(
        reference_date: Date,
        day_count: DayCount,
        policy: InterpolationPolicy,
    ) -> Self {
        Self {
            reference_date,
            day_count,
            policy,
            dates: vec![reference_date],
            times: vec![0.0],
            discounts: vec![1.0],
            zeros: vec![0.0],
        }
    }

    /// Append a pillar after the last one.
    pub(crate) fn push_pillar(&mut self, date: Date, df: DiscountFactor) -> Result<()> {
        let last = self.last_date();
        rk_core::ensure!(
            date > last,
            "pillar {date} is not after the previous pillar {last}"
        );
        rk_core::ensure!(
            df > 0.0 && df.is_finite(),
            "discount factor at {date} must be positive, got {df}"
        );
        let t = self.day_count.year_fraction(self.reference_date, date);
        rk_core::ensure!(t > 0.0, "pillar {date} has non-positive curve time {t}");
        let z = -df.ln() / t;
        self.dates.push(date);
        self.times.push(t);
        self.discounts.push(df);
        self.zeros.push(z);
        if self.dates.len() == 2 {
            self.zeros[0] = z;
        }
        Ok(())
    }

    /// Replace the discount factor of the last pillar.
    pub(crate) fn set_last_discount(&mut self, df: DiscountFactor) {
        let n = self.dates.len() - 1;
        let z = -df.ln() / self.times[n];
        self.discounts[n] = df;
        self.zeros[n] = z;
        if n == 1 {
            self.zeros[0] = z;
        }
    }

    // ── Inspectors ───────────────────────────────────────────────────────

    /// Interpolation policy.
    pub fn policy(&self) -> InterpolationPolicy {
        self.policy
    }

    /// Pillar dates, reference date first.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Pillar times, `0` first.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Pillar discount factors, `1` first.
    pub fn discount_factors(&self) -> &[DiscountFactor] {
        &self.discounts
    }

    /// `(date, discount factor)` pairs, reference date first.
    pub fn pillars(&self) -> impl Iterator<Item = (Date, DiscountFactor)> + '_ {
        self.dates.iter().copied().zip(self.discounts.iter().copied())
    }

    /// Last pillar date.
    pub fn last_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    // ── Interpolation ────────────────────────────────────────────────────

    fn log_discount(&self, t: Time) -> Rate {
        let n = self.times.len() - 1;
        if n == 0 {
            return 0.0;
        }
        if t <= self.times[1] {
            return -self.zeros[1] * t;
        }
        if t > self.times[n] {
            return match self.policy {
                InterpolationPolicy::FlatForward => {
                    let fwd = (self.discounts[n - 1].ln() - self.discounts[n].ln())
                        / (self.times[n] - self.times[n - 1]);
                    self.discounts[n].ln() - fwd * (t - self.times[n])
                }
                InterpolationPolicy::LinearZeroRate => -self.zeros[n] * t,
            };
        }
        // t lies in (times[i-1], times[i]] with i >= 2
        let i = self.times.partition_point(|&x| x < t);
        let (t0, t1) = (self.times[i - 1], self.times[i]);
        let w = (t - t0) / (t1 - t0);
        match self.policy {
            InterpolationPolicy::FlatForward => {
                (1.0 - w) * self.discounts[i - 1].ln() + w * self.discounts[i].ln()
            }
            InterpolationPolicy::LinearZeroRate => {
                -((1.0 - w) * self.zeros[i - 1] + w * self.zeros[i]) * t
            }
        }
    }
}

impl YieldTermStructure for DiscountCurve {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCount {
        self.day_count
    }

    fn discount_time(&self, t: Time) -> DiscountFactor {
        self.log_discount(t).exp()
    }

    fn zero_rate_time(&self, t: Time) -> Rate {
        if t == 0.0 {
            return self.zeros[0];
        }
        -self.log_discount(t) / t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn sample(policy: InterpolationPolicy) -> DiscountCurve {
        let today = date(2020, 1, 1);
        DiscountCurve::from_zero_rates(
            today,
            &[date(2021, 1, 1), date(2022, 1, 1), date(2025, 1, 1)],
            &[0.01, 0.02, 0.03],
            Compounding::Continuous,
            DayCount::Actual365Fixed,
            policy,
        )
        .unwrap()
    }

    #[test]
    fn pillars_are_reproduced_exactly() {
        for policy in [InterpolationPolicy::FlatForward, InterpolationPolicy::LinearZeroRate] {
            let c = sample(policy);
            for (d, df) in c.pillars() {
                assert_abs_diff_eq!(c.discount(d), df, epsilon = 1e-15);
            }
            assert_eq!(c.discount(c.reference_date()), 1.0);
        }
    }

    #[test]
    fn linear_zero_interpolates_rates() {
        let c = sample(InterpolationPolicy::LinearZeroRate);
        let (t1, t2) = (c.times()[1], c.times()[2]);
        let t = 0.5 * (t1 + t2);
        assert_abs_diff_eq!(c.zero_rate_time(t), 0.015, epsilon = 1e-14);
        // flat short end and flat long end
        assert_abs_diff_eq!(c.zero_rate_time(0.0), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(c.zero_rate_time(0.3), 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(c.zero_rate_time(40.0), 0.03, epsilon = 1e-15);
    }

    #[test]
    fn flat_forward_keeps_segment_forward_constant() {
        let c = sample(InterpolationPolicy::FlatForward);
        let (t1, t2) = (c.times()[1], c.times()[2]);
        let fwd = |a: f64, b: f64| (c.discount_time(a) / c.discount_time(b)).ln() / (b - a);
        let expected = fwd(t1, t2);
        assert_abs_diff_eq!(fwd(t1, t1 + 0.1), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(fwd(t2 - 0.2, t2), expected, epsilon = 1e-12);

        // extrapolation continues the last segment's forward
        let n = c.times().len() - 1;
        let last = fwd(c.times()[n - 1], c.times()[n]);
        assert_abs_diff_eq!(fwd(c.times()[n], 30.0), last, epsilon = 1e-12);
    }

    #[test]
    fn negative_times_use_the_first_segment() {
        for policy in [InterpolationPolicy::FlatForward, InterpolationPolicy::LinearZeroRate] {
            let c = sample(policy);
            assert_abs_diff_eq!(c.discount_time(-0.5), (0.01f64 * 0.5).exp(), epsilon = 1e-15);
        }
    }

    #[test]
    fn rejects_bad_pillars() {
        let today = date(2020, 1, 1);
        let bad = DiscountCurve::from_discount_factors(
            today,
            &[date(2021, 1, 1), date(2021, 1, 1)],
            &[0.99, 0.98],
            DayCount::Actual365Fixed,
            InterpolationPolicy::LinearZeroRate,
        );
        assert!(bad.unwrap_err().is_configuration());
        let bad = DiscountCurve::from_discount_factors(
            today,
            &[date(2021, 1, 1)],
            &[-0.5],
            DayCount::Actual365Fixed,
            InterpolationPolicy::LinearZeroRate,
        );
        assert!(bad.unwrap_err().is_configuration());
        let bad = DiscountCurve::from_discount_factors(
            today,
            &[],
            &[],
            DayCount::Actual365Fixed,
            InterpolationPolicy::LinearZeroRate,
        );
        assert!(bad.unwrap_err().is_configuration());
    }
}
