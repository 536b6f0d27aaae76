//! `FlatForward`: a yield curve with one constant rate.
//!
//! The quoted rate is converted once, at construction, to the continuously
//! compounded rate with the same one-year growth; every discount factor is
//! then `exp(−r·t)`.

use crate::yield_term_structure::YieldTermStructure;
use rk_core::{DiscountFactor, Rate, Time};
use rk_time::{Compounding, Date, DayCount};

/// A flat (constant) forward-rate yield term structure.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatForward {
    reference_date: Date,
    day_count: DayCount,
    quoted: Rate,
    compounding: Compounding,
    /// Continuously-compounded equivalent of `quoted`.
    rate: Rate,
}

impl FlatForward {
    /// Create a flat curve quoting `rate` under `compounding`.
    pub fn new(
        reference_date: Date,
        rate: Rate,
        compounding: Compounding,
        day_count: DayCount,
    ) -> Self {
        let one_year_growth = match compounding {
            Compounding::Simple => 1.0 + rate,
            Compounding::Compounded(f) => (1.0 + rate / f.per_year()).powf(f.per_year()),
            Compounding::Continuous => rate.exp(),
        };
        Self {
            reference_date,
            day_count,
            quoted: rate,
            compounding,
            rate: one_year_growth.ln(),
        }
    }

    /// Flat curve with a continuously-compounded rate and Actual/365 Fixed
    /// time measure.
    pub fn continuous(reference_date: Date, rate: Rate) -> Self {
        Self::new(
            reference_date,
            rate,
            Compounding::Continuous,
            DayCount::Actual365Fixed,
        )
    }

    /// The rate as quoted.
    pub fn quoted_rate(&self) -> Rate {
        self.quoted
    }

    /// The quoting convention.
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// The continuously-compounded equivalent rate.
    pub fn continuous_rate(&self) -> Rate {
        self.rate
    }
}

impl YieldTermStructure for FlatForward {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn day_count(&self) -> DayCount {
        self.day_count
    }

    fn discount_time(&self, t: Time) -> DiscountFactor {
        (-self.rate * t).exp()
    }

    fn zero_rate_time(&self, _t: Time) -> Rate {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rk_time::Frequency;

    #[test]
    fn semiannual_quote_discounts_consistently() {
        let today = Date::from_ymd(2020, 1, 15).unwrap();
        let curve = FlatForward::new(
            today,
            0.05,
            Compounding::Compounded(Frequency::Semiannual),
            DayCount::Actual365Fixed,
        );
        assert_abs_diff_eq!(curve.discount_time(2.0), 1.025f64.powi(-4), epsilon = 1e-15);
        let back = curve
            .zero_rate_with(
                Date::from_ymd(2025, 1, 15).unwrap(),
                Compounding::Compounded(Frequency::Semiannual),
            )
            .unwrap();
        assert_abs_diff_eq!(back, 0.05, epsilon = 1e-13);
    }

    #[test]
    fn zero_rate_is_flat() {
        let curve = FlatForward::continuous(Date::from_ymd(2020, 1, 15).unwrap(), 0.06);
        assert_abs_diff_eq!(curve.zero_rate_time(0.0), 0.06);
        assert_abs_diff_eq!(curve.zero_rate_time(7.3), 0.06);
        assert_abs_diff_eq!(curve.discount(curve.reference_date()), 1.0);
    }
}
