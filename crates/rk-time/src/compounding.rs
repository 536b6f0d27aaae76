//! Interest compounding conventions.
//!
//! Converts between a quoted rate and the discount factor it implies over a
//! year fraction `t`, in both directions.

use crate::frequency::Frequency;
use rk_core::errors::{Error, Result};
use rk_core::{DiscountFactor, Rate, Time};

/// How a quoted rate accrues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compounding {
    /// Simple interest: `1 + r·t`.
    Simple,
    /// Discrete compounding: `(1 + r/m)^(m·t)`.
    Compounded(Frequency),
    /// Continuous compounding: `e^(r·t)`.
    #[default]
    Continuous,
}

impl Compounding {
    /// Discount factor implied by `rate` over `t` years.
    pub fn discount_factor(&self, rate: Rate, t: Time) -> Result<DiscountFactor> {
        let growth = match self {
            Compounding::Simple => 1.0 + rate * t,
            Compounding::Compounded(f) => {
                let m = f.per_year();
                let base = 1.0 + rate / m;
                if base <= 0.0 {
                    return Err(Error::Numerical(format!(
                        "rate {rate} is below -100% under {f} compounding"
                    )));
                }
                base.powf(m * t)
            }
            Compounding::Continuous => (rate * t).exp(),
        };
        if growth <= 0.0 || !growth.is_finite() {
            return Err(Error::Numerical(format!(
                "rate {rate} over {t} years gives non-positive growth {growth}"
            )));
        }
        Ok(1.0 / growth)
    }

    /// Rate implied by discount factor `df` over `t` years.
    ///
    /// At `t = 0` the rate is undefined; callers take the limit themselves.
    pub fn implied_rate(&self, df: DiscountFactor, t: Time) -> Result<Rate> {
        if df <= 0.0 || t == 0.0 {
            return Err(Error::Numerical(format!(
                "cannot imply a rate from discount factor {df} over {t} years"
            )));
        }
        Ok(match self {
            Compounding::Simple => (1.0 / df - 1.0) / t,
            Compounding::Compounded(f) => {
                let m = f.per_year();
                m * (df.powf(-1.0 / (m * t)) - 1.0)
            }
            Compounding::Continuous => -df.ln() / t,
        })
    }
}
