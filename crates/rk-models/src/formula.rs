//! Closed-form swaption pricing interface.

use rk_core::errors::Result;
use rk_core::{Price, Rate, Real, SwapType, Time};

/// A model that values a European swaption from market-implied inputs.
///
/// `annuity` is the present value, at the valuation date, of one unit of
/// fixed-leg accrual; the result is per unit notional.
pub trait SwaptionFormula {
    /// Swaption value per unit notional.
    ///
    /// `time` is the year fraction from valuation to exercise; at or below
    /// zero the intrinsic value `annuity · max(w·(F − K), 0)` is returned.
    fn price(
        &self,
        forward: Rate,
        strike: Rate,
        time: Time,
        annuity: Real,
        swap_type: SwapType,
    ) -> Result<Price>;

    /// Short human-readable model name, used in log records.
    fn name(&self) -> &'static str;
}
