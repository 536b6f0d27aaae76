//! Hull-White (extended Vasicek) short-rate model.
//!
//! ```text
//! dr = (θ(t) − a·r) dt + σ dW
//! ```
//!
//! Written as `r(t) = α(t) + x(t)` with `dx = −a·x·dt + σ dW`, `x(0) = 0`.
//! The state is discretised on a trinomial lattice and `α(t)` is fitted
//! layer by layer to the discount curve, so the initial term structure is
//! reproduced exactly. Short rates are Gaussian and may turn negative.

use rk_core::errors::Result;
use rk_core::{Real, Size, Volatility};
use rk_methods::{Lattice, TimeGrid};

use crate::short_rate::{ShortRateModel, DEFAULT_STEPS};

/// Hull-White one-factor model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HullWhite {
    a: Real,
    sigma: Volatility,
    steps: Size,
}

impl HullWhite {
    /// Hull-White model with mean reversion `a ≥ 0` and normal short-rate
    /// volatility `sigma > 0`, on [`DEFAULT_STEPS`] steps to exercise.
    pub fn new(a: Real, sigma: Volatility) -> Result<Self> {
        rk_core::ensure!(
            a >= 0.0 && a.is_finite(),
            "Hull-White mean reversion must be non-negative, got {a}"
        );
        rk_core::ensure!(
            sigma > 0.0 && sigma.is_finite(),
            "Hull-White volatility must be positive, got {sigma}"
        );
        Ok(Self {
            a,
            sigma,
            steps: DEFAULT_STEPS,
        })
    }

    /// Same model with `steps` lattice steps to exercise.
    pub fn with_steps(mut self, steps: Size) -> Self {
        self.steps = steps;
        self
    }

    /// Mean-reversion speed.
    pub fn a(&self) -> Real {
        self.a
    }

    /// Short-rate volatility.
    pub fn sigma(&self) -> Volatility {
        self.sigma
    }
}

impl ShortRateModel for HullWhite {
    fn steps(&self) -> Size {
        self.steps
    }

    fn build_lattice(&self, grid: &TimeGrid) -> Result<Lattice> {
        Lattice::trinomial(grid, self.a, self.sigma)
    }

    fn name(&self) -> &'static str {
        "HullWhite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::short_rate::price_swaption_on_lattice;
    use approx::assert_abs_diff_eq;
    use rk_core::{LatticeSettings, SolverSettings, SwapType, Time};

    fn value(model: &HullWhite, swap_type: SwapType, strike: Real) -> Real {
        let curve = |t: Time| (-0.04 * t).exp();
        let flows: Vec<(Time, Real)> = (1..=4)
            .map(|i| (1.0 + i as Time, strike + if i == 4 { 1.0 } else { 0.0 }))
            .collect();
        price_swaption_on_lattice(
            model,
            curve,
            1.0,
            &flows,
            swap_type,
            &SolverSettings::default(),
            &LatticeSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn vanishing_volatility_gives_the_intrinsic_value() {
        let model = HullWhite::new(0.0, 1e-9).unwrap();
        let curve = |t: Time| (-0.04 * t).exp();
        let strike = 0.03;
        let bond: Real = (1..=4).map(|i| strike * curve(1.0 + i as Time)).sum::<Real>() + curve(5.0);
        let intrinsic = curve(1.0) - bond;
        assert_abs_diff_eq!(value(&model, SwapType::Payer, strike), intrinsic, epsilon = 1e-10);
        assert_abs_diff_eq!(value(&model, SwapType::Receiver, strike), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn more_volatility_is_worth_more() {
        let low = HullWhite::new(0.05, 0.005).unwrap();
        let high = HullWhite::new(0.05, 0.015).unwrap();
        for swap_type in [SwapType::Payer, SwapType::Receiver] {
            assert!(value(&high, swap_type, 0.04) > value(&low, swap_type, 0.04));
        }
    }

    #[test]
    fn mean_reversion_dampens_the_value() {
        let slow = HullWhite::new(0.0, 0.01).unwrap();
        let fast = HullWhite::new(0.3, 0.01).unwrap();
        assert!(value(&fast, SwapType::Payer, 0.04) < value(&slow, SwapType::Payer, 0.04));
    }

    #[test]
    fn parameters_are_validated() {
        assert!(HullWhite::new(-0.1, 0.01).unwrap_err().is_configuration());
        assert!(HullWhite::new(0.1, 0.0).unwrap_err().is_configuration());
        assert_eq!(HullWhite::new(0.1, 0.01).unwrap().steps(), DEFAULT_STEPS);
        assert_eq!(HullWhite::new(0.1, 0.01).unwrap().with_steps(40).steps(), 40);
    }
}
