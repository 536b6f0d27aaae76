//! Black-Karasinski short-rate model.
//!
//! ```text
//! d ln(r) = (θ(t) − a·ln(r)) dt + σ dW
//! ```
//!
//! A lognormal short-rate model: rates stay positive by construction, so a
//! curve with a non-positive forward rate anywhere on the lattice horizon
//! cannot be fitted. There is no closed-form bond price; the model is
//! priced on the mean-reverting trinomial lattice of Hull-White with the
//! state read as `ln r`, which keeps every branch probability valid for
//! any mean reversion.

use rk_core::errors::Result;
use rk_core::{Real, Size, Volatility};
use rk_methods::{Lattice, TimeGrid};

use crate::short_rate::{ShortRateModel, DEFAULT_STEPS};

/// Black-Karasinski short-rate model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlackKarasinski {
    a: Real,
    sigma: Volatility,
    steps: Size,
}

impl BlackKarasinski {
    /// Black-Karasinski model with mean reversion `a ≥ 0` and volatility of
    /// `ln r` equal to `sigma > 0`.
    pub fn new(a: Real, sigma: Volatility) -> Result<Self> {
        rk_core::ensure!(
            a >= 0.0 && a.is_finite(),
            "Black-Karasinski mean reversion must be non-negative, got {a}"
        );
        rk_core::ensure!(
            sigma > 0.0 && sigma.is_finite(),
            "Black-Karasinski volatility must be positive, got {sigma}"
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

    /// Volatility of the log short rate.
    pub fn sigma(&self) -> Volatility {
        self.sigma
    }
}

impl ShortRateModel for BlackKarasinski {
    fn steps(&self) -> Size {
        self.steps
    }

    fn build_lattice(&self, grid: &TimeGrid) -> Result<Lattice> {
        Lattice::trinomial_lognormal(grid, self.a, self.sigma)
    }

    fn name(&self) -> &'static str {
        "BlackKarasinski"
    }
}
