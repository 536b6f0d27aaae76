//! Black-Derman-Toy short-rate model.
//!
//! ```text
//! r(i, j) = exp(α_i + σ_i·(2j − i)·√dt)
//! ```
//!
//! A recombining binomial tree, with equal branch probabilities on a
//! uniform grid. The
//! short-rate volatility may be constant or a piecewise-constant term
//! structure; `σ_i` is its value at the time of layer `i`. Like
//! Black-Karasinski the rates are lognormal and strictly positive.
//!
//! When the steps after exercise are coarser than those before it, `dt`
//! above is the longest step and the shorter steps move up more often than
//! down; see [`Lattice::binomial_with_volatility`].

use rk_core::errors::Result;
use rk_core::{Size, Time, Volatility};
use rk_methods::{Lattice, TimeGrid};

use crate::short_rate::{ShortRateModel, DEFAULT_STEPS};

/// Short-rate volatility of a [`BlackDermanToy`] model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BdtVolatility {
    /// One volatility for every layer.
    Constant(Volatility),
    /// `vols[k]` applies to times in `(times[k-1], times[k]]`; the last
    /// value is held flat beyond `times[n-1]`.
    PiecewiseConstant {
        /// Right end of each interval, strictly increasing and positive.
        times: Vec<Time>,
        /// Volatility on each interval.
        vols: Vec<Volatility>,
    },
}

impl BdtVolatility {
    /// Volatility at time `t`.
    pub fn at(&self, t: Time) -> Volatility {
        match self {
            BdtVolatility::Constant(v) => *v,
            BdtVolatility::PiecewiseConstant { times, vols } => {
                // an empty structure yields zero, which the lattice rejects
                let k = times.partition_point(|&end| end < t);
                vols.get(k).or(vols.last()).copied().unwrap_or(0.0)
            }
        }
    }
}

/// Black-Derman-Toy short-rate model.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlackDermanToy {
    volatility: BdtVolatility,
    steps: Size,
}

impl BlackDermanToy {
    /// BDT model with a constant short-rate volatility `sigma > 0`.
    pub fn new(sigma: Volatility) -> Result<Self> {
        rk_core::ensure!(
            sigma > 0.0 && sigma.is_finite(),
            "Black-Derman-Toy volatility must be positive, got {sigma}"
        );
        Ok(Self {
            volatility: BdtVolatility::Constant(sigma),
            steps: DEFAULT_STEPS,
        })
    }

    /// BDT model with a piecewise-constant volatility term structure.
    pub fn with_term_structure(times: Vec<Time>, vols: Vec<Volatility>) -> Result<Self> {
        rk_core::ensure!(!vols.is_empty(), "volatility term structure is empty");
        rk_core::ensure!(
            times.len() == vols.len(),
            "{} volatility times for {} volatilities",
            times.len(),
            vols.len()
        );
        rk_core::ensure!(
            times.first().is_some_and(|&t| t > 0.0) && times.windows(2).all(|w| w[0] < w[1]),
            "volatility times must be positive and strictly increasing"
        );
        rk_core::ensure!(
            vols.iter().all(|&v| v > 0.0 && v.is_finite()),
            "Black-Derman-Toy volatilities must be positive, got {vols:?}"
        );
        Ok(Self {
            volatility: BdtVolatility::PiecewiseConstant { times, vols },
            steps: DEFAULT_STEPS,
        })
    }

    /// Same model with `steps` lattice steps to exercise.
    pub fn with_steps(mut self, steps: Size) -> Self {
        self.steps = steps;
        self
    }

    /// The short-rate volatility.
    pub fn volatility(&self) -> &BdtVolatility {
        &self.volatility
    }
}

impl ShortRateModel for BlackDermanToy {
    fn steps(&self) -> Size {
        self.steps
    }

    fn build_lattice(&self, grid: &TimeGrid) -> Result<Lattice> {
        Lattice::binomial_with_volatility(grid, |t| self.volatility.at(t))
    }

    fn name(&self) -> &'static str {
        "BlackDermanToy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::short_rate::price_swaption_on_lattice;
    use crate::BlackKarasinski;
    use approx::assert_abs_diff_eq;
    use rk_core::{LatticeSettings, Real, SolverSettings, SwapType};

    #[test]
    fn term_structure_lookup() {
        let vol = BdtVolatility::PiecewiseConstant {
            times: vec![1.0, 3.0],
            vols: vec![0.1, 0.2],
        };
        assert_eq!(vol.at(0.0), 0.1);
        assert_eq!(vol.at(1.0), 0.1);
        assert_eq!(vol.at(1.5), 0.2);
        assert_eq!(vol.at(3.0), 0.2);
        assert_eq!(vol.at(10.0), 0.2);
    }

    #[test]
    fn constant_volatility_is_close_to_black_karasinski_without_mean_reversion() {
        // same dynamics, binomial against trinomial discretisation
        let curve = |t: Time| (-0.045 * t).exp();
        let cf: Vec<(Time, Real)> = vec![(3.0, 0.045), (4.0, 0.045), (5.0, 1.045)];
        let (solver, limits) = (SolverSettings::default(), LatticeSettings::default());
        let bdt = BlackDermanToy::new(0.15).unwrap().with_steps(50);
        let bk = BlackKarasinski::new(0.0, 0.15).unwrap().with_steps(50);
        let a = price_swaption_on_lattice(&bdt, curve, 2.0, &cf, SwapType::Payer, &solver, &limits)
            .unwrap();
        let b = price_swaption_on_lattice(&bk, curve, 2.0, &cf, SwapType::Payer, &solver, &limits)
            .unwrap();
        assert_abs_diff_eq!(a, 0.011_17, epsilon = 1e-4);
        assert_abs_diff_eq!(a, b, epsilon = 1e-4);
    }

    #[test]
    fn term_structure_is_validated() {
        assert!(BlackDermanToy::new(0.0).unwrap_err().is_configuration());
        assert!(BlackDermanToy::with_term_structure(vec![], vec![])
            .unwrap_err()
            .is_configuration());
        assert!(BlackDermanToy::with_term_structure(vec![1.0], vec![0.1, 0.2])
            .unwrap_err()
            .is_configuration());
        assert!(BlackDermanToy::with_term_structure(vec![2.0, 1.0], vec![0.1, 0.2])
            .unwrap_err()
            .is_configuration());
        assert!(BlackDermanToy::with_term_structure(vec![1.0, 2.0], vec![0.1, -0.2])
            .unwrap_err()
            .is_configuration());
        let model = BlackDermanToy::with_term_structure(vec![1.0, 2.0], vec![0.1, 0.2]).unwrap();
        assert_eq!(model.volatility().at(1.5), 0.2);
    }
}
