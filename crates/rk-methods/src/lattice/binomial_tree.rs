//! Binomial geometry for lognormal short-rate models.
//!
//! Node `(i, j)`, `0 ≤ j ≤ i`, sits at `x = (2j − i)·σ_i·√Δ` and branches to
//! `(i + 1, j)` (down) and `(i + 1, j + 1)` (up), so the tree recombines
//! and layer `i` holds `i + 1` nodes. `Δ` is the longest step of the grid.
//!
//! On a uniform grid both branches carry probability ½. A step shorter
//! than `Δ` moves up with probability `p = ½·(1 + √(1 − dt/Δ))`, which
//! gives the move the variance `σ²·dt`; its mean shift is the same for every
//! node of the layer and is absorbed by the fitted drift.

use super::short_rate_tree::{Branching, Lattice, Layer, Node, RateMapping};
use super::TimeGrid;
use rk_core::errors::Result;
use rk_core::{Real, Time, Volatility};
use tracing::debug;

/// Relative shortfall below which a step counts as a longest step.
const EQUAL_STEP_TOLERANCE: Real = 1.0e-9;

impl Lattice {
    /// Binomial lattice whose spacing on layer `i` follows the short-rate
    /// volatility `vol(t_i)`. Short rates are `exp(α_i + σ_i·(2j − i)·√Δ)`.
    pub fn binomial_with_volatility<V>(grid: &TimeGrid, vol: V) -> Result<Self>
    where
        V: Fn(Time) -> Volatility,
    {
        let longest = grid.max_dt();
        let sqrt_longest = longest.sqrt();
        let steps = grid.steps();
        let mut layers = Vec::with_capacity(steps + 1);
        for i in 0..=steps {
            let t = grid.time(i);
            let sigma = vol(t);
            rk_core::ensure!(
                sigma > 0.0 && sigma.is_finite(),
                "short-rate volatility at t = {t} must be positive, got {sigma}"
            );
            let step = sigma * sqrt_longest;
            let states = (0..=i).map(|j| (2.0 * j as Real - i as Real) * step);
            let layer = if i < steps {
                let dt = grid.dt(i);
                let shortfall = 1.0 - dt / longest;
                let up = if shortfall < EQUAL_STEP_TOLERANCE {
                    0.5
                } else {
                    0.5 * (1.0 + shortfall.sqrt())
                };
                let nodes = states
                    .enumerate()
                    .map(|(j, x)| Node::new(x, j, [1.0 - up, up, 0.0]))
                    .collect();
                Layer::new(t, dt, nodes)
            } else {
                Layer::new(t, 0.0, states.map(Node::terminal).collect())
            };
            layers.push(layer);
        }
        debug!(steps, longest, "binomial lattice built");
        Lattice::from_layers(Branching::Binomial, RateMapping::Exponential, layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rk_core::{LatticeSettings, SolverSettings};

    #[test]
    fn uniform_grid_has_equal_probabilities() {
        let grid = TimeGrid::uniform(4.0, 80).unwrap();
        let mut lattice = Lattice::binomial_with_volatility(&grid, |_| 0.2).unwrap();
        let curve = |t: Real| (-0.04 * t).exp();
        lattice.calibrate(curve, &SolverSettings::default()).unwrap();
        for i in 0..lattice.layer_count() {
            assert_eq!(lattice.layer(i).size(), i + 1);
            assert_abs_diff_eq!(lattice.implied_discount(i), curve(grid.time(i)), epsilon = 1e-12);
        }
        for layer in &lattice.layers()[..80] {
            assert!(layer.nodes().iter().all(|n| n.rate() > 0.0));
            assert!(layer.nodes().iter().all(|n| n.probabilities()[..2] == [0.5, 0.5]));
        }
    }

    #[test]
    fn volatility_term_structure_sets_layer_spacing() {
        let grid = TimeGrid::uniform(2.0, 4).unwrap();
        let vol = |t: Time| if t < 1.0 { 0.1 } else { 0.3 };
        let lattice = Lattice::binomial_with_volatility(&grid, vol).unwrap();
        let spacing = |i: usize| {
            let nodes = lattice.layer(i).nodes();
            nodes[1].state() - nodes[0].state()
        };
        assert_abs_diff_eq!(spacing(1), 2.0 * 0.1 * 0.5f64.sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(spacing(3), 2.0 * 0.3 * 0.5f64.sqrt(), epsilon = 1e-15);
        assert!(Lattice::binomial_with_volatility(&grid, |_| -0.1)
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn short_steps_keep_their_variance() {
        let grid = TimeGrid::for_exercise(0.5, 10, 10.5, &LatticeSettings::default()).unwrap();
        let sigma = 0.2;
        let mut lattice = Lattice::binomial_with_volatility(&grid, |_| sigma).unwrap();
        for i in [0, 5, 10, 15] {
            let layer = lattice.layer(i);
            let node = &layer.nodes()[0];
            let [down, up, _] = node.probabilities();
            assert_abs_diff_eq!(down + up, 1.0, epsilon = 1e-15);
            // children sit 2·σ·√Δ apart
            let width = 2.0 * sigma * grid.max_dt().sqrt();
            assert_abs_diff_eq!(up * down * width * width, sigma * sigma * layer.dt(), epsilon = 1e-14);
        }
        assert!(lattice.layer(3).nodes()[0].probabilities()[1] > 0.9);
        let curve = |t: Real| (-0.03 * t).exp();
        lattice.calibrate(curve, &SolverSettings::default()).unwrap();
        for i in 0..lattice.layer_count() {
            assert_abs_diff_eq!(lattice.implied_discount(i), curve(grid.time(i)), epsilon = 1e-12);
        }
    }

    #[test]
    fn negative_forward_rates_cannot_be_fitted() {
        let grid = TimeGrid::uniform(2.0, 20).unwrap();
        let mut lattice = Lattice::binomial_with_volatility(&grid, |_| 0.2).unwrap();
        let err = lattice
            .calibrate(|t| (0.01 * t).exp(), &SolverSettings::default())
            .unwrap_err();
        assert!(err.is_numerical());
    }
}
