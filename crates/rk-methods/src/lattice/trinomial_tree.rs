//! Trinomial geometry for a mean-reverting Gaussian state.
//!
//! The state follows `dx = −a·x·dt + σ dW` with `x(0) = 0`. Over step `i`
//! its conditional variance is `v_i² = σ²(1 − e^{−2a·dt_i}) / (2a)` (or
//! `σ²·dt_i` without mean reversion) and the nodes of layer `i + 1` are
//! spaced `Δx_{i+1} = v_i·√3` apart, so the spacing follows the grid when
//! its steps change length. A node at `x` branches around
//! `k = round(E[x] / Δx_{i+1})` with `e = E[x] − k·Δx_{i+1}`:
//!
//! ```text
//! p_d = (1 + e²/v² − √3·e/v) / 6
//! p_m = (2 − e²/v²) / 3
//! p_u = (1 + e²/v² + √3·e/v) / 6
//! ```
//!
//! Since `|e| ≤ Δx/2` every probability stays in `[0, 1]` whatever the
//! mean reversion. Mean reversion pulls the outer branches inward, so the
//! width of the tree stops growing once `|x|·(1 − e^{−a·dt})` exceeds half
//! a spacing.

use super::short_rate_tree::{Branching, Lattice, Layer, Node, RateMapping};
use super::TimeGrid;
use rk_core::errors::Result;
use rk_core::{Real, Time, Volatility};
use tracing::debug;

/// Mean reversion below which the variance uses the `a → 0` limit.
const MIN_MEAN_REVERSION: Real = 1.0e-12;

impl Lattice {
    /// Trinomial lattice for an Ornstein-Uhlenbeck state with mean reversion
    /// `a` and volatility `sigma`. Short rates are `α_i + x`.
    pub fn trinomial(grid: &TimeGrid, a: Real, sigma: Volatility) -> Result<Self> {
        let layers = ornstein_uhlenbeck_layers(grid, a, sigma)?;
        Lattice::from_layers(Branching::Trinomial, RateMapping::Additive, layers)
    }

    /// Trinomial lattice whose state is the log short rate: the same
    /// geometry as [`trinomial`](Self::trinomial), with short rates
    /// `exp(α_i + x)`.
    pub fn trinomial_lognormal(grid: &TimeGrid, a: Real, sigma: Volatility) -> Result<Self> {
        let layers = ornstein_uhlenbeck_layers(grid, a, sigma)?;
        Lattice::from_layers(Branching::Trinomial, RateMapping::Exponential, layers)
    }
}

fn step_variance(a: Real, sigma: Volatility, dt: Time) -> Real {
    if a.abs() < MIN_MEAN_REVERSION {
        sigma * sigma * dt
    } else {
        sigma * sigma * (1.0 - (-2.0 * a * dt).exp()) / (2.0 * a)
    }
}

fn ornstein_uhlenbeck_layers(grid: &TimeGrid, a: Real, sigma: Volatility) -> Result<Vec<Layer>> {
    rk_core::ensure!(a.is_finite(), "mean reversion must be finite, got {a}");
    rk_core::ensure!(
        sigma > 0.0 && sigma.is_finite(),
        "trinomial lattice volatility must be positive, got {sigma}"
    );
    let sqrt3 = 3.0_f64.sqrt();
    let steps = grid.steps();
    let mut layers = Vec::with_capacity(steps + 1);
    let (mut j_min, mut j_max) = (0_i64, 0_i64);
    let mut dx = 0.0;
    for i in 0..steps {
        let dt = grid.dt(i);
        let variance = step_variance(a, sigma, dt);
        let v = variance.sqrt();
        let next_dx = v * sqrt3;
        let decay = (-a * dt).exp();

        let mut branches = Vec::with_capacity((j_max - j_min + 1) as usize);
        let (mut lo, mut hi) = (i64::MAX, i64::MIN);
        for j in j_min..=j_max {
            let x = j as Real * dx;
            let expected = x * decay;
            let k = (expected / next_dx).round() as i64;
            let e = expected - k as Real * next_dx;
            let ratio2 = e * e / variance;
            let skew = sqrt3 * e / v;
            let probs = [
                (1.0 + ratio2 - skew) / 6.0,
                (2.0 - ratio2) / 3.0,
                (1.0 + ratio2 + skew) / 6.0,
            ];
            branches.push((x, k, probs));
            lo = lo.min(k - 1);
            hi = hi.max(k + 1);
        }
        let nodes = branches
            .into_iter()
            .map(|(x, k, probs)| Node::new(x, (k - 1 - lo) as usize, probs))
            .collect();
        layers.push(Layer::new(grid.time(i), dt, nodes));
        j_min = lo;
        j_max = hi;
        dx = next_dx;
    }
    let terminal = (j_min..=j_max)
        .map(|j| Node::terminal(j as Real * dx))
        .collect();
    layers.push(Layer::new(grid.time(steps), 0.0, terminal));

    debug!(steps, a, sigma, width = j_max - j_min + 1, "trinomial lattice built");
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use rk_core::SolverSettings;

    fn flat(rate: Real) -> impl Fn(Real) -> Real {
        move |t| (-rate * t).exp()
    }

    #[test]
    fn without_mean_reversion_the_tree_widens_by_two_per_step() {
        let grid = TimeGrid::uniform(2.0, 20).unwrap();
        let lattice = Lattice::trinomial(&grid, 0.0, 0.01).unwrap();
        assert_eq!(lattice.layer_count(), 21);
        for i in 0..=20 {
            assert_eq!(lattice.layer(i).size(), 2 * i + 1);
        }
        let root = &lattice.layer(0).nodes()[0];
        assert_abs_diff_eq!(root.probabilities()[0], 1.0 / 6.0, epsilon = 1e-15);
        assert_abs_diff_eq!(root.probabilities()[1], 2.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn mean_reversion_bounds_the_width() {
        let grid = TimeGrid::uniform(20.0, 200).unwrap();
        let lattice = Lattice::trinomial(&grid, 0.1, 0.01).unwrap();
        assert!(lattice.layer(200).size() < 401);
        assert_eq!(lattice.layer(200).size(), lattice.layer(150).size());
        for layer in &lattice.layers()[..200] {
            for node in layer.nodes() {
                let p = node.probabilities();
                assert!(p.iter().all(|&x| (0.0..=1.0).contains(&x)));
                assert_abs_diff_eq!(p.iter().sum::<Real>(), 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn calibrated_tree_reprices_the_curve() {
        let grid = TimeGrid::uniform(5.0, 50).unwrap();
        let mut lattice = Lattice::trinomial(&grid, 0.05, 0.01).unwrap();
        let curve = flat(0.03);
        lattice.calibrate(&curve, &SolverSettings::default()).unwrap();
        assert!(lattice.is_calibrated());
        for i in 0..lattice.layer_count() {
            assert_abs_diff_eq!(lattice.implied_discount(i), curve(grid.time(i)), epsilon = 1e-13);
        }
        let ones = vec![1.0; lattice.layer(50).size()];
        let pv = lattice.roll_back(&ones, 50, 0).unwrap();
        assert_eq!(pv.len(), 1);
        assert_abs_diff_eq!(pv[0], curve(5.0), epsilon = 1e-13);
    }

    #[test]
    fn negative_rates_are_fitted() {
        let grid = TimeGrid::uniform(3.0, 30).unwrap();
        let mut lattice = Lattice::trinomial(&grid, 0.02, 0.008).unwrap();
        let curve = flat(-0.005);
        lattice.calibrate(&curve, &SolverSettings::default()).unwrap();
        assert_abs_diff_eq!(lattice.implied_discount(30), curve(3.0), epsilon = 1e-13);
        assert!(lattice.layer(0).drift().unwrap() < 0.0);
    }

    #[test]
    fn roll_back_needs_calibration_and_matching_sizes() {
        let grid = TimeGrid::uniform(1.0, 4).unwrap();
        let mut lattice = Lattice::trinomial(&grid, 0.1, 0.01).unwrap();
        let ones = vec![1.0; lattice.layer(4).size()];
        assert!(lattice.roll_back(&ones, 4, 0).unwrap_err().is_configuration());
        lattice
            .calibrate(flat(0.02), &SolverSettings::default())
            .unwrap();
        assert!(lattice.roll_back(&ones[1..], 4, 0).unwrap_err().is_configuration());
        assert!(lattice.roll_back(&ones, 4, 5).unwrap_err().is_configuration());
        assert!(Lattice::trinomial(&grid, 0.1, 0.0).unwrap_err().is_configuration());
    }

    #[test]
    fn spacing_follows_a_coarser_tail() {
        let limits = rk_core::LatticeSettings::default();
        let grid = TimeGrid::for_exercise(0.5, 10, 10.5, &limits).unwrap();
        let mut lattice = Lattice::trinomial(&grid, 0.05, 0.01).unwrap();
        let spacing = |i: usize| {
            let nodes = lattice.layer(i).nodes();
            nodes[1].state() - nodes[0].state()
        };
        assert_abs_diff_eq!(spacing(10), 0.01 * (3.0 * 0.05_f64).sqrt(), epsilon = 1e-5);
        assert!(spacing(11) > 4.0 * spacing(10));
        for layer in &lattice.layers()[..20] {
            for node in layer.nodes() {
                assert!(node.probabilities().iter().all(|&p| (0.0..=1.0).contains(&p)));
            }
        }
        let curve = flat(0.03);
        lattice.calibrate(&curve, &SolverSettings::default()).unwrap();
        for i in 0..lattice.layer_count() {
            assert_abs_diff_eq!(lattice.implied_discount(i), curve(grid.time(i)), epsilon = 1e-13);
        }
    }

    #[test]
    fn lognormal_tree_keeps_valid_probabilities_under_strong_mean_reversion() {
        // a·t = 4.5 at the last layer
        let grid = TimeGrid::uniform(15.0, 300).unwrap();
        let mut lattice = Lattice::trinomial_lognormal(&grid, 0.3, 0.2).unwrap();
        assert_eq!(lattice.mapping(), RateMapping::Exponential);
        let curve = flat(0.03);
        lattice.calibrate(&curve, &SolverSettings::default()).unwrap();
        for i in 0..lattice.layer_count() {
            assert_abs_diff_eq!(lattice.implied_discount(i), curve(grid.time(i)), epsilon = 1e-12);
        }
        for layer in &lattice.layers()[..300] {
            assert!(layer.nodes().iter().all(|n| n.rate() > 0.0));
        }
        assert_eq!(lattice.layer(300).size(), lattice.layer(200).size());
    }

    #[test]
    fn lognormal_tree_rejects_negative_forward_rates() {
        let grid = TimeGrid::uniform(2.0, 20).unwrap();
        let mut lattice = Lattice::trinomial_lognormal(&grid, 0.1, 0.2).unwrap();
        let err = lattice
            .calibrate(|t| (0.01 * t).exp(), &SolverSettings::default())
            .unwrap_err();
        assert!(err.is_numerical());
    }

    proptest! {
        #[test]
        fn any_flat_curve_is_repriced(
            a in 0.0f64..0.3,
            sigma in 0.001f64..0.03,
            rate in -0.02f64..0.08,
        ) {
            let grid = TimeGrid::uniform(3.0, 30).unwrap();
            let mut lattice = Lattice::trinomial(&grid, a, sigma).unwrap();
            let curve = flat(rate);
            lattice.calibrate(&curve, &SolverSettings::default()).unwrap();
            for i in 0..lattice.layer_count() {
                prop_assert!((lattice.implied_discount(i) - curve(grid.time(i))).abs() < 1e-12);
            }
        }
    }
}
