//! One-factor short-rate models priced on recombining lattices.
//!
//! A model only decides the lattice geometry; fitting it to the discount
//! curve and rolling the swaption back are shared by every model and live
//! in [`price_swaption_on_lattice`].

use rk_core::errors::Result;
use rk_core::{DiscountFactor, LatticeSettings, Price, Real, Size, SolverSettings, SwapType, Time};
use rk_methods::{Lattice, TimeGrid};
use tracing::debug;

/// Time steps between valuation and exercise unless a model says otherwise.
pub const DEFAULT_STEPS: Size = 100;

/// Exercise times below this are treated as immediate exercise.
const IMMEDIATE_EXERCISE: Time = 1.0e-12;

/// A one-factor short-rate model that can lay out a lattice.
pub trait ShortRateModel {
    /// Lattice steps from the root to the exercise layer.
    fn steps(&self) -> Size;

    /// Uncalibrated lattice on `grid`.
    fn build_lattice(&self, grid: &TimeGrid) -> Result<Lattice>;

    /// Short human-readable model name, used in log records.
    fn name(&self) -> &'static str;
}

/// European swaption value per unit notional on a short-rate lattice.
///
/// * `discount(t)`: discount factor from the valuation date to time `t`
/// * `exercise`: exercise time, in the same time measure as `discount`
/// * `flows`: fixed-leg cash flows of the underlying per unit notional,
///   `(payment time, amount)`, with the notional repayment folded into the
///   last one; flows at or before exercise are ignored
///
/// The grid has `model.steps()` intervals up to the exercise time and at
/// most as many again out to the last payment (see
/// [`TimeGrid::for_exercise`]). Each flow is moved to the
/// nearest layer at or after exercise, rescaled by the curve's forward
/// discount factor between its own time and that layer. The fixed-leg bond
/// `B` is rolled back to the exercise layer where the payoff
/// `max(w·(1 − B), 0)` is formed and rolled back to the root.
///
/// With the exercise at the valuation date the intrinsic value on the curve
/// is returned without building a lattice.
pub fn price_swaption_on_lattice<M, D>(
    model: &M,
    discount: D,
    exercise: Time,
    flows: &[(Time, Real)],
    swap_type: SwapType,
    solver: &SolverSettings,
    limits: &LatticeSettings,
) -> Result<Price>
where
    M: ShortRateModel + ?Sized,
    D: Fn(Time) -> DiscountFactor,
{
    rk_core::ensure!(exercise.is_finite(), "exercise time must be finite, got {exercise}");
    let w = swap_type.sign();
    let live: Vec<(Time, Real)> = flows.iter().copied().filter(|&(t, _)| t > exercise).collect();
    rk_core::ensure!(
        !live.is_empty(),
        "the underlying swap has no payments after exercise"
    );

    if exercise < IMMEDIATE_EXERCISE {
        let bond: Real = live.iter().map(|&(t, a)| a * discount(t)).sum();
        return Ok((w * (1.0 - bond)).max(0.0));
    }

    let horizon = live.iter().map(|&(t, _)| t).fold(exercise, Real::max);
    let grid = TimeGrid::for_exercise(exercise, model.steps(), horizon, limits)?;
    let mut lattice = model.build_lattice(&grid)?;
    lattice.calibrate(&discount, solver)?;

    let n = model.steps();
    let m = grid.steps();
    let mut amounts = vec![0.0; m + 1];
    for &(t, a) in &live {
        let layer = grid.closest_index(t).clamp(n, m);
        amounts[layer] += a * discount(t) / discount(grid.time(layer));
    }

    let mut bond = vec![amounts[m]; lattice.layer(m).size()];
    for i in (n..m).rev() {
        bond = lattice.roll_back(&bond, i + 1, i)?;
        for b in &mut bond {
            *b += amounts[i];
        }
    }
    let payoff: Vec<Real> = bond.iter().map(|b| (w * (1.0 - b)).max(0.0)).collect();
    let root = lattice.roll_back(&payoff, n, 0)?;
    let value = root[0];
    rk_core::ensure_post!(value.is_finite(), "lattice value {value} is not finite");

    debug!(
        model = model.name(),
        %swap_type,
        steps = m,
        nodes = lattice.node_count(),
        value,
        "swaption valued on lattice"
    );
    Ok(value)
}
