//! Recombining lattices for one-factor short-rate models.
//!
//! # Overview
//!
//! * [`TimeGrid`]: increasing layer times starting at zero
//! * [`Lattice`]: arena of [`Layer`]s, each owning its [`Node`]s
//! * [`Lattice::trinomial`]: Ornstein-Uhlenbeck state, three branches,
//!   Gaussian short rates (Hull-White)
//! * [`Lattice::trinomial_lognormal`]: the same geometry with the state
//!   read as `ln r` (Black-Karasinski)
//! * [`Lattice::binomial_with_volatility`]: lognormal state with a
//!   volatility term structure (Black-Derman-Toy)
//!
//! A freshly built lattice only knows its geometry. [`Lattice::calibrate`]
//! then runs forward induction on Arrow-Debreu prices and solves one drift
//! parameter per layer so that the lattice reprices a discount curve, after
//! which [`Lattice::roll_back`] can discount values toward the root.

mod binomial_tree;
mod short_rate_tree;
mod trinomial_tree;

pub use short_rate_tree::{Branching, Lattice, Layer, Node, RateMapping};

use rk_core::errors::Result;
use rk_core::{LatticeSettings, Size, Time};

/// Tolerance used when counting how many steps cover a horizon.
const STEP_ROUNDING: Time = 1.0e-9;

// ─── TimeGrid ─────────────────────────────────────────────────────────────────

/// Strictly increasing layer times starting at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<Time>,
}

impl TimeGrid {
    /// Grid from 0 to `end` with `steps` intervals.
    pub fn uniform(end: Time, steps: Size) -> Result<Self> {
        rk_core::ensure!(steps > 0, "a time grid needs at least one step");
        rk_core::ensure!(
            end > 0.0 && end.is_finite(),
            "time grid end must be positive, got {end}"
        );
        let dt = end / steps as Time;
        Ok(Self {
            times: (0..=steps).map(|i| i as Time * dt).collect(),
        })
    }

    /// Grid with `steps` intervals up to `exercise`, continued until
    /// `horizon` is covered.
    ///
    /// The exercise time sits exactly on layer `steps`. Past it the grid
    /// keeps the exercise spacing `exercise / steps` when at most `steps`
    /// more steps cover the horizon, the last layer then landing on or just
    /// beyond it. Otherwise it takes `steps` coarser steps of
    /// `(horizon − exercise) / steps` ending on the horizon, so a short
    /// expiry on a long swap needs no more than `2 · steps` steps. The total
    /// may not exceed `limits.max_steps`.
    pub fn for_exercise(
        exercise: Time,
        steps: Size,
        horizon: Time,
        limits: &LatticeSettings,
    ) -> Result<Self> {
        rk_core::ensure!(steps > 0, "a time grid needs at least one step");
        rk_core::ensure!(
            exercise > 0.0 && exercise.is_finite(),
            "exercise time must be positive, got {exercise}"
        );
        rk_core::ensure!(
            horizon >= exercise && horizon.is_finite(),
            "grid horizon {horizon} precedes the exercise time {exercise}"
        );
        let dt = exercise / steps as Time;
        let tail = horizon - exercise;
        let same_spacing = ((tail / dt) - STEP_ROUNDING).ceil().max(0.0) as Size;
        let (tail_steps, tail_dt) = if same_spacing <= steps {
            (same_spacing, dt)
        } else {
            (steps, tail / steps as Time)
        };
        let total = steps + tail_steps;
        rk_core::ensure!(
            total <= limits.max_steps,
            "lattice needs {total} steps but at most {} are allowed",
            limits.max_steps
        );
        let mut times: Vec<Time> = (0..=steps).map(|i| i as Time * dt).collect();
        times[steps] = exercise;
        times.extend((1..=tail_steps).map(|k| exercise + k as Time * tail_dt));
        Ok(Self { times })
    }

    /// Number of time points (steps + 1).
    pub fn size(&self) -> Size {
        self.times.len()
    }

    /// Number of steps.
    pub fn steps(&self) -> Size {
        self.times.len() - 1
    }

    /// Time at index `i`.
    pub fn time(&self, i: Size) -> Time {
        self.times[i]
    }

    /// Length of step `i`, from layer `i` to layer `i + 1`.
    pub fn dt(&self, i: Size) -> Time {
        self.times[i + 1] - self.times[i]
    }

    /// Longest step on the grid.
    pub fn max_dt(&self) -> Time {
        self.times
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(0.0, Time::max)
    }

    /// Final time.
    pub fn end(&self) -> Time {
        self.times[self.times.len() - 1]
    }

    /// All time points.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Index of the grid time nearest to `t`, clamped to the grid. A time
    /// halfway between two layers goes to the later one.
    pub fn closest_index(&self, t: Time) -> Size {
        let k = self.times.partition_point(|&s| s < t);
        if k == 0 {
            0
        } else if k == self.times.len() {
            self.steps()
        } else if self.times[k] - t <= t - self.times[k - 1] {
            k
        } else {
            k - 1
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
