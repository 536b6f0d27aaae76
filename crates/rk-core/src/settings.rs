//! Numerical settings and their process-wide defaults.
//!
//! [`SolverSettings`] and [`LatticeSettings`] are plain value types. Every
//! consumer (the curve bootstrapper, the short-rate lattices) accepts an
//! explicit instance; when none is given it falls back to the defaults held
//! by the [`Settings`] singleton, which tests or applications may override.
//!
//! Thread safety: the defaults live behind an `RwLock`, so they can be read
//! concurrently by independent valuations and changed from any thread.

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::errors::Result;
use crate::{Rate, Real, Size};

/// Tolerances and bounds for one-dimensional root finding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverSettings {
    /// Hard cap on solver iterations; exceeding it is an error.
    pub max_iterations: Size,
    /// Absolute tolerance on the root.
    pub accuracy: Real,
    /// Lower bound of the search interval for bootstrapped zero rates.
    pub min_rate: Rate,
    /// Upper bound of the search interval for bootstrapped zero rates.
    pub max_rate: Rate,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            accuracy: 1.0e-12,
            min_rate: -0.20,
            max_rate: 1.00,
        }
    }
}

impl SolverSettings {
    /// Check that the settings describe a usable search.
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.max_iterations > 0,
            "solver iteration cap must be positive"
        );
        crate::ensure!(
            self.accuracy > 0.0 && self.accuracy.is_finite(),
            "solver accuracy must be positive, got {}",
            self.accuracy
        );
        crate::ensure!(
            self.min_rate < self.max_rate,
            "solver rate bounds [{}, {}] are empty",
            self.min_rate,
            self.max_rate
        );
        Ok(())
    }
}

/// Resource limits for recombining short-rate lattices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeSettings {
    /// Maximum number of time layers a single lattice may allocate.
    pub max_steps: Size,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self { max_steps: 5_000 }
    }
}

/// Process-wide default settings.
pub struct Settings {
    solver: RwLock<SolverSettings>,
    lattice: RwLock<LatticeSettings>,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            solver: RwLock::new(SolverSettings::default()),
            lattice: RwLock::new(LatticeSettings::default()),
        })
    }

    /// Current default solver settings.
    pub fn solver(&self) -> SolverSettings {
        *self.solver.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the default solver settings.
    pub fn set_solver(&self, settings: SolverSettings) -> Result<()> {
        settings.validate()?;
        *self.solver.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }

    /// Current default lattice settings.
    pub fn lattice(&self) -> LatticeSettings {
        *self.lattice.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the default lattice settings.
    pub fn set_lattice(&self, settings: LatticeSettings) -> Result<()> {
        crate::ensure!(settings.max_steps > 0, "lattice step cap must be positive");
        *self.lattice.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }

    /// Restore every default.
    pub fn reset(&self) {
        *self.solver.write().unwrap_or_else(PoisonError::into_inner) = SolverSettings::default();
        *self.lattice.write().unwrap_or_else(PoisonError::into_inner) = LatticeSettings::default();
    }
}
