//! # rk-methods
//!
//! Numerical methods for short-rate models: the time grid, recombining
//! binomial and trinomial lattices stored as an arena of layers,
//! Arrow-Debreu forward induction that fits a lattice to a discount curve,
//! and backward induction.
//!
//! # Modules
//!
//! * [`lattice`]: time grid, lattice geometry, calibration, and roll-back

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Short-rate lattices: geometry, curve calibration, backward induction.
pub mod lattice;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{Branching, Lattice, Layer, Node, RateMapping, TimeGrid};
