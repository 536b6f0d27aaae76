//! # rk-core
//!
//! Core types, error taxonomy, and settings for ratekit.
//!
//! Every other crate in the workspace builds on the numeric aliases, the
//! [`Error`] enum (configuration / calibration / numerical failures), the
//! [`SwapType`] direction flag, and the process-wide [`Settings`] defined
//! here.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` / `ensure_post!` macros.
pub mod errors;

/// Solver and lattice settings plus the global defaults.
pub mod settings;

/// Payer / receiver direction of a swap or swaption.
pub mod swap_type;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A discount factor, strictly positive.
pub type DiscountFactor = Real;

/// A price or value.
pub type Price = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use settings::{LatticeSettings, Settings, SolverSettings};
pub use swap_type::SwapType;
