//! # rk-instruments
//!
//! Tradable instruments valued against a discount curve. The vanilla
//! [`Swap`] lives with the curve code because the bootstrapper calibrates
//! to it; it is re-exported here next to the [`Swaption`] written on it.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// European swaption: physical and cash-settled valuation.
pub mod swaption;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use rk_termstructures::Swap;
pub use swaption::Swaption;
