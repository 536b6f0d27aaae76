//! # rk-math
//!
//! Numerical building blocks: the standard normal distribution and bounded
//! one-dimensional root finders.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Standard normal density and distribution function.
pub mod distributions;

/// One-dimensional root finders with iteration caps.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_pdf};
pub use solvers1d::{brent, newton};
