//! # rk-termstructures
//!
//! Discount curves and the bootstrapper that builds them from deposit, FRA,
//! and swap quotes.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `YieldTermStructure`: the discounting interface shared by all curves.
pub mod yield_term_structure;

/// `DiscountCurve`: pillar discount factors with flat-forward or
/// linear-zero-rate interpolation.
pub mod discount_curve;

/// `FlatForward`: a single constant rate for every maturity.
pub mod flat_forward;

/// `FixedLeg`: accrual schedule and annuity of a fixed leg.
pub mod fixed_leg;

/// Calibration instruments: deposits, FRAs, and par swaps.
pub mod rate_helpers;

/// Sequential pillar-by-pillar curve bootstrap.
pub mod bootstrap;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use bootstrap::CurveBootstrapper;
pub use discount_curve::{DiscountCurve, InterpolationPolicy};
pub use fixed_leg::FixedLeg;
pub use flat_forward::FlatForward;
pub use rate_helpers::{CalibrationInstrument, Deposit, Fra, RateHelper, Swap};
pub use yield_term_structure::YieldTermStructure;
