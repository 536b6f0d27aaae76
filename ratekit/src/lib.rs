//! # ratekit
//!
//! Interest-rate curve bootstrapping and European swaption valuation.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on it rather than on
//! the individual `rk-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use ratekit::core::SwapType;
//! use ratekit::instruments::Swaption;
//! use ratekit::models::{Black, PricingModel};
//! use ratekit::termstructures::FlatForward;
//! use ratekit::time::{Date, DayCount, Frequency};
//!
//! let today = Date::from_ymd(2024, 1, 2).unwrap();
//! let curve = FlatForward::continuous(today, 0.03);
//! let swaption = Swaption::new(
//!     today,
//!     Date::from_ymd(2025, 1, 2).unwrap(),
//!     Date::from_ymd(2030, 1, 2).unwrap(),
//!     SwapType::Payer,
//!     0.03,
//!     Frequency::Semiannual,
//!     DayCount::Thirty360Bond,
//! )
//! .unwrap();
//! let model = PricingModel::from(Black::new(0.2).unwrap());
//! let value = swaption.value(today, &curve, &model).unwrap();
//! assert!(value > 0.0);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, error definitions, and settings.
pub use rk_core as core;

/// Date, day count, calendar, schedule, and compounding types.
pub use rk_time as time;

/// Normal distribution and one-dimensional root finders.
pub use rk_math as math;

/// Discount curves and the curve bootstrapper.
pub use rk_termstructures as termstructures;

/// Short-rate lattices.
pub use rk_methods as methods;

/// Closed-form and lattice swaption models.
pub use rk_models as models;

/// Swaptions and swaps.
pub use rk_instruments as instruments;
