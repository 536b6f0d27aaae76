//! # rk-models
//!
//! Swaption pricing models.
//!
//! ## Model families
//!
//! ```text
//! PricingModel
//! ├── SwaptionFormula   → Black, ShiftedBlack, Sabr, ShiftedSabr
//! └── ShortRateModel    → HullWhite, BlackKarasinski, BlackDermanToy
//! ```
//!
//! Closed-form models price from the forward swap rate, the annuity and the
//! time to exercise. Short-rate models build a lattice, fit it to the
//! discount curve and roll the exercise value of the underlying swap back to
//! the root.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Closed-form models ───────────────────────────────────────────────────
pub mod black;
pub mod formula;
pub mod sabr;

// ── Short-rate lattice models ────────────────────────────────────────────
pub mod black_derman_toy;
pub mod black_karasinski;
pub mod hull_white;
pub mod short_rate;

// ── Model selection ──────────────────────────────────────────────────────
pub mod pricing_model;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use black::{black_formula, implied_black_volatility, Black, ShiftedBlack};
pub use black_derman_toy::{BlackDermanToy, BdtVolatility};
pub use black_karasinski::BlackKarasinski;
pub use formula::SwaptionFormula;
pub use hull_white::HullWhite;
pub use pricing_model::PricingModel;
pub use sabr::{black_vol_from_sabr, Sabr, ShiftedSabr};
pub use short_rate::{price_swaption_on_lattice, ShortRateModel, DEFAULT_STEPS};
