//! Standard normal distribution.
//!
//! The distribution function delegates to the complementary error function
//! of `statrs`, which keeps `Φ(x) + Φ(−x) = 1` to machine precision; the
//! put/call parity of the Black formulas relies on that symmetry.

use rk_core::Real;
use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// The standard normal probability density function.
///
/// `φ(x) = exp(-x²/2) / √(2π)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function Φ(x).
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}
