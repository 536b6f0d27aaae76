//! SABR smile: Hagan et al. (2002) lognormal volatility approximation fed
//! into the Black formula.
//!
//! ```text
//! σ_B(F, K) = α / [(FK)^((1−β)/2) · (1 + (1−β)²/24 · ln²(F/K) + (1−β)⁴/1920 · ln⁴(F/K))]
//!           · z / x(z)
//!           · [1 + ((1−β)²/24 · α²/(FK)^(1−β) + ρβνα/(4(FK)^((1−β)/2)) + (2−3ρ²)/24 · ν²) · T]
//!
//! z    = ν/α · (FK)^((1−β)/2) · ln(F/K)
//! x(z) = ln[(√(1 − 2ρz + z²) + z − ρ) / (1 − ρ)]
//! ```
//!
//! At the money the ratio `z / x(z)` tends to one and the log-moneyness
//! terms vanish. The shifted variant evaluates everything on `F + s` and
//! `K + s`.

use rk_core::errors::Result;
use rk_core::{Price, Rate, Real, SwapType, Time, Volatility};
use tracing::trace;

use crate::black::black_formula;
use crate::formula::SwaptionFormula;

/// Log-moneyness below which the at-the-money expansion is used.
const ATM_LOG_MONEYNESS: Real = 1.0e-10;

/// `|z|` below which `z / x(z)` is replaced by its limit.
const SMALL_Z: Real = 1.0e-10;

/// SABR implied Black volatility for forward `f`, strike `k` and expiry `t`.
///
/// Forward and strike must be positive; negative or zero values are a
/// numerical error.
pub fn black_vol_from_sabr(
    f: Rate,
    k: Rate,
    t: Time,
    alpha: Real,
    beta: Real,
    rho: Real,
    nu: Real,
) -> Result<Volatility> {
    rk_core::ensure_post!(
        f > 0.0 && k > 0.0,
        "SABR needs a positive forward and strike, got F = {f}, K = {k}"
    );
    let t = t.max(0.0);
    let one_minus_beta = 1.0 - beta;
    let a = one_minus_beta * one_minus_beta;
    let log_fk = (f / k).ln();
    let fk_half = (f * k).powf(0.5 * one_minus_beta);

    let correction = 1.0
        + (a / 24.0 * alpha * alpha / (fk_half * fk_half)
            + 0.25 * rho * beta * nu * alpha / fk_half
            + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu)
            * t;

    if log_fk.abs() < ATM_LOG_MONEYNESS {
        return Ok(alpha / fk_half * correction);
    }

    let z = nu / alpha * fk_half * log_fk;
    let ratio = if z.abs() < SMALL_Z {
        1.0
    } else {
        let x = (((1.0 - 2.0 * rho * z + z * z).sqrt() + z - rho) / (1.0 - rho)).ln();
        z / x
    };
    let denominator =
        fk_half * (1.0 + a / 24.0 * log_fk * log_fk + a * a / 1920.0 * log_fk.powi(4));
    let vol = alpha / denominator * ratio * correction;
    rk_core::ensure_post!(
        vol.is_finite() && vol >= 0.0,
        "SABR volatility {vol} is not usable at F = {f}, K = {k}"
    );
    Ok(vol)
}

fn validate(alpha: Real, beta: Real, rho: Real, nu: Real) -> Result<()> {
    rk_core::ensure!(alpha > 0.0 && alpha.is_finite(), "SABR alpha must be positive, got {alpha}");
    rk_core::ensure!((0.0..=1.0).contains(&beta), "SABR beta must lie in [0, 1], got {beta}");
    rk_core::ensure!(rho > -1.0 && rho < 1.0, "SABR rho must lie in (-1, 1), got {rho}");
    rk_core::ensure!(nu >= 0.0 && nu.is_finite(), "SABR nu must be non-negative, got {nu}");
    Ok(())
}

fn sabr_price(
    params: (Real, Real, Real, Real),
    forward: Rate,
    strike: Rate,
    time: Time,
    annuity: Real,
    swap_type: SwapType,
) -> Result<Price> {
    let (alpha, beta, rho, nu) = params;
    let vol = black_vol_from_sabr(forward, strike, time, alpha, beta, rho, nu)?;
    trace!(forward, strike, time, vol, "SABR implied Black volatility");
    let std_dev = if time <= 0.0 { 0.0 } else { vol * time.sqrt() };
    Ok(annuity * black_formula(forward, strike, std_dev, swap_type)?)
}

/// SABR stochastic-volatility smile.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sabr {
    alpha: Real,
    beta: Real,
    rho: Real,
    nu: Real,
}

impl Sabr {
    /// SABR model with `α > 0`, `β ∈ [0, 1]`, `ρ ∈ (−1, 1)`, `ν ≥ 0`.
    pub fn new(alpha: Real, beta: Real, rho: Real, nu: Real) -> Result<Self> {
        validate(alpha, beta, rho, nu)?;
        Ok(Self { alpha, beta, rho, nu })
    }

    /// Initial volatility level.
    pub fn alpha(&self) -> Real {
        self.alpha
    }

    /// CEV exponent.
    pub fn beta(&self) -> Real {
        self.beta
    }

    /// Rate/volatility correlation.
    pub fn rho(&self) -> Real {
        self.rho
    }

    /// Volatility of volatility.
    pub fn nu(&self) -> Real {
        self.nu
    }

    /// Implied Black volatility at `strike`.
    pub fn volatility(&self, forward: Rate, strike: Rate, time: Time) -> Result<Volatility> {
        black_vol_from_sabr(forward, strike, time, self.alpha, self.beta, self.rho, self.nu)
    }
}

impl SwaptionFormula for Sabr {
    fn price(
        &self,
        forward: Rate,
        strike: Rate,
        time: Time,
        annuity: Real,
        swap_type: SwapType,
    ) -> Result<Price> {
        let params = (self.alpha, self.beta, self.rho, self.nu);
        sabr_price(params, forward, strike, time, annuity, swap_type)
    }

    fn name(&self) -> &'static str {
        "SABR"
    }
}

/// SABR on rates displaced by a constant shift.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftedSabr {
    sabr: Sabr,
    shift: Rate,
}

impl ShiftedSabr {
    /// Shifted SABR model; `shift` is added to forward and strike.
    pub fn new(alpha: Real, beta: Real, rho: Real, nu: Real, shift: Rate) -> Result<Self> {
        rk_core::ensure!(shift.is_finite(), "rate shift must be finite, got {shift}");
        Ok(Self {
            sabr: Sabr::new(alpha, beta, rho, nu)?,
            shift,
        })
    }

    /// The unshifted SABR parameters.
    pub fn sabr(&self) -> &Sabr {
        &self.sabr
    }

    /// The rate shift.
    pub fn shift(&self) -> Rate {
        self.shift
    }
}

impl SwaptionFormula for ShiftedSabr {
    fn price(
        &self,
        forward: Rate,
        strike: Rate,
        time: Time,
        annuity: Real,
        swap_type: SwapType,
    ) -> Result<Price> {
        let s = &self.sabr;
        sabr_price(
            (s.alpha, s.beta, s.rho, s.nu),
            forward + self.shift,
            strike + self.shift,
            time,
            annuity,
            swap_type,
        )
    }

    fn name(&self) -> &'static str {
        "ShiftedSABR"
    }
}
