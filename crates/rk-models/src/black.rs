//! Black (lognormal) swaption formula and its shifted variant.
//!
//! With forward swap rate `F`, strike `K`, annuity `A`, volatility `σ` and
//! time to exercise `T`:
//!
//! ```text
//! d1 = (ln(F/K) + σ²T/2) / (σ√T)     d2 = d1 − σ√T
//! payer    = A · (F·N(d1) − K·N(d2))
//! receiver = A · (K·N(−d2) − F·N(−d1))
//! ```
//!
//! The shifted model applies the same formula to `F + s` and `K + s`, which
//! admits negative rates down to `−s`.

use rk_core::errors::{Error, Result};
use rk_core::{Price, Rate, Real, Settings, SwapType, Time, Volatility};
use rk_math::{newton, normal_cdf, normal_pdf};

use crate::formula::SwaptionFormula;

/// Standard deviations below this collapse the formula to its intrinsic
/// value.
pub const MIN_STD_DEV: Real = 1.0e-12;

/// Bracket searched by [`implied_black_volatility`].
const IMPLIED_VOL_BOUNDS: (Volatility, Volatility) = (1.0e-8, 10.0);

/// Undiscounted Black value per unit annuity.
///
/// `forward` and `strike` must both be strictly positive; otherwise the
/// lognormal dynamics are undefined and a numerical error is returned,
/// even when the volatility is zero.
pub fn black_formula(forward: Rate, strike: Rate, std_dev: Real, swap_type: SwapType) -> Result<Real> {
    rk_core::ensure_post!(
        forward > 0.0 && strike > 0.0,
        "Black formula needs a positive forward and strike, got F = {forward}, K = {strike}"
    );
    rk_core::ensure!(
        std_dev >= 0.0 && std_dev.is_finite(),
        "standard deviation must be non-negative, got {std_dev}"
    );
    let w = swap_type.sign();
    if std_dev < MIN_STD_DEV {
        return Ok((w * (forward - strike)).max(0.0));
    }
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    Ok(w * (forward * normal_cdf(w * d1) - strike * normal_cdf(w * d2)))
}

fn std_dev(volatility: Volatility, time: Time) -> Real {
    if time <= 0.0 {
        0.0
    } else {
        volatility * time.sqrt()
    }
}

/// Black model with a flat lognormal volatility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Black {
    volatility: Volatility,
}

impl Black {
    /// Black model with volatility `volatility ≥ 0`.
    pub fn new(volatility: Volatility) -> Result<Self> {
        rk_core::ensure!(
            volatility >= 0.0 && volatility.is_finite(),
            "Black volatility must be non-negative, got {volatility}"
        );
        Ok(Self { volatility })
    }

    /// The lognormal volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }
}

impl SwaptionFormula for Black {
    fn price(
        &self,
        forward: Rate,
        strike: Rate,
        time: Time,
        annuity: Real,
        swap_type: SwapType,
    ) -> Result<Price> {
        let undiscounted = black_formula(forward, strike, std_dev(self.volatility, time), swap_type)?;
        Ok(annuity * undiscounted)
    }

    fn name(&self) -> &'static str {
        "Black"
    }
}

/// Black model on rates displaced by a constant shift.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShiftedBlack {
    volatility: Volatility,
    shift: Rate,
}

impl ShiftedBlack {
    /// Shifted Black model; `shift` is added to both forward and strike.
    pub fn new(volatility: Volatility, shift: Rate) -> Result<Self> {
        rk_core::ensure!(
            volatility >= 0.0 && volatility.is_finite(),
            "shifted Black volatility must be non-negative, got {volatility}"
        );
        rk_core::ensure!(shift.is_finite(), "rate shift must be finite, got {shift}");
        Ok(Self { volatility, shift })
    }

    /// The lognormal volatility of the shifted rate.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// The rate shift.
    pub fn shift(&self) -> Rate {
        self.shift
    }
}

impl SwaptionFormula for ShiftedBlack {
    fn price(
        &self,
        forward: Rate,
        strike: Rate,
        time: Time,
        annuity: Real,
        swap_type: SwapType,
    ) -> Result<Price> {
        let undiscounted = black_formula(
            forward + self.shift,
            strike + self.shift,
            std_dev(self.volatility, time),
            swap_type,
        )?;
        Ok(annuity * undiscounted)
    }

    fn name(&self) -> &'static str {
        "ShiftedBlack"
    }
}

/// Black volatility reproducing `price`, a swaption value per unit notional.
///
/// `shift` displaces forward and strike as in [`ShiftedBlack`]; pass zero
/// for the plain model. Prices outside the no-arbitrage band
/// `[intrinsic, upper bound)` are rejected as configuration errors.
pub fn implied_black_volatility(
    price: Price,
    forward: Rate,
    strike: Rate,
    time: Time,
    annuity: Real,
    swap_type: SwapType,
    shift: Rate,
) -> Result<Volatility> {
    rk_core::ensure!(time > 0.0, "implied volatility needs a positive expiry, got {time}");
    rk_core::ensure!(annuity > 0.0, "annuity must be positive, got {annuity}");
    let (f, k) = (forward + shift, strike + shift);
    rk_core::ensure_post!(
        f > 0.0 && k > 0.0,
        "shifted forward {f} and strike {k} must be positive"
    );
    let intrinsic = annuity * (swap_type.sign() * (f - k)).max(0.0);
    let upper = annuity
        * match swap_type {
            SwapType::Payer => f,
            SwapType::Receiver => k,
        };
    rk_core::ensure!(
        price >= intrinsic && price < upper,
        "{swap_type} price {price} outside the attainable range [{intrinsic}, {upper})"
    );

    let sqrt_t = time.sqrt();
    let settings = Settings::instance().solver();
    let (lo, hi) = IMPLIED_VOL_BOUNDS;
    newton(
        |vol| {
            let s = vol * sqrt_t;
            let value = annuity * black_formula(f, k, s, swap_type)?;
            let d1 = ((f / k).ln() + 0.5 * s * s) / s;
            let vega = annuity * f * normal_pdf(d1) * sqrt_t;
            Ok((value - price, vega))
        },
        0.2,
        lo,
        hi,
        settings.accuracy,
        settings.max_iterations,
    )
    .map_err(|e| Error::Numerical(format!("implied Black volatility not found: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    const F: Rate = 0.040_887;
    const K: Rate = 0.040_852;
    const T: Time = 5.002_74;
    const A: Real = 4.160_73;

    #[test]
    fn five_into_five_payer_and_receiver() {
        let model = Black::new(0.1533).unwrap();
        let payer = model.price(F, K, T, A, SwapType::Payer).unwrap();
        let receiver = model.price(F, K, T, A, SwapType::Receiver).unwrap();
        assert_abs_diff_eq!(payer * 1e6, 23_220.26, epsilon = 0.05);
        assert_abs_diff_eq!(receiver * 1e6, 23_074.63, epsilon = 0.05);
        assert_abs_diff_eq!(payer - receiver, A * (F - K), epsilon = 1e-15);
    }

    #[test]
    fn zero_volatility_or_expiry_is_intrinsic() {
        let model = Black::new(0.0).unwrap();
        assert_abs_diff_eq!(
            model.price(F, K, T, A, SwapType::Payer).unwrap(),
            A * (F - K),
            epsilon = 1e-18
        );
        assert_eq!(model.price(F, K, T, A, SwapType::Receiver).unwrap(), 0.0);
        let model = Black::new(0.3).unwrap();
        assert_eq!(model.price(0.03, 0.04, 0.0, 2.0, SwapType::Payer).unwrap(), 0.0);
        assert_abs_diff_eq!(
            model.price(0.03, 0.04, -0.5, 2.0, SwapType::Receiver).unwrap(),
            0.02,
            epsilon = 1e-15
        );
    }

    #[test]
    fn non_positive_rates_are_numerical_errors() {
        let model = Black::new(0.2).unwrap();
        assert!(model
            .price(-0.001, 0.01, 1.0, 1.0, SwapType::Payer)
            .unwrap_err()
            .is_numerical());
        assert!(Black::new(0.0)
            .unwrap()
            .price(0.01, 0.0, 1.0, 1.0, SwapType::Payer)
            .unwrap_err()
            .is_numerical());
        assert!(Black::new(-0.1).unwrap_err().is_configuration());
    }

    #[test]
    fn shift_admits_negative_rates() {
        let model = ShiftedBlack::new(0.31, 0.008).unwrap();
        let v = model.price(-0.001, -0.003, 1.0, 2.9, SwapType::Payer).unwrap();
        assert!(v > 0.0);
        let plain = Black::new(0.1533).unwrap();
        let shifted = ShiftedBlack::new(0.1533, 0.008).unwrap();
        let expected = plain.price(F + 0.008, K + 0.008, T, A, SwapType::Payer).unwrap();
        assert_abs_diff_eq!(
            shifted.price(F, K, T, A, SwapType::Payer).unwrap(),
            expected,
            epsilon = 1e-16
        );
        assert_abs_diff_eq!(expected * 1e6, 27_751.23, epsilon = 0.05);
        assert!(ShiftedBlack::new(0.2, 0.005)
            .unwrap()
            .price(-0.006, 0.01, 1.0, 1.0, SwapType::Payer)
            .unwrap_err()
            .is_numerical());
    }

    #[test]
    fn implied_volatility_recovers_the_input() {
        for swap_type in [SwapType::Payer, SwapType::Receiver] {
            for (vol, shift) in [(0.1533, 0.0), (0.45, 0.0), (0.31, 0.008)] {
                let price = ShiftedBlack::new(vol, shift)
                    .unwrap()
                    .price(F, K, T, A, swap_type)
                    .unwrap();
                let implied = implied_black_volatility(price, F, K, T, A, swap_type, shift).unwrap();
                assert_abs_diff_eq!(implied, vol, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn implied_volatility_rejects_arbitrage() {
        let below = A * (F - K) * 0.5;
        assert!(implied_black_volatility(below, F, K, T, A, SwapType::Payer, 0.0)
            .unwrap_err()
            .is_configuration());
        assert!(implied_black_volatility(A * F, F, K, T, A, SwapType::Payer, 0.0)
            .unwrap_err()
            .is_configuration());
    }

    proptest! {
        #[test]
        fn put_call_parity(
            f in 0.001f64..0.12,
            k in 0.001f64..0.12,
            vol in 0.01f64..1.0,
            t in 0.05f64..20.0,
        ) {
            let model = Black::new(vol).unwrap();
            let payer = model.price(f, k, t, 1.0, SwapType::Payer).unwrap();
            let receiver = model.price(f, k, t, 1.0, SwapType::Receiver).unwrap();
            prop_assert!(payer >= (f - k).max(0.0) - 1e-15);
            prop_assert!((payer - receiver - (f - k)).abs() < 1e-13);
        }

        #[test]
        fn payer_decreases_with_strike(k in 0.005f64..0.1, dk in 1e-4f64..0.02) {
            let model = Black::new(0.25).unwrap();
            let lo = model.price(0.04, k, 3.0, 1.0, SwapType::Payer).unwrap();
            let hi = model.price(0.04, k + dk, 3.0, 1.0, SwapType::Payer).unwrap();
            prop_assert!(hi <= lo);
        }
    }
}
