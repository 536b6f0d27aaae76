//! European swaption.
//!
//! The holder may enter, on the exercise date, the swap running from the
//! exercise date to maturity at the strike rate: paying fixed for a payer
//! swaption, receiving fixed for a receiver. Forward swap rate and annuity
//! come from the discount curve over the fixed schedule; the model turns
//! them (or the curve itself, for lattice models) into a value.
//!
//! All values are seen from the valuation date: discount factors read off
//! the curve are divided by the curve's discount factor at the valuation
//! date, so a curve built at an earlier reference date can still be used.

use rk_core::errors::Result;
use rk_core::{Price, Rate, Real, Settings, SwapType, Time};
use rk_models::{price_swaption_on_lattice, PricingModel};
use rk_termstructures::{Swap, YieldTermStructure};
use rk_time::{Date, DayCount, Frequency, Schedule};
use tracing::debug;

/// A European swaption on a vanilla fixed-for-floating swap.
#[derive(Debug, Clone, PartialEq)]
pub struct Swaption {
    settlement: Date,
    exercise: Date,
    underlying: Swap,
}

impl Swaption {
    /// Swaption exercisable on `exercise` into a swap maturing on
    /// `maturity`, paying or receiving `strike` on the fixed leg.
    ///
    /// Notional defaults to one and the floating leg to quarterly
    /// Actual/360. The settlement date may not follow the exercise date.
    /// The exercise date must fall strictly before maturity: exercising on
    /// the maturity date would deliver a swap with no fixed period, so that
    /// case is rejected as a configuration error rather than valued at zero.
    pub fn new(
        settlement: Date,
        exercise: Date,
        maturity: Date,
        swap_type: SwapType,
        strike: Rate,
        fixed_frequency: Frequency,
        fixed_day_count: DayCount,
    ) -> Result<Self> {
        rk_core::ensure!(
            settlement <= exercise,
            "settlement {settlement} is after exercise {exercise}"
        );
        rk_core::ensure!(
            exercise < maturity,
            "exercise {exercise} must precede swap maturity {maturity}"
        );
        rk_core::ensure!(strike.is_finite(), "strike must be finite, got {strike}");
        let underlying = Swap::new(
            exercise,
            maturity,
            swap_type,
            strike,
            fixed_frequency,
            fixed_day_count,
        )?;
        Ok(Self {
            settlement,
            exercise,
            underlying,
        })
    }

    /// Replace the notional; it must be positive.
    pub fn with_notional(mut self, notional: Real) -> Result<Self> {
        self.underlying = self.underlying.with_notional(notional)?;
        Ok(self)
    }

    /// Replace the floating-leg conventions of the underlying swap.
    pub fn with_float_leg(mut self, frequency: Frequency, day_count: DayCount) -> Result<Self> {
        self.underlying = self.underlying.with_float_leg(frequency, day_count)?;
        Ok(self)
    }

    /// Settlement date.
    pub fn settlement_date(&self) -> Date {
        self.settlement
    }

    /// Exercise date.
    pub fn exercise_date(&self) -> Date {
        self.exercise
    }

    /// Adjusted maturity of the underlying swap.
    pub fn maturity_date(&self) -> Date {
        self.underlying.maturity_date()
    }

    /// Payer or receiver.
    pub fn swap_type(&self) -> SwapType {
        self.underlying.swap_type()
    }

    /// Fixed rate of the underlying swap.
    pub fn strike(&self) -> Rate {
        self.underlying.fixed_rate()
    }

    /// Notional amount.
    pub fn notional(&self) -> Real {
        self.underlying.notional()
    }

    /// The forward-starting swap delivered on exercise.
    pub fn underlying_swap(&self) -> &Swap {
        &self.underlying
    }

    /// Accrual dates of the fixed leg, exercise to maturity.
    pub fn fixed_leg_schedule(&self) -> &Schedule {
        self.underlying.fixed_leg().schedule()
    }

    // ── Curve quantities ─────────────────────────────────────────────────

    /// Forward swap rate `(P(start) − P(end)) / annuity` on `curve`.
    pub fn forward_swap_rate(&self, curve: &dyn YieldTermStructure) -> Rate {
        self.underlying.par_rate(curve)
    }

    /// Fixed-leg annuity `Σ τ_i · P(pay_i)`, discounted to the curve's
    /// reference date.
    pub fn annuity(&self, curve: &dyn YieldTermStructure) -> Real {
        self.underlying.annuity(curve)
    }

    /// Cash-settlement annuity `(1/m) · Σ_{k=1}^{n} (1 + S/m)^{−k}` for a
    /// flat swap rate `S`, `m` fixed payments a year and `n` fixed periods.
    pub fn cash_settled_annuity(&self, flat_swap_rate: Rate) -> Result<Real> {
        let leg = self.underlying.fixed_leg();
        let m = leg.frequency().per_year();
        let growth = 1.0 + flat_swap_rate / m;
        rk_core::ensure!(
            growth > 0.0 && flat_swap_rate.is_finite(),
            "flat swap rate {flat_swap_rate} leaves no positive discount factor"
        );
        let n = leg.schedule().period_count() as i32;
        Ok((1..=n).map(|k| growth.powi(-k)).sum::<Real>() / m)
    }

    // ── Valuation ────────────────────────────────────────────────────────

    /// Value of the physically settled swaption at `valuation`, scaled by
    /// the notional.
    ///
    /// A swaption whose exercise date has passed is worth zero. The
    /// valuation date may not precede the curve's reference date.
    pub fn value(
        &self,
        valuation: Date,
        curve: &dyn YieldTermStructure,
        model: &PricingModel,
    ) -> Result<Price> {
        if valuation > self.exercise {
            debug!(%valuation, exercise = %self.exercise, "swaption expired");
            return Ok(0.0);
        }
        let inputs = MarketInputs::new(self, valuation, curve)?;
        let unit = self.unit_value(&inputs, curve, model, inputs.annuity)?;
        let value = self.notional() * unit;
        debug!(
            model = model.name(),
            swap_type = %self.swap_type(),
            forward = inputs.forward,
            annuity = inputs.annuity,
            value,
            "swaption valued"
        );
        Ok(value)
    }

    /// Value of the cash-settled swaption at `valuation`.
    ///
    /// The settlement amount is the exercise value over the
    /// [`cash_settled_annuity`](Self::cash_settled_annuity) at
    /// `flat_swap_rate` instead of the curve annuity. The forward swap rate
    /// still comes from the curve and no further discounting from exercise
    /// to valuation is applied.
    pub fn cash_settled_value(
        &self,
        valuation: Date,
        curve: &dyn YieldTermStructure,
        flat_swap_rate: Rate,
        model: &PricingModel,
    ) -> Result<Price> {
        if valuation > self.exercise {
            debug!(%valuation, exercise = %self.exercise, "swaption expired");
            return Ok(0.0);
        }
        let cash_annuity = self.cash_settled_annuity(flat_swap_rate)?;
        let inputs = MarketInputs::new(self, valuation, curve)?;
        let unit = match model.closed_form() {
            Some(_) => self.unit_value(&inputs, curve, model, cash_annuity)?,
            None => {
                let physical = self.unit_value(&inputs, curve, model, inputs.annuity)?;
                physical * cash_annuity / inputs.annuity
            }
        };
        let value = self.notional() * unit;
        debug!(
            model = model.name(),
            swap_type = %self.swap_type(),
            forward = inputs.forward,
            cash_annuity,
            value,
            "cash-settled swaption valued"
        );
        Ok(value)
    }

    fn unit_value(
        &self,
        inputs: &MarketInputs,
        curve: &dyn YieldTermStructure,
        model: &PricingModel,
        annuity: Real,
    ) -> Result<Price> {
        if let Some(formula) = model.closed_form() {
            let expiry = DayCount::Actual365Fixed.year_fraction(inputs.valuation, self.exercise);
            return formula.price(inputs.forward, self.strike(), expiry, annuity, self.swap_type());
        }
        let Some(short_rate) = model.short_rate() else {
            rk_core::fail!("{} has no pricing route", model.name());
        };

        // lattice time 0 is the valuation date
        let t0 = inputs.valuation_time;
        let df0 = inputs.valuation_discount;
        let discount = |t: Time| curve.discount_time(t + t0) / df0;
        let leg = self.underlying.fixed_leg();
        let exercise = curve.time_from_reference(leg.start_date()) - t0;
        let mut flows: Vec<(Time, Real)> = leg
            .accruals()
            .map(|(pay, tau)| (curve.time_from_reference(pay) - t0, self.strike() * tau))
            .collect();
        if let Some(last) = flows.last_mut() {
            last.1 += 1.0;
        }
        let settings = Settings::instance();
        price_swaption_on_lattice(
            short_rate,
            discount,
            exercise,
            &flows,
            self.swap_type(),
            &settings.solver(),
            &settings.lattice(),
        )
    }
}

/// Curve quantities seen from the valuation date.
struct MarketInputs {
    valuation: Date,
    valuation_time: Time,
    valuation_discount: Real,
    forward: Rate,
    annuity: Real,
}

impl MarketInputs {
    fn new(swaption: &Swaption, valuation: Date, curve: &dyn YieldTermStructure) -> Result<Self> {
        let reference = curve.reference_date();
        rk_core::ensure!(
            valuation >= reference,
            "valuation date {valuation} precedes the curve reference date {reference}"
        );
        let valuation_time = curve.time_from_reference(valuation);
        let valuation_discount = curve.discount_time(valuation_time);
        rk_core::ensure_post!(
            valuation_discount > 0.0 && valuation_discount.is_finite(),
            "curve discount factor {valuation_discount} at {valuation} is not positive"
        );
        let annuity = swaption.annuity(curve) / valuation_discount;
        rk_core::ensure_post!(annuity > 0.0, "swaption annuity {annuity} is not positive");
        Ok(Self {
            valuation,
            valuation_time,
            valuation_discount,
            forward: swaption.forward_swap_rate(curve),
            annuity,
        })
    }
}
