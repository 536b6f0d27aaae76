//! Sequential curve bootstrap.
//!
//! Instruments are merged and ordered by pillar date, then solved one at a
//! time with every earlier pillar held fixed:
//!
//! * a deposit or FRA whose start date is already covered by the curve has
//!   its pillar discount factor in closed form, `P(end) = P(start) / (1 + r·τ)`;
//! * anything else (swaps, forward-starting deposits and FRAs) is solved
//!   with Brent's method on the continuously-compounded zero rate of the new
//!   pillar. Each trial value is written into the curve before the implied
//!   quote is recomputed, so discount factors interpolated between the
//!   previous pillar and the new one always see the trial.
//!
//! The first instrument that cannot be matched aborts the whole bootstrap
//! with [`Error::Calibration`]; no partial curve is returned.

use crate::discount_curve::{DiscountCurve, InterpolationPolicy};
use crate::rate_helpers::{Deposit, Fra, RateHelper, Swap};
use crate::yield_term_structure::YieldTermStructure;
use rk_core::errors::{Error, Result};
use rk_core::{Real, Settings, SolverSettings};
use rk_math::brent;
use rk_time::{Date, DayCount};
use tracing::{debug, warn};

/// Largest accepted gap between a quote and its recomputed par rate.
pub const REPRICING_TOLERANCE: Real = 1.0e-8;

/// Builds a [`DiscountCurve`] from deposits, FRAs, and swaps.
#[derive(Debug, Clone)]
pub struct CurveBootstrapper {
    valuation_date: Date,
    policy: InterpolationPolicy,
    day_count: DayCount,
    settings: Option<SolverSettings>,
}

impl CurveBootstrapper {
    /// Bootstrapper for a curve anchored at `valuation_date`, with
    /// linear-zero-rate interpolation and an Actual/365 Fixed time measure.
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            policy: InterpolationPolicy::default(),
            day_count: DayCount::Actual365Fixed,
            settings: None,
        }
    }

    /// Choose the interpolation policy of the resulting curve.
    pub fn with_interpolation(mut self, policy: InterpolationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Choose the day count that maps dates to curve times.
    pub fn with_day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = day_count;
        self
    }

    /// Override the global solver settings.
    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Bootstrap from the three instrument lists.
    ///
    /// Each list must be strictly increasing in maturity, and no two
    /// instruments, across all lists, may share a pillar date.
    pub fn bootstrap(
        &self,
        deposits: &[Deposit],
        fras: &[Fra],
        swaps: &[Swap],
    ) -> Result<DiscountCurve> {
        check_increasing("deposit", deposits)?;
        check_increasing("FRA", fras)?;
        check_increasing("swap", swaps)?;
        let mut helpers: Vec<&dyn RateHelper> = Vec::new();
        helpers.extend(deposits.iter().map(|d| d as &dyn RateHelper));
        helpers.extend(fras.iter().map(|f| f as &dyn RateHelper));
        helpers.extend(swaps.iter().map(|s| s as &dyn RateHelper));
        self.bootstrap_helpers(helpers)
    }

    /// Bootstrap from instruments given in any order.
    pub fn bootstrap_instruments<H: RateHelper>(&self, instruments: &[H]) -> Result<DiscountCurve> {
        self.bootstrap_helpers(instruments.iter().map(|h| h as &dyn RateHelper).collect())
    }

    fn bootstrap_helpers(&self, mut helpers: Vec<&dyn RateHelper>) -> Result<DiscountCurve> {
        let settings = match self.settings {
            Some(s) => s,
            None => Settings::instance().solver(),
        };
        settings.validate()?;
        rk_core::ensure!(
            !helpers.is_empty(),
            "at least one calibration instrument is required"
        );
        let valuation = self.valuation_date;
        for h in &helpers {
            rk_core::ensure!(
                h.start_date() >= valuation,
                "{h} starts before the valuation date {valuation}"
            );
            rk_core::ensure!(
                h.pillar_date() > valuation,
                "{h} matures on or before the valuation date {valuation}"
            );
        }
        helpers.sort_by_key(|h| h.pillar_date());
        for pair in helpers.windows(2) {
            rk_core::ensure!(
                pair[0].pillar_date() != pair[1].pillar_date(),
                "{} and {} share the pillar date {}",
                pair[0],
                pair[1],
                pair[1].pillar_date()
            );
        }

        let mut curve = DiscountCurve::anchor(valuation, self.day_count, self.policy);
        for helper in &helpers {
            self.solve_pillar(&mut curve, *helper, &settings)?;
        }

        for helper in &helpers {
            let gap = (helper.implied_quote(&curve) - helper.quote()).abs();
            if gap > REPRICING_TOLERANCE {
                warn!(instrument = %helper, gap, "bootstrapped curve does not reprice quote");
                return Err(Error::Calibration {
                    instrument: helper.to_string(),
                    reason: format!("repriced quote is off by {gap:e}"),
                });
            }
        }
        debug!(
            pillars = helpers.len(),
            policy = %self.policy,
            "curve bootstrap complete"
        );
        Ok(curve)
    }

    fn solve_pillar(
        &self,
        curve: &mut DiscountCurve,
        helper: &dyn RateHelper,
        settings: &SolverSettings,
    ) -> Result<()> {
        let pillar = helper.pillar_date();
        let start = helper.start_date();

        if start <= curve.last_date() {
            if let Some(df) = helper.pillar_discount(curve.discount(start)) {
                if !(df > 0.0 && df.is_finite()) {
                    warn!(instrument = %helper, df, "closed-form discount factor not positive");
                    return Err(Error::Calibration {
                        instrument: helper.to_string(),
                        reason: format!("implied discount factor {df} is not positive"),
                    });
                }
                curve.push_pillar(pillar, df)?;
                debug!(instrument = %helper, %pillar, df, "pillar set in closed form");
                return Ok(());
            }
        }

        let t = curve.day_count().year_fraction(curve.reference_date(), pillar);
        let guess = curve.zero_rate_time(curve.times()[curve.times().len() - 1]);
        curve.push_pillar(pillar, (-guess * t).exp())?;
        let quote = helper.quote();
        let solved = brent(
            |z| {
                curve.set_last_discount((-z * t).exp());
                Ok(helper.implied_quote(&*curve) - quote)
            },
            settings.min_rate,
            settings.max_rate,
            settings.accuracy,
            settings.max_iterations,
        );
        let zero = match solved {
            Ok(z) => z,
            Err(e) => {
                warn!(instrument = %helper, error = %e, "pillar solve failed");
                return Err(e.into_calibration(helper.to_string()));
            }
        };
        curve.set_last_discount((-zero * t).exp());
        debug!(instrument = %helper, %pillar, zero, "pillar solved");
        Ok(())
    }
}

fn check_increasing<H: RateHelper>(kind: &str, list: &[H]) -> Result<()> {
    for pair in list.windows(2) {
        rk_core::ensure!(
            pair[0].pillar_date() < pair[1].pillar_date(),
            "{kind} maturities must be strictly increasing: {} is not after {}",
            pair[1].pillar_date(),
            pair[0].pillar_date()
        );
    }
    Ok(())
}

impl DiscountCurve {
    /// Bootstrap a curve at `valuation_date` with default settings.
    pub fn bootstrap(
        valuation_date: Date,
        deposits: &[Deposit],
        fras: &[Fra],
        swaps: &[Swap],
        policy: InterpolationPolicy,
    ) -> Result<Self> {
        CurveBootstrapper::new(valuation_date)
            .with_interpolation(policy)
            .bootstrap(deposits, fras, swaps)
    }
}
