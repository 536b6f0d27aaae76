//! Calibration instruments for curve bootstrapping.
//!
//! Each instrument pairs a market quote with the conventions needed to
//! recompute that quote from a curve. The bootstrapper places one pillar on
//! every instrument's [`pillar_date`](RateHelper::pillar_date) and solves for
//! the discount factor there until
//! [`implied_quote`](RateHelper::implied_quote) matches
//! [`quote`](RateHelper::quote).
//!
//! Every quote is a par rate on a single discounting curve; FRA quotes are
//! used as-is, without any convexity adjustment.

use crate::fixed_leg::FixedLeg;
use crate::yield_term_structure::YieldTermStructure;
use rk_core::errors::Result;
use rk_core::{DiscountFactor, Rate, Real, SwapType, Time};
use rk_time::{
    BusinessDayConvention, Date, DayCount, Frequency, Period, Schedule, WeekendCalendar,
};

// ── RateHelper trait ──────────────────────────────────────────────────────────

/// A single market quote that constrains a discount curve at a pillar date.
pub trait RateHelper: std::fmt::Debug + std::fmt::Display + Send + Sync {
    /// Date from which the instrument accrues.
    fn start_date(&self) -> Date;

    /// Date up to which the instrument constrains the curve.
    fn pillar_date(&self) -> Date;

    /// The quoted par rate.
    fn quote(&self) -> Rate;

    /// The par rate implied by `curve`.
    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Rate;

    /// Discount factor at the pillar given the one at the start date, when
    /// the quote pins it down in closed form.
    fn pillar_discount(&self, _start_discount: DiscountFactor) -> Option<DiscountFactor> {
        None
    }
}

/// Simple-rate accrual shared by deposits and FRAs.
fn simple_forward(
    curve: &dyn YieldTermStructure,
    start: Date,
    end: Date,
    day_count: DayCount,
) -> Rate {
    let tau = day_count.year_fraction(start, end);
    (curve.discount(start) / curve.discount(end) - 1.0) / tau
}

// ── Deposit ───────────────────────────────────────────────────────────────────

/// A money-market deposit paying simple interest at maturity.
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    start: Date,
    maturity: Date,
    rate: Rate,
    day_count: DayCount,
}

impl Deposit {
    /// Deposit between explicit dates.
    pub fn new(start: Date, maturity: Date, rate: Rate, day_count: DayCount) -> Result<Self> {
        rk_core::ensure!(
            start < maturity,
            "deposit start {start} must be before maturity {maturity}"
        );
        Ok(Self {
            start,
            maturity,
            rate,
            day_count,
        })
    }

    /// Deposit running for `tenor` from `start`; the maturity is rolled
    /// Modified Following on the weekend calendar.
    pub fn from_tenor(start: Date, tenor: Period, rate: Rate, day_count: DayCount) -> Result<Self> {
        let maturity =
            WeekendCalendar.advance(start, tenor, BusinessDayConvention::ModifiedFollowing)?;
        Self::new(start, maturity, rate, day_count)
    }

    /// Maturity date.
    pub fn maturity_date(&self) -> Date {
        self.maturity
    }

    /// Accrual day count.
    pub fn day_count(&self) -> DayCount {
        self.day_count
    }

    /// Accrual fraction from start to maturity.
    pub fn accrual(&self) -> Time {
        self.day_count.year_fraction(self.start, self.maturity)
    }
}

impl RateHelper for Deposit {
    fn start_date(&self) -> Date {
        self.start
    }

    fn pillar_date(&self) -> Date {
        self.maturity
    }

    fn quote(&self) -> Rate {
        self.rate
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Rate {
        simple_forward(curve, self.start, self.maturity, self.day_count)
    }

    fn pillar_discount(&self, start_discount: DiscountFactor) -> Option<DiscountFactor> {
        Some(start_discount / (1.0 + self.rate * self.accrual()))
    }
}

impl std::fmt::Display for Deposit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "deposit {} to {} at {:.4}%",
            self.start,
            self.maturity,
            self.rate * 100.0
        )
    }
}

// ── Fra ───────────────────────────────────────────────────────────────────────

/// A forward rate agreement on a single accrual period.
#[derive(Debug, Clone, PartialEq)]
pub struct Fra {
    start: Date,
    maturity: Date,
    rate: Rate,
    day_count: DayCount,
}

impl Fra {
    /// FRA accruing from `start` to `maturity`.
    pub fn new(start: Date, maturity: Date, rate: Rate, day_count: DayCount) -> Result<Self> {
        rk_core::ensure!(
            start < maturity,
            "FRA start {start} must be before maturity {maturity}"
        );
        Ok(Self {
            start,
            maturity,
            rate,
            day_count,
        })
    }

    /// FRA starting `months_to_start` and ending `months_to_end` months after
    /// `spot`, both rolled Modified Following.
    pub fn from_months(
        spot: Date,
        months_to_start: i32,
        months_to_end: i32,
        rate: Rate,
        day_count: DayCount,
    ) -> Result<Self> {
        let cal = WeekendCalendar;
        let conv = BusinessDayConvention::ModifiedFollowing;
        let start = cal.advance(spot, Period::months(months_to_start), conv)?;
        let maturity = cal.advance(spot, Period::months(months_to_end), conv)?;
        Self::new(start, maturity, rate, day_count)
    }

    /// Maturity date.
    pub fn maturity_date(&self) -> Date {
        self.maturity
    }

    /// Accrual fraction from start to maturity.
    pub fn accrual(&self) -> Time {
        self.day_count.year_fraction(self.start, self.maturity)
    }
}

impl RateHelper for Fra {
    fn start_date(&self) -> Date {
        self.start
    }

    fn pillar_date(&self) -> Date {
        self.maturity
    }

    fn quote(&self) -> Rate {
        self.rate
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Rate {
        simple_forward(curve, self.start, self.maturity, self.day_count)
    }

    fn pillar_discount(&self, start_discount: DiscountFactor) -> Option<DiscountFactor> {
        Some(start_discount / (1.0 + self.rate * self.accrual()))
    }
}

impl std::fmt::Display for Fra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FRA {} to {} at {:.4}%",
            self.start,
            self.maturity,
            self.rate * 100.0
        )
    }
}

// ── Swap ──────────────────────────────────────────────────────────────────────

/// A vanilla fixed-for-floating interest-rate swap.
///
/// The fixed schedule is generated backward from the maturity date and
/// rolled Following; the last adjusted fixed payment date is the pillar.
#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    swap_type: SwapType,
    fixed_rate: Rate,
    fixed_leg: FixedLeg,
    float_schedule: Schedule,
    float_frequency: Frequency,
    float_day_count: DayCount,
    notional: Real,
}

impl Swap {
    /// Swap from `start` to `maturity` paying (or receiving) `fixed_rate`.
    ///
    /// The floating leg defaults to quarterly Actual/360 and the notional
    /// to one.
    pub fn new(
        start: Date,
        maturity: Date,
        swap_type: SwapType,
        fixed_rate: Rate,
        fixed_frequency: Frequency,
        fixed_day_count: DayCount,
    ) -> Result<Self> {
        rk_core::ensure!(
            start < maturity,
            "swap start {start} must be before maturity {maturity}"
        );
        let fixed_leg = FixedLeg::new(start, maturity, fixed_frequency, fixed_day_count)?;
        let float_frequency = Frequency::Quarterly;
        let float_schedule = Schedule::backward(
            start,
            maturity,
            float_frequency.period(),
            BusinessDayConvention::Following,
        )?;
        Ok(Self {
            swap_type,
            fixed_rate,
            fixed_leg,
            float_schedule,
            float_frequency,
            float_day_count: DayCount::Actual360,
            notional: 1.0,
        })
    }

    /// Swap running for `tenor` from `start`.
    pub fn from_tenor(
        start: Date,
        tenor: Period,
        swap_type: SwapType,
        fixed_rate: Rate,
        fixed_frequency: Frequency,
        fixed_day_count: DayCount,
    ) -> Result<Self> {
        let maturity = tenor.add_to(start)?;
        Self::new(
            start,
            maturity,
            swap_type,
            fixed_rate,
            fixed_frequency,
            fixed_day_count,
        )
    }

    /// Replace the floating-leg conventions.
    pub fn with_float_leg(mut self, frequency: Frequency, day_count: DayCount) -> Result<Self> {
        self.float_schedule = Schedule::backward(
            self.fixed_leg.schedule().start_date(),
            self.fixed_leg.schedule().end_date(),
            frequency.period(),
            BusinessDayConvention::Following,
        )?;
        self.float_frequency = frequency;
        self.float_day_count = day_count;
        Ok(self)
    }

    /// Replace the notional.
    pub fn with_notional(mut self, notional: Real) -> Result<Self> {
        rk_core::ensure!(notional > 0.0, "notional must be positive, got {notional}");
        self.notional = notional;
        Ok(self)
    }

    /// Payer or receiver.
    pub fn swap_type(&self) -> SwapType {
        self.swap_type
    }

    /// The fixed coupon rate.
    pub fn fixed_rate(&self) -> Rate {
        self.fixed_rate
    }

    /// The fixed leg.
    pub fn fixed_leg(&self) -> &FixedLeg {
        &self.fixed_leg
    }

    /// Floating-leg payment frequency.
    pub fn float_frequency(&self) -> Frequency {
        self.float_frequency
    }

    /// Floating-leg accrual day count.
    pub fn float_day_count(&self) -> DayCount {
        self.float_day_count
    }

    /// Notional amount.
    pub fn notional(&self) -> Real {
        self.notional
    }

    /// Adjusted final payment date.
    pub fn maturity_date(&self) -> Date {
        self.fixed_leg.end_date()
    }

    /// Fixed-leg annuity per unit notional.
    pub fn annuity(&self, curve: &dyn YieldTermStructure) -> Real {
        self.fixed_leg.annuity(curve)
    }

    /// Par fixed rate implied by `curve`.
    pub fn par_rate(&self, curve: &dyn YieldTermStructure) -> Rate {
        self.fixed_leg.par_rate(curve)
    }

    /// Present value of the floating leg per unit notional, projecting each
    /// coupon off the discount curve.
    pub fn float_leg_value(&self, curve: &dyn YieldTermStructure) -> Real {
        self.float_schedule
            .periods()
            .map(|(s, e)| {
                let tau = self.float_day_count.year_fraction(s, e);
                simple_forward(curve, s, e, self.float_day_count) * tau * curve.discount(e)
            })
            .sum()
    }

    /// Present value to the holder: float minus fixed for a payer, the
    /// reverse for a receiver.
    pub fn value(&self, curve: &dyn YieldTermStructure) -> Real {
        let fixed = self.fixed_rate * self.annuity(curve);
        self.swap_type.sign() * self.notional * (self.float_leg_value(curve) - fixed)
    }
}

impl RateHelper for Swap {
    fn start_date(&self) -> Date {
        self.fixed_leg.start_date()
    }

    fn pillar_date(&self) -> Date {
        self.fixed_leg.end_date()
    }

    fn quote(&self) -> Rate {
        self.fixed_rate
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Rate {
        self.par_rate(curve)
    }
}

impl std::fmt::Display for Swap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} swap {} to {} at {:.4}%",
            self.swap_type,
            self.start_date(),
            self.maturity_date(),
            self.fixed_rate * 100.0
        )
    }
}

// ── CalibrationInstrument ─────────────────────────────────────────────────────

/// Any of the instruments the bootstrapper accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationInstrument {
    /// A money-market deposit.
    Deposit(Deposit),
    /// A forward rate agreement.
    Fra(Fra),
    /// A par swap.
    Swap(Swap),
}

impl CalibrationInstrument {
    fn helper(&self) -> &dyn RateHelper {
        match self {
            CalibrationInstrument::Deposit(d) => d,
            CalibrationInstrument::Fra(f) => f,
            CalibrationInstrument::Swap(s) => s,
        }
    }
}

impl RateHelper for CalibrationInstrument {
    fn start_date(&self) -> Date {
        self.helper().start_date()
    }

    fn pillar_date(&self) -> Date {
        self.helper().pillar_date()
    }

    fn quote(&self) -> Rate {
        self.helper().quote()
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure) -> Rate {
        self.helper().implied_quote(curve)
    }

    fn pillar_discount(&self, start_discount: DiscountFactor) -> Option<DiscountFactor> {
        self.helper().pillar_discount(start_discount)
    }
}

impl std::fmt::Display for CalibrationInstrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.helper(), f)
    }
}

impl From<Deposit> for CalibrationInstrument {
    fn from(d: Deposit) -> Self {
        CalibrationInstrument::Deposit(d)
    }
}

impl From<Fra> for CalibrationInstrument {
    fn from(f: Fra) -> Self {
        CalibrationInstrument::Fra(f)
    }
}

impl From<Swap> for CalibrationInstrument {
    fn from(s: Swap) -> Self {
        CalibrationInstrument::Swap(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat_forward::FlatForward;
    use approx::assert_abs_diff_eq;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn deposit_tenor_rolls_modified_following() {
        let dep = Deposit::from_tenor(
            date(2014, 2, 28),
            Period::months(3),
            0.01,
            DayCount::Actual360,
        )
        .unwrap();
        assert_eq!(dep.maturity_date(), date(2014, 5, 28));
        // 2014-05-31 is a Saturday: Modified Following stays in May.
        let dep = Deposit::from_tenor(
            date(2014, 3, 31),
            Period::months(2),
            0.01,
            DayCount::Actual360,
        )
        .unwrap();
        assert_eq!(dep.maturity_date(), date(2014, 5, 30));
    }

    #[test]
    fn swap_at_par_has_zero_value() {
        let today = date(2020, 3, 2);
        let curve = FlatForward::continuous(today, 0.025);
        let mut swap = Swap::from_tenor(
            today,
            Period::years(7),
            SwapType::Payer,
            0.0,
            Frequency::Semiannual,
            DayCount::Thirty360Bond,
        )
        .unwrap();
        let par = swap.par_rate(&curve);
        swap.fixed_rate = par;
        assert_abs_diff_eq!(swap.value(&curve), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn payer_and_receiver_values_offset() {
        let today = date(2020, 3, 2);
        let curve = FlatForward::continuous(today, 0.025);
        let payer = Swap::from_tenor(
            today,
            Period::years(5),
            SwapType::Payer,
            0.03,
            Frequency::Annual,
            DayCount::Thirty360E,
        )
        .unwrap()
        .with_notional(1.0e6)
        .unwrap();
        let mut receiver = payer.clone();
        receiver.swap_type = SwapType::Receiver;
        assert!(payer.value(&curve) < 0.0);
        assert_abs_diff_eq!(payer.value(&curve) + receiver.value(&curve), 0.0, epsilon = 1e-8);
        let expected = 1.0e6 * (payer.par_rate(&curve) - 0.03) * payer.annuity(&curve);
        assert_abs_diff_eq!(payer.value(&curve), expected, epsilon = 1e-8);
    }

    #[test]
    fn closed_form_deposit_discount() {
        let dep = Deposit::new(date(2020, 1, 2), date(2020, 7, 2), 0.02, DayCount::Actual360)
            .unwrap();
        let tau = 182.0 / 360.0;
        assert_abs_diff_eq!(
            dep.pillar_discount(1.0).unwrap(),
            1.0 / (1.0 + 0.02 * tau),
            epsilon = 1e-15
        );
        let swap: CalibrationInstrument = Swap::from_tenor(
            date(2020, 1, 2),
            Period::years(2),
            SwapType::Payer,
            0.02,
            Frequency::Annual,
            DayCount::Actual365Fixed,
        )
        .unwrap()
        .into();
        assert!(swap.pillar_discount(1.0).is_none());
    }
}
