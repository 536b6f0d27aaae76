//! Property tests for the date conventions shared by every instrument.

use proptest::prelude::*;
use rk_time::{BusinessDayConvention, Date, DayCount, Period, WeekendCalendar};

fn any_date() -> impl Strategy<Value = Date> {
    (Date::MIN.serial() + 10..Date::MAX.serial() - 4000)
        .prop_map(|s| Date::from_serial(s).unwrap())
}

proptest! {
    #[test]
    fn adjusted_dates_are_business_days(d in any_date()) {
        let cal = WeekendCalendar;
        for conv in [
            BusinessDayConvention::Following,
            BusinessDayConvention::ModifiedFollowing,
            BusinessDayConvention::Preceding,
            BusinessDayConvention::ModifiedPreceding,
        ] {
            let adj = cal.adjust(d, conv).unwrap();
            prop_assert!(cal.is_business_day(adj));
            prop_assert!((adj - d).abs() <= 3);
        }
    }

    #[test]
    fn modified_following_never_changes_month(d in any_date()) {
        let adj = WeekendCalendar
            .adjust(d, BusinessDayConvention::ModifiedFollowing)
            .unwrap();
        prop_assert_eq!(adj.month(), d.month());
    }

    #[test]
    fn thirty_e_360_year_is_exactly_one(d in any_date()) {
        let one_year = Period::years(1).add_to(d).unwrap();
        if d.day_of_month() <= 28 {
            let yf = DayCount::Thirty360E.year_fraction(d, one_year);
            prop_assert!((yf - 1.0).abs() < 1e-15);
        }
    }

    #[test]
    fn year_fractions_are_antisymmetric(a in any_date(), b in any_date()) {
        for dc in [DayCount::Actual365Fixed, DayCount::Actual360, DayCount::ActualActualIsda] {
            let fwd = dc.year_fraction(a, b);
            let bwd = dc.year_fraction(b, a);
            prop_assert!((fwd + bwd).abs() < 1e-12);
        }
    }
}

#[test]
fn deposit_tenors_from_strings() {
    let spot = Date::from_ymd(2014, 3, 4).unwrap();
    let cal = WeekendCalendar;
    let roll = |tenor: &str| {
        cal.advance(
            spot,
            tenor.parse::<Period>().unwrap(),
            BusinessDayConvention::ModifiedFollowing,
        )
        .unwrap()
    };
    assert_eq!(roll("1W"), Date::from_ymd(2014, 3, 11).unwrap());
    assert_eq!(roll("1M"), Date::from_ymd(2014, 4, 4).unwrap());
    // 2014-09-04 is a Thursday, 2014-10-04 a Saturday.
    assert_eq!(roll("6M"), Date::from_ymd(2014, 9, 4).unwrap());
    assert_eq!(roll("7M"), Date::from_ymd(2014, 10, 6).unwrap());
}
