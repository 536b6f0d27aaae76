//! # rk-time
//!
//! Date, day-count, calendar, schedule, and compounding types.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Business-day adjustment conventions.
pub mod business_day_convention;

/// Weekend-only business calendar.
pub mod calendar;

/// Interest compounding conventions.
pub mod compounding;

/// `Date` type.
pub mod date;

/// Day-count conventions.
pub mod day_count;

/// Payment / compounding frequency.
pub mod frequency;

/// `Period`: a time span in a `TimeUnit`, parsed from tenors such as `"5Y"`.
pub mod period;

/// `Schedule`: an ordered sequence of payment dates.
pub mod schedule;

/// `TimeUnit`: days, weeks, months, years.
pub mod time_unit;

/// `Weekday`: day of the week.
pub mod weekday;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use business_day_convention::BusinessDayConvention;
pub use calendar::WeekendCalendar;
pub use compounding::Compounding;
pub use date::Date;
pub use day_count::DayCount;
pub use frequency::Frequency;
pub use period::Period;
pub use schedule::Schedule;
pub use time_unit::TimeUnit;
pub use weekday::Weekday;
