//! Error types for ratekit.
//!
//! All fallible operations return [`Result`], whose error is a single
//! `thiserror`-derived enum split along the three failure families of the
//! library:
//!
//! * [`Error::Configuration`]: the caller handed in something invalid
//!   (dates out of order, duplicate pillars, bad model parameters). Raised
//!   before any numerics run, via [`ensure!`](crate::ensure).
//! * [`Error::Calibration`]: the bootstrapper could not reproduce a quote.
//!   Carries the offending instrument; no partial curve is ever returned.
//! * [`Error::Numerical`]: a valuation left the domain of its method
//!   (lattice probability outside `[0, 1]`, per-layer drift solve failed,
//!   Black formula with a non-positive forward). Raised via
//!   [`fail!`](crate::fail) and [`ensure_post!`](crate::ensure_post).

use thiserror::Error;

/// The top-level error type used throughout ratekit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid input supplied by the caller.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The curve bootstrap failed for a specific instrument.
    #[error("calibration failed for {instrument}: {reason}")]
    Calibration {
        /// Description of the instrument whose quote could not be matched.
        instrument: String,
        /// What went wrong.
        reason: String,
    },

    /// A numerical method left its domain of validity.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Date construction or arithmetic error.
    #[error("date error: {0}")]
    Date(String),

    /// A one-dimensional root finder did not converge.
    #[error("solver error: {0}")]
    Solver(String),
}

impl Error {
    /// Wrap any error as a calibration failure of `instrument`.
    ///
    /// Configuration errors pass through unchanged so that input problems
    /// are still reported as such.
    pub fn into_calibration(self, instrument: impl Into<String>) -> Error {
        match self {
            Error::Configuration(_) | Error::Calibration { .. } => self,
            other => Error::Calibration {
                instrument: instrument.into(),
                reason: other.to_string(),
            },
        }
    }

    /// Return `true` for [`Error::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Return `true` for [`Error::Calibration`].
    pub fn is_calibration(&self) -> bool {
        matches!(self, Error::Calibration { .. })
    }

    /// Return `true` for [`Error::Numerical`].
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::Numerical(_))
    }
}

/// Shorthand `Result` type used throughout ratekit.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Check an input precondition.
///
/// Returns `Err(Error::Configuration(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use rk_core::{ensure, errors::Error};
/// fn positive(x: f64) -> rk_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Configuration(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Configuration(
                format!($($msg)*)
            ));
        }
    };
}

/// Check a numerical postcondition.
///
/// Returns `Err(Error::Numerical(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use rk_core::{ensure_post, errors::Error};
/// fn probability(p: f64) -> rk_core::errors::Result<f64> {
///     ensure_post!((0.0..=1.0).contains(&p), "probability {p} outside [0, 1]");
///     Ok(p)
/// }
/// assert!(probability(0.5).is_ok());
/// assert!(matches!(probability(1.5), Err(Error::Numerical(_))));
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Numerical(
                format!($($msg)*)
            ));
        }
    };
}

/// Return a numerical error immediately.
///
/// # Example
/// ```
/// use rk_core::{fail, errors::Error};
/// fn always_err() -> rk_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Numerical(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_calibration_wraps_solver_errors() {
        let err = Error::Solver("root not bracketed".into()).into_calibration("Swap 5Y");
        assert!(err.is_calibration());
        assert_eq!(
            err.to_string(),
            "calibration failed for Swap 5Y: solver error: root not bracketed"
        );
    }

    #[test]
    fn into_calibration_keeps_configuration_errors() {
        let err = Error::Configuration("duplicate pillar".into()).into_calibration("Deposit 1M");
        assert!(err.is_configuration());
    }
}
