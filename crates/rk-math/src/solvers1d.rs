//! One-dimensional root finders.
//!
//! Both solvers take a fallible objective, so errors raised while
//! evaluating a trial point (an interpolation outside its domain, say)
//! abort the search and propagate unchanged. Failing to bracket a root or
//! exhausting `max_iterations` is reported as [`Error::Solver`].

use rk_core::{
    errors::{Error, Result},
    Real, Size,
};

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for a root of `f` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation. The
/// endpoints must bracket a sign change.
pub fn brent<F>(
    mut f: F,
    x_min: Real,
    x_max: Real,
    accuracy: Real,
    max_iterations: Size,
) -> Result<Real>
where
    F: FnMut(Real) -> Result<Real>,
{
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a)?;
    let mut fb = f(b)?;

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa * fb > 0.0 || !(fa * fb).is_finite() {
        return Err(Error::Solver(format!(
            "root not bracketed: f({a}) = {fa}, f({b}) = {fb}"
        )));
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iterations {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * accuracy;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b)?;
    }
    Err(Error::Solver(format!(
        "Brent: no convergence after {max_iterations} iterations (last x = {b})"
    )))
}

// ── Newton-Raphson ────────────────────────────────────────────────────────────

/// Safeguarded Newton-Raphson on `[x_min, x_max]`.
///
/// `f_df` returns the value and the derivative. A step that would leave the
/// current bracket, or a vanishing derivative, is replaced by a bisection
/// step, so the search never escapes the interval. The endpoints must
/// bracket a sign change.
pub fn newton<F>(
    mut f_df: F,
    x0: Real,
    x_min: Real,
    x_max: Real,
    accuracy: Real,
    max_iterations: Size,
) -> Result<Real>
where
    F: FnMut(Real) -> Result<(Real, Real)>,
{
    let (f_lo, _) = f_df(x_min)?;
    let (f_hi, _) = f_df(x_max)?;
    if f_lo == 0.0 {
        return Ok(x_min);
    }
    if f_hi == 0.0 {
        return Ok(x_max);
    }
    if f_lo * f_hi > 0.0 {
        return Err(Error::Solver(format!(
            "root not bracketed: f({x_min}) = {f_lo}, f({x_max}) = {f_hi}"
        )));
    }
    // orient so that f(lo) < 0 < f(hi)
    let (mut lo, mut hi) = if f_lo < 0.0 {
        (x_min, x_max)
    } else {
        (x_max, x_min)
    };

    let mut x = x0.clamp(x_min.min(x_max), x_min.max(x_max));
    for _ in 0..max_iterations {
        let (fx, dfx) = f_df(x)?;
        if fx == 0.0 {
            return Ok(x);
        }
        if fx < 0.0 {
            lo = x;
        } else {
            hi = x;
        }
        let newton_x = if dfx.abs() > f64::EPSILON {
            x - fx / dfx
        } else {
            Real::NAN
        };
        let inside = (newton_x - lo) * (newton_x - hi) < 0.0;
        let next = if inside { newton_x } else { 0.5 * (lo + hi) };
        if (next - x).abs() < accuracy {
            return Ok(next);
        }
        x = next;
    }
    Err(Error::Solver(format!(
        "Newton: no convergence after {max_iterations} iterations (last x = {x})"
    )))
}
