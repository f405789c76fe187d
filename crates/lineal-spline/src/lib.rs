//! Piecewise cubic spline interpolation.
//!
//! [`Spline::build`] assembles the tridiagonal system in the knot second
//! derivatives from the standard continuity equations, hands the solve to the
//! numerical backend, and derives one cubic polynomial per interval in local
//! coordinates. [`Spline::eval`] bisects for the interval and applies
//! Horner's rule; outside the breakpoints the configured extrapolation policy
//! decides between failing, clamping, extending the linear term, or extending
//! the full boundary polynomial.

use lineal_core::{Error, LinearBackend, Result, Vector};
use log::trace;

/// Boundary condition closing the spline system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Boundary {
    /// Equate third derivatives across the first and last interior knots;
    /// needs at least four points.
    NotAKnot,
    /// Zero second derivative at both ends.
    Natural,
    /// Fixed first derivatives at both ends.
    Clamped { da: f64, db: f64 },
}

/// Behavior outside the breakpoint range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extrapolation {
    /// Evaluation outside the domain fails.
    #[default]
    None,
    /// Extend the boundary value.
    Const,
    /// Extend only the linear term of the boundary polynomial.
    Linear,
    /// Extend the full boundary polynomial unclipped.
    Cubic,
}

/// Piecewise cubic interpolant: `n` polynomials
/// `a + b*t + c*t^2 + d*t^3` on local coordinate `t = X - x[i]`.
#[derive(Clone, Debug)]
pub struct Spline {
    x: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
    d: Vec<f64>,
    extrapolation: Extrapolation,
}

impl Spline {
    /// Build a cubic spline through the sample points `(x, y)`.
    ///
    /// Needs at least three points (four for not-a-knot) and strictly
    /// increasing abscissae. The tridiagonal solve goes through the backend's
    /// `gtsv` primitive.
    pub fn build<B: LinearBackend>(
        x: &Vector,
        y: &Vector,
        boundary: Boundary,
        extrapolation: Extrapolation,
        backend: &B,
    ) -> Result<Self> {
        let xs = x.to_vec();
        let ys = y.to_vec();
        if ys.len() != xs.len() {
            return Err(Error::dimension(xs.len(), ys.len(), "spline ordinates"));
        }
        let min_points = if matches!(boundary, Boundary::NotAKnot) {
            4
        } else {
            3
        };
        if xs.len() < min_points {
            return Err(Error::argument(format!(
                "spline needs at least {min_points} points, got {}",
                xs.len()
            )));
        }
        let n = xs.len() - 1;
        let mut h = vec![0.0; n];
        for i in 0..n {
            h[i] = xs[i + 1] - xs[i];
            if !(h[i] > 0.0) {
                return Err(Error::argument(
                    "spline abscissae must be strictly increasing",
                ));
            }
        }

        // Tridiagonal system in the knot second-derivative unknowns.
        let mut dl = vec![0.0; n];
        let mut dm = vec![0.0; n + 1];
        let mut du = vec![0.0; n];
        let mut rhs = vec![0.0; n + 1];
        for i in 1..n {
            dl[i - 1] = h[i - 1];
            dm[i] = 2.0 * (h[i - 1] + h[i]);
            du[i] = h[i];
            rhs[i] = 3.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
        }
        match boundary {
            Boundary::NotAKnot => {
                dm[0] = h[0] - (h[1] * h[1]) / h[0];
                du[0] = 3.0 * h[1] + 2.0 * h[0] + (h[1] * h[1]) / h[0];
                rhs[0] = 3.0 * ((ys[2] - ys[1]) / h[1] - (ys[1] - ys[0]) / h[0]);
                dl[n - 1] = 3.0 * h[n - 2] + 2.0 * h[n - 1] + (h[n - 2] * h[n - 2]) / h[n - 1];
                dm[n] = h[n - 1] - (h[n - 2] * h[n - 2]) / h[n - 1];
                rhs[n] = 3.0
                    * ((ys[n] - ys[n - 1]) / h[n - 1] - (ys[n - 1] - ys[n - 2]) / h[n - 2]);
            }
            Boundary::Natural => {
                dm[0] = 1.0;
                du[0] = 0.0;
                rhs[0] = 0.0;
                dl[n - 1] = 0.0;
                dm[n] = 1.0;
                rhs[n] = 0.0;
            }
            Boundary::Clamped { da, db } => {
                dm[0] = 2.0 * h[0];
                du[0] = h[0];
                rhs[0] = 3.0 * ((ys[1] - ys[0]) / h[0] - da);
                dl[n - 1] = h[n - 1];
                dm[n] = 2.0 * h[n - 1];
                rhs[n] = 3.0 * (db - (ys[n] - ys[n - 1]) / h[n - 1]);
            }
        }

        if !backend.gtsv(n + 1, &mut dl, &mut dm, &mut du, &mut rhs)? {
            return Err(Error::backend("spline system is singular"));
        }
        trace!("spline: solved {} second-derivative unknowns", n + 1);

        // Polynomial coefficients from the solved second derivatives.
        let mut b = vec![0.0; n];
        let mut c = vec![0.0; n];
        let mut d = vec![0.0; n];
        for i in 0..n {
            b[i] = (ys[i + 1] - ys[i]) / h[i] - (2.0 * rhs[i] + rhs[i + 1]) * h[i] / 3.0;
            c[i] = rhs[i];
            d[i] = (rhs[i + 1] - rhs[i]) / (3.0 * h[i]);
        }

        Ok(Spline {
            x: xs,
            a: ys,
            b,
            c,
            d,
            extrapolation,
        })
    }

    /// Number of cubic polynomials (one per interval).
    pub fn polynomial_count(&self) -> usize {
        self.x.len() - 1
    }

    /// The breakpoints, including both endpoints.
    pub fn breakpoints(&self) -> &[f64] {
        &self.x
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Evaluate the interpolant at `at`.
    ///
    /// In-domain evaluation bisects for the interval and applies Horner's
    /// rule. Out-of-domain behavior follows the extrapolation policy; with
    /// [`Extrapolation::None`] it fails. NaN cannot be located in the
    /// breakpoints and is rejected.
    pub fn eval(&self, at: f64) -> Result<f64> {
        let n = self.polynomial_count();
        let (x0, xn) = (self.x[0], self.x[n]);
        if at >= x0 && at <= xn {
            let index = self.x[..n].partition_point(|&k| k <= at).saturating_sub(1);
            let t = at - self.x[index];
            Ok(((self.d[index] * t + self.c[index]) * t + self.b[index]) * t + self.a[index])
        } else if at < x0 {
            match self.extrapolation {
                Extrapolation::None => Err(Error::range("below the spline domain")),
                Extrapolation::Const => Ok(self.a[0]),
                Extrapolation::Linear => {
                    let t = at - x0;
                    Ok(self.b[0] * t + self.a[0])
                }
                Extrapolation::Cubic => {
                    let t = at - x0;
                    Ok(((self.d[0] * t + self.c[0]) * t + self.b[0]) * t + self.a[0])
                }
            }
        } else if at > xn {
            match self.extrapolation {
                Extrapolation::None => Err(Error::range("above the spline domain")),
                Extrapolation::Const => Ok(self.a[n]),
                Extrapolation::Linear => {
                    let t = at - xn;
                    Ok(self.b[n - 1] * t + self.a[n])
                }
                Extrapolation::Cubic => {
                    // The last polynomial keeps its own local coordinate.
                    let t = at - self.x[n - 1];
                    Ok(((self.d[n - 1] * t + self.c[n - 1]) * t + self.b[n - 1]) * t
                        + self.a[n - 1])
                }
            }
        } else {
            Err(Error::argument("cannot evaluate a spline at NaN"))
        }
    }
}
