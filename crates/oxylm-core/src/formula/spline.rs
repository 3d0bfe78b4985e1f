//! Natural cubic spline basis
//!
//! A natural cubic spline is piecewise cubic between knots, with the extra
//! constraint that the function is linear beyond the boundary knots. That
//! constraint tames the wild extrapolation behaviour of unconstrained
//! polynomials and splines near the edges of the data.
//!
//! The basis is built in truncated-power form. With knots ξ_0 < ... < ξ_{K-1}
//! (K = df + 1, placed at evenly spaced quantiles of the training data, with
//! the boundary knots at the minimum and maximum), the df columns are
//!
//! ```text
//! N_1(x) = x
//! N_{k+1}(x) = d_k(x) - d_{K-2}(x),   k = 0, ..., K-3
//! d_k(x) = ((x - ξ_k)³₊ - (x - ξ_{K-1})³₊) / (ξ_{K-1} - ξ_k)
//! ```
//!
//! Knots are stored at fit time so the identical basis applies to new data.

use serde::{Deserialize, Serialize};

use crate::data::{Matrix, Vector};
use crate::formula::error::{FormulaError, FormulaResult};

/// Natural cubic spline basis fitted to training data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalSplineBasis {
    df: usize,
    /// Interior and boundary knots, strictly increasing
    knots: Vec<f64>,
}

impl NaturalSplineBasis {
    /// Fit a natural spline basis with `df` degrees of freedom to `x`
    ///
    /// Places df + 1 knots at evenly spaced quantiles of `x`; the first and
    /// last knots sit at the minimum and maximum.
    pub fn fit(x: &Vector, df: usize) -> FormulaResult<Self> {
        if df < 1 {
            return Err(FormulaError::function("ns", "df must be at least 1"));
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(FormulaError::function(
                "ns",
                "input contains non-finite values",
            ));
        }

        let n_knots = df + 1;
        if x.len() < n_knots {
            return Err(FormulaError::function(
                "ns",
                format!("df {} requires at least {} observations", df, n_knots),
            ));
        }

        let mut sorted: Vec<f64> = x.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let knots: Vec<f64> = (0..n_knots)
            .map(|i| quantile(&sorted, i as f64 / (n_knots - 1) as f64))
            .collect();

        if knots.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FormulaError::function(
                "ns",
                format!("quantile knots are not strictly increasing: {:?}", knots),
            ));
        }

        Ok(Self { df, knots })
    }

    /// Degrees of freedom (number of basis columns)
    pub fn df(&self) -> usize {
        self.df
    }

    /// The fitted knot locations
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Evaluate the basis on (possibly new) data
    ///
    /// Returns an n × df matrix. Observations outside the boundary knots are
    /// extrapolated linearly, which is exactly what the natural constraint
    /// guarantees.
    pub fn eval(&self, x: &Vector) -> FormulaResult<Matrix> {
        if x.iter().any(|v| !v.is_finite()) {
            return Err(FormulaError::function(
                "ns",
                "input contains non-finite values",
            ));
        }

        let n = x.len();
        let k = self.knots.len();
        let mut basis = Matrix::zeros((n, self.df));

        for (i, &xi) in x.iter().enumerate() {
            basis[[i, 0]] = xi;

            if self.df > 1 {
                let d_last = self.scaled_power(xi, k - 2);
                for j in 0..k - 2 {
                    basis[[i, j + 1]] = self.scaled_power(xi, j) - d_last;
                }
            }
        }

        Ok(basis)
    }

    /// d_k(x) in the truncated-power representation
    fn scaled_power(&self, x: f64, k: usize) -> f64 {
        let last = self.knots[self.knots.len() - 1];
        let cube = |v: f64| {
            let t = v.max(0.0);
            t * t * t
        };
        (cube(x - self.knots[k]) - cube(x - last)) / (last - self.knots[k])
    }
}

/// Linear-interpolation quantile of pre-sorted data, q in [0, 1]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
