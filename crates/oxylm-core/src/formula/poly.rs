//! Orthogonal polynomial basis
//!
//! Raw polynomial columns (x, x², x³, ...) are nearly collinear for most
//! data. This module instead builds polynomials that are orthogonal over the
//! training values of x, via the classic three-term recurrence. The recurrence
//! coefficients are stored so that the same basis can be re-applied to new
//! data at prediction time.

use serde::{Deserialize, Serialize};

use crate::data::{Matrix, Vector};
use crate::formula::error::{FormulaError, FormulaResult};

/// Orthogonal polynomial basis fitted to training data
///
/// The basis polynomials p_1, ..., p_d satisfy the recurrence
///
/// ```text
/// p_{j+1}(x) = (x - alpha[j]) * p_j(x) - (norm2[j] / norm2[j-1]) * p_{j-1}(x)
/// ```
///
/// with p_0 = 1, and `norm2[j]` the squared norm of p_j over the training
/// values. Evaluated columns are normalized to unit length on the training
/// data, so on the training set the columns are orthonormal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthogonalPoly {
    degree: usize,
    /// Recurrence shifts; alpha[j] generates p_{j+1}
    alpha: Vec<f64>,
    /// Squared norms of p_0, ..., p_d over the training data
    norm2: Vec<f64>,
}

impl OrthogonalPoly {
    /// Fit an orthogonal polynomial basis of the given degree to `x`
    pub fn fit(x: &Vector, degree: usize) -> FormulaResult<Self> {
        if degree == 0 {
            return Err(FormulaError::function(
                "poly",
                "degree must be at least 1",
            ));
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(FormulaError::function(
                "poly",
                "input contains non-finite values",
            ));
        }

        let mut distinct: Vec<f64> = x.to_vec();
        distinct.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        distinct.dedup();
        if distinct.len() <= degree {
            return Err(FormulaError::function(
                "poly",
                format!(
                    "degree {} requires more than {} distinct values",
                    degree,
                    distinct.len()
                ),
            ));
        }

        let n = x.len();
        let mut alpha = Vec::with_capacity(degree);
        let mut norm2 = Vec::with_capacity(degree + 1);

        // p_0 = 1
        let mut p_prev = Vector::zeros(n);
        let mut p_curr = Vector::ones(n);
        norm2.push(n as f64);

        for j in 0..degree {
            // alpha[j] = <x p_j, p_j> / <p_j, p_j>
            let a = x
                .iter()
                .zip(p_curr.iter())
                .map(|(&xi, &pi)| xi * pi * pi)
                .sum::<f64>()
                / norm2[j];
            alpha.push(a);

            let beta = if j == 0 {
                0.0
            } else {
                norm2[j] / norm2[j - 1]
            };

            let p_next: Vector = x
                .iter()
                .zip(p_curr.iter().zip(p_prev.iter()))
                .map(|(&xi, (&pc, &pp))| (xi - a) * pc - beta * pp)
                .collect();

            let sq = p_next.iter().map(|v| v * v).sum::<f64>();
            if sq <= f64::EPSILON * n as f64 {
                return Err(FormulaError::NumericalError {
                    message: format!("polynomial basis degenerate at degree {}", j + 1),
                    operation: "poly".to_string(),
                });
            }
            norm2.push(sq);

            p_prev = p_curr;
            p_curr = p_next;
        }

        Ok(Self {
            degree,
            alpha,
            norm2,
        })
    }

    /// Degree of the basis
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Evaluate the basis on (possibly new) data
    ///
    /// Returns an n × degree matrix; column j-1 holds the normalized
    /// polynomial p_j evaluated at each observation.
    pub fn eval(&self, x: &Vector) -> FormulaResult<Matrix> {
        if x.iter().any(|v| !v.is_finite()) {
            return Err(FormulaError::function(
                "poly",
                "input contains non-finite values",
            ));
        }

        let n = x.len();
        let mut basis = Matrix::zeros((n, self.degree));

        let mut p_prev = Vector::zeros(n);
        let mut p_curr = Vector::ones(n);

        for j in 0..self.degree {
            let a = self.alpha[j];
            let beta = if j == 0 {
                0.0
            } else {
                self.norm2[j] / self.norm2[j - 1]
            };

            let p_next: Vector = x
                .iter()
                .zip(p_curr.iter().zip(p_prev.iter()))
                .map(|(&xi, (&pc, &pp))| (xi - a) * pc - beta * pp)
                .collect();

            let scale = self.norm2[j + 1].sqrt();
            for (i, &v) in p_next.iter().enumerate() {
                basis[[i, j]] = v / scale;
            }

            p_prev = p_curr;
            p_curr = p_next;
        }

        Ok(basis)
    }
}
