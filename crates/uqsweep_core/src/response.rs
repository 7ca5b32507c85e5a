//! Response surfaces
//!
//! A response surface approximates the black-box output as a cheap
//! function of the inputs, so the output distribution can be estimated by
//! resampling the surface instead of re-running the model. Two forms:
//! a Legendre-basis polynomial reconstructed from polynomial-chaos
//! coefficients, and a multiquadric radial-basis interpolant over
//! scattered samples. Both keep their training data so fit quality is
//! always measurable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chaos::ChaosBasis;
use crate::error::{PdfError, StrategyError};
use crate::parameter::Parameter;
use crate::pdf::Pdf;

/// A fitted approximation of the model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseSurface {
    Poly(PolyResponse),
    Rbf(RbfResponse),
}

impl ResponseSurface {
    /// Evaluate at one point in physical parameter coordinates
    #[must_use]
    pub fn eval(&self, point: &[f64]) -> f64 {
        match self {
            ResponseSurface::Poly(p) => p.eval(point),
            ResponseSurface::Rbf(r) => r.eval(point),
        }
    }

    /// `(rmse, rmse_percent)` against the training data
    #[must_use]
    pub fn rmse(&self) -> (f64, f64) {
        match self {
            ResponseSurface::Poly(p) => {
                rmse_of(&p.train_points, &p.train_values, |pt| p.eval(pt))
            }
            ResponseSurface::Rbf(r) => rmse_of(&r.points, &r.values, |pt| r.eval(pt)),
        }
    }

    /// Estimate the output density by pushing descriptive samples of each
    /// parameter through the surface
    pub fn sample_pdf<R: Rng + ?Sized>(
        &self,
        params: &[Parameter],
        n: usize,
        rng: &mut R,
    ) -> Result<Pdf, PdfError> {
        if params.is_empty() || n == 0 {
            return Err(PdfError::EmptyInput);
        }
        let columns: Vec<Vec<f64>> = params.iter().map(|p| p.pdf.ds(n, rng)).collect();
        let evals: Vec<f64> = (0..n)
            .map(|i| {
                let row: Vec<f64> = columns.iter().map(|c| c[i]).collect();
                self.eval(&row)
            })
            .collect();
        Pdf::experimental(&evals, 0, params[0].pdf.config())
    }
}

/// Legendre-basis polynomial surface from chaos coefficients
///
/// Physical coordinates map into the canonical cube through per-dimension
/// affine transforms `(x - center) / halfwidth` taken from the parameter
/// collocation ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolyResponse {
    pub basis: ChaosBasis,
    /// Chaos coefficients, one per basis term
    pub coefficients: Vec<f64>,
    pub centers: Vec<f64>,
    pub halfwidths: Vec<f64>,
    pub train_points: Vec<Vec<f64>>,
    pub train_values: Vec<f64>,
}

impl PolyResponse {
    #[must_use]
    pub fn eval(&self, point: &[f64]) -> f64 {
        let unit: Vec<f64> = point
            .iter()
            .zip(self.centers.iter().zip(&self.halfwidths))
            .map(|(&x, (&c, &h))| (x - c) / h)
            .collect();
        self.basis
            .eval(&unit)
            .iter()
            .zip(&self.coefficients)
            .map(|(b, c)| b * c)
            .sum()
    }

    /// The constant term, which is the surface mean over the canonical cube
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.coefficients.first().copied().unwrap_or(0.0)
    }

    /// Standard deviation implied by the chaos coefficients
    ///
    /// Orthogonality makes the variance a weighted sum of squared
    /// non-constant coefficients.
    #[must_use]
    pub fn dev(&self) -> f64 {
        self.coefficients
            .iter()
            .zip(self.basis.norms())
            .skip(1)
            .map(|(c, h2)| c * c * h2)
            .sum::<f64>()
            .sqrt()
    }
}

/// Multiquadric radial-basis interpolant over scattered samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RbfResponse {
    pub points: Vec<Vec<f64>>,
    pub values: Vec<f64>,
    pub epsilon: f64,
    weights: Vec<f64>,
}

impl RbfResponse {
    /// Fit an interpolant through `(points, values)`
    ///
    /// `epsilon` defaults to the approximate average node spacing.
    pub fn fit(
        points: Vec<Vec<f64>>,
        values: Vec<f64>,
        epsilon: Option<f64>,
    ) -> Result<Self, StrategyError> {
        if points.is_empty() || points.len() != values.len() {
            return Err(StrategyError::ResponseFit(
                "need matching, non-empty points and values",
            ));
        }
        let epsilon = epsilon.unwrap_or_else(|| default_epsilon(&points));

        let n = points.len();
        let mut matrix: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| multiquadric(distance(&points[i], &points[j]), epsilon))
                    .collect()
            })
            .collect();
        let weights = solve(&mut matrix, values.clone())?;

        Ok(Self {
            points,
            values,
            epsilon,
            weights,
        })
    }

    #[must_use]
    pub fn eval(&self, point: &[f64]) -> f64 {
        self.points
            .iter()
            .zip(&self.weights)
            .map(|(p, w)| w * multiquadric(distance(p, point), self.epsilon))
            .sum()
    }
}

fn multiquadric(r: f64, epsilon: f64) -> f64 {
    ((r / epsilon).powi(2) + 1.0).sqrt()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Geometric-mean bounding-box edge divided by the node count
fn default_epsilon(points: &[Vec<f64>]) -> f64 {
    let ndim = points[0].len();
    let mut prod = 1.0;
    let mut count = 0;
    for d in 0..ndim {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for p in points {
            lo = lo.min(p[d]);
            hi = hi.max(p[d]);
        }
        if hi > lo {
            prod *= hi - lo;
            count += 1;
        }
    }
    if count == 0 {
        return 1.0;
    }
    prod.powf(1.0 / count as f64) / points.len() as f64
}

/// Gaussian elimination with partial pivoting; consumes the matrix
fn solve(matrix: &mut [Vec<f64>], mut rhs: Vec<f64>) -> Result<Vec<f64>, StrategyError> {
    let n = rhs.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))
            .ok_or(StrategyError::ResponseFit("empty system"))?;
        if matrix[pivot][col].abs() < 1e-12 {
            return Err(StrategyError::ResponseFit(
                "singular interpolation matrix (duplicate sample points?)",
            ));
        }
        matrix.swap(col, pivot);
        rhs.swap(col, pivot);
        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }
    let mut out = vec![0.0; n];
    for col in (0..n).rev() {
        let mut acc = rhs[col];
        for k in col + 1..n {
            acc -= matrix[col][k] * out[k];
        }
        out[col] = acc / matrix[col][col];
    }
    Ok(out)
}

/// `(rmse, rmse_percent)` of a predictor against its training set
fn rmse_of<F: Fn(&[f64]) -> f64>(points: &[Vec<f64>], values: &[f64], predict: F) -> (f64, f64) {
    if points.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let sq_sum: f64 = points
        .iter()
        .zip(values)
        .map(|(p, &v)| (predict(p) - v).powi(2))
        .sum();
    let rmse = (sq_sum / points.len() as f64).sqrt();
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pct = if hi > lo { 100.0 * rmse / (hi - lo) } else { 0.0 };
    (rmse, pct)
}
