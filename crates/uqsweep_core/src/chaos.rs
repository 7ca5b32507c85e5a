//! Tensor Legendre basis for generalized polynomial chaos
//!
//! A [`ChaosBasis`] owns the multi-index sequence and normalization
//! constants for a given dimension and polynomial degree, so repeated
//! projections reuse the tables without any process-wide cache.

use serde::{Deserialize, Serialize};

use crate::numeric::binomial;

/// Multi-indices and norms of the tensor Legendre basis
///
/// Indices are graded by total degree; within one degree they run in
/// reverse-lexicographic order (`[2,0], [1,1], [0,2]`), giving a stable
/// coefficient layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaosBasis {
    ndim: usize,
    degree: usize,
    indices: Vec<Vec<usize>>,
    /// Squared norms `E[P_idx^2]` under the uniform measure on `[-1,1]^ndim`
    norms: Vec<f64>,
}

impl ChaosBasis {
    #[must_use]
    pub fn new(ndim: usize, degree: usize) -> Self {
        let indices = chaos_sequence(ndim, degree);
        let norms = indices
            .iter()
            .map(|idx| {
                idx.iter()
                    .map(|&n| 1.0 / (2 * n + 1) as f64)
                    .product::<f64>()
            })
            .collect();
        Self {
            ndim,
            degree,
            indices,
            norms,
        }
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of basis terms, `C(ndim + degree, degree)`
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn indices(&self) -> &[Vec<usize>] {
        &self.indices
    }

    #[must_use]
    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    /// All basis polynomials evaluated at one point in `[-1,1]^ndim`
    #[must_use]
    pub fn eval(&self, point: &[f64]) -> Vec<f64> {
        debug_assert_eq!(point.len(), self.ndim);
        // Per-dimension tables P_0..P_degree
        let tables: Vec<Vec<f64>> = point
            .iter()
            .map(|&x| legendre_table(x, self.degree))
            .collect();
        self.indices
            .iter()
            .map(|idx| {
                idx.iter()
                    .enumerate()
                    .map(|(d, &n)| tables[d][n])
                    .product()
            })
            .collect()
    }
}

/// Expected number of chaos terms for a given dimension and degree
#[must_use]
pub fn term_count(ndim: usize, degree: usize) -> usize {
    binomial(ndim + degree, degree) as usize
}

/// Graded multi-index sequence up to `degree`
#[must_use]
pub fn chaos_sequence(ndim: usize, degree: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::with_capacity(term_count(ndim, degree));
    for g in 0..=degree {
        degree_compositions(ndim, g, &mut Vec::with_capacity(ndim), &mut out);
    }
    out
}

fn degree_compositions(
    ndim: usize,
    total: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if ndim == 1 {
        current.push(total);
        out.push(current.clone());
        current.pop();
        return;
    }
    for first in (0..=total).rev() {
        current.push(first);
        degree_compositions(ndim - 1, total - first, current, out);
        current.pop();
    }
}

/// Legendre polynomials `P_0(x) .. P_n(x)` by the three-term recurrence
#[must_use]
pub fn legendre_table(x: f64, n: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n + 1);
    table.push(1.0);
    if n == 0 {
        return table;
    }
    table.push(x);
    for k in 1..n {
        let next = ((2 * k + 1) as f64 * x * table[k] - k as f64 * table[k - 1])
            / (k + 1) as f64;
        table.push(next);
    }
    table
}
