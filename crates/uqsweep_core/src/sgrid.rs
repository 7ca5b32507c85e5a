//! Smolyak sparse-grid generation
//!
//! Builds the Clenshaw–Curtis sparse grid for a given dimension and level
//! in canonical `[-1, 1]^ndim` space, with quadrature weights from the
//! standard combination technique. The 1-D rules are nested (`m_1 = 1`,
//! `m_k = 2^(k-1) + 1`), so the point set at level L+1 strictly contains
//! the level-L set. Rows are emitted in order of the level at which a
//! point first appears, then sorted by its integer index on the finest
//! grid, which makes `grid(L)` a literal row prefix of `grid(L+1)` up to
//! the weight column. Identical `(ndim, level)` always produces the
//! bit-identical grid; downstream duplicate detection depends on this.

use std::f64::consts::PI;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::numeric::binomial;

/// A Smolyak collocation grid with quadrature weights
///
/// Weights sum to `2^ndim`, the measure of the canonical cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseGrid {
    ndim: usize,
    level: usize,
    points: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl SparseGrid {
    /// Generate the grid for `ndim >= 1` dimensions at `level >= 0`
    #[must_use]
    pub fn new(ndim: usize, level: usize) -> Self {
        debug_assert!(ndim >= 1);
        let n_max: u64 = 1 << level.max(1) as u64;

        // Accumulate combination-weighted tensor quadrature weights,
        // keyed by the exact integer index tuple on the finest grid.
        let q = ndim + level;
        let mut weight_map: FxHashMap<Vec<u64>, f64> = FxHashMap::default();
        for total in ndim.max(level + 1)..=q {
            let sign = if (q - total) % 2 == 0 { 1.0 } else { -1.0 };
            let coeff = sign * binomial(ndim - 1, q - total) as f64;
            for idx in level_compositions(ndim, total) {
                accumulate_tensor(&mut weight_map, &idx, coeff, n_max);
            }
        }

        // Order rows by first-appearance level, then by index tuple.
        let mut order: Vec<Vec<u64>> = Vec::with_capacity(weight_map.len());
        let mut seen: FxHashSet<Vec<u64>> = FxHashSet::default();
        for ell in 0..=level {
            let mut fresh: Vec<Vec<u64>> = Vec::new();
            let top = ndim + ell;
            for idx in level_compositions(ndim, top) {
                for tuple in tensor_tuples(&idx, n_max) {
                    if seen.insert(tuple.clone()) {
                        fresh.push(tuple);
                    }
                }
            }
            fresh.sort();
            order.extend(fresh);
        }

        let points: Vec<Vec<f64>> = order
            .iter()
            .map(|tuple| tuple.iter().map(|&f| coord(f, n_max)).collect())
            .collect();
        let weights: Vec<f64> = order
            .iter()
            .map(|tuple| weight_map.get(tuple).copied().unwrap_or(0.0))
            .collect();

        Self {
            ndim,
            level,
            points,
            weights,
        }
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Collocation rows in canonical `[-1, 1]^ndim` coordinates
    #[must_use]
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// One coordinate column
    #[must_use]
    pub fn column(&self, dim: usize) -> Vec<f64> {
        self.points.iter().map(|row| row[dim]).collect()
    }
}

/// Number of points in the 1-D nested Clenshaw–Curtis rule at `k >= 1`
fn rule_size(k: usize) -> usize {
    if k == 1 { 1 } else { (1 << (k - 1)) + 1 }
}

/// Quadrature weights of the 1-D rule at `k`, for the weight function 1
/// on `[-1, 1]`
fn cc_weights(k: usize) -> Vec<f64> {
    let m = rule_size(k);
    if m == 1 {
        return vec![2.0];
    }
    let n = m - 1;
    (0..=n)
        .map(|j| {
            let c = if j == 0 || j == n { 1.0 } else { 2.0 };
            let mut s = 0.0;
            for t in 1..=n / 2 {
                let b = if t == n / 2 { 1.0 } else { 2.0 };
                s += b * (2.0 * PI * (t * j) as f64 / n as f64).cos()
                    / ((4 * t * t - 1) as f64);
            }
            c / n as f64 * (1.0 - s)
        })
        .collect()
}

/// Index of point `j` of rule `k` on the finest grid of `n_max` segments
fn finest_index(k: usize, j: usize, n_max: u64) -> u64 {
    if k == 1 {
        n_max / 2
    } else {
        j as u64 * (n_max / (rule_size(k) - 1) as u64)
    }
}

/// Canonical coordinate of a finest-grid index
///
/// Computed from the index ratio only, so the same abscissa is
/// bit-identical no matter which level first produced it.
fn coord(fidx: u64, n_max: u64) -> f64 {
    if 2 * fidx == n_max {
        0.0
    } else if fidx == 0 {
        -1.0
    } else if fidx == n_max {
        1.0
    } else {
        -(PI * fidx as f64 / n_max as f64).cos()
    }
}

/// All ways to write `total` as `ndim` parts, each at least 1,
/// first part descending
fn level_compositions(ndim: usize, total: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(ndim);
    fill_compositions(ndim, total, &mut current, &mut out);
    out
}

fn fill_compositions(
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
    // Each remaining part needs at least 1
    for first in (1..=total - (ndim - 1)).rev() {
        current.push(first);
        fill_compositions(ndim - 1, total - first, current, out);
        current.pop();
    }
}

/// Index tuples of the tensor rule for one multi-index
fn tensor_tuples(idx: &[usize], n_max: u64) -> Vec<Vec<u64>> {
    let mut tuples: Vec<Vec<u64>> = vec![Vec::new()];
    for &k in idx {
        let m = rule_size(k);
        let mut next = Vec::with_capacity(tuples.len() * m);
        for t in &tuples {
            for j in 0..m {
                let mut row = t.clone();
                row.push(finest_index(k, j, n_max));
                next.push(row);
            }
        }
        tuples = next;
    }
    tuples
}

/// Add one multi-index's tensor weights into the running map
fn accumulate_tensor(
    weight_map: &mut FxHashMap<Vec<u64>, f64>,
    idx: &[usize],
    coeff: f64,
    n_max: u64,
) {
    let mut partial: Vec<(Vec<u64>, f64)> = vec![(Vec::new(), coeff)];
    for &k in idx {
        let w1d = cc_weights(k);
        let mut next = Vec::with_capacity(partial.len() * w1d.len());
        for (tuple, w) in &partial {
            for (j, &wj) in w1d.iter().enumerate() {
                let mut row = tuple.clone();
                row.push(finest_index(k, j, n_max));
                next.push((row, w * wj));
            }
        }
        partial = next;
    }
    for (tuple, w) in partial {
        *weight_map.entry(tuple).or_insert(0.0) += w;
    }
}
