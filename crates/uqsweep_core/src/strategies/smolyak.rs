//! Smolyak sparse-grid collocation with a polynomial-chaos surface

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::chaos::ChaosBasis;
use crate::error::StrategyError;
use crate::numeric::mean_and_dev;
use crate::parameter::Parameter;
use crate::response::{PolyResponse, ResponseSurface};
use crate::sgrid::SparseGrid;
use crate::strategies::{SamplingStrategy, SensitivityRecord, VariableAnalysis};

/// Number of descriptive samples pushed through the fitted surface to
/// estimate the output density
const SURFACE_SAMPLES: usize = 10_000;

/// Collocation strategy: evaluate the model on a sparse grid, project the
/// outputs onto a Legendre chaos basis, and screen sensitivities by
/// Elementary Effects
pub struct SmolyakStrategy {
    level: usize,
    seed: u64,
    grid: Option<SparseGrid>,
}

impl SmolyakStrategy {
    #[must_use]
    pub fn new(level: usize, seed: u64) -> Self {
        Self {
            level,
            seed,
            grid: None,
        }
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Map canonical grid columns into each parameter's collocation range
    fn fill_values(grid: &SparseGrid, params: &mut [Parameter], from_row: usize) {
        for (d, p) in params.iter_mut().enumerate() {
            let (lo, hi) = p.pdf.srange();
            let center = (hi + lo) / 2.0;
            let half = (hi - lo) / 2.0;
            p.values.truncate(from_row);
            p.values.extend(
                grid.points()[from_row..]
                    .iter()
                    .map(|row| row[d] * half + center),
            );
        }
    }
}

impl SamplingStrategy for SmolyakStrategy {
    fn name(&self) -> &'static str {
        "smolyak"
    }

    fn generate(&mut self, params: &mut [Parameter]) -> Result<usize, StrategyError> {
        let grid = SparseGrid::new(params.len(), self.level);
        for p in params.iter_mut() {
            p.values.clear();
        }
        Self::fill_values(&grid, params, 0);
        let n = grid.len();
        info!(level = self.level, points = n, "generated sparse grid");
        self.grid = Some(grid);
        Ok(n)
    }

    /// Move to the next level; nesting makes the appended rows the only
    /// new model evaluations
    fn extend(&mut self, params: &mut [Parameter], _n: usize) -> Result<usize, StrategyError> {
        let old = match &self.grid {
            Some(g) => g.len(),
            None => return Err(StrategyError::NoSamples),
        };
        self.level += 1;
        let grid = SparseGrid::new(params.len(), self.level);
        debug_assert!(grid.len() >= old);
        Self::fill_values(&grid, params, old);
        let added = grid.len() - old;
        info!(level = self.level, added, "extended sparse grid");
        self.grid = Some(grid);
        Ok(added)
    }

    fn analyze(
        &self,
        params: &[Parameter],
        data: &[Option<f64>],
    ) -> Result<VariableAnalysis, StrategyError> {
        let grid = self.grid.as_ref().ok_or(StrategyError::NoSamples)?;
        if data.len() != grid.len() {
            return Err(StrategyError::IncompleteResults {
                expected: grid.len(),
                finished: data.len(),
            });
        }
        let finished = data.iter().flatten().count();
        if finished != grid.len() {
            return Err(StrategyError::IncompleteResults {
                expected: grid.len(),
                finished,
            });
        }
        let results: Vec<f64> = data.iter().map(|d| d.unwrap_or(0.0)).collect();

        // Project onto the chaos basis with normalized quadrature weights
        let ndim = params.len();
        let basis = ChaosBasis::new(ndim, self.level);
        let wsum: f64 = grid.weights().iter().sum();
        let mut uhat = vec![0.0; basis.len()];
        for (row, (&w, &r)) in grid
            .points()
            .iter()
            .zip(grid.weights().iter().zip(&results))
        {
            let jf = basis.eval(row);
            for (u, j) in uhat.iter_mut().zip(&jf) {
                *u += r * j * w / wsum;
            }
        }
        for (u, h2) in uhat.iter_mut().zip(basis.norms()) {
            *u /= h2;
        }

        let mut centers = Vec::with_capacity(ndim);
        let mut halfwidths = Vec::with_capacity(ndim);
        for p in params {
            let (lo, hi) = p.pdf.srange();
            centers.push((hi + lo) / 2.0);
            halfwidths.push((hi - lo) / 2.0);
        }
        let train_points: Vec<Vec<f64>> = (0..grid.len())
            .map(|i| params.iter().map(|p| p.values[i]).collect())
            .collect();
        let surface = ResponseSurface::Poly(PolyResponse {
            basis,
            coefficients: uhat,
            centers,
            halfwidths,
            train_points,
            train_values: results.clone(),
        });
        let rmse = surface.rmse();
        info!(rmse = rmse.0, rmse_pct = rmse.1, "chaos surface fit");

        let sensitivity = elementary_effects(grid, params, &results);
        for s in &sensitivity {
            debug!(name = %s.name, ustar = s.ustar, std = s.std, "sensitivity");
        }

        // Push the true input densities through the surface
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let columns: Vec<Vec<f64>> = params
            .iter()
            .map(|p| p.pdf.ds(SURFACE_SAMPLES, &mut rng))
            .collect();
        let evals: Vec<f64> = (0..SURFACE_SAMPLES)
            .map(|i| {
                let row: Vec<f64> = columns.iter().map(|c| c[i]).collect();
                surface.eval(&row)
            })
            .collect();
        let (mean, dev) = mean_and_dev(&evals);
        let pdf = crate::pdf::Pdf::experimental(&evals, 0, params[0].pdf.config())?;

        Ok(VariableAnalysis {
            mean,
            dev,
            pdf: Some(pdf),
            response: Some(surface),
            rmse: Some(rmse),
            sensitivity: Some(sensitivity),
            samples: results,
        })
    }
}

/// Elementary Effects screening over the collocation grid
///
/// For each dimension, rows identical in every other coordinate form a
/// group; finite differences between consecutive group members (sorted by
/// the varying coordinate) are the elementary effects. Grouping uses the
/// exact bit patterns of the rescaled coordinates, which is sound because
/// identical `(ndim, level)` grids are bit-identical.
fn elementary_effects(
    grid: &SparseGrid,
    params: &[Parameter],
    results: &[f64],
) -> Vec<SensitivityRecord> {
    let ndim = params.len();
    // Rescale to [0,1] so effects are comparable across dimensions
    let unit: Vec<Vec<f64>> = grid
        .points()
        .iter()
        .map(|row| row.iter().map(|v| (v + 1.0) / 2.0).collect())
        .collect();

    let mut records = Vec::with_capacity(ndim);
    for (col, p) in params.iter().enumerate() {
        let mut groups: FxHashMap<Vec<u64>, Vec<usize>> = FxHashMap::default();
        for (i, row) in unit.iter().enumerate() {
            let key: Vec<u64> = row
                .iter()
                .enumerate()
                .filter(|&(d, _)| d != col)
                .map(|(_, v)| v.to_bits())
                .collect();
            groups.entry(key).or_default().push(i);
        }

        let mut effects = Vec::new();
        for rows in groups.values() {
            if rows.len() < 2 {
                continue;
            }
            let mut sorted = rows.clone();
            sorted.sort_by(|&a, &b| unit[a][col].total_cmp(&unit[b][col]));
            for pair in sorted.windows(2) {
                let dx = unit[pair[1]][col] - unit[pair[0]][col];
                effects.push((results[pair[1]] - results[pair[0]]) / dx);
            }
        }

        let (ustar, std) = if effects.is_empty() {
            (0.0, 0.0)
        } else {
            let abs: Vec<f64> = effects.iter().map(|e| e.abs()).collect();
            let ustar = abs.iter().sum::<f64>() / abs.len() as f64;
            let (_, std) = mean_and_dev(&effects);
            (ustar, std)
        };
        records.push(SensitivityRecord {
            name: p.name.clone(),
            ustar,
            std,
        });
    }
    records.sort_by(|a, b| b.ustar.total_cmp(&a.ustar));
    records
}
