//! Sampling strategies
//!
//! A strategy decides where the black-box model is evaluated and how the
//! collected outputs are turned into statistics. All strategies share one
//! contract: `generate` fills each parameter's `values` column with the
//! initial batch, `extend` appends further points without discarding any
//! prior ones, and `analyze` consumes the per-point outputs of a single
//! output variable. Missing outputs (failed jobs) arrive as `None`.

use serde::{Deserialize, Serialize};

use crate::error::StrategyError;
use crate::parameter::Parameter;
use crate::pdf::Pdf;
use crate::response::ResponseSurface;

mod lhs;
mod montecarlo;
mod simplesweep;
mod smolyak;

pub use lhs::LhsStrategy;
pub use montecarlo::MonteCarloStrategy;
pub use simplesweep::SimpleSweepStrategy;
pub use smolyak::SmolyakStrategy;

/// Per-parameter sensitivity measure from Elementary Effects screening
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRecord {
    pub name: String,
    /// Mean absolute elementary effect
    pub ustar: f64,
    /// Standard deviation of the elementary effects
    pub std: f64,
}

/// Everything a strategy derives for one output variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableAnalysis {
    pub mean: f64,
    pub dev: f64,
    #[serde(default)]
    pub pdf: Option<Pdf>,
    #[serde(default)]
    pub response: Option<ResponseSurface>,
    /// `(rmse, rmse_percent)` of the response surface, when one was fit
    #[serde(default)]
    pub rmse: Option<(f64, f64)>,
    /// Ranked descending by `ustar`
    #[serde(default)]
    pub sensitivity: Option<Vec<SensitivityRecord>>,
    /// Outputs actually used by the analysis (failed jobs removed)
    pub samples: Vec<f64>,
}

/// Point generation and analysis for one sweep
pub trait SamplingStrategy {
    /// Short name used as the result-store section for derived data
    fn name(&self) -> &'static str;

    fn supports_extend(&self) -> bool {
        true
    }

    /// Populate every parameter's `values` column with the initial batch;
    /// returns the number of rows generated
    fn generate(&mut self, params: &mut [Parameter]) -> Result<usize, StrategyError>;

    /// Append more points to every `values` column; returns the number of
    /// new rows. Strategies with intrinsic growth rules (Smolyak levels,
    /// the descriptive-sampling 3x rule) may ignore `n`.
    fn extend(&mut self, params: &mut [Parameter], n: usize) -> Result<usize, StrategyError>;

    /// Derive statistics for one output variable from the per-point data
    fn analyze(
        &self,
        params: &[Parameter],
        data: &[Option<f64>],
    ) -> Result<VariableAnalysis, StrategyError>;
}

/// Split sparse outputs into the indices and values that are present
pub(crate) fn collect_finished(data: &[Option<f64>]) -> (Vec<usize>, Vec<f64>) {
    let mut idx = Vec::new();
    let mut vals = Vec::new();
    for (i, d) in data.iter().enumerate() {
        if let Some(v) = d {
            idx.push(i);
            vals.push(*v);
        }
    }
    (idx, vals)
}

/// Reweighted moments for data sampled uniformly but interpreted under
/// the parameters' true densities
pub(crate) fn reweighted_moments(
    params: &[Parameter],
    rows: &[usize],
    data: &[f64],
) -> (f64, f64) {
    let weights: Vec<f64> = rows
        .iter()
        .map(|&i| params.iter().map(|p| p.pdf.pdf(p.values[i])).product())
        .collect();
    crate::numeric::weighted_mean_and_dev(data, &weights)
}
