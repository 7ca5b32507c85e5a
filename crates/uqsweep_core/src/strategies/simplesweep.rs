//! Fixed evaluation at caller-supplied points

use tracing::info;

use crate::error::StrategyError;
use crate::numeric::mean_and_dev;
use crate::parameter::Parameter;
use crate::strategies::{SamplingStrategy, VariableAnalysis, collect_finished};

/// Evaluate the model at an explicit value column per parameter; no
/// randomization and no distribution reconstruction, just moments
pub struct SimpleSweepStrategy {
    columns: Vec<Vec<f64>>,
}

impl SimpleSweepStrategy {
    /// `columns[i]` holds the evaluation points for the i-th parameter;
    /// all columns must share one length
    pub fn new(columns: Vec<Vec<f64>>) -> Result<Self, StrategyError> {
        if columns.is_empty() || columns[0].is_empty() {
            return Err(StrategyError::InvalidSampleCount(0));
        }
        let expected = columns[0].len();
        for (i, c) in columns.iter().enumerate() {
            if c.len() != expected {
                return Err(StrategyError::ValueLengthMismatch {
                    name: format!("column {i}"),
                    expected,
                    got: c.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Append further caller-supplied points
    pub fn extend_with(
        &mut self,
        params: &mut [Parameter],
        columns: Vec<Vec<f64>>,
    ) -> Result<usize, StrategyError> {
        let more = Self::new(columns)?;
        let added = more.columns[0].len();
        for (p, c) in params.iter_mut().zip(&more.columns) {
            p.values.extend(c);
        }
        for (ours, theirs) in self.columns.iter_mut().zip(more.columns) {
            ours.extend(theirs);
        }
        Ok(added)
    }
}

impl SamplingStrategy for SimpleSweepStrategy {
    fn name(&self) -> &'static str {
        "simplesweep"
    }

    fn supports_extend(&self) -> bool {
        false
    }

    fn generate(&mut self, params: &mut [Parameter]) -> Result<usize, StrategyError> {
        if params.len() != self.columns.len() {
            return Err(StrategyError::ValueLengthMismatch {
                name: "columns".into(),
                expected: params.len(),
                got: self.columns.len(),
            });
        }
        for (p, c) in params.iter_mut().zip(&self.columns) {
            p.values = c.clone();
        }
        Ok(self.columns[0].len())
    }

    fn extend(&mut self, _params: &mut [Parameter], _n: usize) -> Result<usize, StrategyError> {
        Err(StrategyError::ExtendUnsupported {
            strategy: "simplesweep",
            reason: "new points must be supplied explicitly via extend_with",
        })
    }

    fn analyze(
        &self,
        _params: &[Parameter],
        data: &[Option<f64>],
    ) -> Result<VariableAnalysis, StrategyError> {
        let (_, vals) = collect_finished(data);
        if vals.is_empty() {
            return Err(StrategyError::NoSamples);
        }
        let (mean, dev) = mean_and_dev(&vals);
        info!(mean, dev, "sample moments");
        Ok(VariableAnalysis {
            mean,
            dev,
            pdf: None,
            response: None,
            rmse: None,
            sensitivity: None,
            samples: vals,
        })
    }
}
