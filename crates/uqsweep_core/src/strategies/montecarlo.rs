//! Plain Monte Carlo sampling

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::error::StrategyError;
use crate::numeric::mean_and_dev;
use crate::parameter::Parameter;
use crate::pdf::Pdf;
use crate::response::{RbfResponse, ResponseSurface};
use crate::strategies::{
    SamplingStrategy, VariableAnalysis, collect_finished, reweighted_moments,
};

/// Independent inverse-CDF draws; extension appends any positive number
/// of further draws
pub struct MonteCarloStrategy {
    num: usize,
    response: bool,
    rng: SmallRng,
}

impl MonteCarloStrategy {
    #[must_use]
    pub fn new(num: usize, seed: u64) -> Self {
        Self {
            num,
            response: false,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Sample Uniform over each parameter's range and fit an RBF surface,
    /// recovering true moments by reweighting
    #[must_use]
    pub fn with_response(mut self) -> Self {
        self.response = true;
        self
    }

    #[must_use]
    pub fn num(&self) -> usize {
        self.num
    }

    fn sampler(&self, p: &Parameter) -> Result<Pdf, StrategyError> {
        if self.response {
            let (lo, hi) = p.pdf.range();
            Ok(Pdf::uniform(Some(lo), Some(hi), None, p.pdf.config())?)
        } else {
            Ok(p.pdf.clone())
        }
    }

    fn draw(&mut self, params: &mut [Parameter], n: usize) -> Result<(), StrategyError> {
        for i in 0..params.len() {
            let sampler = self.sampler(&params[i])?;
            let vals = sampler.random(n, &mut self.rng);
            params[i].values.extend(vals);
        }
        Ok(())
    }
}

impl SamplingStrategy for MonteCarloStrategy {
    fn name(&self) -> &'static str {
        "montecarlo"
    }

    fn generate(&mut self, params: &mut [Parameter]) -> Result<usize, StrategyError> {
        if self.num == 0 {
            return Err(StrategyError::InvalidSampleCount(0));
        }
        for p in params.iter_mut() {
            p.values.clear();
        }
        let n = self.num;
        self.draw(params, n)?;
        Ok(n)
    }

    fn extend(&mut self, params: &mut [Parameter], n: usize) -> Result<usize, StrategyError> {
        if n == 0 {
            return Err(StrategyError::InvalidSampleCount(0));
        }
        info!(from = self.num, added = n, "extending monte carlo sample");
        self.draw(params, n)?;
        self.num += n;
        Ok(n)
    }

    fn analyze(
        &self,
        params: &[Parameter],
        data: &[Option<f64>],
    ) -> Result<VariableAnalysis, StrategyError> {
        let (rows, vals) = collect_finished(data);
        if vals.is_empty() {
            return Err(StrategyError::NoSamples);
        }

        if self.response {
            let points: Vec<Vec<f64>> = rows
                .iter()
                .map(|&i| params.iter().map(|p| p.values[i]).collect())
                .collect();
            let surface =
                ResponseSurface::Rbf(RbfResponse::fit(points, vals.clone(), None)?);
            let rmse = surface.rmse();
            let (mean, dev) = reweighted_moments(params, &rows, &vals);
            info!(mean, dev, "reweighted moments");
            Ok(VariableAnalysis {
                mean,
                dev,
                pdf: None,
                response: Some(surface),
                rmse: Some(rmse),
                sensitivity: None,
                samples: vals,
            })
        } else {
            let (mean, dev) = mean_and_dev(&vals);
            info!(mean, dev, "sample moments");
            let pdf = Pdf::experimental(&vals, 0, params[0].pdf.config())?;
            Ok(VariableAnalysis {
                mean,
                dev,
                pdf: Some(pdf),
                response: None,
                rmse: None,
                sensitivity: None,
                samples: vals,
            })
        }
    }
}
