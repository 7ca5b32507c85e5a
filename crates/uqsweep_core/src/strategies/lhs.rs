//! Latin Hypercube and Descriptive Sampling

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::info;

use crate::error::StrategyError;
use crate::numeric::mean_and_dev;
use crate::parameter::Parameter;
use crate::pdf::Pdf;
use crate::response::{RbfResponse, ResponseSurface};
use crate::strategies::{
    SamplingStrategy, VariableAnalysis, collect_finished, reweighted_moments,
};

/// Stratified sampling strategy
///
/// With `response = true` the points are drawn from Uniform densities
/// spanning each parameter's range, so the fitted surface is valid
/// everywhere; the true distribution's moments are recovered afterwards
/// by reweighting each output with the product of the true densities.
pub struct LhsStrategy {
    num: usize,
    ds: bool,
    response: bool,
    rng: SmallRng,
}

impl LhsStrategy {
    #[must_use]
    pub fn new(num: usize, seed: u64) -> Self {
        Self {
            num,
            ds: false,
            response: true,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Use descriptive sampling (stratum midpoints); required for
    /// extension
    #[must_use]
    pub fn descriptive(mut self) -> Self {
        self.ds = true;
        self
    }

    /// Sample the true densities directly instead of fitting a surface
    #[must_use]
    pub fn without_response(mut self) -> Self {
        self.response = false;
        self
    }

    #[must_use]
    pub fn num(&self) -> usize {
        self.num
    }

    /// The density each point is drawn from: the parameter's own, or a
    /// Uniform over its range when a surface is requested
    fn sampler(&self, p: &Parameter) -> Result<Pdf, StrategyError> {
        if self.response {
            let (lo, hi) = p.pdf.range();
            Ok(Pdf::uniform(Some(lo), Some(hi), None, p.pdf.config())?)
        } else {
            Ok(p.pdf.clone())
        }
    }
}

impl SamplingStrategy for LhsStrategy {
    fn name(&self) -> &'static str {
        "lhs"
    }

    fn generate(&mut self, params: &mut [Parameter]) -> Result<usize, StrategyError> {
        if self.num == 0 {
            return Err(StrategyError::InvalidSampleCount(0));
        }
        for i in 0..params.len() {
            let sampler = self.sampler(&params[i])?;
            params[i].values = if self.ds {
                sampler.ds(self.num, &mut self.rng)
            } else {
                sampler.lhs(self.num, &mut self.rng)
            };
        }
        Ok(self.num)
    }

    /// Triple the stratum count
    ///
    /// Descriptive samples always sit at stratum centers, so with three
    /// times as many strata every old point reappears as a new center;
    /// only the two flanking thirds of each old stratum are new work.
    fn extend(&mut self, params: &mut [Parameter], _n: usize) -> Result<usize, StrategyError> {
        if !self.ds {
            return Err(StrategyError::ExtendUnsupported {
                strategy: "lhs",
                reason: "extension requires descriptive sampling",
            });
        }
        if params.is_empty() || params[0].values.len() != self.num {
            return Err(StrategyError::NoSamples);
        }
        info!(from = self.num, to = self.num * 3, "extending descriptive sample");
        for i in 0..params.len() {
            let sampler = self.sampler(&params[i])?;
            let all = sampler.ds_sorted(self.num * 3);
            // Every third point, starting at the stratum center, is an
            // already-evaluated old point
            let mut fresh: Vec<f64> = all
                .iter()
                .enumerate()
                .filter(|(j, _)| j % 3 != 1)
                .map(|(_, &v)| v)
                .collect();
            fresh.shuffle(&mut self.rng);
            params[i].values.extend(fresh);
        }
        let added = 2 * self.num;
        self.num *= 3;
        Ok(added)
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
