//! Sweep orchestration
//!
//! One iteration walks the state machine
//! `GENERATING -> DISPATCHED -> COLLECTING -> ANALYZING`, then either
//! finishes or loops through `ITERATING` with a strategy extension. The
//! orchestrator owns an append-only cache keyed by the exact bit pattern
//! of each argument tuple: a point that was ever evaluated is never
//! dispatched again, which is what makes iterative refinement affordable
//! for nested strategies.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SweepError;
use crate::parameter::Parameter;
use crate::runner::{JobRunner, parse_tagged};
use crate::store::ResultStore;
use crate::strategies::{SamplingStrategy, VariableAnalysis};

/// Where the orchestrator currently is in its iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepState {
    Generating,
    Dispatched,
    Collecting,
    Analyzing,
    Iterating,
    Done,
    Failed,
}

/// Returned by the iteration callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDecision {
    /// Accept the current analysis and stop
    Stop,
    /// Extend the strategy and run another iteration
    Extend,
}

/// Aggregate outcome of a sweep run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub iterations: usize,
    pub total_points: usize,
    pub dispatched_jobs: usize,
    pub failed_jobs: usize,
    /// Derived statistics, keyed by output variable name
    pub analyses: BTreeMap<String, VariableAnalysis>,
}

/// Exact-bits cache key for one argument tuple
fn point_key(row: &[f64]) -> Vec<u64> {
    row.iter().map(|v| v.to_bits()).collect()
}

/// Drives one uncertainty-quantification run
pub struct Sweep {
    params: Vec<Parameter>,
    strategy: Box<dyn SamplingStrategy>,
    runner: Box<dyn JobRunner>,
    store: ResultStore,
    state: SweepState,
    program: String,
    /// Evaluated points; append-only so no point is ever re-run
    cache: FxHashMap<Vec<u64>, FxHashMap<String, f64>>,
    /// job index -> point row index
    job_rows: Vec<usize>,
    total_points: usize,
    failed_jobs: usize,
    generated: bool,
}

// The strategy and runner are trait objects, so Debug is written by hand
impl fmt::Debug for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sweep")
            .field("strategy", &self.strategy.name())
            .field("state", &self.state)
            .field("program", &self.program)
            .field("total_points", &self.total_points)
            .field("failed_jobs", &self.failed_jobs)
            .finish_non_exhaustive()
    }
}

impl Sweep {
    /// Parameter names must be unique; the parameter set must be
    /// non-empty
    pub fn new(
        params: Vec<Parameter>,
        strategy: Box<dyn SamplingStrategy>,
        runner: Box<dyn JobRunner>,
    ) -> Result<Self, SweepError> {
        if params.is_empty() {
            return Err(SweepError::NoParameters);
        }
        let mut seen = BTreeSet::new();
        for p in &params {
            if !seen.insert(p.name.clone()) {
                return Err(SweepError::DuplicateParameter(p.name.clone()));
            }
        }
        let store = ResultStore::new(strategy.name());
        Ok(Self {
            params,
            strategy,
            runner,
            store,
            state: SweepState::Generating,
            program: "model".to_string(),
            cache: FxHashMap::default(),
            job_rows: Vec::new(),
            total_points: 0,
            failed_jobs: 0,
            generated: false,
        })
    }

    /// Program name rendered into each job's command line
    #[must_use]
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    #[must_use]
    pub fn state(&self) -> SweepState {
        self.state
    }

    #[must_use]
    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Run a single generate/dispatch/collect/analyze iteration
    pub fn run(&mut self) -> Result<SweepReport, SweepError> {
        self.run_iterative(0, |_, _| SweepDecision::Stop)
    }

    /// Run until the callback returns [`SweepDecision::Stop`] or the
    /// strategy cannot extend further
    ///
    /// `extend_n` is passed to strategies whose extension takes a count;
    /// level- and stratification-driven strategies ignore it.
    pub fn run_iterative<F>(
        &mut self,
        extend_n: usize,
        mut callback: F,
    ) -> Result<SweepReport, SweepError>
    where
        F: FnMut(usize, &SweepReport) -> SweepDecision,
    {
        let mut iterations = 0;
        loop {
            self.state = SweepState::Generating;
            let added = if self.generated {
                self.strategy
                    .extend(&mut self.params, extend_n)
                    .map_err(|e| {
                        self.state = SweepState::Failed;
                        e
                    })?
            } else {
                let n = self.strategy.generate(&mut self.params).map_err(|e| {
                    self.state = SweepState::Failed;
                    e
                })?;
                self.generated = true;
                n
            };
            self.total_points += added;
            iterations += 1;

            self.dispatch_new_points()?;
            self.collect()?;
            let report = self.analyze(iterations)?;

            if callback(iterations, &report) == SweepDecision::Stop {
                self.state = SweepState::Done;
                return Ok(report);
            }
            if !self.strategy.supports_extend() {
                warn!("iteration requested but the strategy cannot extend");
                self.state = SweepState::Done;
                return Ok(report);
            }
            self.state = SweepState::Iterating;
        }
    }

    /// One argument tuple per point row
    fn row_args(&self, row: usize) -> Vec<(String, f64)> {
        self.params
            .iter()
            .map(|p| (p.name.clone(), p.values[row]))
            .collect()
    }

    fn row_values(&self, row: usize) -> Vec<f64> {
        self.params.iter().map(|p| p.values[row]).collect()
    }

    /// Queue jobs for every not-yet-evaluated new point and run them
    fn dispatch_new_points(&mut self) -> Result<(), SweepError> {
        let already: FxHashSet<usize> = self.job_rows.iter().copied().collect();
        // Keys queued this batch, so repeated argument tuples within one
        // generation collapse onto a single job
        let mut batch_keys: FxHashSet<Vec<u64>> = FxHashSet::default();
        let mut queued = 0;
        for row in 0..self.total_points {
            if already.contains(&row) {
                continue;
            }
            let key = point_key(&self.row_values(row));
            if self.cache.contains_key(&key) || !batch_keys.insert(key) {
                continue;
            }
            let cmd = self.render_cmd(row);
            let outfile = format!("job_{}.out", self.job_rows.len());
            self.runner.add_job(&cmd, ".", 1, &outfile);
            self.job_rows.push(row);
            queued += 1;
        }
        info!(queued, total = self.total_points, "dispatching jobs");

        self.state = SweepState::Dispatched;
        if !self.runner.run() {
            self.state = SweepState::Failed;
            return Err(SweepError::Dispatch("runner refused the batch".into()));
        }
        Ok(())
    }

    fn render_cmd(&self, row: usize) -> String {
        let mut cmd = self.program.clone();
        for (name, value) in self.row_args(row) {
            cmd.push_str(&format!(" --{name}={value}"));
        }
        cmd
    }

    /// Harvest finished jobs into the cache and the result store
    fn collect(&mut self) -> Result<(), SweepError> {
        self.state = SweepState::Collecting;
        let finished = self.runner.collect(&mut self.store);
        let (_, all_done) = self.runner.status();
        if !all_done {
            self.state = SweepState::Failed;
            return Err(SweepError::Dispatch("jobs still pending".into()));
        }

        for &job in &finished {
            let row = self.job_rows[job];
            let stdout: String = self
                .store
                .get_json(&format!("output/jobs/{job}/stdout"))?
                .unwrap_or_default();
            let outputs = parse_tagged(&stdout);
            if outputs.is_empty() {
                warn!(job, "finished job produced no tagged output");
                continue;
            }
            let key = point_key(&self.row_values(row));
            let entry = self.cache.entry(key).or_default();
            for out in outputs {
                entry.insert(out.name, out.value);
            }
        }
        self.failed_jobs = self
            .job_rows
            .iter()
            .enumerate()
            .filter(|&(job, &row)| {
                !finished.contains(&job)
                    || !self.cache.contains_key(&point_key(&self.row_values(row)))
            })
            .count();
        Ok(())
    }

    /// Run the strategy's analysis for every observed output variable
    fn analyze(&mut self, iterations: usize) -> Result<SweepReport, SweepError> {
        self.state = SweepState::Analyzing;

        // Union of variable names over every evaluated point of this sweep
        let mut names: BTreeSet<String> = BTreeSet::new();
        for row in 0..self.total_points {
            if let Some(outputs) = self.cache.get(&point_key(&self.row_values(row))) {
                names.extend(outputs.keys().cloned());
            }
        }
        if names.is_empty() {
            self.state = SweepState::Failed;
            return Err(SweepError::NoOutputData);
        }

        // Persist inputs alongside the derived results
        for p in &self.params {
            self.store.set_json(&format!("input/params/{}", p.name), p)?;
        }
        let columns: Vec<&[f64]> = self.params.iter().map(|p| p.values.as_slice()).collect();
        self.store.set_json("input/param_array", &columns)?;

        let mut analyses = BTreeMap::new();
        for name in names {
            let data: Vec<Option<f64>> = (0..self.total_points)
                .map(|row| {
                    self.cache
                        .get(&point_key(&self.row_values(row)))
                        .and_then(|outputs| outputs.get(&name))
                        .copied()
                })
                .collect();
            let collected: Vec<f64> = data.iter().flatten().copied().collect();
            self.store
                .set_json(&format!("output/data/{name}"), &collected)?;

            let analysis = self
                .strategy
                .analyze(&self.params, &data)
                .map_err(|e| {
                    self.state = SweepState::Failed;
                    e
                })?;
            let section = self.strategy.name();
            self.store
                .set_json(&format!("{section}/{name}/mean"), &analysis.mean)?;
            self.store
                .set_json(&format!("{section}/{name}/dev"), &analysis.dev)?;
            self.store
                .set_json(&format!("{section}/{name}/samples"), &analysis.samples)?;
            if let Some(pdf) = &analysis.pdf {
                self.store.set_json(&format!("{section}/{name}/pdf"), pdf)?;
            }
            if let Some(response) = &analysis.response {
                self.store
                    .set_json(&format!("{section}/{name}/response"), response)?;
            }
            if let Some(rmse) = &analysis.rmse {
                self.store.set_json(&format!("{section}/{name}/rmse"), rmse)?;
            }
            if let Some(sens) = &analysis.sensitivity {
                self.store
                    .set_json(&format!("{section}/{name}/sensitivity"), sens)?;
            }
            analyses.insert(name, analysis);
        }

        Ok(SweepReport {
            iterations,
            total_points: self.total_points,
            dispatched_jobs: self.job_rows.len(),
            failed_jobs: self.failed_jobs,
            analyses,
        })
    }
}
