//! Job execution interface
//!
//! The orchestrator never runs the model itself; it hands rendered command
//! lines to a [`JobRunner`] and later harvests captured stdout from the
//! result store. The model reports each output variable as one tagged
//! line on stdout:
//!
//! ```text
//! UQS:{"name":"total","desc":"","value":110.0}:SQU
//! ```
//!
//! A dispatched job with no tagged line is a failure for that job only;
//! the rest of the batch still collects.
//!
//! [`CallableRunner`] is the bundled in-process implementation: it parses
//! the `--name=value` flags out of each command line, evaluates a closure,
//! and synthesizes the tagged stdout a real process would have printed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::ResultStore;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

const TAG_OPEN: &str = "UQS:";
const TAG_CLOSE: &str = ":SQU";

/// One output variable reported by a model run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedOutput {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub value: f64,
}

/// Render one tagged stdout line
pub fn format_tagged(out: &TaggedOutput) -> Result<String, serde_json::Error> {
    Ok(format!("{TAG_OPEN}{}{TAG_CLOSE}", serde_json::to_string(out)?))
}

/// Extract every well-formed tagged line from captured stdout
#[must_use]
pub fn parse_tagged(stdout: &str) -> Vec<TaggedOutput> {
    let mut outputs = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix(TAG_OPEN) else {
            continue;
        };
        let Some(payload) = rest.strip_suffix(TAG_CLOSE) else {
            continue;
        };
        match serde_json::from_str::<TaggedOutput>(payload) {
            Ok(out) => outputs.push(out),
            Err(e) => warn!(error = %e, "ignoring malformed tagged line"),
        }
    }
    outputs
}

/// External job execution, consumed by the sweep orchestrator
///
/// Jobs are numbered in the order they were added, across every
/// iteration of the sweep.
pub trait JobRunner {
    /// Queue one model invocation
    fn add_job(&mut self, cmd: &str, dir: &str, cpus: usize, outfile: &str);

    /// Run everything queued; returns false on a dispatch-level failure
    fn run(&mut self) -> bool;

    /// `(finished job indices, all jobs done)`
    fn status(&self) -> (Vec<usize>, bool);

    /// Write captured stdout/stderr under `output/jobs/<n>` and return
    /// the indices of finished jobs
    fn collect(&mut self, store: &mut ResultStore) -> Vec<usize>;
}

#[derive(Debug, Clone)]
enum JobState {
    Pending,
    Finished { stdout: String },
    Failed { stderr: String },
}

struct JobRecord {
    cmd: String,
    args: Vec<(String, f64)>,
    state: JobState,
}

/// In-process runner evaluating a closure per queued point
pub struct CallableRunner<F> {
    func: F,
    jobs: Vec<JobRecord>,
}

impl<F> CallableRunner<F>
where
    F: Fn(&[(String, f64)]) -> Result<Vec<(String, f64)>, String> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            jobs: Vec::new(),
        }
    }
}

/// Pull `--name=value` flags out of a rendered command line
fn parse_args(cmd: &str) -> Vec<(String, f64)> {
    cmd.split_whitespace()
        .filter_map(|tok| {
            let flag = tok.strip_prefix("--")?;
            let (name, value) = flag.split_once('=')?;
            let value: f64 = value.parse().ok()?;
            Some((name.to_string(), value))
        })
        .collect()
}

impl<F> JobRunner for CallableRunner<F>
where
    F: Fn(&[(String, f64)]) -> Result<Vec<(String, f64)>, String> + Send + Sync,
{
    fn add_job(&mut self, cmd: &str, _dir: &str, _cpus: usize, _outfile: &str) {
        self.jobs.push(JobRecord {
            cmd: cmd.to_string(),
            args: parse_args(cmd),
            state: JobState::Pending,
        });
    }

    fn run(&mut self) -> bool {
        let pending: Vec<(usize, &JobRecord)> = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| matches!(j.state, JobState::Pending))
            .collect();
        debug!(jobs = pending.len(), "running queued jobs");

        let evaluate = |(_idx, job): &(usize, &JobRecord)| -> JobState {
            match (self.func)(&job.args) {
                Ok(outputs) => {
                    let mut stdout = String::new();
                    for (name, value) in outputs {
                        let tagged = TaggedOutput {
                            name,
                            desc: String::new(),
                            value,
                        };
                        match format_tagged(&tagged) {
                            Ok(line) => {
                                stdout.push_str(&line);
                                stdout.push('\n');
                            }
                            Err(e) => {
                                return JobState::Failed {
                                    stderr: format!("output encoding failed: {e}"),
                                };
                            }
                        }
                    }
                    JobState::Finished { stdout }
                }
                Err(msg) => JobState::Failed { stderr: msg },
            }
        };

        #[cfg(feature = "parallel")]
        let states: Vec<JobState> = pending.par_iter().map(evaluate).collect();
        #[cfg(not(feature = "parallel"))]
        let states: Vec<JobState> = pending.iter().map(evaluate).collect();

        let indices: Vec<usize> = pending.iter().map(|(i, _)| *i).collect();
        for (idx, state) in indices.into_iter().zip(states) {
            self.jobs[idx].state = state;
        }
        true
    }

    fn status(&self) -> (Vec<usize>, bool) {
        let finished: Vec<usize> = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, j)| matches!(j.state, JobState::Finished { .. }))
            .map(|(i, _)| i)
            .collect();
        let all_done = self
            .jobs
            .iter()
            .all(|j| !matches!(j.state, JobState::Pending));
        (finished, all_done)
    }

    fn collect(&mut self, store: &mut ResultStore) -> Vec<usize> {
        let mut finished = Vec::new();
        for (i, job) in self.jobs.iter().enumerate() {
            match &job.state {
                JobState::Finished { stdout } => {
                    store.set(
                        &format!("output/jobs/{i}/stdout"),
                        serde_json::Value::String(stdout.clone()),
                    );
                    store.set(
                        &format!("output/jobs/{i}/stderr"),
                        serde_json::Value::String(String::new()),
                    );
                    finished.push(i);
                }
                JobState::Failed { stderr } => {
                    debug!(job = i, cmd = %job.cmd, "job failed");
                    store.set(
                        &format!("output/jobs/{i}/stdout"),
                        serde_json::Value::String(String::new()),
                    );
                    store.set(
                        &format!("output/jobs/{i}/stderr"),
                        serde_json::Value::String(stderr.clone()),
                    );
                }
                JobState::Pending => {}
            }
        }
        finished
    }
}
