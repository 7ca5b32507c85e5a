//! Parametric uncertainty quantification library
//!
//! This crate propagates input uncertainty through a black-box model and
//! reconstructs the output distribution. It supports:
//! - Piecewise-linear probability densities with full arithmetic
//!   (convolution-based add/subtract, change-of-variables multiply/divide)
//! - Distribution families (Normal, Uniform, Weibull, Rayleigh,
//!   Exponential, Triangle) plus data-driven densities (histogram, KDE)
//! - Latin Hypercube, Descriptive, and plain Monte Carlo sampling
//! - Smolyak sparse-grid collocation with a generalized polynomial-chaos
//!   response surface and Elementary Effects sensitivity screening
//! - A sweep orchestrator that dispatches model evaluations through a
//!   pluggable job runner and never re-runs an already evaluated point
//!
//! # Quick start
//!
//! ```ignore
//! use uqsweep_core::{Parameter, Sweep, SmolyakStrategy, CallableRunner};
//!
//! let params = vec![
//!     Parameter::normal("x", "first input", 10.0, 2.0)?,
//!     Parameter::normal("y", "second input", 100.0, 3.0)?,
//! ];
//! let strategy = SmolyakStrategy::new(2, 7);
//! let runner = CallableRunner::new(|args: &[(String, f64)]| {
//!     Ok(vec![("total".to_string(), args[0].1 + args[1].1)])
//! });
//! let mut sweep = Sweep::new(params, Box::new(strategy), Box::new(runner))?;
//! let report = sweep.run()?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod chaos;
pub mod config;
pub mod error;
pub mod numeric;
pub mod response;
pub mod runner;
pub mod sgrid;
pub mod store;
pub mod strategies;
pub mod sweep;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod parameter;
pub mod pdf;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::PdfConfig;
pub use error::{PdfError, StrategyError, SweepError};
pub use parameter::{CalType, Parameter, ParameterKind};
pub use pdf::Pdf;
pub use response::ResponseSurface;
pub use runner::{CallableRunner, JobRunner};
pub use sgrid::SparseGrid;
pub use strategies::{
    LhsStrategy, MonteCarloStrategy, SamplingStrategy, SimpleSweepStrategy, SmolyakStrategy,
};
pub use sweep::{Sweep, SweepDecision, SweepState};
