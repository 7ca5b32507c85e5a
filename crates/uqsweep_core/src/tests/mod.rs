//! Tests for the uncertainty quantification pipeline
//!
//! Tests are organized by topic:
//! - `numeric` - Interpolation, integration, and normal special functions
//! - `pdf` - Piecewise-linear density construction and evaluation
//! - `arith` - Arithmetic on independent random variables
//! - `families` - Named distribution families and data-driven densities
//! - `sampling` - Inverse-CDF, Latin Hypercube, and descriptive samplers
//! - `sgrid` - Sparse-grid generation, weights, and nesting
//! - `chaos` - Legendre chaos basis and multi-index ordering
//! - `response` - Polynomial and RBF response surfaces
//! - `strategies` - Strategy contracts, extension, and analysis
//! - `store` - Result store paths and the in-process job runner
//! - `sweep` - End-to-end orchestration and point caching

mod numeric;
mod pdf;
mod response;
mod sgrid;
mod store;
