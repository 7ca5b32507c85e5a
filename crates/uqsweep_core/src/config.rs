//! Numeric resolution settings
//!
//! Every [`Pdf`](crate::Pdf) carries the configuration it was constructed
//! with, so densities built with different resolutions can coexist in one
//! process and arithmetic results inherit the left operand's settings.

use serde::{Deserialize, Serialize};

fn default_numpart() -> usize {
    100
}

fn default_fit() -> f64 {
    0.999
}

fn default_sfit() -> f64 {
    0.995
}

/// Resolution and tail-truncation settings for piecewise-linear densities
///
/// `fit` and `sfit` are central-mass fractions: a density is truncated so
/// that `fit` of its probability mass lies inside the stored grid, and
/// `sfit` bounds the tighter presentation/collocation range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfConfig {
    /// Number of grid points used when a density is resampled
    #[serde(default = "default_numpart")]
    pub numpart: usize,

    /// Central probability mass retained by the stored grid
    #[serde(default = "default_fit")]
    pub fit: f64,

    /// Central probability mass for the tighter collocation range
    #[serde(default = "default_sfit")]
    pub sfit: f64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            numpart: default_numpart(),
            fit: default_fit(),
            sfit: default_sfit(),
        }
    }
}

impl PdfConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_numpart(mut self, numpart: usize) -> Self {
        self.numpart = numpart;
        self
    }

    #[must_use]
    pub fn with_fit(mut self, fit: f64) -> Self {
        self.fit = fit;
        self
    }

    #[must_use]
    pub fn with_sfit(mut self, sfit: f64) -> Self {
        self.sfit = sfit;
        self
    }
}
