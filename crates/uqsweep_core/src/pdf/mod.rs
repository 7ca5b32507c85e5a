//! Piecewise-linear probability densities
//!
//! A [`Pdf`] stores a density as matched abscissa/ordinate arrays plus a
//! precomputed, normalized CDF. Construction resamples long-tailed or
//! irregular input onto a canonical uniform grid so that downstream
//! arithmetic stays numerically bounded. Densities are immutable after
//! construction; every combinator returns a new instance.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::PdfConfig;
use crate::error::PdfError;
use crate::numeric::{
    cumulative_trapezoid, interp, interp_outside, is_uniformly_spaced, linspace, trapezoid,
};

pub mod arith;
pub mod families;

/// A piecewise-linear probability density
///
/// Invariants (checked at construction):
/// - `x` strictly ascending, `y` non-negative, equal lengths
/// - the trapezoidal integral of `y` over `x` is 1
/// - `cdfy` is the normalized running integral of `y`
///
/// The single-point form (`x.len() == 1`) represents a point mass with
/// `y = [1]`, `cdfy = [1]`, and zero deviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pdf {
    x: Vec<f64>,
    y: Vec<f64>,
    cdfy: Vec<f64>,
    mean: f64,
    dev: f64,
    config: PdfConfig,
}

impl Pdf {
    /// Build a density from raw `(x, y)` samples
    ///
    /// Descending input is reversed. The grid is resampled onto
    /// `config.numpart` uniform points when its tails extend materially
    /// past the `config.fit` central-mass range, its spacing is
    /// non-uniform, or its point count strays more than 10% from
    /// `numpart`.
    pub fn new(x: Vec<f64>, y: Vec<f64>, config: PdfConfig) -> Result<Self, PdfError> {
        if x.is_empty() {
            return Err(PdfError::EmptyInput);
        }
        if x.len() != y.len() {
            return Err(PdfError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }

        let (mut x, mut y) = (x, y);
        if x.len() > 1 && x[0] > x[x.len() - 1] {
            x.reverse();
            y.reverse();
        }

        let last = x.len() - 1;
        if x.len() == 1 || x[0] == x[last] {
            let x0 = x[0];
            return Ok(Self::point_mass(x0, config));
        }

        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(PdfError::InvalidParameters {
                family: "piecewise linear",
                reason: "x values must be strictly increasing".into(),
            });
        }
        if y.iter().any(|&v| v < 0.0 || !v.is_finite()) {
            return Err(PdfError::InvalidParameters {
                family: "piecewise linear",
                reason: "density values must be finite and non-negative".into(),
            });
        }

        let mut pdf = Self::normalized(x, y, config)?;

        // Trim tails that carry less than the configured central mass,
        // leaving some slack so near-misses keep their native grid.
        let mut resample = false;
        let (mut lo, mut hi) = (pdf.x[0], pdf.x[pdf.x.len() - 1]);
        let dist = hi - lo;
        let tail = (1.0 - config.fit) / 2.0;
        let lo_t = pdf.ppf(tail);
        let hi_t = pdf.ppf(1.0 - tail);
        if (lo_t - lo) / dist > 0.1 || (hi - hi_t) / dist > 0.1 {
            resample = true;
            lo = lo_t;
            hi = hi_t;
        }
        if !resample && !is_uniformly_spaced(&pdf.x) {
            resample = true;
        }
        let numpart = config.numpart.max(2);
        if !resample
            && (pdf.x.len() as f64 - numpart as f64).abs() / numpart as f64 > 0.1
        {
            resample = true;
        }

        if resample {
            let nx = linspace(lo, hi, numpart);
            let ny: Vec<f64> = nx
                .iter()
                .map(|&v| interp_outside(v, &pdf.x, &pdf.y, 0.0, 0.0))
                .collect();
            pdf = Self::normalized(nx, ny, config)?;
        }
        Ok(pdf)
    }

    /// Build a density with the default configuration
    pub fn from_samples(x: Vec<f64>, y: Vec<f64>) -> Result<Self, PdfError> {
        Self::new(x, y, PdfConfig::default())
    }

    /// The point-mass density at `x0`
    #[must_use]
    pub fn point_mass(x0: f64, config: PdfConfig) -> Self {
        Self {
            x: vec![x0],
            y: vec![1.0],
            cdfy: vec![1.0],
            mean: x0,
            dev: 0.0,
            config,
        }
    }

    /// Normalize a strictly-ascending grid and compute CDF and moments
    fn normalized(x: Vec<f64>, y: Vec<f64>, config: PdfConfig) -> Result<Self, PdfError> {
        let mass = trapezoid(&y, &x);
        if mass <= 0.0 || !mass.is_finite() {
            return Err(PdfError::NonPositiveMass);
        }
        let y: Vec<f64> = y.iter().map(|v| v / mass).collect();
        let mut cdfy = cumulative_trapezoid(&y, &x);
        let total = cdfy[cdfy.len() - 1];
        for c in &mut cdfy {
            *c /= total;
        }

        let xy: Vec<f64> = x.iter().zip(&y).map(|(a, b)| a * b).collect();
        let mean = trapezoid(&xy, &x);
        let m2: Vec<f64> = x
            .iter()
            .zip(&y)
            .map(|(a, b)| (a - mean).powi(2) * b)
            .collect();
        let dev = trapezoid(&m2, &x).max(0.0).sqrt();

        Ok(Self {
            x,
            y,
            cdfy,
            mean,
            dev,
            config,
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn cdfy(&self) -> &[f64] {
        &self.cdfy
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn dev(&self) -> f64 {
        self.dev
    }

    #[must_use]
    pub fn config(&self) -> PdfConfig {
        self.config
    }

    /// Whether this is the degenerate single-point form
    #[must_use]
    pub fn is_point_mass(&self) -> bool {
        self.x.len() == 1
    }

    /// Full stored support `(x[0], x[last])`
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Tighter range covering `config.sfit` of the central mass
    #[must_use]
    pub fn srange(&self) -> (f64, f64) {
        let r = (1.0 - self.config.sfit) / 2.0;
        (self.ppf(r), self.ppf(1.0 - r))
    }

    /// Abscissa of the maximum density
    #[must_use]
    pub fn mode(&self) -> f64 {
        let mut best = 0;
        for i in 1..self.y.len() {
            if self.y[i] > self.y[best] {
                best = i;
            }
        }
        self.x[best]
    }

    // === Evaluation ===

    /// Density at `v` (zero outside the stored range)
    #[must_use]
    pub fn pdf(&self, v: f64) -> f64 {
        if self.is_point_mass() {
            return 0.0;
        }
        interp_outside(v, &self.x, &self.y, 0.0, 0.0)
    }

    /// Cumulative probability at `v` (clamped to 0/1 outside the range)
    #[must_use]
    pub fn cdf(&self, v: f64) -> f64 {
        if self.is_point_mass() {
            return if v < self.x[0] { 0.0 } else { 1.0 };
        }
        interp_outside(v, &self.x, &self.cdfy, 0.0, 1.0)
    }

    /// Quantile function, the inverse of [`cdf`](Self::cdf)
    #[must_use]
    pub fn ppf(&self, p: f64) -> f64 {
        if self.is_point_mass() {
            return self.x[0];
        }
        interp(p, &self.cdfy, &self.x)
    }

    // === Samplers ===

    /// `n` independent inverse-CDF draws
    pub fn random<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        (0..n).map(|_| self.ppf(rng.random::<f64>())).collect()
    }

    /// Latin Hypercube sample: one draw per equal-probability stratum,
    /// returned in random order
    ///
    /// The shuffle matters: pairing independently shuffled columns is what
    /// makes a multi-parameter sample a valid Latin Hypercube.
    pub fn lhs<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let mut vals: Vec<f64> = (0..n)
            .map(|i| self.ppf((i as f64 + rng.random::<f64>()) / n as f64))
            .collect();
        vals.shuffle(rng);
        vals
    }

    /// Descriptive sample: stratum midpoints in random order
    pub fn ds<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let mut vals = self.ds_sorted(n);
        vals.shuffle(rng);
        vals
    }

    /// Stratum midpoints in ascending order
    #[must_use]
    pub fn ds_sorted(&self, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| self.ppf((i as f64 + 0.5) / n as f64))
            .collect()
    }

    /// [`lhs`](Self::lhs) rescaled into `[-1, 1]` about the range midpoint
    pub fn lhs1<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let vals = self.lhs(n, rng);
        self.rescale_unit(vals)
    }

    /// [`ds`](Self::ds) rescaled into `[-1, 1]` about the range midpoint
    pub fn ds1<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<f64> {
        let vals = self.ds(n, rng);
        self.rescale_unit(vals)
    }

    fn rescale_unit(&self, vals: Vec<f64>) -> Vec<f64> {
        let (pmin, pmax) = self.range();
        let span = pmax - pmin;
        if span == 0.0 {
            return vec![0.0; vals.len()];
        }
        vals.iter()
            .map(|v| (2.0 * v - (pmax + pmin)) / span)
            .collect()
    }
}
