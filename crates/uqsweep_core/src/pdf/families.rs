//! Named distribution families
//!
//! Each constructor samples a closed-form density onto a finite grid and
//! feeds it through [`Pdf::new`]. Infinite tails are truncated at the
//! `config.fit` central-mass quantiles first, so a long-tailed family
//! (Normal, Exponential, Weibull) never dominates the resampled grid:
//! one-tailed families keep their finite endpoint and cut the other at
//! the `fit` quantile, two-tailed families cut both at `(1 ± fit)/2`.

use crate::config::PdfConfig;
use crate::error::PdfError;
use crate::numeric::{inverse_normal_cdf, linspace, standard_normal_pdf};
use crate::pdf::Pdf;

impl Pdf {
    /// Normal density with the given mean and standard deviation
    pub fn normal(mean: f64, dev: f64, config: PdfConfig) -> Result<Self, PdfError> {
        Self::normal_bounded(mean, dev, None, None, config)
    }

    /// Normal density additionally clamped to `[min, max]`
    pub fn normal_bounded(
        mean: f64,
        dev: f64,
        min: Option<f64>,
        max: Option<f64>,
        config: PdfConfig,
    ) -> Result<Self, PdfError> {
        if dev <= 0.0 || !dev.is_finite() {
            return Err(PdfError::InvalidParameters {
                family: "normal",
                reason: format!("deviation must be positive, got {dev}"),
            });
        }
        let tail = (1.0 - config.fit) / 2.0;
        let lo = clamp_lo(mean + dev * inverse_normal_cdf(tail), min);
        let hi = clamp_hi(mean + dev * inverse_normal_cdf(1.0 - tail), max);
        if lo >= hi {
            return Err(PdfError::InvalidParameters {
                family: "normal",
                reason: format!("empty support [{lo}, {hi}]"),
            });
        }
        let x = linspace(lo, hi, config.numpart.max(2));
        let y: Vec<f64> = x
            .iter()
            .map(|&v| standard_normal_pdf((v - mean) / dev) / dev)
            .collect();
        Self::new(x, y, config)
    }

    /// Uniform density from any consistent two of `min`, `max`, `mean`
    pub fn uniform(
        min: Option<f64>,
        max: Option<f64>,
        mean: Option<f64>,
        config: PdfConfig,
    ) -> Result<Self, PdfError> {
        let err = |reason: String| PdfError::InvalidParameters {
            family: "uniform",
            reason,
        };
        if let (Some(lo), Some(hi), Some(m)) = (min, max, mean)
            && (m - (lo + hi) / 2.0).abs() > 1e-6
        {
            return Err(err(format!(
                "mean must be (min+max)/2, got mean={m} for [{lo}, {hi}]"
            )));
        }
        let (lo, hi) = match (min, max, mean) {
            (Some(lo), Some(hi), _) => (lo, hi),
            (Some(lo), None, Some(m)) => (lo, m + (m - lo)),
            (None, Some(hi), Some(m)) => (m - (hi - m), hi),
            _ => {
                return Err(err(
                    "two of (min, max, mean) must be specified".into(),
                ));
            }
        };
        if lo >= hi {
            return Err(err(format!("min {lo} must be below max {hi}")));
        }
        Self::new(vec![lo, hi], vec![1.0, 1.0], config)
    }

    /// Weibull density with the given shape and scale
    pub fn weibull(shape: f64, scale: f64, config: PdfConfig) -> Result<Self, PdfError> {
        if shape <= 0.0 || scale <= 0.0 {
            return Err(PdfError::InvalidParameters {
                family: "weibull",
                reason: format!("shape and scale must be positive, got {shape} and {scale}"),
            });
        }
        // The density blows up at zero for shape < 1
        let lo = if shape < 1.0 { 0.01 } else { 0.0 };
        let hi = scale * (-(1.0 - config.fit).ln()).powf(1.0 / shape);
        let x = linspace(lo, hi, config.numpart.max(2));
        let y: Vec<f64> = x
            .iter()
            .map(|&v| {
                if v <= 0.0 {
                    0.0
                } else {
                    (shape / scale)
                        * (v / scale).powf(shape - 1.0)
                        * (-(v / scale).powf(shape)).exp()
                }
            })
            .collect();
        Self::new(x, y, config)
    }

    /// Rayleigh density with the given scale
    pub fn rayleigh(scale: f64, config: PdfConfig) -> Result<Self, PdfError> {
        if scale <= 0.0 {
            return Err(PdfError::InvalidParameters {
                family: "rayleigh",
                reason: format!("scale must be positive, got {scale}"),
            });
        }
        let hi = scale * (-2.0 * (1.0 - config.fit).ln()).sqrt();
        let x = linspace(0.0, hi, config.numpart.max(2));
        let s2 = scale * scale;
        let y: Vec<f64> = x
            .iter()
            .map(|&v| (v / s2) * (-v * v / (2.0 * s2)).exp())
            .collect();
        Self::new(x, y, config)
    }

    /// Exponential density with the given rate
    pub fn exponential(rate: f64, config: PdfConfig) -> Result<Self, PdfError> {
        if rate <= 0.0 {
            return Err(PdfError::InvalidParameters {
                family: "exponential",
                reason: format!("rate must be positive, got {rate}"),
            });
        }
        let hi = -(1.0 - config.fit).ln() / rate;
        let x = linspace(0.0, hi, config.numpart.max(2));
        let y: Vec<f64> = x.iter().map(|&v| rate * (-rate * v).exp()).collect();
        Self::new(x, y, config)
    }

    /// Triangular density; the three arguments are sorted so the middle
    /// one becomes the mode
    pub fn triangle(a: f64, b: f64, c: f64, config: PdfConfig) -> Result<Self, PdfError> {
        let mut v = [a, b, c];
        v.sort_by(f64::total_cmp);
        Self::new(v.to_vec(), vec![0.0, 1.0, 0.0], config)
    }

    /// Density estimated from measured data by histogram binning
    ///
    /// `nbins == 0` selects the Freedman–Diaconis count from the
    /// interquartile range. Zero-spread data collapses to a point mass.
    pub fn experimental(data: &[f64], nbins: usize, config: PdfConfig) -> Result<Self, PdfError> {
        if data.is_empty() {
            return Err(PdfError::EmptyInput);
        }
        let mut sorted = data.to_vec();
        sorted.sort_by(f64::total_cmp);
        let (dmin, dmax) = (sorted[0], sorted[sorted.len() - 1]);
        if dmin == dmax {
            return Ok(Self::point_mass(dmin, config));
        }

        let nbins = if nbins == 0 {
            let iqr = percentile(&sorted, 75.0) - percentile(&sorted, 25.0);
            if iqr == 0.0 {
                return Ok(Self::point_mass(dmin, config));
            }
            let width = 2.0 * iqr / (data.len() as f64).powf(1.0 / 3.0);
            ((dmax - dmin) / width + 0.5) as usize
        } else {
            nbins
        };

        if nbins < 2 {
            return Self::new(vec![dmin, dmax], vec![1.0, 1.0], config);
        }

        // Density histogram evaluated at bin centers
        let width = (dmax - dmin) / nbins as f64;
        let mut counts = vec![0usize; nbins];
        for &v in data {
            let idx = (((v - dmin) / width) as usize).min(nbins - 1);
            counts[idx] += 1;
        }
        let norm = data.len() as f64 * width;
        let centers: Vec<f64> = (0..nbins)
            .map(|i| dmin + width * (i as f64 + 0.5))
            .collect();
        let dens: Vec<f64> = counts.iter().map(|&c| c as f64 / norm).collect();

        // Linear interpolation over the full bin range, extrapolating the
        // edge segments and clipping anything that goes negative
        let x = linspace(dmin, dmax, config.numpart.max(2));
        let y: Vec<f64> = x
            .iter()
            .map(|&v| extrapolating_interp(v, &centers, &dens).max(0.0))
            .collect();
        Self::new(x, y, config)
    }

    /// Density estimated from measured data by a Gaussian kernel
    ///
    /// `bw` overrides the bandwidth factor (Scott's rule `n^(-1/5)` by
    /// default); the kernel sum is evaluated over mean ± 5 deviations.
    pub fn experimental_kde(
        data: &[f64],
        bw: Option<f64>,
        config: PdfConfig,
    ) -> Result<Self, PdfError> {
        if data.is_empty() {
            return Err(PdfError::EmptyInput);
        }
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let dev = (data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
        if dev == 0.0 {
            return Err(PdfError::InvalidParameters {
                family: "kde",
                reason: "cannot fit a kernel density to constant data".into(),
            });
        }
        let factor = bw.unwrap_or_else(|| n.powf(-0.2));
        let h = factor * dev;

        let x = linspace(mean - 5.0 * dev, mean + 5.0 * dev, config.numpart.max(2));
        let y: Vec<f64> = x
            .iter()
            .map(|&v| {
                data.iter()
                    .map(|&d| standard_normal_pdf((v - d) / h))
                    .sum::<f64>()
                    / (n * h)
            })
            .collect();
        Self::new(x, y, config)
    }
}

fn clamp_lo(v: f64, min: Option<f64>) -> f64 {
    match min {
        Some(m) => v.max(m),
        None => v,
    }
}

fn clamp_hi(v: f64, max: Option<f64>) -> f64 {
    match max {
        Some(m) => v.min(m),
        None => v,
    }
}

/// Linearly interpolated percentile of pre-sorted data
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let idx = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = idx - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Linear interpolation that extends the outermost segments instead of
/// clamping, matching a degree-1 spline evaluated past its knots
fn extrapolating_interp(xq: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len();
    if n == 1 {
        return fp[0];
    }
    if xq < xp[0] {
        let slope = (fp[1] - fp[0]) / (xp[1] - xp[0]);
        return fp[0] + slope * (xq - xp[0]);
    }
    if xq > xp[n - 1] {
        let slope = (fp[n - 1] - fp[n - 2]) / (xp[n - 1] - xp[n - 2]);
        return fp[n - 1] + slope * (xq - xp[n - 1]);
    }
    crate::numeric::interp(xq, xp, fp)
}
