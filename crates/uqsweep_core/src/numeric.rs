//! Shared numeric helpers
//!
//! Grid construction, trapezoidal integration, linear interpolation, and
//! the normal-distribution special functions used by the density families.

/// 1/√(2π)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// `n` evenly spaced values from `a` to `b` inclusive
#[must_use]
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![a];
    }
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}

/// `n` evenly spaced values from `a` toward `b`, excluding the endpoint
#[must_use]
pub fn linspace_open(a: f64, b: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let step = (b - a) / n as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}

/// Trapezoidal integral of `y` over the (possibly non-uniform) grid `x`
#[must_use]
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    debug_assert_eq!(y.len(), x.len());
    let mut total = 0.0;
    for i in 1..x.len() {
        total += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
    }
    total
}

/// Running trapezoidal integral, same length as `x`, starting at 0
#[must_use]
pub fn cumulative_trapezoid(y: &[f64], x: &[f64]) -> Vec<f64> {
    debug_assert_eq!(y.len(), x.len());
    let mut out = Vec::with_capacity(x.len());
    let mut total = 0.0;
    out.push(0.0);
    for i in 1..x.len() {
        total += 0.5 * (y[i] + y[i - 1]) * (x[i] - x[i - 1]);
        out.push(total);
    }
    out
}

/// Piecewise-linear interpolation of `fp` over ascending knots `xp`
///
/// Queries outside the knot range clamp to the first/last ordinate. A
/// zero-width segment (repeated knot) returns its left ordinate, so flat
/// CDF plateaus invert without dividing by zero.
#[must_use]
pub fn interp(xq: f64, xp: &[f64], fp: &[f64]) -> f64 {
    debug_assert_eq!(xp.len(), fp.len());
    debug_assert!(!xp.is_empty());
    if xq <= xp[0] {
        return fp[0];
    }
    let last = xp.len() - 1;
    if xq >= xp[last] {
        return fp[last];
    }
    // First knot strictly greater than xq; hi >= 1 because xq > xp[0]
    let hi = xp.partition_point(|&v| v <= xq);
    let lo = hi - 1;
    let dx = xp[hi] - xp[lo];
    if dx == 0.0 {
        return fp[lo];
    }
    fp[lo] + (fp[hi] - fp[lo]) * (xq - xp[lo]) / dx
}

/// Like [`interp`] but with explicit ordinates outside the knot range
#[must_use]
pub fn interp_outside(xq: f64, xp: &[f64], fp: &[f64], left: f64, right: f64) -> f64 {
    debug_assert!(!xp.is_empty());
    if xq < xp[0] {
        return left;
    }
    if xq > xp[xp.len() - 1] {
        return right;
    }
    interp(xq, xp, fp)
}

/// Whether consecutive spacings of `x` are all equal within tolerance
#[must_use]
pub fn is_uniformly_spaced(x: &[f64]) -> bool {
    if x.len() < 3 {
        return true;
    }
    let d0 = x[1] - x[0];
    x.windows(2)
        .all(|w| ((w[1] - w[0]) - d0).abs() <= 1e-8 + 1e-5 * d0.abs())
}

/// Binomial coefficient C(n, k)
#[must_use]
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u64 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u64 / (i + 1) as u64;
    }
    acc
}

/// Mean and (population) standard deviation of a sample
#[must_use]
pub fn mean_and_dev(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Weighted mean and standard deviation
///
/// Weights need not be normalized; non-positive total weight yields NaN.
#[must_use]
pub fn weighted_mean_and_dev(values: &[f64], weights: &[f64]) -> (f64, f64) {
    debug_assert_eq!(values.len(), weights.len());
    let wsum: f64 = weights.iter().sum();
    if wsum <= 0.0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .sum::<f64>()
        / wsum;
    let var = values
        .iter()
        .zip(weights)
        .map(|(v, w)| w * (v - mean).powi(2))
        .sum::<f64>()
        / wsum;
    (mean, var.sqrt())
}

/// Standard normal density φ(x)
#[must_use]
pub fn standard_normal_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard normal CDF Φ(x), Abramowitz & Stegun 26.2.17
///
/// Maximum absolute error below 7.5e-8.
#[must_use]
pub fn standard_normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let abs_x = x.abs();
    let k = 1.0 / (1.0 + 0.2316419 * abs_x);
    let poly = k
        * (0.319381530
            + k * (-0.356563782 + k * (1.781477937 + k * (-1.821255978 + k * 1.330274429))));
    let cdf_abs = 1.0 - standard_normal_pdf(abs_x) * poly;
    if x >= 0.0 { cdf_abs } else { 1.0 - cdf_abs }
}

/// Inverse standard normal CDF, Abramowitz & Stegun 26.2.23
///
/// Rational approximation, maximum absolute error below 4.5e-4. Returns
/// NaN for p outside [0, 1] and the signed infinities at the endpoints.
#[must_use]
pub fn inverse_normal_cdf(p: f64) -> f64 {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let (q, sign) = if p > 0.5 { (1.0 - p, 1.0) } else { (p, -1.0) };
    let t = (-2.0 * q.ln()).sqrt();

    const C0: f64 = 2.515517;
    const C1: f64 = 0.802853;
    const C2: f64 = 0.010328;
    const D1: f64 = 1.432788;
    const D2: f64 = 0.189269;
    const D3: f64 = 0.001308;

    let z = t - (C0 + C1 * t + C2 * t * t) / (1.0 + D1 * t + D2 * t * t + D3 * t * t * t);
    sign * z
}
