//! Tests for grid construction, interpolation, integration, and the
//! normal special functions

use crate::numeric::{
    binomial, cumulative_trapezoid, interp, interp_outside, inverse_normal_cdf,
    is_uniformly_spaced, linspace, linspace_open, mean_and_dev, standard_normal_cdf,
    standard_normal_pdf, trapezoid, weighted_mean_and_dev,
};

#[test]
fn test_linspace_endpoints() {
    let v = linspace(0.0, 1.0, 5);
    assert_eq!(v.len(), 5);
    assert_eq!(v[0], 0.0);
    assert_eq!(v[4], 1.0);
    assert!((v[2] - 0.5).abs() < 1e-12);

    assert_eq!(linspace(3.0, 7.0, 1), vec![3.0]);
    assert!(linspace(0.0, 1.0, 0).is_empty());
}

#[test]
fn test_linspace_open_excludes_endpoint() {
    let v = linspace_open(0.0, 1.0, 4);
    assert_eq!(v.len(), 4);
    assert_eq!(v[0], 0.0);
    assert!((v[3] - 0.75).abs() < 1e-12);
}

#[test]
fn test_trapezoid_linear_integrand() {
    // Integral of y = x over [0, 1] is exactly 1/2 under the trapezoid rule
    let x = linspace(0.0, 1.0, 11);
    let y = x.clone();
    assert!((trapezoid(&y, &x) - 0.5).abs() < 1e-12);
}

#[test]
fn test_cumulative_trapezoid_starts_at_zero() {
    let x = vec![0.0, 1.0, 3.0];
    let y = vec![1.0, 1.0, 1.0];
    let c = cumulative_trapezoid(&y, &x);
    assert_eq!(c, vec![0.0, 1.0, 3.0]);
}

#[test]
fn test_interp_midpoint_and_clamping() {
    let xp = vec![0.0, 1.0, 2.0];
    let fp = vec![0.0, 10.0, 40.0];
    assert!((interp(0.5, &xp, &fp) - 5.0).abs() < 1e-12);
    assert!((interp(1.5, &xp, &fp) - 25.0).abs() < 1e-12);
    // Queries outside the knot range clamp to the edge ordinate
    assert_eq!(interp(-3.0, &xp, &fp), 0.0);
    assert_eq!(interp(9.0, &xp, &fp), 40.0);
}

#[test]
fn test_interp_outside_explicit_edges() {
    let xp = vec![0.0, 1.0];
    let fp = vec![2.0, 4.0];
    assert_eq!(interp_outside(-0.1, &xp, &fp, -7.0, 7.0), -7.0);
    assert_eq!(interp_outside(1.1, &xp, &fp, -7.0, 7.0), 7.0);
    // On the boundary the knot ordinate wins
    assert_eq!(interp_outside(0.0, &xp, &fp, -7.0, 7.0), 2.0);
    assert_eq!(interp_outside(1.0, &xp, &fp, -7.0, 7.0), 4.0);
}

#[test]
fn test_is_uniformly_spaced() {
    assert!(is_uniformly_spaced(&linspace(-3.0, 11.0, 50)));
    assert!(is_uniformly_spaced(&[1.0, 2.0]));
    assert!(!is_uniformly_spaced(&[0.0, 1.0, 3.0]));
}

#[test]
fn test_binomial_coefficients() {
    assert_eq!(binomial(5, 2), 10);
    assert_eq!(binomial(10, 0), 1);
    assert_eq!(binomial(10, 10), 1);
    assert_eq!(binomial(4, 5), 0);
    assert_eq!(binomial(20, 10), 184_756);
}

#[test]
fn test_mean_and_dev_population() {
    let (mean, dev) = mean_and_dev(&[1.0, 2.0, 3.0, 4.0]);
    assert!((mean - 2.5).abs() < 1e-12);
    assert!((dev - 1.25f64.sqrt()).abs() < 1e-12);

    let (m, d) = mean_and_dev(&[]);
    assert!(m.is_nan() && d.is_nan());
}

#[test]
fn test_weighted_mean_and_dev() {
    let vals = vec![1.0, 2.0, 3.0];
    // Uniform weights reproduce the plain moments
    let (m, d) = weighted_mean_and_dev(&vals, &[2.0, 2.0, 2.0]);
    let (pm, pd) = mean_and_dev(&vals);
    assert!((m - pm).abs() < 1e-12);
    assert!((d - pd).abs() < 1e-12);

    // All weight on one value collapses the deviation
    let (m, d) = weighted_mean_and_dev(&vals, &[0.0, 1.0, 0.0]);
    assert_eq!(m, 2.0);
    assert_eq!(d, 0.0);

    let (m, _) = weighted_mean_and_dev(&vals, &[0.0, 0.0, 0.0]);
    assert!(m.is_nan());
}

#[test]
fn test_standard_normal_pdf_peak() {
    assert!((standard_normal_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-15);
    assert!((standard_normal_pdf(1.0) - 0.241_970_724_519_143_37).abs() < 1e-12);
}

#[test]
fn test_standard_normal_cdf_reference_values() {
    assert!((standard_normal_cdf(0.0) - 0.5).abs() < 1e-6);
    assert!((standard_normal_cdf(1.96) - 0.975_002).abs() < 1e-4);
    assert!((standard_normal_cdf(-1.96) - 0.024_998).abs() < 1e-4);
    // Symmetry is exact by construction
    let x = 0.73;
    assert_eq!(standard_normal_cdf(-x), 1.0 - standard_normal_cdf(x));
}

#[test]
fn test_inverse_normal_cdf() {
    assert!(inverse_normal_cdf(0.5).abs() < 1e-3);
    assert!((inverse_normal_cdf(0.975) - 1.96).abs() < 2e-3);
    assert!((inverse_normal_cdf(0.025) + 1.96).abs() < 2e-3);
    assert_eq!(inverse_normal_cdf(0.0), f64::NEG_INFINITY);
    assert_eq!(inverse_normal_cdf(1.0), f64::INFINITY);
    assert!(inverse_normal_cdf(-0.1).is_nan());
    assert!(inverse_normal_cdf(1.1).is_nan());
}

#[test]
fn test_inverse_normal_cdf_round_trip() {
    for &p in &[0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99] {
        let z = inverse_normal_cdf(p);
        // Both approximations carry their own error budget
        assert!(
            (standard_normal_cdf(z) - p).abs() < 1e-3,
            "round trip failed at p = {p}"
        );
    }
}
