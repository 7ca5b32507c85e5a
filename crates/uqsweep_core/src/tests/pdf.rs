//! Tests for piecewise-linear density construction, normalization,
//! resampling, and evaluation

use crate::config::PdfConfig;
use crate::error::PdfError;
use crate::numeric::{is_uniformly_spaced, trapezoid};
use crate::pdf::Pdf;

#[test]
fn test_empty_input_rejected() {
    let err = Pdf::from_samples(vec![], vec![]);
    assert!(matches!(err, Err(PdfError::EmptyInput)));
}

#[test]
fn test_length_mismatch_rejected() {
    let err = Pdf::from_samples(vec![0.0, 1.0], vec![1.0]);
    assert!(matches!(err, Err(PdfError::LengthMismatch { x: 2, y: 1 })));
}

#[test]
fn test_non_ascending_rejected() {
    let err = Pdf::from_samples(vec![0.0, 1.0, 1.0], vec![1.0, 1.0, 1.0]);
    assert!(matches!(err, Err(PdfError::InvalidParameters { .. })));
}

#[test]
fn test_negative_density_rejected() {
    let err = Pdf::from_samples(vec![0.0, 1.0, 2.0], vec![1.0, -0.5, 1.0]);
    assert!(matches!(err, Err(PdfError::InvalidParameters { .. })));
}

#[test]
fn test_zero_mass_rejected() {
    let err = Pdf::from_samples(vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 0.0]);
    assert!(matches!(err, Err(PdfError::NonPositiveMass)));
}

#[test]
fn test_descending_input_is_reversed() {
    let pdf = Pdf::from_samples(vec![2.0, 1.0, 0.0], vec![0.0, 1.0, 0.0]).unwrap();
    let (lo, hi) = pdf.range();
    assert_eq!(lo, 0.0);
    assert_eq!(hi, 2.0);
    assert!((pdf.mean() - 1.0).abs() < 1e-9);
}

#[test]
fn test_point_mass_forms() {
    // A single sample and a zero-width pair both collapse
    let a = Pdf::from_samples(vec![5.0], vec![1.0]).unwrap();
    let b = Pdf::from_samples(vec![5.0, 5.0], vec![0.3, 0.7]).unwrap();
    for pm in [a, b] {
        assert!(pm.is_point_mass());
        assert_eq!(pm.mean(), 5.0);
        assert_eq!(pm.dev(), 0.0);
        assert_eq!(pm.y(), &[1.0]);
        assert_eq!(pm.cdfy(), &[1.0]);
        assert_eq!(pm.ppf(0.3), 5.0);
        assert_eq!(pm.cdf(4.9), 0.0);
        assert_eq!(pm.cdf(5.0), 1.0);
        assert_eq!(pm.pdf(5.0), 0.0);
    }
}

#[test]
fn test_normalization_and_cdf() {
    // Unnormalized triangle comes out with unit mass and a proper CDF
    let pdf = Pdf::from_samples(vec![0.0, 1.0, 2.0], vec![0.0, 8.0, 0.0]).unwrap();
    assert!((trapezoid(pdf.y(), pdf.x()) - 1.0).abs() < 1e-9);
    let cdfy = pdf.cdfy();
    assert_eq!(cdfy[0], 0.0);
    assert!((cdfy[cdfy.len() - 1] - 1.0).abs() < 1e-12);
    assert!(cdfy.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_sparse_input_resampled_to_canonical_grid() {
    let config = PdfConfig::default();
    let pdf = Pdf::new(vec![0.0, 1.0], vec![1.0, 1.0], config).unwrap();
    assert_eq!(pdf.x().len(), config.numpart);
    assert!(is_uniformly_spaced(pdf.x()));
    assert!((pdf.mean() - 0.5).abs() < 1e-9);
    assert!((pdf.dev() - 1.0 / 12f64.sqrt()).abs() < 1e-3);
}

#[test]
fn test_matching_grid_kept_as_is() {
    // Input already on the canonical grid with tight tails is untouched
    let config = PdfConfig::default();
    let pdf = Pdf::normal(0.0, 1.0, config).unwrap();
    let again = Pdf::new(pdf.x().to_vec(), pdf.y().to_vec(), config).unwrap();
    assert_eq!(again.x(), pdf.x());
}

#[test]
fn test_cdf_ppf_are_inverse() {
    let pdf = Pdf::normal(3.0, 1.5, PdfConfig::default()).unwrap();
    for &p in &[0.01, 0.1, 0.3, 0.5, 0.7, 0.9, 0.99] {
        let v = pdf.ppf(p);
        assert!((pdf.cdf(v) - p).abs() < 1e-8, "mismatch at p = {p}");
    }
}

#[test]
fn test_pdf_zero_outside_range() {
    let pdf = Pdf::normal(0.0, 1.0, PdfConfig::default()).unwrap();
    let (lo, hi) = pdf.range();
    assert_eq!(pdf.pdf(lo - 1.0), 0.0);
    assert_eq!(pdf.pdf(hi + 1.0), 0.0);
    assert_eq!(pdf.cdf(lo - 1.0), 0.0);
    assert_eq!(pdf.cdf(hi + 1.0), 1.0);
    assert!(pdf.pdf(0.0) > 0.3);
}

#[test]
fn test_mode_of_asymmetric_triangle() {
    let pdf = Pdf::triangle(0.0, 0.4, 2.0, PdfConfig::default()).unwrap();
    assert!((pdf.mode() - 0.4).abs() < 0.05);
}

#[test]
fn test_srange_is_narrower_than_range() {
    let pdf = Pdf::normal(0.0, 1.0, PdfConfig::default()).unwrap();
    let (lo, hi) = pdf.range();
    let (slo, shi) = pdf.srange();
    assert!(slo > lo && shi < hi);
    assert!(slo < 0.0 && shi > 0.0);
}

#[test]
fn test_serde_round_trip() {
    let pdf = Pdf::normal(10.0, 2.0, PdfConfig::default()).unwrap();
    let json = serde_json::to_string(&pdf).unwrap();
    let back: Pdf = serde_json::from_str(&json).unwrap();
    assert_eq!(back, pdf);
    assert_eq!(back.mean(), pdf.mean());
    assert_eq!(back.dev(), pdf.dev());
}

#[test]
fn test_config_accessor_and_builders() {
    let config = PdfConfig::new().with_numpart(50).with_fit(0.99).with_sfit(0.98);
    assert_eq!(config.numpart, 50);
    let pdf = Pdf::normal(0.0, 1.0, config).unwrap();
    assert_eq!(pdf.config().numpart, 50);
    assert_eq!(pdf.x().len(), 50);
}
