//! Tests for polynomial and radial-basis response surfaces

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::chaos::ChaosBasis;
use crate::error::StrategyError;
use crate::parameter::Parameter;
use crate::response::{PolyResponse, RbfResponse, ResponseSurface};

#[test]
fn test_rbf_interpolates_training_points() {
    let points = vec![vec![0.0], vec![1.0], vec![2.0], vec![3.0]];
    let values = vec![0.0, 1.0, 4.0, 9.0];
    let rbf = RbfResponse::fit(points.clone(), values.clone(), None).unwrap();
    for (p, &v) in points.iter().zip(&values) {
        assert!((rbf.eval(p) - v).abs() < 1e-8, "node {p:?} missed");
    }
    // Between nodes the interpolant stays close to the parabola
    assert!((rbf.eval(&[1.5]) - 2.25).abs() < 0.5);
}

#[test]
fn test_rbf_two_dimensional() {
    let mut points = Vec::new();
    let mut values = Vec::new();
    for i in 0..4 {
        for j in 0..4 {
            let (x, y) = (i as f64, j as f64);
            points.push(vec![x, y]);
            values.push(x + 2.0 * y);
        }
    }
    let rbf = RbfResponse::fit(points, values, None).unwrap();
    assert!((rbf.eval(&[1.0, 2.0]) - 5.0).abs() < 1e-8);
    assert!((rbf.eval(&[1.5, 1.5]) - 4.5).abs() < 0.2);
}

#[test]
fn test_rbf_rejects_bad_input() {
    assert!(matches!(
        RbfResponse::fit(vec![], vec![], None),
        Err(StrategyError::ResponseFit(_))
    ));
    assert!(RbfResponse::fit(vec![vec![0.0]], vec![1.0, 2.0], None).is_err());

    // Duplicate sample points make the system singular
    let dup = RbfResponse::fit(
        vec![vec![0.0], vec![0.0], vec![1.0]],
        vec![1.0, 2.0, 3.0],
        None,
    );
    assert!(matches!(dup, Err(StrategyError::ResponseFit(_))));
}

#[test]
fn test_rbf_explicit_epsilon() {
    let points = vec![vec![0.0], vec![1.0]];
    let rbf = RbfResponse::fit(points, vec![1.0, 3.0], Some(0.5)).unwrap();
    assert_eq!(rbf.epsilon, 0.5);
    assert!((rbf.eval(&[0.0]) - 1.0).abs() < 1e-9);
}

fn linear_poly() -> PolyResponse {
    // 2 + 3 P_1(x) over the canonical interval, centered at 5 with
    // halfwidth 2, so in physical coordinates f(x) = 2 + 1.5 (x - 5)
    let basis = ChaosBasis::new(1, 2);
    let train_points: Vec<Vec<f64>> = vec![vec![3.0], vec![5.0], vec![7.0]];
    let train_values: Vec<f64> = train_points.iter().map(|p| 2.0 + 1.5 * (p[0] - 5.0)).collect();
    PolyResponse {
        basis,
        coefficients: vec![2.0, 3.0, 0.0],
        centers: vec![5.0],
        halfwidths: vec![2.0],
        train_points,
        train_values,
    }
}

#[test]
fn test_poly_eval_affine_mapping() {
    let poly = linear_poly();
    assert!((poly.eval(&[5.0]) - 2.0).abs() < 1e-12);
    assert!((poly.eval(&[7.0]) - 5.0).abs() < 1e-12);
    assert!((poly.eval(&[3.0]) + 1.0).abs() < 1e-12);
}

#[test]
fn test_poly_moments_from_coefficients() {
    let poly = linear_poly();
    // Constant term is the mean; variance sums c^2 h2 over the rest
    assert_eq!(poly.mean(), 2.0);
    assert!((poly.dev() - (9.0 / 3.0f64).sqrt()).abs() < 1e-12);
}

#[test]
fn test_surface_rmse_of_exact_fit() {
    let surface = ResponseSurface::Poly(linear_poly());
    let (rmse, pct) = surface.rmse();
    assert!(rmse < 1e-10);
    assert!(pct < 1e-8);
}

#[test]
fn test_surface_serde_round_trip() {
    let surface = ResponseSurface::Poly(linear_poly());
    let json = serde_json::to_string(&surface).unwrap();
    assert!(json.contains("\"type\":\"Poly\""));
    let back: ResponseSurface = serde_json::from_str(&json).unwrap();
    assert_eq!(back, surface);

    let rbf = ResponseSurface::Rbf(
        RbfResponse::fit(vec![vec![0.0], vec![1.0]], vec![0.0, 1.0], None).unwrap(),
    );
    let json = serde_json::to_string(&rbf).unwrap();
    let back: ResponseSurface = serde_json::from_str(&json).unwrap();
    assert!((back.eval(&[0.5]) - rbf.eval(&[0.5])).abs() < 1e-12);
}

#[test]
fn test_sample_pdf_through_linear_surface() {
    // Pushing a uniform input through f(x) = 2 + 1.5 (x - 5) on [3, 7]
    // gives a density centered at 2
    let surface = ResponseSurface::Poly(linear_poly());
    let param = Parameter::uniform("x", "", 3.0, 7.0).unwrap();
    let mut rng = SmallRng::seed_from_u64(11);
    let pdf = surface.sample_pdf(&[param], 5000, &mut rng).unwrap();
    assert!((pdf.mean() - 2.0).abs() < 0.05);
    assert!((pdf.dev() - 3.0f64.sqrt()).abs() < 0.1);
}
