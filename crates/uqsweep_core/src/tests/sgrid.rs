//! Tests for sparse-grid generation, quadrature weights, and nesting

use crate::sgrid::SparseGrid;

#[test]
fn test_one_dimension_level_zero() {
    let grid = SparseGrid::new(1, 0);
    assert_eq!(grid.len(), 1);
    assert_eq!(grid.points(), &[vec![0.0]]);
    assert_eq!(grid.weights(), &[2.0]);
}

#[test]
fn test_one_dimension_level_one() {
    // Three-point Clenshaw-Curtis rule: weights 1/3, 4/3, 1/3, with the
    // level-zero center point emitted first
    let grid = SparseGrid::new(1, 1);
    assert_eq!(grid.points(), &[vec![0.0], vec![-1.0], vec![1.0]]);
    let w = grid.weights();
    assert!((w[0] - 4.0 / 3.0).abs() < 1e-12);
    assert!((w[1] - 1.0 / 3.0).abs() < 1e-12);
    assert!((w[2] - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_two_dimensions_level_one() {
    let grid = SparseGrid::new(2, 1);
    assert_eq!(grid.len(), 5);
    assert_eq!(
        grid.points(),
        &[
            vec![0.0, 0.0],
            vec![-1.0, 0.0],
            vec![0.0, -1.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
        ]
    );
    // Combination coefficients leave 4/3 on the center, 2/3 on each arm
    let w = grid.weights();
    assert!((w[0] - 4.0 / 3.0).abs() < 1e-12);
    for &wi in &w[1..] {
        assert!((wi - 2.0 / 3.0).abs() < 1e-12);
    }
}

#[test]
fn test_grid_sizes() {
    assert_eq!(SparseGrid::new(2, 0).len(), 1);
    assert_eq!(SparseGrid::new(2, 2).len(), 13);
    assert_eq!(SparseGrid::new(2, 3).len(), 29);
    assert_eq!(SparseGrid::new(3, 1).len(), 7);
    assert_eq!(SparseGrid::new(3, 2).len(), 25);
}

#[test]
fn test_weights_sum_to_cube_measure() {
    for ndim in 1..=3 {
        for level in 0..=3 {
            let grid = SparseGrid::new(ndim, level);
            let sum: f64 = grid.weights().iter().sum();
            let measure = 2f64.powi(ndim as i32);
            assert!(
                (sum - measure).abs() < 1e-10,
                "weights off at ndim={ndim} level={level}: {sum}"
            );
        }
    }
}

#[test]
fn test_points_stay_in_canonical_cube() {
    let grid = SparseGrid::new(3, 3);
    for row in grid.points() {
        assert_eq!(row.len(), 3);
        assert!(row.iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}

#[test]
fn test_refinement_is_a_row_prefix() {
    // Nested 1-D rules make each level's point set a strict superset of
    // the previous one, and the emission order makes it a literal prefix
    for ndim in [1, 2, 3] {
        for level in 0..3 {
            let coarse = SparseGrid::new(ndim, level);
            let fine = SparseGrid::new(ndim, level + 1);
            assert!(fine.len() > coarse.len());
            assert_eq!(
                &fine.points()[..coarse.len()],
                coarse.points(),
                "prefix broken at ndim={ndim} level={level}"
            );
        }
    }
}

#[test]
fn test_repeated_construction_is_bit_identical() {
    let a = SparseGrid::new(3, 2);
    let b = SparseGrid::new(3, 2);
    assert_eq!(a, b);
}

#[test]
fn test_quadrature_is_exact_for_low_degree() {
    // Level-1 grids integrate quadratics exactly: sum w x^2 = 2^(d-1) * 2/3
    let grid = SparseGrid::new(2, 1);
    let q: f64 = grid
        .points()
        .iter()
        .zip(grid.weights())
        .map(|(p, w)| w * p[0] * p[0])
        .sum();
    assert!((q - 4.0 / 3.0).abs() < 1e-12);

    // Level 2 handles the cross term x^2 y^2: integral is 4/9
    let grid = SparseGrid::new(2, 2);
    let q: f64 = grid
        .points()
        .iter()
        .zip(grid.weights())
        .map(|(p, w)| w * p[0] * p[0] * p[1] * p[1])
        .sum();
    assert!((q - 4.0 / 9.0).abs() < 1e-9);

    // Odd monomials vanish by symmetry
    let q: f64 = grid
        .points()
        .iter()
        .zip(grid.weights())
        .map(|(p, w)| w * p[0] * p[1])
        .sum();
    assert!(q.abs() < 1e-12);
}

#[test]
fn test_column_accessor() {
    let grid = SparseGrid::new(2, 1);
    assert_eq!(grid.column(0), vec![0.0, -1.0, 0.0, 0.0, 1.0]);
    assert_eq!(grid.column(1), vec![0.0, 0.0, -1.0, 1.0, 0.0]);
    assert_eq!(grid.ndim(), 2);
    assert_eq!(grid.level(), 1);
}
