//! tests/poly_snapshots.rs
//! Snapshot of the characteristic polynomial derivation.

use eigenlab::commands::poly;
use eigenlab::core::matrix::{Matrix, MatrixSize};
use eigenlab::core::number_format::NumberFormat;
use eigenlab::core::polynomial::QUARTIC_NOTE;

#[test]
fn quadratic_derivation_is_stable() {
    let m = Matrix::example(MatrixSize::Two);
    let text = poly::render(&m, &NumberFormat::STEPS, false).unwrap();
    insta::assert_snapshot!(text.trim_end(), @r"
    A - λI =
      [ 4 - λ  2     ]
      [ 1      3 - λ ]
    λ² - (a + d)λ + (ad - bc) = 0
      where a=4, b=2, c=1, d=3
      λ² - (4 + 3)λ + (4×3 - 2×1) = 0
      λ² - (7)λ + (12 - 2) = 0
    λ² - 7λ + 10 = 0
    ");
}

#[test]
fn cubic_derivation_lists_invariants() {
    let m = Matrix::example(MatrixSize::Three);
    let text = poly::render(&m, &NumberFormat::STEPS, false).unwrap();
    assert!(text.contains("  [ 2 - λ  0      0     ]"), "{text}");
    assert!(text.contains("trace = 2 + 3 + 9 = 14"));
    assert!(text.contains("sum of 2×2 minors = 35"));
    assert!(text.contains("det(A) = 22"));
}

#[test]
fn quartic_falls_back_to_note() {
    let m = Matrix::zeros(MatrixSize::Four);
    let text = poly::render(&m, &NumberFormat::STEPS, false).unwrap();
    assert!(text.contains("[ -λ  0   0   0  ]"), "{text}");
    assert!(text.contains(QUARTIC_NOTE), "{text}");
}
