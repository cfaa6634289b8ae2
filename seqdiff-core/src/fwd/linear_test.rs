// src/fwd/linear_test.rs

use super::*;
use crate::vector::Vector;
use approx::assert_abs_diff_eq;

#[test]
fn test_product_rule() {
    // d/dx_k sum(x * x) = 2 x_k
    let x = DualVector::basis(Vector::<f64>::from_f64(&[1.0, -2.0, 3.0]));
    let s = x.dot(&x).unwrap();
    assert_abs_diff_eq!(s.value, 14.0, epsilon = 1e-12);
    assert_eq!(s.derivs, vec![2.0, -4.0, 6.0]);
}

#[test]
fn test_add_scale_sum() {
    let x = DualVector::basis(Vector::<f64>::from_f64(&[1.0, 2.0]));
    let y = x.scale(3.0).add(&x).unwrap().sum();
    assert_abs_diff_eq!(y.value, 12.0, epsilon = 1e-12);
    assert_eq!(y.derivs, vec![4.0, 4.0]);
}

#[test]
fn test_incompatible_duals() {
    let a = DualVector::basis(Vector::<f64>::from_f64(&[1.0, 2.0]));
    let b = DualVector::constant(Vector::<f64>::from_f64(&[1.0, 2.0]), 1);
    assert!(matches!(a.add(&b), Err(SeqDiffError::ShapeMismatch { .. })));
    let c = DualVector::basis(Vector::<f64>::from_f64(&[1.0]));
    assert!(matches!(a.mul(&c), Err(SeqDiffError::ShapeMismatch { .. })));
}
