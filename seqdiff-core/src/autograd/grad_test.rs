// src/autograd/grad_test.rs

use super::*;

#[test]
fn test_for_vars_starts_at_zero() {
    let a = Var::<f64>::from_f64(&[1.0, 2.0, 3.0]);
    let grad = Grad::for_vars([&a]);
    assert_eq!(grad.len(), 1);
    assert_eq!(grad.get_var(&a).unwrap().to_f64_vec(), vec![0.0; 3]);
}

#[test]
fn test_accumulate_shape_mismatch() {
    let a = Var::<f64>::from_f64(&[1.0, 2.0]);
    let mut grad = Grad::for_vars([&a]);
    let result = grad.accumulate(a.id(), &Vector::from_f64(&[1.0]));
    assert_eq!(
        result,
        Err(SeqDiffError::GradientAccumulationShapeMismatch {
            expected: vec![2],
            actual: vec![1],
        })
    );
}

#[test]
fn test_intersects() {
    let a = Var::<f64>::from_f64(&[1.0]);
    let b = Var::<f64>::from_f64(&[1.0]);
    let grad = Grad::for_vars([&a]);
    assert!(grad.intersects(&VarSet::merge([&VarSet::single(a.id()), &VarSet::single(b.id())])));
    assert!(!grad.intersects(&VarSet::single(b.id())));
    assert!(!grad.intersects(&VarSet::new()));
}

#[test]
fn test_take_removes_slot() {
    let a = Var::<f64>::from_f64(&[1.0]);
    let mut grad = Grad::for_vars([&a]);
    grad.accumulate(a.id(), &Vector::from_f64(&[2.0])).unwrap();
    assert_eq!(grad.take(a.id()).unwrap().to_f64_vec(), vec![2.0]);
    assert!(!grad.contains(a.id()));
    assert!(matches!(grad.take(a.id()), Err(SeqDiffError::InternalError(_))));
}

#[test]
fn test_scale_and_clear() {
    let a = Var::<f64>::from_f64(&[1.0, 1.0]);
    let mut grad = Grad::for_vars([&a]);
    grad.accumulate(a.id(), &Vector::from_f64(&[1.0, -2.0])).unwrap();
    grad.scale(3.0);
    assert_eq!(grad.get_var(&a).unwrap().to_f64_vec(), vec![3.0, -6.0]);
    grad.clear();
    assert_eq!(grad.get_var(&a).unwrap().to_f64_vec(), vec![0.0, 0.0]);
    assert_eq!(grad.iter().count(), 1);
}
