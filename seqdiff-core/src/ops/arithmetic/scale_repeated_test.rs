// src/ops/arithmetic/scale_repeated_test.rs

use super::*;
use crate::autograd::grad_check::{check_res_grad, GradCheckConfig};
use crate::autograd::{gradients, Var};
use crate::utils::testing::check_vector_near;

#[test]
fn test_scale_repeated_forward_backward() -> Result<(), SeqDiffError> {
    let v = Var::<f64>::from_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let s = Var::<f64>::from_f64(&[10.0, -1.0]);
    let y = scale_repeated_op(&v.as_node(), &s.as_node())?;
    check_vector_near(&y.output(), &[10.0, -2.0, 30.0, -4.0, 50.0, -6.0], 1e-12);

    let grad = gradients(&y, &[v.clone(), s.clone()])?;
    check_vector_near(grad.get_var(&v).unwrap(), &[10.0, -1.0, 10.0, -1.0, 10.0, -1.0], 1e-12);
    check_vector_near(grad.get_var(&s).unwrap(), &[9.0, 12.0], 1e-12);
    Ok(())
}

#[test]
fn test_scale_repeated_rejects_non_divisor() {
    let v = Var::<f64>::from_f64(&[1.0, 2.0, 3.0]);
    let s = Var::<f64>::from_f64(&[1.0, 2.0]);
    let result = scale_repeated_op(&v.as_node(), &s.as_node());
    assert!(matches!(result, Err(SeqDiffError::ShapeMismatch { .. })));

    let empty = Var::<f64>::from_f64(&[]);
    let result = scale_repeated_op(&v.as_node(), &empty.as_node());
    assert!(matches!(result, Err(SeqDiffError::ShapeMismatch { .. })));
}

#[test]
fn test_scale_repeated_grad_check() {
    let v = Var::new(crate::vector::randn::<f64>(12));
    let s = Var::new(crate::vector::randn::<f64>(4));
    let (nv, ns) = (v.as_node(), s.as_node());
    check_res_grad(
        || scale_repeated_op(&nv, &ns),
        &[v.clone(), s.clone()],
        &GradCheckConfig::default(),
    )
    .unwrap_or_else(|e| panic!("scale_repeated grad check failed: {}", e));
}
