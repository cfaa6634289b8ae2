// src/ops/arithmetic/mul_test.rs

use super::*;
use crate::autograd::grad_check::{check_res_grad, GradCheckConfig};
use crate::autograd::{gradients, Var};
use crate::utils::testing::check_vector_near;

#[test]
fn test_mul_backward() -> Result<(), SeqDiffError> {
    let a = Var::<f64>::from_f64(&[2.0, -3.0]);
    let b = Var::<f64>::from_f64(&[0.5, 4.0]);
    let y = mul_op(&a.as_node(), &b.as_node())?;
    check_vector_near(&y.output(), &[1.0, -12.0], 1e-12);

    let grad = gradients(&y, &[a.clone(), b.clone()])?;
    check_vector_near(grad.get_var(&a).unwrap(), &[0.5, 4.0], 1e-12);
    check_vector_near(grad.get_var(&b).unwrap(), &[2.0, -3.0], 1e-12);
    Ok(())
}

#[test]
fn test_mul_square() -> Result<(), SeqDiffError> {
    let a = Var::<f64>::from_f64(&[2.0, -3.0]);
    let node = a.as_node();
    let y = mul_op(&node, &node)?;
    let grad = gradients(&y, &[a.clone()])?;
    check_vector_near(grad.get_var(&a).unwrap(), &[4.0, -6.0], 1e-12);
    Ok(())
}

#[test]
fn test_mul_grad_check() {
    let a = Var::new(crate::vector::randn::<f64>(6));
    let b = Var::new(crate::vector::randn::<f64>(6));
    let (na, nb) = (a.as_node(), b.as_node());
    check_res_grad(|| mul_op(&na, &nb), &[a.clone(), b.clone()], &GradCheckConfig::default())
        .unwrap_or_else(|e| panic!("mul grad check failed: {}", e));
}
