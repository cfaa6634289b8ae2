// src/ops/math_elem/exp_test.rs

use super::*;
use crate::autograd::grad_check::{check_res_grad, GradCheckConfig};
use crate::autograd::{gradients, Var};
use crate::utils::testing::check_vector_near;

#[test]
fn test_exp_backward_equals_output() -> Result<(), SeqDiffError> {
    let x = Var::<f64>::from_f64(&[0.0, 1.0, -2.0]);
    let y = exp_op(&x.as_node())?;
    let expected = [1.0, 1.0f64.exp(), (-2.0f64).exp()];
    check_vector_near(&y.output(), &expected, 1e-12);
    let grad = gradients(&y, &[x.clone()])?;
    check_vector_near(grad.get_var(&x).unwrap(), &expected, 1e-12);
    Ok(())
}

#[test]
fn test_exp_grad_check() {
    let x = Var::new(crate::vector::randn::<f64>(5));
    let node = x.as_node();
    check_res_grad(|| exp_op(&node), &[x.clone()], &GradCheckConfig::default())
        .unwrap_or_else(|e| panic!("exp grad check failed: {}", e));
}
