// src/ops/reduction/sum_test.rs

use super::*;
use crate::autograd::grad_check::{check_res_grad, GradCheckConfig};
use crate::autograd::{gradients, Var};
use crate::utils::testing::check_vector_near;

const MAT_3X4: [f64; 12] = [
    0.3562578410664004, 0.7578617982451722, -0.1913118498264184, 1.8452133159741528,
    -0.8814597466441325, 0.9602627040929411, -0.0130910013786673, 0.0322210430457061,
    0.3242423917388176, -1.2307395594558537, -0.1558666924323481, 0.4826032047570410,
];

#[test]
fn test_sum_rows_and_cols_forward() -> Result<(), SeqDiffError> {
    let x = Var::<f64>::from_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let m = Matrix::from_var(&x, 2, 3)?;
    check_vector_near(&sum_rows_op(&m)?.output(), &[5.0, 7.0, 9.0], 1e-12);
    check_vector_near(&sum_cols_op(&m)?.output(), &[6.0, 15.0], 1e-12);
    check_vector_near(&sum_op(&x.as_node())?.output(), &[21.0], 1e-12);
    Ok(())
}

#[test]
fn test_sum_backward_broadcasts() -> Result<(), SeqDiffError> {
    let x = Var::<f64>::from_f64(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let y = sum_op(&x.as_node())?;
    let grad = gradients(&y, &[x.clone()])?;
    check_vector_near(grad.get_var(&x).unwrap(), &[1.0; 6], 0.0);
    Ok(())
}

#[test]
fn test_sum_rows_grad_check() {
    let x = Var::<f64>::from_f64(&MAT_3X4);
    check_res_grad(
        || sum_rows_op(&Matrix::from_var(&x, 3, 4)?),
        &[x.clone()],
        &GradCheckConfig::default(),
    )
    .unwrap_or_else(|e| panic!("sum_rows grad check failed: {}", e));
}

#[test]
fn test_sum_cols_grad_check() {
    let x = Var::<f64>::from_f64(&MAT_3X4);
    check_res_grad(
        || sum_cols_op(&Matrix::from_var(&x, 3, 4)?),
        &[x.clone()],
        &GradCheckConfig::default(),
    )
    .unwrap_or_else(|e| panic!("sum_cols grad check failed: {}", e));
}
