// src/ops/math_elem/exp.rs

use crate::autograd::res::Node;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::apply_unary_op;

/// Computes \( e^x \) elementwise. The derivative is the output itself.
pub fn exp_op<T: Numeric>(a: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    apply_unary_op(a, |x: T| x.exp(), |_x: T, y: T| y, "exp")
}

#[cfg(test)]
#[path = "exp_test.rs"]
mod tests;
