// src/ops/activation/sigmoid.rs

use crate::autograd::res::Node;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::apply_unary_op;
use crate::vector::elementwise::sigmoid;

/// Computes the elementwise logistic sigmoid, with derivative \( y (1 - y) \).
pub fn sigmoid_op<T: Numeric>(a: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    apply_unary_op(a, sigmoid, |_x: T, y: T| y * (T::one() - y), "sigmoid")
}

#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
