// src/ops/activation/tanh.rs

use crate::autograd::res::Node;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::apply_unary_op;

/// Computes the elementwise hyperbolic tangent.
///
/// The derivative is taken from the output: \( 1 - \tanh(x)^2 \).
pub fn tanh_op<T: Numeric>(a: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    apply_unary_op(a, |x: T| x.tanh(), |_x: T, y: T| T::one() - y * y, "tanh")
}

#[cfg(test)]
#[path = "tanh_test.rs"]
mod tests;
