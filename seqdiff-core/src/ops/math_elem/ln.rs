// src/ops/math_elem/ln.rs

use crate::autograd::res::Node;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::apply_unary_op;

/// Computes the natural logarithm elementwise.
///
/// Non-positive inputs are not rejected: they yield `NaN` or `-inf` in the
/// output, and their gradient \( 1/x \) is propagated unchanged.
pub fn ln_op<T: Numeric>(a: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    apply_unary_op(a, |x: T| x.ln(), |x: T, _y: T| x.recip(), "ln")
}

#[cfg(test)]
#[path = "ln_test.rs"]
mod tests;
