// src/ops/activation/clip_pos.rs

use crate::autograd::res::Node;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::apply_unary_op;

/// Clips every element to be non-negative (ReLU).
///
/// The gradient passes where the input was strictly positive and is zero
/// elsewhere, including at zero.
pub fn clip_pos_op<T: Numeric>(a: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    apply_unary_op(
        a,
        |x: T| if x > T::zero() { x } else { T::zero() },
        |x: T, _y: T| if x > T::zero() { T::one() } else { T::zero() },
        "clip_pos",
    )
}

#[cfg(test)]
#[path = "clip_pos_test.rs"]
mod tests;
