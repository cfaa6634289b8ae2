// src/ops/math_elem/trig.rs

use crate::autograd::res::Node;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::apply_unary_op;

pub fn sin_op<T: Numeric>(a: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    apply_unary_op(a, |x: T| x.sin(), |x: T, _y: T| x.cos(), "sin")
}

pub fn cos_op<T: Numeric>(a: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    apply_unary_op(a, |x: T| x.cos(), |x: T, _y: T| -x.sin(), "cos")
}

#[cfg(test)]
#[path = "trig_test.rs"]
mod tests;
