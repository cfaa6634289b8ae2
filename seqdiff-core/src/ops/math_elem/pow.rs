// src/ops/math_elem/pow.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::sync::Arc;

// --- Node Structure ---

#[derive(Debug)]
struct PowRes<T: Numeric> {
    input: Node<T>,
    input_value: Vector<T>,
    exponent: T,
    out: Vector<T>,
}

impl<T: Numeric> Res<T> for PowRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        self.input.vars()
    }

    /// \( d(x^p)/dx = p x^{p-1} \).
    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "pow")?;
        if !grad.intersects(self.input.vars()) {
            return Ok(());
        }
        let p = self.exponent;
        let downstream = upstream.zip_with(&self.input_value, |g, x| g * p * x.powf(p - T::one()));
        self.input.propagate(downstream, grad)
    }
}

// --- Forward Operation ---

/// Raises every element of `a` to the constant power `exponent`.
///
/// The exponent is a plain value and receives no gradient. Negative bases
/// with a non-integer exponent yield `NaN`.
pub fn pow_op<T: Numeric>(a: &Node<T>, exponent: T) -> Result<Node<T>, SeqDiffError> {
    let input_value = a.output();
    let out = input_value.powf(exponent);
    Ok(Arc::new(PowRes {
        input: a.clone(),
        input_value,
        exponent,
        out,
    }))
}

#[cfg(test)]
#[path = "pow_test.rs"]
mod tests;
