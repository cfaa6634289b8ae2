// src/ops/arithmetic/mul.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, merge_vars, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::sync::Arc;

// --- Node Structure ---

/// Elementwise product node. Stores both input values for the backward rule.
#[derive(Debug)]
struct MulRes<T: Numeric> {
    a: Node<T>,
    b: Node<T>,
    a_value: Vector<T>,
    b_value: Vector<T>,
    out: Vector<T>,
    vars: VarSet,
}

impl<T: Numeric> Res<T> for MulRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    /// grad_a = upstream * b, grad_b = upstream * a.
    ///
    /// When both inputs are the same node it is propagated twice; the two
    /// contributions add up wherever they are accumulated.
    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "mul")?;
        if grad.intersects(self.a.vars()) {
            self.a.propagate(upstream.zip_with(&self.b_value, |u, b| u * b), grad)?;
        }
        if grad.intersects(self.b.vars()) {
            self.b.propagate(upstream.zip_with(&self.a_value, |u, a| u * a), grad)?;
        }
        Ok(())
    }
}

// --- Forward Operation ---

/// Elementwise product of two equally sized nodes.
pub fn mul_op<T: Numeric>(a: &Node<T>, b: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    let a_value = a.output();
    let b_value = b.output();
    let out = a_value.mul(&b_value)?;
    Ok(Arc::new(MulRes {
        vars: merge_vars(&[a, b]),
        a: a.clone(),
        b: b.clone(),
        a_value,
        b_value,
        out,
    }))
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
