// src/ops/arithmetic/add.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, merge_vars, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::sync::Arc;

// --- Node Structure ---

#[derive(Debug)]
struct AddRes<T: Numeric> {
    a: Node<T>,
    b: Node<T>,
    out: Vector<T>,
    vars: VarSet,
}

impl<T: Numeric> Res<T> for AddRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "add")?;
        // d(a+b)/da = d(a+b)/db = 1
        if grad.intersects(self.a.vars()) {
            self.a.propagate(upstream.clone(), grad)?;
        }
        if grad.intersects(self.b.vars()) {
            self.b.propagate(upstream, grad)?;
        }
        Ok(())
    }
}

// --- Forward Operation ---

/// Elementwise sum of two equally sized nodes.
pub fn add_op<T: Numeric>(a: &Node<T>, b: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    let out = a.output().add(&b.output())?;
    Ok(Arc::new(AddRes {
        vars: merge_vars(&[a, b]),
        a: a.clone(),
        b: b.clone(),
        out,
    }))
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
