// src/ops/arithmetic/sub.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, merge_vars, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::sync::Arc;

#[derive(Debug)]
struct SubRes<T: Numeric> {
    a: Node<T>,
    b: Node<T>,
    out: Vector<T>,
    vars: VarSet,
}

impl<T: Numeric> Res<T> for SubRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "sub")?;
        if grad.intersects(self.b.vars()) {
            self.b.propagate(upstream.scale(-T::one()), grad)?;
        }
        if grad.intersects(self.a.vars()) {
            self.a.propagate(upstream, grad)?;
        }
        Ok(())
    }
}

/// Elementwise difference `a - b`.
pub fn sub_op<T: Numeric>(a: &Node<T>, b: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    let out = a.output().sub(&b.output())?;
    Ok(Arc::new(SubRes {
        vars: merge_vars(&[a, b]),
        a: a.clone(),
        b: b.clone(),
        out,
    }))
}

#[cfg(test)]
#[path = "sub_test.rs"]
mod tests;
