// src/ops/arithmetic/scale.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::sync::Arc;

#[derive(Debug)]
struct ScaleRes<T: Numeric> {
    input: Node<T>,
    scaler: T,
    out: Vector<T>,
}

impl<T: Numeric> Res<T> for ScaleRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        self.input.vars()
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "scale")?;
        if !grad.intersects(self.input.vars()) {
            return Ok(());
        }
        let mut downstream = upstream;
        downstream.scale_inplace(self.scaler);
        self.input.propagate(downstream, grad)
    }
}

/// Multiplies every element by a constant.
pub fn scale_op<T: Numeric>(a: &Node<T>, scaler: T) -> Result<Node<T>, SeqDiffError> {
    Ok(Arc::new(ScaleRes {
        input: a.clone(),
        scaler,
        out: a.output().scale(scaler),
    }))
}

#[cfg(test)]
#[path = "scale_test.rs"]
mod tests;
