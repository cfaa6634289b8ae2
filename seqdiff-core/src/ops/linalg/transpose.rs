// src/ops/linalg/transpose.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::linalg::Matrix;
use crate::vector::linalg::{transpose, Dims};
use crate::vector::Vector;
use std::sync::Arc;

#[derive(Debug)]
struct TransposeRes<T: Numeric> {
    input: Node<T>,
    /// Stored shape of the input.
    dims: Dims,
    out: Vector<T>,
}

impl<T: Numeric> Res<T> for TransposeRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        self.input.vars()
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "transpose")?;
        if !grad.intersects(self.input.vars()) {
            return Ok(());
        }
        let downstream = transpose(&upstream, self.dims.transposed(true))?;
        self.input.propagate(downstream, grad)
    }
}

/// Swaps the rows and columns of a matrix.
pub fn transpose_op<T: Numeric>(m: &Matrix<T>) -> Result<Matrix<T>, SeqDiffError> {
    let dims = m.dims();
    let out = transpose(&m.data.output(), dims)?;
    Ok(Matrix {
        data: Arc::new(TransposeRes {
            input: m.data.clone(),
            dims,
            out,
        }),
        rows: dims.cols,
        cols: dims.rows,
    })
}

#[cfg(test)]
#[path = "transpose_test.rs"]
mod tests;
