// src/ops/reduction/sum.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::linalg::Matrix;
use crate::vector::linalg::{repeat_cols, repeat_rows, sum_cols, sum_rows, Dims};
use crate::vector::Vector;
use std::sync::Arc;

/// Which dimension a [`SumRes`] collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reduction {
    /// Adds the rows together (one output per column).
    Rows,
    /// Adds the columns together (one output per row).
    Cols,
    /// Adds everything into a single element.
    All,
}

#[derive(Debug)]
struct SumRes<T: Numeric> {
    input: Node<T>,
    dims: Dims,
    reduction: Reduction,
    out: Vector<T>,
}

impl<T: Numeric> Res<T> for SumRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        self.input.vars()
    }

    /// The gradient of a sum is the upstream broadcast back over the
    /// collapsed dimension.
    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "sum")?;
        if !grad.intersects(self.input.vars()) {
            return Ok(());
        }
        let downstream = match self.reduction {
            Reduction::Rows => repeat_rows(&upstream, self.dims.rows),
            Reduction::Cols => repeat_cols(&upstream, self.dims.cols),
            Reduction::All => Vector::from_vec(vec![upstream.as_slice()[0]; self.dims.numel()]),
        };
        self.input.propagate(downstream, grad)
    }
}

fn sum_node<T: Numeric>(input: &Node<T>, dims: Dims, reduction: Reduction, out: Vector<T>) -> Node<T> {
    Arc::new(SumRes {
        input: input.clone(),
        dims,
        reduction,
        out,
    })
}

/// Sums the rows of `m` together, producing a vector with one entry per
/// column.
pub fn sum_rows_op<T: Numeric>(m: &Matrix<T>) -> Result<Node<T>, SeqDiffError> {
    let out = sum_rows(&m.data.output(), m.dims())?;
    Ok(sum_node(&m.data, m.dims(), Reduction::Rows, out))
}

/// Sums the columns of `m` together, producing a vector with one entry per
/// row.
pub fn sum_cols_op<T: Numeric>(m: &Matrix<T>) -> Result<Node<T>, SeqDiffError> {
    let out = sum_cols(&m.data.output(), m.dims())?;
    Ok(sum_node(&m.data, m.dims(), Reduction::Cols, out))
}

/// Sums every element of `input` into a one-element vector.
pub fn sum_op<T: Numeric>(input: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    let value = input.output();
    let dims = Dims::new(1, value.len());
    Ok(sum_node(input, dims, Reduction::All, Vector::from_vec(vec![value.sum()])))
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
