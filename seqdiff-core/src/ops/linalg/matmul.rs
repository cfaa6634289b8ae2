// src/ops/linalg/matmul.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, merge_vars, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::linalg::{Matrix, MatrixBatch};
use crate::vector::linalg::{batched_gemm, gemm_dims, Dims};
use crate::vector::Vector;
use log::trace;
use std::sync::Arc;

// --- Node Structure ---

/// Product node shared by the single and batched forms. A single product is
/// a batch of one.
#[derive(Debug)]
struct MatMulRes<T: Numeric> {
    a: Node<T>,
    b: Node<T>,
    a_value: Vector<T>,
    b_value: Vector<T>,
    a_dims: Dims,
    b_dims: Dims,
    out_dims: Dims,
    trans_a: bool,
    trans_b: bool,
    num: usize,
    out: Vector<T>,
    vars: VarSet,
}

impl<T: Numeric> Res<T> for MatMulRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    /// For `C = op(A) op(B)` with upstream `G`, the gradients with respect
    /// to the stored operands are:
    ///
    /// * `A`: `G op(B)^T`, or `op(B) G^T` when `A` is stored transposed.
    /// * `B`: `op(A)^T G`, or `G^T op(A)` when `B` is stored transposed.
    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "matmul")?;
        let (ta, tb, num) = (self.trans_a, self.trans_b, self.num);
        if grad.intersects(self.a.vars()) {
            let grad_a = if ta {
                batched_gemm(tb, true, num, &self.b_value, self.b_dims, &upstream, self.out_dims)?
            } else {
                batched_gemm(false, !tb, num, &upstream, self.out_dims, &self.b_value, self.b_dims)?
            };
            self.a.propagate(grad_a, grad)?;
        }
        if grad.intersects(self.b.vars()) {
            let grad_b = if tb {
                batched_gemm(true, ta, num, &upstream, self.out_dims, &self.a_value, self.a_dims)?
            } else {
                batched_gemm(!ta, false, num, &self.a_value, self.a_dims, &upstream, self.out_dims)?
            };
            self.b.propagate(grad_b, grad)?;
        }
        Ok(())
    }
}

fn build_matmul<T: Numeric>(
    trans_a: bool,
    trans_b: bool,
    num: usize,
    a: &Node<T>,
    a_dims: Dims,
    b: &Node<T>,
    b_dims: Dims,
) -> Result<(Node<T>, Dims), SeqDiffError> {
    let out_dims = gemm_dims(trans_a, a_dims, trans_b, b_dims)?;
    let a_value = a.output();
    let b_value = b.output();
    let out = batched_gemm(trans_a, trans_b, num, &a_value, a_dims, &b_value, b_dims)?;
    trace!(
        "matmul: {} x ({}x{}) * ({}x{}), trans=({}, {})",
        num,
        a_dims.rows,
        a_dims.cols,
        b_dims.rows,
        b_dims.cols,
        trans_a,
        trans_b
    );
    let node: Node<T> = Arc::new(MatMulRes {
        vars: merge_vars(&[a, b]),
        a: a.clone(),
        b: b.clone(),
        a_value,
        b_value,
        a_dims,
        b_dims,
        out_dims,
        trans_a,
        trans_b,
        num,
        out,
    });
    Ok((node, out_dims))
}

// --- Forward Operations ---

/// Computes `op(a) * op(b)`, where `op` transposes its operand when the
/// corresponding flag is set.
///
/// # Errors
/// `ShapeMismatch` if the inner dimensions of `op(a)` and `op(b)` differ.
pub fn matmul_op<T: Numeric>(
    trans_a: bool,
    trans_b: bool,
    a: &Matrix<T>,
    b: &Matrix<T>,
) -> Result<Matrix<T>, SeqDiffError> {
    let (node, out_dims) = build_matmul(trans_a, trans_b, 1, &a.data, a.dims(), &b.data, b.dims())?;
    Ok(Matrix {
        data: node,
        rows: out_dims.rows,
        cols: out_dims.cols,
    })
}

/// Multiplies each pair of matrices from two batches of equal size.
///
/// # Errors
/// `ShapeMismatch` if the batch sizes or the inner dimensions differ.
pub fn batched_matmul_op<T: Numeric>(
    trans_a: bool,
    trans_b: bool,
    a: &MatrixBatch<T>,
    b: &MatrixBatch<T>,
) -> Result<MatrixBatch<T>, SeqDiffError> {
    if a.num != b.num {
        return Err(SeqDiffError::length_mismatch(a.num, b.num, "batched_matmul (batch size)"));
    }
    let (node, out_dims) = build_matmul(trans_a, trans_b, a.num, &a.data, a.dims(), &b.data, b.dims())?;
    Ok(MatrixBatch {
        data: node,
        num: a.num,
        rows: out_dims.rows,
        cols: out_dims.cols,
    })
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
