// src/ops/arithmetic/scale_rows.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, merge_vars, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::ops::linalg::Matrix;
use crate::vector::linalg::{scale_rows, sum_cols, Dims};
use crate::vector::Vector;
use std::sync::Arc;

// --- Node Structure ---

#[derive(Debug)]
struct ScaleRowsRes<T: Numeric> {
    matrix: Node<T>,
    scalers: Node<T>,
    dims: Dims,
    matrix_value: Vector<T>,
    scalers_value: Vector<T>,
    out: Vector<T>,
    vars: VarSet,
}

impl<T: Numeric> Res<T> for ScaleRowsRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    /// For \( Y_{ij} = M_{ij} s_i \):
    /// \( dL/dM = G \cdot s \) (row-scaled) and \( dL/ds_i = \sum_j G_{ij} M_{ij} \).
    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "scale_rows")?;
        if grad.intersects(self.scalers.vars()) {
            let weighted = upstream.zip_with(&self.matrix_value, |g, m| g * m);
            self.scalers.propagate(sum_cols(&weighted, self.dims)?, grad)?;
        }
        if grad.intersects(self.matrix.vars()) {
            self.matrix
                .propagate(scale_rows(&upstream, self.dims, &self.scalers_value)?, grad)?;
        }
        Ok(())
    }
}

// --- Forward Operation ---

/// Multiplies row `i` of `m` by element `i` of `scalers`.
///
/// # Errors
/// `ShapeMismatch` if `scalers` does not have one element per row.
pub fn scale_rows_op<T: Numeric>(m: &Matrix<T>, scalers: &Node<T>) -> Result<Matrix<T>, SeqDiffError> {
    let dims = m.dims();
    let matrix_value = m.data.output();
    let scalers_value = scalers.output();
    let out = scale_rows(&matrix_value, dims, &scalers_value)?;
    let node: Node<T> = Arc::new(ScaleRowsRes {
        vars: merge_vars(&[&m.data, scalers]),
        matrix: m.data.clone(),
        scalers: scalers.clone(),
        dims,
        matrix_value,
        scalers_value,
        out,
    });
    Matrix::new(node, dims.rows, dims.cols)
}

#[cfg(test)]
#[path = "scale_rows_test.rs"]
mod tests;
