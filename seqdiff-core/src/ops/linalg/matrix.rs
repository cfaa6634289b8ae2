// src/ops/linalg/matrix.rs

use crate::autograd::res::Node;
use crate::autograd::var::Var;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::linalg::Dims;
use std::sync::Arc;

/// A node interpreted as a row-major `rows x cols` matrix.
#[derive(Debug, Clone)]
pub struct Matrix<T: Numeric> {
    pub data: Node<T>,
    pub rows: usize,
    pub cols: usize,
}

impl<T: Numeric> Matrix<T> {
    /// Wraps `data` as a matrix.
    ///
    /// # Errors
    /// `VectorCreationError` if the output length of `data` is not `rows * cols`.
    pub fn new(data: Node<T>, rows: usize, cols: usize) -> Result<Self, SeqDiffError> {
        let data_len = data.output().len();
        if data_len != rows * cols {
            return Err(SeqDiffError::VectorCreationError {
                data_len,
                shape: vec![rows, cols],
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    pub fn from_var(var: &Arc<Var<T>>, rows: usize, cols: usize) -> Result<Self, SeqDiffError> {
        Matrix::new(var.as_node(), rows, cols)
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.rows, self.cols)
    }
}

/// `num` matrices of identical shape packed back to back in one node.
#[derive(Debug, Clone)]
pub struct MatrixBatch<T: Numeric> {
    pub data: Node<T>,
    pub num: usize,
    pub rows: usize,
    pub cols: usize,
}

impl<T: Numeric> MatrixBatch<T> {
    /// # Errors
    /// `VectorCreationError` if the output length of `data` is not
    /// `num * rows * cols`.
    pub fn new(data: Node<T>, num: usize, rows: usize, cols: usize) -> Result<Self, SeqDiffError> {
        let data_len = data.output().len();
        if data_len != num * rows * cols {
            return Err(SeqDiffError::VectorCreationError {
                data_len,
                shape: vec![num, rows, cols],
            });
        }
        Ok(MatrixBatch { data, num, rows, cols })
    }

    /// Dimensions of one matrix of the batch.
    pub fn dims(&self) -> Dims {
        Dims::new(self.rows, self.cols)
    }
}

impl<T: Numeric> From<Matrix<T>> for MatrixBatch<T> {
    fn from(m: Matrix<T>) -> Self {
        MatrixBatch {
            data: m.data,
            num: 1,
            rows: m.rows,
            cols: m.cols,
        }
    }
}
