// src/vector/linalg.rs
//
// Matrix kernels over flat row-major vectors. Each kernel takes the stored
// `Dims` of its operands and the transpose flags separately.

use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;

/// Row/column shape of a matrix stored in a flat vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub fn new(rows: usize, cols: usize) -> Self {
        Dims { rows, cols }
    }

    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }

    /// The logical shape after an optional transpose.
    pub fn transposed(self, transpose: bool) -> Self {
        if transpose {
            Dims::new(self.cols, self.rows)
        } else {
            self
        }
    }

    pub fn to_vec(self) -> Vec<usize> {
        vec![self.rows, self.cols]
    }
}

fn check_numel<T: Numeric>(v: &Vector<T>, dims: Dims, operation: &str) -> Result<(), SeqDiffError> {
    if v.len() != dims.numel() {
        return Err(SeqDiffError::ShapeMismatch {
            expected: dims.to_vec(),
            actual: vec![v.len()],
            operation: operation.to_string(),
        });
    }
    Ok(())
}

/// Output shape of `op(A) * op(B)`, or a `ShapeMismatch` if the inner
/// dimensions disagree.
pub fn gemm_dims(trans_a: bool, a_dims: Dims, trans_b: bool, b_dims: Dims) -> Result<Dims, SeqDiffError> {
    let op_a = a_dims.transposed(trans_a);
    let op_b = b_dims.transposed(trans_b);
    if op_a.cols != op_b.rows {
        return Err(SeqDiffError::ShapeMismatch {
            expected: vec![op_a.rows, op_a.cols, op_a.cols, op_b.cols],
            actual: vec![op_a.rows, op_a.cols, op_b.rows, op_b.cols],
            operation: "gemm (inner dim)".to_string(),
        });
    }
    Ok(Dims::new(op_a.rows, op_b.cols))
}

/// Computes `op(A) * op(B)` where `op` transposes when the flag is set.
///
/// `a_dims` and `b_dims` describe the matrices as stored.
pub fn gemm<T: Numeric>(
    trans_a: bool,
    trans_b: bool,
    a: &Vector<T>,
    a_dims: Dims,
    b: &Vector<T>,
    b_dims: Dims,
) -> Result<Vector<T>, SeqDiffError> {
    check_numel(a, a_dims, "gemm (lhs)")?;
    check_numel(b, b_dims, "gemm (rhs)")?;
    let out_dims = gemm_dims(trans_a, a_dims, trans_b, b_dims)?;
    let mut out = vec![T::zero(); out_dims.numel()];
    gemm_into(trans_a, trans_b, a.as_slice(), a_dims, b.as_slice(), b_dims, &mut out);
    Ok(Vector::from_vec(out))
}

/// Computes `op(A_i) * op(B_i)` for each of `num` matrices packed back to back.
pub fn batched_gemm<T: Numeric>(
    trans_a: bool,
    trans_b: bool,
    num: usize,
    a: &Vector<T>,
    a_dims: Dims,
    b: &Vector<T>,
    b_dims: Dims,
) -> Result<Vector<T>, SeqDiffError> {
    if a.len() != num * a_dims.numel() {
        return Err(SeqDiffError::ShapeMismatch {
            expected: vec![num, a_dims.rows, a_dims.cols],
            actual: vec![a.len()],
            operation: "batched_gemm (lhs)".to_string(),
        });
    }
    if b.len() != num * b_dims.numel() {
        return Err(SeqDiffError::ShapeMismatch {
            expected: vec![num, b_dims.rows, b_dims.cols],
            actual: vec![b.len()],
            operation: "batched_gemm (rhs)".to_string(),
        });
    }
    let out_dims = gemm_dims(trans_a, a_dims, trans_b, b_dims)?;
    let mut out = vec![T::zero(); num * out_dims.numel()];
    let (a_size, b_size, out_size) = (a_dims.numel(), b_dims.numel(), out_dims.numel());
    for i in 0..num {
        gemm_into(
            trans_a,
            trans_b,
            &a.as_slice()[i * a_size..(i + 1) * a_size],
            a_dims,
            &b.as_slice()[i * b_size..(i + 1) * b_size],
            b_dims,
            &mut out[i * out_size..(i + 1) * out_size],
        );
    }
    Ok(Vector::from_vec(out))
}

fn gemm_into<T: Numeric>(
    trans_a: bool,
    trans_b: bool,
    a: &[T],
    a_dims: Dims,
    b: &[T],
    b_dims: Dims,
    out: &mut [T],
) {
    let op_a = a_dims.transposed(trans_a);
    let op_b = b_dims.transposed(trans_b);
    let (m, k, n) = (op_a.rows, op_a.cols, op_b.cols);
    let a_at = |i: usize, l: usize| {
        if trans_a {
            a[l * a_dims.cols + i]
        } else {
            a[i * a_dims.cols + l]
        }
    };
    let b_at = |l: usize, j: usize| {
        if trans_b {
            b[j * b_dims.cols + l]
        } else {
            b[l * b_dims.cols + j]
        }
    };
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for l in 0..k {
                sum += a_at(i, l) * b_at(l, j);
            }
            out[i * n + j] = sum;
        }
    }
}

/// Transposes a stored `dims` matrix.
pub fn transpose<T: Numeric>(v: &Vector<T>, dims: Dims) -> Result<Vector<T>, SeqDiffError> {
    check_numel(v, dims, "transpose")?;
    let data = v.as_slice();
    let mut out = Vec::with_capacity(dims.numel());
    for j in 0..dims.cols {
        for i in 0..dims.rows {
            out.push(data[i * dims.cols + j]);
        }
    }
    Ok(Vector::from_vec(out))
}

/// Sums the rows of a matrix together, producing one entry per column.
pub fn sum_rows<T: Numeric>(v: &Vector<T>, dims: Dims) -> Result<Vector<T>, SeqDiffError> {
    check_numel(v, dims, "sum_rows")?;
    let mut out = vec![T::zero(); dims.cols];
    for row in v.as_slice().chunks(dims.cols.max(1)).take(dims.rows) {
        for (acc, &x) in out.iter_mut().zip(row) {
            *acc += x;
        }
    }
    Ok(Vector::from_vec(out))
}

/// Sums the columns of a matrix together, producing one entry per row.
pub fn sum_cols<T: Numeric>(v: &Vector<T>, dims: Dims) -> Result<Vector<T>, SeqDiffError> {
    check_numel(v, dims, "sum_cols")?;
    if dims.cols == 0 {
        return Ok(Vector::zeros(dims.rows));
    }
    Ok(Vector::from_vec(
        v.as_slice()
            .chunks(dims.cols)
            .map(|row| row.iter().fold(T::zero(), |acc, &x| acc + x))
            .collect(),
    ))
}

/// Multiplies row `i` of a matrix by `scalers[i]`.
pub fn scale_rows<T: Numeric>(v: &Vector<T>, dims: Dims, scalers: &Vector<T>) -> Result<Vector<T>, SeqDiffError> {
    check_numel(v, dims, "scale_rows")?;
    if scalers.len() != dims.rows {
        return Err(SeqDiffError::length_mismatch(dims.rows, scalers.len(), "scale_rows (scalers)"));
    }
    let mut out = v.to_vec();
    if dims.cols > 0 {
        for (row, &s) in out.chunks_mut(dims.cols).zip(scalers.as_slice()) {
            for x in row {
                *x *= s;
            }
        }
    }
    Ok(Vector::from_vec(out))
}

/// Broadcasts a per-column vector across `rows` rows.
pub fn repeat_rows<T: Numeric>(row: &Vector<T>, rows: usize) -> Vector<T> {
    let mut out = Vec::with_capacity(rows * row.len());
    for _ in 0..rows {
        out.extend_from_slice(row.as_slice());
    }
    Vector::from_vec(out)
}

/// Broadcasts a per-row vector across `cols` columns.
pub fn repeat_cols<T: Numeric>(col: &Vector<T>, cols: usize) -> Vector<T> {
    let mut out = Vec::with_capacity(cols * col.len());
    for &x in col.as_slice() {
        out.extend(std::iter::repeat(x).take(cols));
    }
    Vector::from_vec(out)
}

#[cfg(test)]
#[path = "linalg_test.rs"]
mod tests;
