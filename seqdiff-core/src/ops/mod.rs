//! # Differentiable Operations (`ops`)
//!
//! Every operation is a constructor taking input [`Node`]s and returning a new
//! node whose `propagate` implements the derivative rule of the operation.
//!
//! ## Structure:
//!
//! - **`_op` functions:** validate shapes eagerly, compute the forward value and
//!   wrap it in the operation's node type. They return
//!   `Result<Node<T>, SeqDiffError>`; construction never defers a shape error
//!   to propagation time.
//! - **`Res` structs:** each operation has a private node struct (e.g.
//!   `MatMulRes`, `ScaleRowsRes`) holding its inputs, its output and the
//!   union of its inputs' variables.
//! - **Elementwise unary operations** share [`apply_unary_op`]: a forward map and
//!   a derivative rule expressed in terms of the input and output values.
//!
//! ## Submodules:
//!
//! - [`activation`]: `tanh`, `sigmoid`, `clip_pos`.
//! - [`arithmetic`]: `add`, `sub`, `mul`, `scale`, `scale_rows`, `scale_repeated`.
//! - [`linalg`]: `Matrix`, `MatrixBatch`, `matmul`, `batched_matmul`, `transpose`.
//! - [`math_elem`]: `exp`, `ln`, `sin`, `cos`, `pow`.
//! - [`reduction`]: `sum_rows`, `sum_cols`, `sum`.

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::fmt;
use std::sync::Arc;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod math_elem;
pub mod reduction;

pub use activation::{clip_pos_op, sigmoid_op, tanh_op};
pub use arithmetic::{add_op, mul_op, scale_op, scale_repeated_op, scale_rows_op, sub_op};
pub use linalg::{batched_matmul_op, matmul_op, transpose_op, Matrix, MatrixBatch};
pub use math_elem::{cos_op, exp_op, ln_op, pow_op, sin_op};
pub use reduction::{sum_cols_op, sum_op, sum_rows_op};

/// Derivative rule of an elementwise function, given `(x, f(x))`.
pub(crate) type LocalDerivative<T> = fn(T, T) -> T;

/// Node for an elementwise unary function.
///
/// Keeps the pre-transform input value alongside the output so the
/// derivative rule may use whichever is cheaper.
struct UnaryRes<T: Numeric> {
    input: Node<T>,
    input_value: Vector<T>,
    out: Vector<T>,
    derivative: LocalDerivative<T>,
    op_name: &'static str,
}

impl<T: Numeric> fmt::Debug for UnaryRes<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryRes")
            .field("op", &self.op_name)
            .field("len", &self.out.len())
            .finish()
    }
}

impl<T: Numeric> Res<T> for UnaryRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        self.input.vars()
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), self.op_name)?;
        if !grad.intersects(self.input.vars()) {
            return Ok(());
        }
        let derivative = self.derivative;
        let mut downstream = upstream;
        for ((g, &x), &y) in downstream
            .as_mut_slice()
            .iter_mut()
            .zip(self.input_value.as_slice())
            .zip(self.out.as_slice())
        {
            *g *= derivative(x, y);
        }
        self.input.propagate(downstream, grad)
    }
}

/// Applies an elementwise unary function to a node.
///
/// # Arguments
/// * `input`: The input node.
/// * `forward`: The function applied to each element.
/// * `derivative`: `f'` given `(x, f(x))` for each element.
/// * `op_name`: Name of the operation for error messages.
pub(crate) fn apply_unary_op<T: Numeric>(
    input: &Node<T>,
    forward: fn(T) -> T,
    derivative: LocalDerivative<T>,
    op_name: &'static str,
) -> Result<Node<T>, SeqDiffError> {
    let input_value = input.output();
    let out = input_value.map(forward);
    Ok(Arc::new(UnaryRes {
        input: input.clone(),
        input_value,
        out,
        derivative,
        op_name,
    }))
}
