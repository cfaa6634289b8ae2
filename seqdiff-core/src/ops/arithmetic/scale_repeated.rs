// src/ops/arithmetic/scale_repeated.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, merge_vars, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::sync::Arc;

#[derive(Debug)]
struct ScaleRepeatedRes<T: Numeric> {
    input: Node<T>,
    scalers: Node<T>,
    input_value: Vector<T>,
    scalers_value: Vector<T>,
    out: Vector<T>,
    vars: VarSet,
}

impl<T: Numeric> Res<T> for ScaleRepeatedRes<T> {
    fn output(&self) -> Vector<T> {
        self.out.clone()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.out.len(), "scale_repeated")?;
        let k = self.scalers_value.len();
        if grad.intersects(self.scalers.vars()) {
            let mut scalers_grad = vec![T::zero(); k];
            for (chunk_g, chunk_x) in upstream
                .as_slice()
                .chunks(k)
                .zip(self.input_value.as_slice().chunks(k))
            {
                for ((acc, &g), &x) in scalers_grad.iter_mut().zip(chunk_g).zip(chunk_x) {
                    *acc += g * x;
                }
            }
            self.scalers.propagate(Vector::from_vec(scalers_grad), grad)?;
        }
        if grad.intersects(self.input.vars()) {
            self.input
                .propagate(repeat_scale(&upstream, &self.scalers_value), grad)?;
        }
        Ok(())
    }
}

fn repeat_scale<T: Numeric>(v: &Vector<T>, scalers: &Vector<T>) -> Vector<T> {
    let s = scalers.as_slice();
    Vector::from_vec(
        v.as_slice()
            .iter()
            .enumerate()
            .map(|(i, &x)| x * s[i % s.len()])
            .collect(),
    )
}

/// Multiplies `a` elementwise by `scalers` repeated end to end.
///
/// Used to weight every row of a packed batch by the same per-feature vector,
/// or, with one scaler per row of a transposed layout, to combine a
/// per-timestep summary with the original input.
///
/// # Errors
/// `ShapeMismatch` if `scalers` is empty or its length does not divide the
/// length of `a`.
pub fn scale_repeated_op<T: Numeric>(a: &Node<T>, scalers: &Node<T>) -> Result<Node<T>, SeqDiffError> {
    let input_value = a.output();
    let scalers_value = scalers.output();
    let k = scalers_value.len();
    if k == 0 || input_value.len() % k != 0 {
        return Err(SeqDiffError::ShapeMismatch {
            expected: vec![input_value.len()],
            actual: vec![k],
            operation: "scale_repeated (scalers must divide input)".to_string(),
        });
    }
    let out = repeat_scale(&input_value, &scalers_value);
    Ok(Arc::new(ScaleRepeatedRes {
        vars: merge_vars(&[a, scalers]),
        input: a.clone(),
        scalers: scalers.clone(),
        input_value,
        scalers_value,
        out,
    }))
}

#[cfg(test)]
#[path = "scale_repeated_test.rs"]
mod tests;
