// src/autograd/res.rs

use crate::autograd::grad::Grad;
use crate::autograd::var::{Var, VarSet};
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use log::debug;
use std::fmt::Debug;
use std::sync::Arc;

/// A node of the differentiation graph.
///
/// A `Res` is immutable once built: it owns its forward value and knows how to
/// turn a gradient with respect to that value into gradients for its inputs.
/// Nodes are shared between consumers through [`Node`] handles; the graph is
/// a DAG by construction, so reference counting is all the lifetime
/// management it needs.
///
/// The trait requires `Debug + Send + Sync` so that graphs built from shared
/// immutable inputs can live on different threads.
pub trait Res<T: Numeric>: Debug + Send + Sync {
    /// The forward value of this node. Cheap: vectors share their buffer.
    fn output(&self) -> Vector<T>;

    /// The variables this node depends on.
    fn vars(&self) -> &VarSet;

    /// Back-propagates `upstream` (dL/dOutput) into the accumulator.
    ///
    /// `upstream` must have the length of [`Res::output`]. Implementations
    /// compute the gradient of each input by their own derivative rule and
    /// call the input's `propagate`, skipping inputs whose variables are not
    /// tracked by `grad`.
    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError>;
}

/// Shared handle to a graph node.
pub type Node<T> = Arc<dyn Res<T>>;

/// Fails with `ShapeMismatch` unless `upstream` matches `output` in length.
pub(crate) fn check_upstream<T: Numeric>(
    upstream: &Vector<T>,
    output_len: usize,
    operation: &str,
) -> Result<(), SeqDiffError> {
    if upstream.len() != output_len {
        return Err(SeqDiffError::ShapeMismatch {
            expected: vec![output_len],
            actual: vec![upstream.len()],
            operation: format!("{} (upstream gradient)", operation),
        });
    }
    Ok(())
}

/// Union of the variable sets of `nodes`.
pub(crate) fn merge_vars<T: Numeric>(nodes: &[&Node<T>]) -> VarSet {
    VarSet::merge(nodes.iter().map(|n| n.vars()))
}

/// Propagates `upstream` from `root` through the whole graph.
///
/// This is the entry point for a backward pass. It returns only after every
/// path from `root` to a tracked variable has contributed to `grad`.
///
/// # Errors
/// `ShapeMismatch` if `upstream` does not match the root's output, or any
/// error raised by a node during propagation. On error the contents of `grad`
/// are unspecified.
pub fn backward<T: Numeric>(root: &Node<T>, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
    check_upstream(&upstream, root.output().len(), "backward")?;
    if !grad.intersects(root.vars()) {
        debug!("backward: root does not depend on any tracked variable");
        return Ok(());
    }
    root.propagate(upstream, grad)
}

/// Computes the gradient of `sum(root)` with respect to `vars`.
pub fn gradients<T: Numeric>(root: &Node<T>, vars: &[Arc<Var<T>>]) -> Result<Grad<T>, SeqDiffError> {
    let mut grad = Grad::for_vars(vars);
    let upstream = Vector::ones(root.output().len());
    backward(root, upstream, &mut grad)?;
    Ok(grad)
}

/// A node wrapping a fixed value that no variable influences.
#[derive(Debug)]
pub struct Constant<T: Numeric> {
    value: Vector<T>,
    vars: VarSet,
}

impl<T: Numeric> Constant<T> {
    pub fn new(value: Vector<T>) -> Node<T> {
        Arc::new(Constant {
            value,
            vars: VarSet::new(),
        })
    }
}

impl<T: Numeric> Res<T> for Constant<T> {
    fn output(&self) -> Vector<T> {
        self.value.clone()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vector<T>, _grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.value.len(), "constant")
    }
}

#[cfg(test)]
#[path = "res_test.rs"]
mod tests;
