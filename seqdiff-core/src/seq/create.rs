// src/seq/create.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{merge_vars, Node};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::seq::{check_seq_upstream, validate_batches, Batch, Seq, SeqRef};
use crate::vector::Vector;
use std::sync::Arc;

// --- Constant sequences ---

#[derive(Debug)]
struct ConstSeq<T: Numeric> {
    batches: Vec<Batch<T>>,
    vars: VarSet,
}

impl<T: Numeric> Seq<T> for ConstSeq<T> {
    fn output(&self) -> &[Batch<T>] {
        &self.batches
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vec<Vector<T>>, _grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_seq_upstream(&upstream, &self.batches, "const_seq")
    }
}

/// A sequence that depends on no variable.
///
/// # Errors
/// `InvalidSequence` if the lane count changes between timesteps or a lane
/// reappears after ending.
pub fn const_seq<T: Numeric>(batches: Vec<Batch<T>>) -> Result<SeqRef<T>, SeqDiffError> {
    validate_batches(&batches)?;
    Ok(Arc::new(ConstSeq {
        batches,
        vars: VarSet::new(),
    }))
}

/// Packs per-lane timestep lists into a constant sequence.
///
/// Lane `l` is present at timestep `t` iff `t < lanes[l].len()`. Every vector
/// of a timestep must have the same length.
pub fn const_seq_from_lanes<T: Numeric>(lanes: &[Vec<Vector<T>>]) -> Result<SeqRef<T>, SeqDiffError> {
    let steps = lanes.iter().map(Vec::len).max().unwrap_or(0);
    let mut batches = Vec::with_capacity(steps);
    for t in 0..steps {
        let present: Vec<bool> = lanes.iter().map(|lane| t < lane.len()).collect();
        let mut packed = Vec::new();
        let mut width = None;
        for (l, lane) in lanes.iter().enumerate() {
            let Some(step) = lane.get(t) else {
                continue;
            };
            match width {
                None => width = Some(step.len()),
                Some(w) if w != step.len() => {
                    return Err(SeqDiffError::ShapeMismatch {
                        expected: vec![w],
                        actual: vec![step.len()],
                        operation: format!("const_seq_from_lanes (lane {}, timestep {})", l, t),
                    });
                }
                Some(_) => {}
            }
            packed.extend_from_slice(step.as_slice());
        }
        batches.push(Batch::new(Vector::from_vec(packed), present)?);
    }
    const_seq(batches)
}

// --- Node-backed sequences ---

/// The node and presence mask of one timestep of a [`res_seq`].
#[derive(Debug, Clone)]
pub struct ResBatch<T: Numeric> {
    pub packed: Node<T>,
    pub present: Vec<bool>,
}

#[derive(Debug)]
struct ResSeq<T: Numeric> {
    steps: Vec<Node<T>>,
    batches: Vec<Batch<T>>,
    vars: VarSet,
}

impl<T: Numeric> Seq<T> for ResSeq<T> {
    fn output(&self) -> &[Batch<T>] {
        &self.batches
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vec<Vector<T>>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_seq_upstream(&upstream, &self.batches, "res_seq")?;
        for (step, up) in self.steps.iter().zip(upstream) {
            if grad.intersects(step.vars()) {
                step.propagate(up, grad)?;
            }
        }
        Ok(())
    }
}

/// A sequence whose timesteps are graph nodes, typically [`Var`]s.
///
/// [`Var`]: crate::autograd::Var
pub fn res_seq<T: Numeric>(steps: Vec<ResBatch<T>>) -> Result<SeqRef<T>, SeqDiffError> {
    let batches = steps
        .iter()
        .map(|s| Batch::new(s.packed.output(), s.present.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    validate_batches(&batches)?;
    let steps: Vec<Node<T>> = steps.into_iter().map(|s| s.packed).collect();
    let refs: Vec<&Node<T>> = steps.iter().collect();
    Ok(Arc::new(ResSeq {
        vars: merge_vars(&refs),
        steps,
        batches,
    }))
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
