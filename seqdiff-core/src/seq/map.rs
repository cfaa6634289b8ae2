// src/seq/map.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::Node;
use crate::autograd::var::{Var, VarId, VarSet};
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::seq::{check_seq_upstream, Batch, Seq, SeqRef};
use crate::vector::Vector;
use log::trace;
use std::sync::Arc;

/// Temporary leaves standing in for one input sequence, one per timestep.
#[derive(Debug)]
struct Inputs<T: Numeric> {
    seq: SeqRef<T>,
    temps: Vec<VarId>,
}

impl<T: Numeric> Inputs<T> {
    fn new(seq: &SeqRef<T>) -> (Self, Vec<Node<T>>) {
        let leaves: Vec<Arc<Var<T>>> = seq.output().iter().map(|b| Var::new(b.packed.clone())).collect();
        let inputs = Inputs {
            seq: seq.clone(),
            temps: leaves.iter().map(|v| v.id()).collect(),
        };
        (inputs, leaves.iter().map(Var::as_node).collect())
    }

    fn track(&self, grad: &mut Grad<T>) {
        for (&id, batch) in self.temps.iter().zip(self.seq.output()) {
            grad.track(id, batch.packed.zeros_like());
        }
    }

    /// Removes the temporary slots, returning one summed gradient per
    /// timestep.
    fn take(&self, grad: &mut Grad<T>) -> Result<Vec<Vector<T>>, SeqDiffError> {
        self.temps.iter().map(|&id| grad.take(id)).collect()
    }
}

/// Sequence produced by [`map`] and [`map_n`].
#[derive(Debug)]
struct MapSeq<T: Numeric> {
    inputs: Vec<Inputs<T>>,
    steps: Vec<Node<T>>,
    batches: Vec<Batch<T>>,
    vars: VarSet,
    op_name: &'static str,
}

impl<T: Numeric> MapSeq<T> {
    fn build(
        inputs: Vec<Inputs<T>>,
        steps: Vec<Node<T>>,
        masks: Vec<Vec<bool>>,
        op_name: &'static str,
    ) -> Result<Self, SeqDiffError> {
        let batches = steps
            .iter()
            .zip(masks)
            .map(|(step, present)| Batch::new(step.output(), present))
            .collect::<Result<Vec<_>, _>>()?;

        let mut vars = VarSet::merge(
            steps
                .iter()
                .map(|s| s.vars())
                .chain(inputs.iter().map(|i| i.seq.vars())),
        );
        for id in inputs.iter().flat_map(|i| i.temps.iter()) {
            vars.remove(*id);
        }
        Ok(MapSeq {
            inputs,
            steps,
            batches,
            vars,
            op_name,
        })
    }

    fn propagate_steps(&self, upstream: Vec<Vector<T>>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        for (step, up) in self.steps.iter().zip(upstream) {
            if grad.intersects(step.vars()) {
                step.propagate(up, grad)?;
            }
        }
        Ok(())
    }
}

impl<T: Numeric> Seq<T> for MapSeq<T> {
    fn output(&self) -> &[Batch<T>] {
        &self.batches
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vec<Vector<T>>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_seq_upstream(&upstream, &self.batches, self.op_name)?;
        let active: Vec<&Inputs<T>> = self
            .inputs
            .iter()
            .filter(|i| grad.intersects(i.seq.vars()))
            .collect();
        for input in &active {
            input.track(grad);
        }

        let steps_result = self.propagate_steps(upstream, grad);
        let sums = active
            .iter()
            .map(|input| input.take(grad))
            .collect::<Result<Vec<_>, _>>()?;
        steps_result?;

        trace!(
            "{}: propagating {} timesteps into {} input sequences",
            self.op_name,
            self.steps.len(),
            active.len()
        );
        for (input, sum) in active.iter().zip(sums) {
            input.seq.propagate(sum, grad)?;
        }
        Ok(())
    }
}

/// Applies `f` to every timestep of `seq`.
///
/// `f` receives the timestep as a node and the number of present lanes. It
/// may change the per-lane width but its output must still split evenly into
/// that many lanes. The result keeps the presence masks of `seq`.
pub fn map<T, F>(seq: &SeqRef<T>, mut f: F) -> Result<SeqRef<T>, SeqDiffError>
where
    T: Numeric,
    F: FnMut(Node<T>, usize) -> Result<Node<T>, SeqDiffError>,
{
    let (inputs, leaves) = Inputs::new(seq);
    let mut steps = Vec::with_capacity(leaves.len());
    let mut masks = Vec::with_capacity(leaves.len());
    for (leaf, batch) in leaves.into_iter().zip(seq.output()) {
        steps.push(f(leaf, batch.num_present())?);
        masks.push(batch.present.clone());
    }
    Ok(Arc::new(MapSeq::build(vec![inputs], steps, masks, "map")?))
}

/// Applies `f` across aligned timesteps of several sequences.
///
/// `f` receives the number of present lanes and one node per sequence, in the
/// order of `seqs`. The sequences may have different widths.
///
/// # Errors
/// `InvalidSequence` if `seqs` is empty; `MisalignedSequences` if the
/// sequences differ in timestep count or in any presence mask.
pub fn map_n<T, F>(mut f: F, seqs: &[SeqRef<T>]) -> Result<SeqRef<T>, SeqDiffError>
where
    T: Numeric,
    F: FnMut(usize, &[Node<T>]) -> Result<Node<T>, SeqDiffError>,
{
    let Some(first) = seqs.first() else {
        return Err(SeqDiffError::InvalidSequence(
            "map_n needs at least one sequence".to_string(),
        ));
    };
    let reference = first.output();
    for (i, seq) in seqs.iter().enumerate().skip(1) {
        let other = seq.output();
        if other.len() != reference.len() {
            return Err(SeqDiffError::MisalignedSequences {
                operation: "map_n".to_string(),
                reason: format!(
                    "sequence {} has {} timesteps, sequence 0 has {}",
                    i,
                    other.len(),
                    reference.len()
                ),
            });
        }
        if let Some(t) = (0..reference.len()).find(|&t| other[t].present != reference[t].present) {
            return Err(SeqDiffError::MisalignedSequences {
                operation: "map_n".to_string(),
                reason: format!("presence masks of sequence {} and sequence 0 differ at timestep {}", i, t),
            });
        }
    }

    let (inputs, leaves): (Vec<Inputs<T>>, Vec<Vec<Node<T>>>) = seqs.iter().map(Inputs::new).unzip();
    let mut steps = Vec::with_capacity(reference.len());
    let mut masks = Vec::with_capacity(reference.len());
    for (t, batch) in reference.iter().enumerate() {
        let args: Vec<Node<T>> = leaves.iter().map(|l| l[t].clone()).collect();
        steps.push(f(batch.num_present(), &args)?);
        masks.push(batch.present.clone());
    }
    Ok(Arc::new(MapSeq::build(inputs, steps, masks, "map_n")?))
}

#[cfg(test)]
#[path = "map_test.rs"]
mod tests;
