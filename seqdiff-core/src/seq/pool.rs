// src/seq/pool.rs

use crate::autograd::grad::Grad;
use crate::autograd::var::{Var, VarId, VarSet};
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::seq::create::{res_seq, ResBatch};
use crate::seq::{check_seq_upstream, Batch, Seq, SeqRef};
use crate::vector::Vector;
use log::trace;
use std::sync::Arc;

#[derive(Debug)]
struct PoolSeq<T: Numeric> {
    input: SeqRef<T>,
    temps: Vec<VarId>,
    result: SeqRef<T>,
    vars: VarSet,
}

impl<T: Numeric> Seq<T> for PoolSeq<T> {
    fn output(&self) -> &[Batch<T>] {
        self.result.output()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vec<Vector<T>>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_seq_upstream(&upstream, self.result.output(), "seq pool")?;
        if !grad.intersects(self.input.vars()) {
            return self.result.propagate(upstream, grad);
        }

        for (&id, batch) in self.temps.iter().zip(self.input.output()) {
            grad.track(id, batch.packed.zeros_like());
        }
        let consumers = self.result.propagate(upstream, grad);
        let sums = self
            .temps
            .iter()
            .map(|&id| grad.take(id))
            .collect::<Result<Vec<_>, _>>()?;
        consumers?;

        trace!("seq pool: propagating summed gradients of {} timesteps", sums.len());
        self.input.propagate(sums, grad)
    }
}

/// Shares `seq` across every consumer built by `f`.
///
/// `f` receives a sequence with the same batches and masks as `seq`, backed by
/// temporary leaves. Each timestep of `seq` is propagated once, with the sum
/// of all consumer contributions for that timestep.
pub fn pool<T, F>(seq: &SeqRef<T>, f: F) -> Result<SeqRef<T>, SeqDiffError>
where
    T: Numeric,
    F: FnOnce(SeqRef<T>) -> Result<SeqRef<T>, SeqDiffError>,
{
    let leaves: Vec<Arc<Var<T>>> = seq.output().iter().map(|b| Var::new(b.packed.clone())).collect();
    let temps: Vec<VarId> = leaves.iter().map(|v| v.id()).collect();
    let shared = res_seq(
        leaves
            .iter()
            .zip(seq.output())
            .map(|(leaf, batch)| ResBatch {
                packed: leaf.as_node(),
                present: batch.present.clone(),
            })
            .collect(),
    )?;
    let result = f(shared)?;

    let mut vars = VarSet::merge([result.vars(), seq.vars()]);
    for &id in &temps {
        vars.remove(id);
    }
    Ok(Arc::new(PoolSeq {
        input: seq.clone(),
        temps,
        result,
        vars,
    }))
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
