// src/autograd/pool.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::autograd::var::{Var, VarId, VarSet};
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use log::trace;
use std::sync::Arc;

/// Node produced by [`pool`]: the consumer subgraph plus the shared input it
/// reads through a temporary variable.
#[derive(Debug)]
struct PoolRes<T: Numeric> {
    input: Node<T>,
    temp: VarId,
    temp_len: usize,
    result: Node<T>,
    vars: VarSet,
}

/// Shares the value of `node` across every consumer built by `f`.
///
/// The value of `node` is materialized once and handed to `f` as a temporary
/// leaf. `f` may read that leaf any number of times. During propagation the
/// consumer subgraph runs first while the accumulator collects, in the
/// temporary's slot, the sum of every consumer's contribution. `node` itself
/// is then propagated exactly once with that sum.
///
/// The set of consumers is exactly the subgraph returned by `f`, so no
/// consumer count has to be declared or inferred.
pub fn pool<T, F>(node: &Node<T>, f: F) -> Result<Node<T>, SeqDiffError>
where
    T: Numeric,
    F: FnOnce(Node<T>) -> Result<Node<T>, SeqDiffError>,
{
    let value = node.output();
    let temp_len = value.len();
    let temp = Var::new(value);
    let temp_id = temp.id();
    let result = f(temp.as_node())?;

    let mut vars = VarSet::merge([result.vars(), node.vars()]);
    vars.remove(temp_id);
    Ok(Arc::new(PoolRes {
        input: node.clone(),
        temp: temp_id,
        temp_len,
        result,
        vars,
    }))
}

impl<T: Numeric> Res<T> for PoolRes<T> {
    fn output(&self) -> Vector<T> {
        self.result.output()
    }

    fn vars(&self) -> &VarSet {
        &self.vars
    }

    fn propagate(&self, upstream: Vector<T>, grad: &mut Grad<T>) -> Result<(), SeqDiffError> {
        check_upstream(&upstream, self.result.output().len(), "pool")?;
        if !grad.intersects(self.input.vars()) {
            return self.result.propagate(upstream, grad);
        }

        grad.track(self.temp, Vector::zeros(self.temp_len));
        let consumers = self.result.propagate(upstream, grad);
        let summed = grad.take(self.temp)?;
        consumers?;

        trace!("pool: propagating summed gradient of {} elements into shared input", self.temp_len);
        self.input.propagate(summed, grad)
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod tests;
