// src/seq/reduce.rs

use crate::autograd::grad::Grad;
use crate::autograd::res::{check_upstream, Node, Res};
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::seq::{Batch, SeqRef};
use crate::vector::Vector;
use std::sync::Arc;

/// Location of one lane's row inside a packed timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    step: usize,
    offset: usize,
}

/// Reduces a sequence to one row per lane by summing selected timestep rows.
///
/// Absent lanes have no rows at a timestep, so they can contribute neither
/// value nor gradient there.
#[derive(Debug)]
struct LaneReduceRes<T: Numeric> {
    input: SeqRef<T>,
    sources: Vec<Vec<Row>>,
    width: usize,
    out: Vector<T>,
    op_name: &'static str,
}

impl<T: Numeric> Res<T> for LaneReduceRes<T> {
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
        let mut downstream: Vec<Vec<T>> = self
            .input
            .output()
            .iter()
            .map(|b| vec![T::zero(); b.packed.len()])
            .collect();
        let up = upstream.as_slice();
        for (lane, rows) in self.sources.iter().enumerate() {
            let lane_grad = &up[lane * self.width..(lane + 1) * self.width];
            for row in rows {
                let target = &mut downstream[row.step][row.offset..row.offset + self.width];
                for (d, &g) in target.iter_mut().zip(lane_grad) {
                    *d += g;
                }
            }
        }
        self.input
            .propagate(downstream.into_iter().map(Vector::from_vec).collect(), grad)
    }
}

/// Common width of every timestep, required by the lane reductions.
fn common_width<T: Numeric>(batches: &[Batch<T>], op_name: &str) -> Result<usize, SeqDiffError> {
    let first = batches.first().ok_or(SeqDiffError::EmptyBatch)?;
    let width = first.width();
    if let Some(b) = batches.iter().find(|b| b.width() != width) {
        return Err(SeqDiffError::ShapeMismatch {
            expected: vec![width],
            actual: vec![b.width()],
            operation: format!("{} (timestep width)", op_name),
        });
    }
    Ok(width)
}

/// For every lane, the rows it occupies, in timestep order.
fn lane_rows<T: Numeric>(batches: &[Batch<T>], width: usize) -> Vec<Vec<Row>> {
    let lanes = batches.first().map_or(0, Batch::lanes);
    let mut rows = vec![Vec::new(); lanes];
    for (step, batch) in batches.iter().enumerate() {
        let present_lanes = batch.present.iter().enumerate().filter(|(_, p)| **p);
        for (packed_index, (lane, _)) in present_lanes.enumerate() {
            rows[lane].push(Row {
                step,
                offset: packed_index * width,
            });
        }
    }
    rows
}

fn lane_reduce<T: Numeric>(
    seq: &SeqRef<T>,
    sources: Vec<Vec<Row>>,
    width: usize,
    op_name: &'static str,
) -> Node<T> {
    let batches = seq.output();
    let mut out = vec![T::zero(); sources.len() * width];
    for (lane, rows) in sources.iter().enumerate() {
        let target = &mut out[lane * width..(lane + 1) * width];
        for row in rows {
            let values = &batches[row.step].packed.as_slice()[row.offset..row.offset + width];
            for (o, &v) in target.iter_mut().zip(values) {
                *o += v;
            }
        }
    }
    Arc::new(LaneReduceRes {
        input: seq.clone(),
        sources,
        width,
        out: Vector::from_vec(out),
        op_name,
    })
}

/// Sums every lane over the timesteps where it is present.
///
/// The output holds one row of the common timestep width per lane. A lane
/// that is never present gets a zero row.
///
/// # Errors
/// `EmptyBatch` for a sequence without timesteps, `ShapeMismatch` if the
/// timestep widths differ.
pub fn sum_each<T: Numeric>(seq: &SeqRef<T>) -> Result<Node<T>, SeqDiffError> {
    let width = common_width(seq.output(), "sum_each")?;
    let sources = lane_rows(seq.output(), width);
    Ok(lane_reduce(seq, sources, width, "sum_each"))
}

/// The row of the last timestep at which each lane is present.
///
/// Errors as for [`sum_each`].
pub fn tail<T: Numeric>(seq: &SeqRef<T>) -> Result<Node<T>, SeqDiffError> {
    let width = common_width(seq.output(), "tail")?;
    let sources = lane_rows(seq.output(), width)
        .into_iter()
        .map(|rows| rows.last().copied().into_iter().collect())
        .collect();
    Ok(lane_reduce(seq, sources, width, "tail"))
}

#[cfg(test)]
#[path = "reduce_test.rs"]
mod tests;
