//! # Ragged sequence batches (`seq`)
//!
//! A [`Seq`] is a list of timesteps. Each timestep is a [`Batch`]: the packed
//! values of the lanes still present at that step, plus a presence mask over
//! every lane of the batch. Lanes end at different timesteps; once a lane is
//! absent it stays absent.
//!
//! Per-timestep graph work is expressed with the combinators:
//!
//! - [`map`]: one sequence, one node per timestep.
//! - [`map_n`]: several aligned sequences combined per timestep.
//! - [`pool`]: one sequence shared by several consumers.
//!
//! and reduced across time with [`sum_each`] and [`tail`].

use crate::autograd::grad::Grad;
use crate::autograd::var::VarSet;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;
use std::fmt::Debug;
use std::sync::Arc;

pub mod create;
pub mod map;
pub mod pool;
pub mod reduce;
pub mod utils;

pub use create::{const_seq, const_seq_from_lanes, res_seq, ResBatch};
pub use map::{map, map_n};
pub use pool::pool;
pub use reduce::{sum_each, tail};
pub use utils::{expand, separate_lanes};

/// The output of one timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T: Numeric> {
    /// Values of the present lanes, lane after lane.
    pub packed: Vector<T>,
    /// One flag per lane of the batch.
    pub present: Vec<bool>,
}

impl<T: Numeric> Batch<T> {
    /// # Errors
    /// `InvalidSequence` if no lane is present or the packed length is not a
    /// multiple of the number of present lanes.
    pub fn new(packed: Vector<T>, present: Vec<bool>) -> Result<Self, SeqDiffError> {
        let batch = Batch { packed, present };
        batch.check_packing()?;
        Ok(batch)
    }

    // Fields are public, so batches assembled by hand are re-checked here
    // whenever a sequence is built from them.
    fn check_packing(&self) -> Result<(), SeqDiffError> {
        let num_present = self.num_present();
        if num_present == 0 {
            return Err(SeqDiffError::InvalidSequence(
                "timestep has no present lanes".to_string(),
            ));
        }
        if self.packed.len() % num_present != 0 {
            return Err(SeqDiffError::InvalidSequence(format!(
                "packed length {} is not a multiple of {} present lanes",
                self.packed.len(),
                num_present
            )));
        }
        Ok(())
    }

    pub fn num_present(&self) -> usize {
        self.present.iter().filter(|&&p| p).count()
    }

    /// Total number of lanes, present or not.
    pub fn lanes(&self) -> usize {
        self.present.len()
    }

    /// Number of values per present lane.
    pub fn width(&self) -> usize {
        self.packed.len() / self.num_present().max(1)
    }
}

/// A differentiable sequence of batches.
///
/// The sequence analogue of [`Res`](crate::autograd::Res): `propagate` takes
/// one upstream vector per timestep, each matching that timestep's packed
/// output.
pub trait Seq<T: Numeric>: Debug + Send + Sync {
    fn output(&self) -> &[Batch<T>];

    fn vars(&self) -> &VarSet;

    fn propagate(&self, upstream: Vec<Vector<T>>, grad: &mut Grad<T>) -> Result<(), SeqDiffError>;
}

/// Shared handle to a sequence.
pub type SeqRef<T> = Arc<dyn Seq<T>>;

/// Checks the structural invariants of a batch list: every batch packs its
/// present lanes evenly, the lane count is constant and presence is
/// monotonic.
pub(crate) fn validate_batches<T: Numeric>(batches: &[Batch<T>]) -> Result<(), SeqDiffError> {
    for (t, batch) in batches.iter().enumerate() {
        batch.check_packing().map_err(|err| match err {
            SeqDiffError::InvalidSequence(reason) => {
                SeqDiffError::InvalidSequence(format!("timestep {}: {}", t, reason))
            }
            other => other,
        })?;
    }
    let Some(first) = batches.first() else {
        return Ok(());
    };
    let lanes = first.lanes();
    for (t, pair) in batches.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.lanes() != lanes {
            return Err(SeqDiffError::InvalidSequence(format!(
                "timestep {} has {} lanes, expected {}",
                t + 1,
                next.lanes(),
                lanes
            )));
        }
        if let Some(lane) = (0..lanes).find(|&l| next.present[l] && !prev.present[l]) {
            return Err(SeqDiffError::InvalidSequence(format!(
                "lane {} reappears at timestep {}",
                lane,
                t + 1
            )));
        }
    }
    Ok(())
}

/// Fails with `ShapeMismatch` unless `upstream` has one vector per timestep,
/// each as long as the packed output.
pub(crate) fn check_seq_upstream<T: Numeric>(
    upstream: &[Vector<T>],
    output: &[Batch<T>],
    operation: &str,
) -> Result<(), SeqDiffError> {
    let expected: Vec<usize> = output.iter().map(|b| b.packed.len()).collect();
    let actual: Vec<usize> = upstream.iter().map(Vector::len).collect();
    if expected != actual {
        return Err(SeqDiffError::ShapeMismatch {
            expected,
            actual,
            operation: format!("{} (upstream gradient)", operation),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
