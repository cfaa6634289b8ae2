// src/utils/testing.rs
//
// Helpers shared by unit and integration tests.

use crate::autograd::Var;
use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::seq::{res_seq, ResBatch, SeqRef};
use crate::vector::Vector;
use std::sync::Arc;

/// Checks that a vector is elementwise close to the expected values.
///
/// Panics with the first offending index if lengths differ or any element
/// differs by more than `tolerance`.
pub fn check_vector_near<T: Numeric>(actual: &Vector<T>, expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "Data length mismatch");
    for (i, (a, e)) in actual.as_slice().iter().zip(expected.iter()).enumerate() {
        let a = a.as_f64();
        let diff = (a - e).abs();
        if diff > tolerance || diff.is_nan() {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Per-timestep variables of a ragged sequence together with its presence
/// masks.
///
/// [`RandomSeq::seq`] builds the sequence from the variables' current values,
/// so a gradient-check closure must call it on every evaluation.
#[derive(Debug, Clone)]
pub struct RandomSeq<T: Numeric> {
    pub vars: Vec<Arc<Var<T>>>,
    masks: Vec<Vec<bool>>,
}

impl<T: Numeric> RandomSeq<T> {
    pub fn seq(&self) -> Result<SeqRef<T>, SeqDiffError> {
        let batches = self
            .vars
            .iter()
            .zip(&self.masks)
            .map(|(var, present)| ResBatch {
                packed: var.as_node(),
                present: present.clone(),
            })
            .collect();
        res_seq(batches)
    }
}

/// One random `Var` per timestep.
///
/// Lane `l` is present for the first `lane_lengths[l]` timesteps; each present
/// lane holds `width` standard normal values.
pub fn random_seq<T: Numeric>(lane_lengths: &[usize], width: usize) -> RandomSeq<T> {
    let steps = lane_lengths.iter().copied().max().unwrap_or(0);
    let mut vars = Vec::with_capacity(steps);
    let mut masks = Vec::with_capacity(steps);
    for t in 0..steps {
        let present: Vec<bool> = lane_lengths.iter().map(|&len| t < len).collect();
        let count = present.iter().filter(|&&p| p).count();
        vars.push(Var::new(crate::vector::randn(count * width)));
        masks.push(present);
    }
    RandomSeq { vars, masks }
}
