// src/seq/utils.rs

use crate::numeric::Numeric;
use crate::seq::Batch;
use crate::vector::Vector;

/// Scatters the packed rows of `batch` into a full `lanes x width` vector,
/// leaving zero rows for absent lanes.
pub fn expand<T: Numeric>(batch: &Batch<T>) -> Vector<T> {
    let width = batch.width();
    let mut out = vec![T::zero(); batch.lanes() * width];
    let mut rows = batch.packed.as_slice().chunks(width.max(1));
    for (lane, _) in batch.present.iter().enumerate().filter(|(_, p)| **p) {
        if let Some(row) = rows.next() {
            out[lane * width..(lane + 1) * width].copy_from_slice(row);
        }
    }
    Vector::from_vec(out)
}

/// Splits a batch list back into one list of timestep rows per lane.
pub fn separate_lanes<T: Numeric>(batches: &[Batch<T>]) -> Vec<Vec<Vector<T>>> {
    let lanes = batches.first().map_or(0, Batch::lanes);
    let mut out = vec![Vec::new(); lanes];
    for batch in batches {
        let width = batch.width();
        let mut rows = batch.packed.as_slice().chunks(width.max(1));
        for (lane, _) in batch.present.iter().enumerate().filter(|(_, p)| **p) {
            if let Some(row) = rows.next() {
                out[lane].push(Vector::from_vec(row.to_vec()));
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod tests;
