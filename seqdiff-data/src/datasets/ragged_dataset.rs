// seqdiff-data/src/datasets/ragged_dataset.rs

use super::traits::Dataset;
use seqdiff_core::{Numeric, SeqDiffError, Vector};

/// Sequences of varying length whose timesteps all have the same width.
///
/// Each sample is one sequence, returned as its list of timestep vectors.
/// Timestep vectors share storage with the dataset, so `get` does not copy
/// the values.
#[derive(Debug, Clone)]
pub struct RaggedDataset<T: Numeric> {
    sequences: Vec<Vec<Vector<T>>>,
    width: usize,
}

impl<T: Numeric> RaggedDataset<T> {
    /// Builds a dataset from already split timesteps.
    ///
    /// # Errors
    /// - `ShapeMismatch` if a timestep does not have `width` elements.
    /// - `InvalidSequence` if `width` is zero or a sequence has no timesteps.
    pub fn new(sequences: Vec<Vec<Vector<T>>>, width: usize) -> Result<Self, SeqDiffError> {
        if width == 0 {
            return Err(SeqDiffError::InvalidSequence(
                "RaggedDataset: timestep width must be positive".to_string(),
            ));
        }
        for (index, sequence) in sequences.iter().enumerate() {
            if sequence.is_empty() {
                return Err(SeqDiffError::InvalidSequence(format!(
                    "RaggedDataset: sequence {} has no timesteps",
                    index
                )));
            }
            for (t, step) in sequence.iter().enumerate() {
                if step.len() != width {
                    return Err(SeqDiffError::ShapeMismatch {
                        expected: vec![width],
                        actual: vec![step.len()],
                        operation: format!("RaggedDataset::new (sequence {}, timestep {})", index, t),
                    });
                }
            }
        }
        Ok(RaggedDataset { sequences, width })
    }

    /// Builds a dataset from flat rows, each one the concatenation of its
    /// timesteps.
    ///
    /// # Errors
    /// `ShapeMismatch` if a row's length is not a positive multiple of `width`.
    pub fn from_flat(rows: &[Vec<f64>], width: usize) -> Result<Self, SeqDiffError> {
        if width == 0 {
            return Err(SeqDiffError::InvalidSequence(
                "RaggedDataset: timestep width must be positive".to_string(),
            ));
        }
        let mut sequences = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.is_empty() || row.len() % width != 0 {
                return Err(SeqDiffError::ShapeMismatch {
                    expected: vec![width],
                    actual: vec![row.len()],
                    operation: format!("RaggedDataset::from_flat (sequence {})", index),
                });
            }
            sequences.push(row.chunks(width).map(Vector::from_f64).collect());
        }
        Self::new(sequences, width)
    }

    /// Width shared by every timestep.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of timesteps of the sequence at `index`, if it exists.
    pub fn seq_len(&self, index: usize) -> Option<usize> {
        self.sequences.get(index).map(Vec::len)
    }

    /// Length of the longest sequence, zero for an empty dataset.
    pub fn max_len(&self) -> usize {
        self.sequences.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl<T: Numeric> Dataset for RaggedDataset<T> {
    type Item = Vec<Vector<T>>;

    fn get(&self, index: usize) -> Result<Self::Item, SeqDiffError> {
        self.sequences
            .get(index)
            .cloned()
            .ok_or_else(|| SeqDiffError::IndexOutOfBounds {
                index: vec![index],
                shape: vec![self.sequences.len()],
            })
    }

    fn len(&self) -> usize {
        self.sequences.len()
    }
}

#[cfg(test)]
#[path = "ragged_dataset_test.rs"]
mod tests;
