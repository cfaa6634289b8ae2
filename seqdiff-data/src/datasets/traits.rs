// seqdiff-data/src/datasets/traits.rs

use seqdiff_core::SeqDiffError;

/// Indexed access to the samples of a dataset.
pub trait Dataset {
    /// The type of a single sample.
    type Item;

    /// Returns the sample at `index`.
    ///
    /// # Errors
    /// `SeqDiffError::IndexOutOfBounds` when `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Self::Item, SeqDiffError>;

    /// Number of samples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
