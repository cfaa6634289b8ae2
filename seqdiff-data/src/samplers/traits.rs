// seqdiff-data/src/samplers/traits.rs

use std::fmt::Debug;

/// Produces the order in which a loader visits the samples of a dataset.
pub trait Sampler: Debug + Send + Sync {
    /// Indices for one epoch over a dataset of `dataset_len` samples.
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync>;

    /// Number of indices `iter` yields for a dataset of `dataset_len` samples.
    fn len(&self, dataset_len: usize) -> usize;
}
