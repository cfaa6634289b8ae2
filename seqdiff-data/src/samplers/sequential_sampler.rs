// seqdiff-data/src/samplers/sequential_sampler.rs

use super::traits::Sampler;

/// Yields `0..len` in order, so a [`SeqLoader`](crate::SeqLoader) packs
/// neighbouring sequences of the dataset into the same batch.
///
/// Every epoch is identical. Combine it with
/// [`SeqLoaderOptions::sort_by_length`](crate::SeqLoaderOptions) when the
/// dataset is already grouped by length.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl SequentialSampler {
    pub fn new() -> Self {
        SequentialSampler
    }
}

impl Sampler for SequentialSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        Box::new(0..dataset_len)
    }

    fn len(&self, dataset_len: usize) -> usize {
        dataset_len
    }
}

#[cfg(test)]
#[path = "sequential_sampler_test.rs"]
mod tests;
