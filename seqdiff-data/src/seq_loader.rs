// seqdiff-data/src/seq_loader.rs

//! Batches of ragged sequences as constant [`SeqRef`]s.
//!
//! ```no_run
//! use seqdiff_core::Seq;
//! use seqdiff_data::{RaggedDataset, SeqLoader, SeqLoaderOptions, SequentialSampler};
//!
//! let dataset = RaggedDataset::<f64>::from_flat(&[vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0]], 2)?;
//! let options = SeqLoaderOptions { batch_size: 2, ..Default::default() };
//! for batch in SeqLoader::new(dataset, SequentialSampler::new(), options)? {
//!     let seq = batch?;
//!     println!("{} timesteps", seq.output().len());
//! }
//! # Ok::<(), seqdiff_core::SeqDiffError>(())
//! ```

use crate::datasets::Dataset;
use crate::samplers::Sampler;
use log::debug;
use seqdiff_core::seq::const_seq_from_lanes;
use seqdiff_core::{Numeric, SeqDiffError, SeqRef, Vector};

/// Options of a [`SeqLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqLoaderOptions {
    /// Maximum number of sequences (lanes) per batch.
    pub batch_size: usize,
    /// Skip the final batch when it has fewer than `batch_size` lanes.
    pub drop_last: bool,
    /// Order the lanes of each batch by decreasing length, so the lanes
    /// still present at any timestep are a prefix of the batch.
    pub sort_by_length: bool,
}

impl Default for SeqLoaderOptions {
    fn default() -> Self {
        SeqLoaderOptions {
            batch_size: 16,
            drop_last: false,
            sort_by_length: false,
        }
    }
}

/// Iterates over a dataset of sequences, one packed [`SeqRef`] per batch.
///
/// Lane `i` of a batch is the `i`-th sampled sequence (after the optional
/// length sort); shorter lanes simply end earlier.
pub struct SeqLoader<D: Dataset, S: Sampler> {
    dataset: D,
    sampler: S,
    options: SeqLoaderOptions,
    indices: Box<dyn Iterator<Item = usize> + Send + Sync>,
    emitted: usize,
}

impl<D: Dataset, S: Sampler> SeqLoader<D, S> {
    /// # Errors
    /// `InvalidSequence` if `options.batch_size` is zero.
    pub fn new(dataset: D, sampler: S, options: SeqLoaderOptions) -> Result<Self, SeqDiffError> {
        if options.batch_size == 0 {
            return Err(SeqDiffError::InvalidSequence(
                "SeqLoader: batch_size must be positive".to_string(),
            ));
        }
        let indices = sampler.iter(dataset.len());
        Ok(SeqLoader {
            dataset,
            sampler,
            options,
            indices,
            emitted: 0,
        })
    }

    pub fn options(&self) -> &SeqLoaderOptions {
        &self.options
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    /// Number of batches in a full epoch.
    pub fn num_batches(&self) -> usize {
        let samples = self.sampler.len(self.dataset.len());
        if self.options.drop_last {
            samples / self.options.batch_size
        } else {
            samples.div_ceil(self.options.batch_size)
        }
    }

    /// Starts a new epoch, drawing a fresh index order from the sampler.
    pub fn reset(&mut self) {
        self.indices = self.sampler.iter(self.dataset.len());
        self.emitted = 0;
    }
}

impl<T, D, S> SeqLoader<D, S>
where
    T: Numeric,
    D: Dataset<Item = Vec<Vector<T>>>,
    S: Sampler,
{
    fn collate(&self, indices: &[usize]) -> Result<SeqRef<T>, SeqDiffError> {
        let mut lanes = indices
            .iter()
            .map(|&i| self.dataset.get(i))
            .collect::<Result<Vec<_>, _>>()?;
        if self.options.sort_by_length {
            lanes.sort_by(|a, b| b.len().cmp(&a.len()));
        }
        const_seq_from_lanes(&lanes)
    }
}

impl<T, D, S> Iterator for SeqLoader<D, S>
where
    T: Numeric,
    D: Dataset<Item = Vec<Vector<T>>>,
    S: Sampler,
{
    type Item = Result<SeqRef<T>, SeqDiffError>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch_size = self.options.batch_size;
        let indices: Vec<usize> = self.indices.by_ref().take(batch_size).collect();
        if indices.is_empty() {
            return None;
        }
        if self.options.drop_last && indices.len() < batch_size {
            debug!("SeqLoader: dropping final batch of {} sequences", indices.len());
            return None;
        }
        self.emitted += 1;
        debug!(
            "SeqLoader: batch {} with {} sequences",
            self.emitted,
            indices.len()
        );
        Some(self.collate(&indices))
    }
}

#[cfg(test)]
#[path = "seq_loader_test.rs"]
mod tests;
