//! Ragged sequence datasets and batch loading for `seqdiff`.
//!
//! A [`RaggedDataset`] stores sequences of fixed-width timestep vectors with
//! arbitrary lengths. A [`SeqLoader`] draws indices from a [`Sampler`] and
//! packs each group of sequences into a constant [`SeqRef`](seqdiff_core::SeqRef)
//! whose lanes are the sampled sequences.

pub mod datasets;
pub mod samplers;
pub mod seq_loader;

pub use datasets::{Dataset, RaggedDataset};
pub use samplers::{RandomSampler, Sampler, SequentialSampler};
pub use seq_loader::{SeqLoader, SeqLoaderOptions};
