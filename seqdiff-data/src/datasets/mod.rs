pub mod ragged_dataset;
pub mod traits;

pub use ragged_dataset::RaggedDataset;
pub use traits::Dataset;
