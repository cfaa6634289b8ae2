// Shared helpers for the integration tests of seqdiff-data.

use seqdiff_data::RaggedDataset;
use std::sync::Once;

static LOGGER_INIT: Once = Once::new();

#[allow(dead_code)]
pub fn setup_logger() {
    LOGGER_INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Sequence `i` has `lengths[i]` timesteps of `width` standard normal values.
#[allow(dead_code)]
pub fn random_dataset(lengths: &[usize], width: usize) -> RaggedDataset<f64> {
    let sequences = lengths
        .iter()
        .map(|&len| (0..len).map(|_| seqdiff_core::vector::randn(width)).collect())
        .collect();
    RaggedDataset::new(sequences, width).expect("generated timesteps have the requested width")
}
