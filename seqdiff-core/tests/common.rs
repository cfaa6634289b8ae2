// Shared helpers for the integration tests of seqdiff-core.

use seqdiff_core::autograd::Var;
use seqdiff_core::vector::randn;
use std::sync::{Arc, Once};

// Helper to initialize logger only once for all tests in a binary
static LOGGER_INIT: Once = Once::new();

#[allow(dead_code)]
pub fn setup_logger() {
    LOGGER_INIT.call_once(|| {
        // If another test harness already installed a logger, that's okay.
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// A variable holding `len` standard normal values.
#[allow(dead_code)]
pub fn random_var(len: usize) -> Arc<Var<f64>> {
    Var::new(randn(len))
}
