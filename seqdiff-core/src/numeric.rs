use num_traits::{Float, NumAssignOps, NumOps};
use std::fmt::Debug;

/// A trait representing the element types usable in seqdiff vectors.
///
/// This trait bounds the types (`f32`, `f64`) that the substrate kernels,
/// the reverse-mode engine and the forward-mode duals are generic over.
pub trait Numeric:
    Float
    + NumAssignOps
    + NumOps
    + PartialOrd
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Converts a literal (or an `f64` computed in a test/check) to this type.
    fn of(value: f64) -> Self;

    /// Widens this value to `f64`.
    fn as_f64(self) -> f64;
}

impl Numeric for f32 {
    fn of(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Numeric for f64 {
    fn of(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }
}
