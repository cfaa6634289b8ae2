// src/fwd/linear.rs

use crate::error::SeqDiffError;
use crate::fwd::dual::{DualScalar, DualVector};
use crate::numeric::Numeric;

/// Linear combinations and products, enough to build scalar-valued functions
/// in forward mode.
impl<T: Numeric> DualVector<T> {
    pub fn add(&self, other: &DualVector<T>) -> Result<Self, SeqDiffError> {
        self.check_compatible(other, "fwd add")?;
        let jacobian = self
            .jacobian()
            .iter()
            .zip(other.jacobian())
            .map(|(a, b)| a.add(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DualVector::from_parts(self.values().add(other.values())?, jacobian))
    }

    /// Elementwise product, by the product rule.
    pub fn mul(&self, other: &DualVector<T>) -> Result<Self, SeqDiffError> {
        self.check_compatible(other, "fwd mul")?;
        let (x, y) = (self.values(), other.values());
        let jacobian = self
            .jacobian()
            .iter()
            .zip(other.jacobian())
            .map(|(dx, dy)| dx.mul(y)?.add(&dy.mul(x)?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DualVector::from_parts(x.mul(y)?, jacobian))
    }

    pub fn scale(&self, scaler: T) -> Self {
        DualVector::from_parts(
            self.values().scale(scaler),
            self.jacobian().iter().map(|row| row.scale(scaler)).collect(),
        )
    }

    pub fn sum(&self) -> DualScalar<T> {
        DualScalar::new(
            self.values().sum(),
            self.jacobian().iter().map(|row| row.sum()).collect(),
        )
    }

    pub fn dot(&self, other: &DualVector<T>) -> Result<DualScalar<T>, SeqDiffError> {
        Ok(self.mul(other)?.sum())
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
