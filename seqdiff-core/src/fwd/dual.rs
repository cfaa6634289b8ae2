// src/fwd/dual.rs

use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use crate::vector::Vector;

/// A scalar with its derivative along each tracked direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DualScalar<T: Numeric> {
    pub value: T,
    pub derivs: Vec<T>,
}

impl<T: Numeric> DualScalar<T> {
    pub fn new(value: T, derivs: Vec<T>) -> Self {
        DualScalar { value, derivs }
    }

    /// A scalar that does not vary along any of `directions` directions.
    pub fn constant(value: T, directions: usize) -> Self {
        DualScalar {
            value,
            derivs: vec![T::zero(); directions],
        }
    }

    /// Whether every derivative is zero.
    pub fn is_constant(&self) -> bool {
        self.derivs.iter().all(|d| d.is_zero())
    }
}

/// A vector with its Jacobian with respect to the tracked directions.
///
/// `jacobian[k]` holds the derivative of every component along direction `k`
/// and always has the length of the primal value.
#[derive(Debug, Clone, PartialEq)]
pub struct DualVector<T: Numeric> {
    values: Vector<T>,
    jacobian: Vec<Vector<T>>,
}

impl<T: Numeric> DualVector<T> {
    /// # Errors
    /// `ShapeMismatch` if a Jacobian row differs in length from `values`.
    pub fn new(values: Vector<T>, jacobian: Vec<Vector<T>>) -> Result<Self, SeqDiffError> {
        if let Some(row) = jacobian.iter().find(|row| row.len() != values.len()) {
            return Err(SeqDiffError::ShapeMismatch {
                expected: vec![values.len()],
                actual: vec![row.len()],
                operation: "DualVector::new (jacobian row)".to_string(),
            });
        }
        Ok(DualVector { values, jacobian })
    }

    /// A value that does not vary along any of `directions` directions.
    pub fn constant(values: Vector<T>, directions: usize) -> Self {
        let jacobian = (0..directions).map(|_| values.zeros_like()).collect();
        DualVector { values, jacobian }
    }

    /// Tracks one direction per component: the Jacobian starts as the
    /// identity, so final derivatives are the columns of the full Jacobian.
    pub fn basis(values: Vector<T>) -> Self {
        let n = values.len();
        let jacobian = (0..n)
            .map(|k| {
                let mut row = vec![T::zero(); n];
                row[k] = T::one();
                Vector::from_vec(row)
            })
            .collect();
        DualVector { values, jacobian }
    }

    /// Tracks a single direction, for a directional derivative.
    pub fn with_direction(values: Vector<T>, direction: Vector<T>) -> Result<Self, SeqDiffError> {
        DualVector::new(values, vec![direction])
    }

    pub fn values(&self) -> &Vector<T> {
        &self.values
    }

    pub fn jacobian(&self) -> &[Vector<T>] {
        &self.jacobian
    }

    pub fn directions(&self) -> usize {
        self.jacobian.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds the result of an elementwise transform: `values` is the new
    /// primal and every Jacobian row is multiplied by `local_derivative`.
    pub(crate) fn chain(&self, values: Vector<T>, local_derivative: &Vector<T>) -> Self {
        let jacobian = self
            .jacobian
            .iter()
            .map(|row| row.zip_with(local_derivative, |d, s| d * s))
            .collect();
        DualVector { values, jacobian }
    }

    pub(crate) fn from_parts(values: Vector<T>, jacobian: Vec<Vector<T>>) -> Self {
        DualVector { values, jacobian }
    }

    pub(crate) fn check_compatible(&self, other: &DualVector<T>, operation: &str) -> Result<(), SeqDiffError> {
        if self.len() != other.len() || self.directions() != other.directions() {
            return Err(SeqDiffError::ShapeMismatch {
                expected: vec![self.directions(), self.len()],
                actual: vec![other.directions(), other.len()],
                operation: operation.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "dual_test.rs"]
mod tests;
