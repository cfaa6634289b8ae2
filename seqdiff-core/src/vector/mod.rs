// src/vector/mod.rs

use crate::error::SeqDiffError;
use crate::numeric::Numeric;
use std::fmt;
use std::sync::Arc;

pub mod create;
pub(crate) mod elementwise;
pub mod linalg;

pub use create::{full, ones, rand, randn, zeros};
pub use linalg::Dims;

/// A flat, row-major numeric buffer: the substrate every node and dual value
/// is built on.
///
/// `Vector` keeps its elements behind an `Arc`, so `clone()` is cheap and
/// yields a shared snapshot. Mutating methods take `&mut self` and go through
/// `Arc::make_mut`: a vector that is still shared is copied first, so values
/// already captured by a graph never change underneath it. Use [`Vector::copy`]
/// when an independent buffer is wanted up front.
///
/// Matrix shapes are not stored here; operations carry explicit [`Dims`].
#[derive(Clone, PartialEq)]
pub struct Vector<T: Numeric> {
    data: Arc<Vec<T>>,
}

impl<T: Numeric> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vector").field(&self.data.as_slice()).finish()
    }
}

impl<T: Numeric> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Vector::from_vec(data)
    }
}

impl<T: Numeric> Vector<T> {
    /// Wraps an owned buffer.
    pub fn from_vec(data: Vec<T>) -> Self {
        Vector {
            data: Arc::new(data),
        }
    }

    /// Builds a vector from literal values, converting each to `T`.
    pub fn from_f64(values: &[f64]) -> Self {
        Vector::from_vec(values.iter().map(|&v| T::of(v)).collect())
    }

    /// Builds a `rows x cols` matrix from literal values in row-major order.
    ///
    /// # Errors
    /// Returns `SeqDiffError::VectorCreationError` if `values.len() != rows * cols`.
    pub fn matrix_from_f64(values: &[f64], rows: usize, cols: usize) -> Result<Self, SeqDiffError> {
        if values.len() != rows * cols {
            return Err(SeqDiffError::VectorCreationError {
                data_len: values.len(),
                shape: vec![rows, cols],
            });
        }
        Ok(Vector::from_f64(values))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.as_ref().clone()
    }

    /// Returns the elements widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.data.iter().map(|&x| x.as_f64()).collect()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).copied()
    }

    /// Returns an independent deep copy of this vector.
    pub fn copy(&self) -> Self {
        Vector::from_vec(self.to_vec())
    }

    /// Mutable access to the elements (copy-on-write if shared).
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Overwrites a single element.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), SeqDiffError> {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SeqDiffError::IndexOutOfBounds {
                index: vec![index],
                shape: vec![len],
            }),
        }
    }

    /// Applies `f` to every element, producing a new vector.
    pub fn map<F: Fn(T) -> T>(&self, f: F) -> Self {
        Vector::from_vec(self.data.iter().map(|&x| f(x)).collect())
    }

    /// Applies `f` to every element in place.
    pub fn map_inplace<F: Fn(T) -> T>(&mut self, f: F) {
        for x in self.as_mut_slice() {
            *x = f(*x);
        }
    }

    /// Combines two vectors of equal length element by element.
    pub fn zip_map<F: Fn(T, T) -> T>(
        &self,
        other: &Vector<T>,
        operation: &str,
        f: F,
    ) -> Result<Self, SeqDiffError> {
        self.check_same_len(other, operation)?;
        Ok(self.zip_with(other, f))
    }

    /// Element-by-element combination for callers that already know the
    /// lengths agree.
    pub(crate) fn zip_with<F: Fn(T, T) -> T>(&self, other: &Vector<T>, f: F) -> Self {
        debug_assert_eq!(self.len(), other.len());
        Vector::from_vec(
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    pub(crate) fn check_same_len(&self, other: &Vector<T>, operation: &str) -> Result<(), SeqDiffError> {
        if self.len() != other.len() {
            return Err(SeqDiffError::length_mismatch(self.len(), other.len(), operation));
        }
        Ok(())
    }

    pub fn add(&self, other: &Vector<T>) -> Result<Self, SeqDiffError> {
        self.zip_map(other, "add", |a, b| a + b)
    }

    pub fn sub(&self, other: &Vector<T>) -> Result<Self, SeqDiffError> {
        self.zip_map(other, "sub", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn mul(&self, other: &Vector<T>) -> Result<Self, SeqDiffError> {
        self.zip_map(other, "mul", |a, b| a * b)
    }

    pub fn scale(&self, scaler: T) -> Self {
        self.map(|x| x * scaler)
    }

    /// In-place `self += other`.
    pub fn add_assign(&mut self, other: &Vector<T>) -> Result<(), SeqDiffError> {
        self.check_same_len(other, "add_assign")?;
        for (a, &b) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *a += b;
        }
        Ok(())
    }

    /// In-place `self *= other`, elementwise.
    pub fn mul_assign(&mut self, other: &Vector<T>) -> Result<(), SeqDiffError> {
        self.check_same_len(other, "mul_assign")?;
        for (a, &b) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *a *= b;
        }
        Ok(())
    }

    pub fn scale_inplace(&mut self, scaler: T) {
        self.map_inplace(|x| x * scaler);
    }

    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    pub fn dot(&self, other: &Vector<T>) -> Result<T, SeqDiffError> {
        self.check_same_len(other, "dot")?;
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Largest absolute element, or zero for an empty vector.
    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
