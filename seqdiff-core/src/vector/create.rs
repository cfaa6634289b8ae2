// src/vector/create.rs

use crate::numeric::Numeric;
use crate::vector::Vector;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Creates a vector of `len` zeros.
pub fn zeros<T: Numeric>(len: usize) -> Vector<T> {
    Vector::from_vec(vec![T::zero(); len])
}

/// Creates a vector of `len` ones.
pub fn ones<T: Numeric>(len: usize) -> Vector<T> {
    Vector::from_vec(vec![T::one(); len])
}

/// Creates a vector of `len` copies of `value`.
pub fn full<T: Numeric>(len: usize, value: T) -> Vector<T> {
    Vector::from_vec(vec![value; len])
}

// Random creation uses the thread-local RNG; seeded generation can be added
// once something needs reproducible draws.

/// Creates a vector with elements drawn uniformly from `[0, 1)`.
pub fn rand<T: Numeric>(len: usize) -> Vector<T> {
    let mut rng = rand::thread_rng();
    Vector::from_vec((0..len).map(|_| T::of(rng.gen::<f64>())).collect())
}

/// Creates a vector with elements drawn from the standard normal distribution.
pub fn randn<T: Numeric>(len: usize) -> Vector<T> {
    let mut rng = rand::thread_rng();
    Vector::from_vec(
        (0..len)
            .map(|_| T::of(StandardNormal.sample(&mut rng)))
            .collect(),
    )
}

impl<T: Numeric> Vector<T> {
    pub fn zeros(len: usize) -> Self {
        zeros(len)
    }

    pub fn ones(len: usize) -> Self {
        ones(len)
    }

    /// A zero vector with the same length as `self`.
    pub fn zeros_like(&self) -> Self {
        zeros(self.len())
    }
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
