// src/vector/elementwise.rs

use crate::numeric::Numeric;
use crate::vector::Vector;

/// Elementwise unary transforms of the substrate.
impl<T: Numeric> Vector<T> {
    pub fn tanh(&self) -> Self {
        self.map(|x| x.tanh())
    }

    pub fn sin(&self) -> Self {
        self.map(|x| x.sin())
    }

    pub fn cos(&self) -> Self {
        self.map(|x| x.cos())
    }

    pub fn exp(&self) -> Self {
        self.map(|x| x.exp())
    }

    /// Natural logarithm. Non-positive inputs produce `NaN` or `-inf`.
    pub fn ln(&self) -> Self {
        self.map(|x| x.ln())
    }

    /// Logistic sigmoid, `1 / (1 + e^-x)`.
    pub fn sigmoid(&self) -> Self {
        self.map(sigmoid)
    }

    pub fn powf(&self, exponent: T) -> Self {
        self.map(|x| x.powf(exponent))
    }

    /// One where the element exceeds `threshold`, zero elsewhere.
    pub fn greater_than(&self, threshold: T) -> Self {
        self.map(|x| if x > threshold { T::one() } else { T::zero() })
    }

    /// `1 - x` for every element.
    pub fn complement(&self) -> Self {
        self.map(|x| T::one() - x)
    }
}

pub(crate) fn sigmoid<T: Numeric>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

#[cfg(test)]
#[path = "elementwise_test.rs"]
mod tests;
