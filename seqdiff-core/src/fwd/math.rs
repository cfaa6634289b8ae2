// src/fwd/math.rs

use crate::error::SeqDiffError;
use crate::fwd::dual::{DualScalar, DualVector};
use crate::numeric::Numeric;

/// Elementwise transforms. Each computes the local derivative, scales every
/// tracked direction by it and returns the transformed value.
impl<T: Numeric> DualVector<T> {
    /// Derivative from the output: \( 1 - \tanh(x)^2 \).
    pub fn tanh(&self) -> Self {
        let out = self.values().tanh();
        let deriv = out.powf(T::of(2.0)).complement();
        self.chain(out, &deriv)
    }

    pub fn sin(&self) -> Self {
        self.chain(self.values().sin(), &self.values().cos())
    }

    pub fn cos(&self) -> Self {
        self.chain(self.values().cos(), &self.values().sin().scale(-T::one()))
    }

    /// The derivative is the output itself.
    pub fn exp(&self) -> Self {
        let out = self.values().exp();
        self.chain(out.clone(), &out)
    }

    pub fn ln(&self) -> Self {
        self.chain(self.values().ln(), &self.values().powf(-T::one()))
    }

    /// Derivative from the output: \( \sigma(x)(1 - \sigma(x)) \).
    pub fn sigmoid(&self) -> Self {
        let out = self.values().sigmoid();
        let deriv = out.zip_with(&out.complement(), |s, c| s * c);
        self.chain(out, &deriv)
    }

    /// Clips to non-negative values; the derivative is the `x > 0` mask.
    pub fn clip_pos(&self) -> Self {
        let mask = self.values().greater_than(T::zero());
        let out = self.values().zip_with(&mask, |x, m| x * m);
        self.chain(out, &mask)
    }

    /// Raises every component to `exponent`.
    ///
    /// # Errors
    /// `UnsupportedOperation` if the exponent varies along any tracked
    /// direction.
    pub fn pow(&self, exponent: &DualScalar<T>) -> Result<Self, SeqDiffError> {
        if !exponent.is_constant() {
            return Err(SeqDiffError::UnsupportedOperation(
                "forward-mode pow with a non-constant exponent".to_string(),
            ));
        }
        Ok(self.pow_const(exponent.value))
    }

    pub fn pow_const(&self, p: T) -> Self {
        let deriv = self.values().powf(p - T::one()).scale(p);
        self.chain(self.values().powf(p), &deriv)
    }
}

#[cfg(test)]
#[path = "math_test.rs"]
mod tests;
