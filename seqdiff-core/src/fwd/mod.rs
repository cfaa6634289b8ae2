//! # Forward-mode propagation (`fwd`)
//!
//! A [`DualVector`] carries a primal value together with one derivative
//! vector per tracked direction. Every transform returns a new dual whose
//! derivatives have been pushed through the chain rule; nothing is recorded
//! and there is no backward pass.

pub mod dual;
pub mod linear;
pub mod math;

pub use dual::{DualScalar, DualVector};
