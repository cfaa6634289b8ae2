// src/ops/activation/mod.rs

//! # Activation Functions
//!
//! Elementwise nonlinearities whose derivative is cheapest in terms of their
//! output (`tanh`, `sigmoid`) or of a mask (`clip_pos`).

pub mod clip_pos;
pub mod sigmoid;
pub mod tanh;

pub use clip_pos::clip_pos_op;
pub use sigmoid::sigmoid_op;
pub use tanh::tanh_op;
