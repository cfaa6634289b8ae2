//! # Reverse-mode engine (`autograd`)
//!
//! - [`Res`] / [`Node`]: graph nodes and shared handles to them.
//! - [`Var`]: leaf variables with identity ([`VarId`]).
//! - [`Grad`]: the accumulator threaded through a propagation.
//! - [`pool`]: shares one computed value across many consumers.
//! - [`backward`] / [`gradients`]: entry points for a backward pass.
//! - [`grad_check`]: finite-difference verification of propagated gradients.

pub mod grad;
pub mod grad_check;
pub mod pool;
pub mod res;
pub mod var;

pub use grad::Grad;
pub use pool::pool;
pub use res::{backward, gradients, Constant, Node, Res};
pub use var::{Var, VarId, VarSet};
