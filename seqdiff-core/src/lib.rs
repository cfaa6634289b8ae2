// Core modules of the crate
pub mod autograd;
pub mod error;
pub mod fwd;
pub mod numeric;
pub mod ops;
pub mod seq;
pub mod utils;
pub mod vector;

// Re-export the main types so they are reachable as `seqdiff_core::Vector`, etc.
pub use autograd::{backward, gradients, pool, Grad, Node, Res, Var};
pub use error::SeqDiffError;
pub use fwd::{DualScalar, DualVector};
pub use numeric::Numeric;
pub use seq::{Batch, Seq, SeqRef};
pub use vector::Vector;
// Re-export traits required by public functions/structs
pub use num_traits;
