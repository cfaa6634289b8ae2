// src/ops/linalg/mod.rs

pub mod matmul;
pub mod matrix;
pub mod transpose;

pub use matmul::{batched_matmul_op, matmul_op};
pub use matrix::{Matrix, MatrixBatch};
pub use transpose::transpose_op;
