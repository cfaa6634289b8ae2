// src/ops/reduction/mod.rs

pub mod sum;

pub use sum::{sum_cols_op, sum_op, sum_rows_op};
