// src/ops/arithmetic/mod.rs

pub mod add;
pub mod mul;
pub mod scale;
pub mod scale_repeated;
pub mod scale_rows;
pub mod sub;

pub use add::add_op;
pub use mul::mul_op;
pub use scale::scale_op;
pub use scale_repeated::scale_repeated_op;
pub use scale_rows::scale_rows_op;
pub use sub::sub_op;
