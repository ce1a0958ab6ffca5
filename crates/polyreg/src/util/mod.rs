//! Utility modules: range partitioning and input dimension checks.

pub mod dims;
pub mod parallel;

pub use dims::{
    verify_inputs, verify_matrices, verify_row_lengths, MutableRowMatrix, RowMatrix, RowSet, Rower,
};
pub use parallel::{default_grain_size, grain_size, parallel_for};
