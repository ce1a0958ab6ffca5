//! Dimension checks for row-oriented numeric inputs.
//!
//! Precondition helpers for callers that pair an input table with an output
//! table and an optional per-row weight vector.

use crate::error::DimensionError;

/// Row access by index.
pub trait Rower {
    /// Replaces the contents of `dst` with row `i`.
    fn row_into(&self, i: usize, dst: &mut Vec<f64>);
}

/// A row-addressable table with known dimensions.
pub trait RowMatrix: Rower {
    /// Returns (rows, columns).
    fn dims(&self) -> (usize, usize);
}

/// A [`RowMatrix`] whose rows can be overwritten.
pub trait MutableRowMatrix: RowMatrix {
    /// Copies `src` into row `i`, returning the number of values written.
    fn set_row(&mut self, i: usize, src: &[f64]) -> usize;
}

impl Rower for [Vec<f64>] {
    fn row_into(&self, i: usize, dst: &mut Vec<f64>) {
        dst.clear();
        dst.extend_from_slice(&self[i]);
    }
}

impl RowMatrix for [Vec<f64>] {
    fn dims(&self) -> (usize, usize) {
        (self.len(), self.first().map_or(0, Vec::len))
    }
}

impl MutableRowMatrix for [Vec<f64>] {
    fn set_row(&mut self, i: usize, src: &[f64]) -> usize {
        let row = &mut self[i];
        let n = row.len().min(src.len());
        row[..n].copy_from_slice(&src[..n]);
        n
    }
}

impl Rower for Vec<Vec<f64>> {
    fn row_into(&self, i: usize, dst: &mut Vec<f64>) {
        self.as_slice().row_into(i, dst);
    }
}

impl RowMatrix for Vec<Vec<f64>> {
    fn dims(&self) -> (usize, usize) {
        self.as_slice().dims()
    }
}

impl MutableRowMatrix for Vec<Vec<f64>> {
    fn set_row(&mut self, i: usize, src: &[f64]) -> usize {
        self.as_mut_slice().set_row(i, src)
    }
}

/// Which side of a dataset a row set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSet {
    Inputs,
    Outputs,
}

/// Checks that row counts agree and returns the per-row weights.
///
/// Without weights (or with an empty vector) every row gets weight 1.
pub fn verify_inputs(
    n_inputs: usize,
    n_outputs: usize,
    weights: Option<Vec<f64>>,
) -> Result<Vec<f64>, DimensionError> {
    let weights = weights.unwrap_or_default();
    if n_inputs != n_outputs || (!weights.is_empty() && n_inputs != weights.len()) {
        return Err(DimensionError::DataMismatch {
            input: n_inputs,
            output: n_outputs,
            weight: weights.len(),
        });
    }
    if !weights.is_empty() {
        return Ok(weights);
    }
    Ok(vec![1.0; n_inputs])
}

/// [`verify_inputs`] over two tables.
pub fn verify_matrices<I, O>(
    inputs: &I,
    outputs: &O,
    weights: Option<Vec<f64>>,
) -> Result<Vec<f64>, DimensionError>
where
    I: RowMatrix + ?Sized,
    O: RowMatrix + ?Sized,
{
    verify_inputs(inputs.dims().0, outputs.dims().0, weights)
}

/// Checks that every row has the same length and returns that length.
pub fn verify_row_lengths<R: AsRef<[f64]>>(rows: &[R], set: RowSet) -> Result<usize, DimensionError> {
    let Some(first) = rows.first() else {
        return Err(DimensionError::NoData);
    };
    let width = first.as_ref().len();
    if rows.iter().any(|r| r.as_ref().len() != width) {
        return Err(match set {
            RowSet::Inputs => DimensionError::InputLengths,
            RowSet::Outputs => DimensionError::OutputLengths,
        });
    }
    Ok(width)
}
