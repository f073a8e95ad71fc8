//! Element-wise logistic transform over dense `f64` matrices.
//!
//! The matrix type is [`ndarray::Array2<f64>`]. Callers that hold their data
//! as nested rows or as a flat row-major buffer go through [`from_rows`] or
//! [`from_shape_vec`] first; both reject input that does not describe a
//! rectangular matrix before any element is transformed.
//!
//! # Shape rules
//!
//! - The output always has the input's dimensions.
//! - Zero-sized matrices (`0×n`, `m×0`) are valid and map to themselves.
//! - Ragged rows are an error ([`Error::RaggedRows`]).

use ndarray::{Array2, ArrayBase, Data, DataMut, Ix2};

use crate::error::{Error, Result};
use crate::special;

/// Element count from which [`expit_with_config`] switches to the parallel path.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

/// Tuning for [`expit_with_config`].
///
/// # Examples
/// ```
/// use kvaser::matrix::ExpitConfig;
/// let config = ExpitConfig::default().with_parallel_threshold(1024);
/// assert_eq!(config.parallel_threshold, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpitConfig {
    /// Matrices with at least this many elements are transformed on the
    /// rayon thread pool. `usize::MAX` disables the parallel path.
    pub parallel_threshold: usize,
}

impl ExpitConfig {
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Configuration that never uses the thread pool.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    fn is_parallel(&self, len: usize) -> bool {
        len > 0 && len >= self.parallel_threshold
    }
}

impl Default for ExpitConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Applies the logistic sigmoid to every element, returning a new matrix.
///
/// Accepts owned arrays and views alike. Each element is evaluated with
/// [`special::expit`], so no intermediate `exp` ever overflows.
///
/// # Complexity
/// Time: O(rows·cols), Space: O(rows·cols)
///
/// # Examples
/// ```
/// use kvaser::matrix::expit;
/// use ndarray::array;
/// let y = expit(&array![[-1000.0, 0.0, 1000.0]]);
/// assert_eq!(y, array![[0.0, 0.5, 1.0]]);
/// ```
pub fn expit<S>(x: &ArrayBase<S, Ix2>) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    x.mapv(special::expit)
}

/// Applies the logistic sigmoid to every element in place.
///
/// # Examples
/// ```
/// use kvaser::matrix::expit_inplace;
/// use ndarray::array;
/// let mut x = array![[0.0], [f64::NEG_INFINITY]];
/// expit_inplace(&mut x);
/// assert_eq!(x, array![[0.5], [0.0]]);
/// ```
pub fn expit_inplace<S>(x: &mut ArrayBase<S, Ix2>)
where
    S: DataMut<Elem = f64>,
{
    x.mapv_inplace(special::expit);
}

/// In-place variant that spreads elements over the rayon thread pool.
///
/// Every output element depends only on its own input element, so the
/// result is bit-identical to [`expit_inplace`].
pub fn expit_par_inplace<S>(x: &mut ArrayBase<S, Ix2>)
where
    S: DataMut<Elem = f64>,
{
    x.par_mapv_inplace(special::expit);
}

/// Applies the sigmoid, choosing the sequential or parallel path by size.
///
/// # Examples
/// ```
/// use kvaser::matrix::{expit_with_config, ExpitConfig};
/// use ndarray::Array2;
/// let x = Array2::<f64>::zeros((64, 64));
/// let y = expit_with_config(&x, &ExpitConfig::default().with_parallel_threshold(1));
/// assert!(y.iter().all(|&v| v == 0.5));
/// ```
pub fn expit_with_config<S>(x: &ArrayBase<S, Ix2>, config: &ExpitConfig) -> Array2<f64>
where
    S: Data<Elem = f64>,
{
    let mut y = x.to_owned();
    if config.is_parallel(y.len()) {
        expit_par_inplace(&mut y);
    } else {
        expit_inplace(&mut y);
    }
    y
}

/// Builds a matrix from row slices, validating that every row has the
/// length of the first one.
///
/// # Errors
/// Returns [`Error::RaggedRows`] naming the first offending row.
///
/// # Examples
/// ```
/// use kvaser::matrix::from_rows;
/// let m = from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(m.dim(), (2, 2));
/// assert_eq!(m[[1, 0]], 3.0);
///
/// assert!(from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
/// ```
pub fn from_rows<R>(rows: &[R]) -> Result<Array2<f64>>
where
    R: AsRef<[f64]>,
{
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, |r| r.as_ref().len());

    let mut data = Vec::with_capacity(nrows * ncols);
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != ncols {
            return Err(Error::RaggedRows {
                row: i,
                expected: ncols,
                found: row.len(),
            });
        }
        data.extend_from_slice(row);
    }

    from_shape_vec(nrows, ncols, data)
}

/// Builds a `rows × cols` matrix from a row-major buffer.
///
/// # Errors
/// Returns [`Error::InvalidShape`] if `data.len() != rows * cols`.
pub fn from_shape_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Array2<f64>> {
    let len = data.len();
    let shape_error = || Error::InvalidShape { rows, cols, len };
    if rows.checked_mul(cols) != Some(len) {
        return Err(shape_error());
    }
    Array2::from_shape_vec((rows, cols), data).map_err(|_| shape_error())
}

/// Copies a matrix back out as row vectors, preserving order and values.
pub fn to_rows<S>(x: &ArrayBase<S, Ix2>) -> Vec<Vec<f64>>
where
    S: Data<Elem = f64>,
{
    x.outer_iter().map(|row| row.to_vec()).collect()
}

/// Marshals `rows` into a matrix and applies the sigmoid.
///
/// Shape errors are reported before any element is computed.
///
/// # Examples
/// ```
/// use kvaser::matrix::expit_rows;
/// let y = expit_rows(&[[0.0]]).unwrap();
/// assert_eq!(y[[0, 0]], 0.5);
/// ```
pub fn expit_rows<R>(rows: &[R]) -> Result<Array2<f64>>
where
    R: AsRef<[f64]>,
{
    let mut x = from_rows(rows)?;
    expit_inplace(&mut x);
    Ok(x)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn matrix(max_dim: usize) -> impl Strategy<Value = Array2<f64>> {
        (0..=max_dim, 0..=max_dim).prop_flat_map(|(m, n)| {
            proptest::collection::vec(-800.0_f64..800.0, m * n)
                .prop_map(move |data| Array2::from_shape_vec((m, n), data).unwrap())
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn shape_is_preserved(x in matrix(12)) {
            prop_assert_eq!(expit(&x).dim(), x.dim());
        }

        #[test]
        fn output_in_unit_interval(x in matrix(12)) {
            let y = expit(&x);
            prop_assert!(y.iter().all(|v| (0.0..=1.0).contains(v)));
        }

        #[test]
        fn matches_scalar_elementwise(x in matrix(8)) {
            let y = expit(&x);
            for (a, b) in x.iter().zip(y.iter()) {
                prop_assert_eq!(special::expit(*a), *b);
            }
        }

        #[test]
        fn parallel_is_bit_identical(x in matrix(16)) {
            let seq = expit_with_config(&x, &ExpitConfig::sequential());
            let par = expit_with_config(&x, &ExpitConfig::default().with_parallel_threshold(1));
            prop_assert_eq!(seq, par);
        }

        #[test]
        fn rows_roundtrip_is_exact(x in matrix(8)) {
            let rows = to_rows(&x);
            let back = from_rows(&rows).unwrap();
            // A 0×n matrix has no rows to recover the column count from.
            if x.nrows() > 0 {
                prop_assert_eq!(back, x);
            } else {
                prop_assert_eq!(back.len(), 0);
            }
        }
    }
}
