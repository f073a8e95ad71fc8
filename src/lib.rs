//! # kvaser
//!
//! Numerically stable logistic transform (`expit`) over dense matrices, and
//! the outcome simulator built on top of it.
//!
//! ## Modules
//!
//! - [`special`] — scalar logistic sigmoid with bounded intermediates
//! - [`matrix`] — element-wise `expit` over `ndarray` matrices, plus
//!   shape-checked conversion from row slices and flat buffers
//! - [`distributions`] — outcome distributions with inverse links
//! - [`random`] — seeded RNG and weighted sampling
//! - [`dag`] — DAG of variables simulated from their parents
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: `exp` is only evaluated where it cannot
//!   overflow
//! - **Fail before compute**: shape errors surface before any element is
//!   transformed; the transform itself is total
//! - **Property-based testing**: mathematical invariants verified via proptest
//!
//! ## Example
//!
//! ```
//! use ndarray::array;
//!
//! let y = kvaser::expit(&array![[-1.0, 0.0], [1.0, 2.0]]);
//! assert_eq!(y[[0, 1]], 0.5);
//! assert!((y[[1, 1]] - 0.8807970779778823).abs() < 1e-12);
//! ```

pub mod dag;
pub mod distributions;
pub mod error;
pub mod matrix;
pub mod random;
pub mod special;

pub use error::{Error, Result};
pub use matrix::{expit, expit_inplace};
