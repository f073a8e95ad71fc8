//! Error type shared by every module of the crate.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while marshalling matrices, validating distribution
/// parameters or building and simulating a DAG model.
///
/// The sigmoid transform itself has no failure mode; every variant here is
/// detected before any element is computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input rows are not rectangular.
    #[error("invalid shape: row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Flat buffer length does not match the requested dimensions.
    #[error("invalid shape: cannot arrange {len} elements as {rows}x{cols}")]
    InvalidShape { rows: usize, cols: usize, len: usize },

    /// Parameters violate distribution constraints.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// A coefficient key of the form `child~parent` names no edge.
    #[error("coefficient '{0}' does not match any edge")]
    UnknownCoefficient(String),

    /// Adding the edge would make the graph cyclic.
    #[error("edge {from} -> {to} would create a cycle")]
    Cycle { from: String, to: String },
}

impl Error {
    /// Returns true for both shape variants.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Error::RaggedRows { .. } | Error::InvalidShape { .. })
    }

    pub(crate) fn invalid_parameters(message: impl Into<String>) -> Self {
        Error::InvalidParameters(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_messages() {
        let ragged = Error::RaggedRows {
            row: 2,
            expected: 3,
            found: 1,
        };
        assert_eq!(
            ragged.to_string(),
            "invalid shape: row 2 has 1 columns, expected 3"
        );
        assert!(ragged.is_shape_error());

        let flat = Error::InvalidShape {
            rows: 2,
            cols: 3,
            len: 5,
        };
        assert_eq!(
            flat.to_string(),
            "invalid shape: cannot arrange 5 elements as 2x3"
        );
        assert!(flat.is_shape_error());
    }

    #[test]
    fn test_model_errors_are_not_shape_errors() {
        let errors = [
            Error::invalid_parameters("scale must be > 0"),
            Error::UnknownVariable("y".into()),
            Error::UnknownCoefficient("y~q".into()),
            Error::Cycle {
                from: "y".into(),
                to: "x".into(),
            },
        ];
        for e in &errors {
            assert!(!e.is_shape_error(), "{e}");
        }
        assert_eq!(errors[3].to_string(), "edge y -> x would create a cycle");
    }
}
