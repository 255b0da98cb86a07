//! Error types for bernoulli_jsd

use thiserror::Error;

/// Result type alias using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when running the JSD operators
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two buffers handed to the same operator disagree in length
    #[error("Shape mismatch in '{op}': '{arg}' has {got} elements, expected {expected}")]
    ShapeMismatch {
        /// The operator name
        op: &'static str,
        /// The offending argument
        arg: &'static str,
        /// Length of the reference input
        expected: usize,
        /// Length of the offending argument
        got: usize,
    },

    /// A tensor shape does not describe its data
    #[error("Shape {shape:?} is incompatible with {len} data elements")]
    InvalidShape {
        /// The requested shape
        shape: Vec<usize>,
        /// Number of data elements supplied
        len: usize,
    },

    /// No operator is registered under the name
    #[error("Unknown operator '{name}'")]
    UnknownOperator {
        /// The requested name
        name: String,
    },

    /// An operator with the same name is already registered
    #[error("Operator '{name}' is already registered")]
    DuplicateOperator {
        /// The conflicting name
        name: &'static str,
    },

    /// Wrong number of buffers passed to an operator
    #[error("Operator '{op}' takes {expected} {kind}, got {got}")]
    ArityMismatch {
        /// The operator name
        op: &'static str,
        /// `"inputs"` or `"outputs"`
        kind: &'static str,
        /// Arity declared by the schema
        expected: usize,
        /// Number of buffers supplied
        got: usize,
    },

    /// A backend name that does not map onto a [`Backend`](crate::backend::Backend)
    #[error("Unknown backend '{name}'")]
    UnknownBackend {
        /// The lowercased name that was requested
        name: String,
    },

    /// The operator has no registered gradient
    #[error("Operator '{op}' has no gradient definition")]
    NoGradient {
        /// The operator name
        op: &'static str,
    },
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(op: &'static str, arg: &'static str, expected: usize, got: usize) -> Self {
        Self::ShapeMismatch {
            op,
            arg,
            expected,
            got,
        }
    }

    /// Create an arity error
    pub fn arity(op: &'static str, kind: &'static str, expected: usize, got: usize) -> Self {
        Self::ArityMismatch {
            op,
            kind,
            expected,
            got,
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(name: impl Into<String>) -> Self {
        Self::UnknownOperator { name: name.into() }
    }
}

/// Fails with [`Error::ShapeMismatch`] unless `got == expected`.
pub(crate) fn ensure_len(
    op: &'static str,
    arg: &'static str,
    expected: usize,
    got: usize,
) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(Error::shape_mismatch(op, arg, expected, got))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_operator_and_argument() {
        let err = Error::shape_mismatch("BernoulliJSD", "target", 3, 2);
        assert_eq!(
            err.to_string(),
            "Shape mismatch in 'BernoulliJSD': 'target' has 2 elements, expected 3"
        );
    }

    #[test]
    fn ensure_len_accepts_equal_lengths() {
        assert!(ensure_len("op", "x", 4, 4).is_ok());
        assert_eq!(
            ensure_len("op", "x", 4, 5),
            Err(Error::shape_mismatch("op", "x", 4, 5))
        );
    }
}
