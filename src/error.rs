//! Error types for few-shot evaluation.
//!
//! Every fallible operation in the crate returns [`Result`]. Nothing is
//! retried: all operations are deterministic given their inputs.

use crate::sampling::Label;
use thiserror::Error;

/// Main error type for lign operations.
///
/// # Examples
///
/// ```
/// use lign::error::LignError;
///
/// let err = LignError::ShapeMismatch {
///     context: "query embeddings".to_string(),
///     expected: "16 columns".to_string(),
///     actual: "8 columns".to_string(),
/// };
/// assert!(err.to_string().contains("shape mismatch"));
/// ```
#[derive(Error, Debug)]
pub enum LignError {
    /// An argument violated its documented constraint.
    #[error("invalid argument: {param} = {value}, expected {constraint}")]
    InvalidArgument {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// The requested node attribute does not exist on the graph view.
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    /// The requested metric is not registered.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// Dimensionality or length mismatch between two populations.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Where the mismatch was detected
        context: String,
        /// Expected shape description
        expected: String,
        /// Actual shape found
        actual: String,
    },

    /// Classes under evaluation that received no support examples.
    #[error("classes without support examples: {0:?}")]
    MissingClasses(Vec<Label>),

    /// The diagnostic renderer failed to produce its artifact.
    #[error("rendering failed: {0}")]
    Rendering(String),

    /// I/O error (config file, render output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),
}

impl LignError {
    /// Builds an [`LignError::InvalidArgument`].
    pub fn invalid(
        param: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            param: param.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Builds an [`LignError::ShapeMismatch`].
    pub fn shape(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// True for bad caller input: invalid arguments and unknown attributes.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::UnknownAttribute(_)
        )
    }
}

impl From<serde_json::Error> for LignError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, LignError>;
