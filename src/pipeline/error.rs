//! Error types for the cleaning pipeline and the decomposition step.
//!
//! Every stage fails fast: a mis-encoded demographic feature would poison all
//! downstream analysis, so nothing here is retried or suppressed.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while cleaning the dataset or fitting the decomposition.
#[derive(Debug, Error)]
pub enum CleaningError {
    /// A required attribute is absent from the dataset at the point a stage needs it.
    #[error("attribute '{attribute}' not found ({context})")]
    SchemaMismatch {
        /// Name of the missing attribute
        attribute: String,
        /// Stage or lookup that required it
        context: String,
    },

    /// A sentinel token or composite code could not be read as an integer.
    #[error("cannot coerce value '{value}' of attribute '{attribute}' to an integer")]
    TypeCoercion {
        /// Attribute the value belongs to
        attribute: String,
        /// Offending raw value
        value: String,
    },

    /// The feature metadata table is malformed.
    #[error("invalid feature metadata: {0}")]
    Metadata(String),

    /// Constraint violated by the principal component decomposition.
    #[error("decomposition failed: {0}")]
    Decomposition(String),

    /// Error surfaced by polars.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl CleaningError {
    pub(crate) fn schema(attribute: &str, context: &str) -> Self {
        Self::SchemaMismatch {
            attribute: attribute.to_string(),
            context: context.to_string(),
        }
    }

    pub(crate) fn coercion(attribute: &str, value: impl ToString) -> Self {
        Self::TypeCoercion {
            attribute: attribute.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result alias used across the pipeline.
pub type Result<T> = std::result::Result<T, CleaningError>;
