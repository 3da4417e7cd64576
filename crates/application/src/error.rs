//! Application error types

use stencil_domain::DomainError;
use thiserror::Error;

use crate::template::ParseError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The template text violates the substitution grammar.
    #[error("template parse error: {0}")]
    Parse(#[from] ParseError),

    /// One or more referenced variables had no usable value in any layer.
    #[error("unresolved variables: {}", .names.join(", "))]
    Unresolved {
        /// Every missing name, in first-occurrence order.
        names: Vec<String>,
    },

    /// The renderer met a helper it has no implementation for.
    #[error("unknown helper: {0}")]
    UnknownHelper(String),

    /// The rendered document is not valid under the target format.
    #[error("rendered output is not valid JSON: {0}")]
    InvalidOutput(#[from] serde_json::Error),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
