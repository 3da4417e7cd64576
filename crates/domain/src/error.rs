//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value layer was built from JSON that is not an object.
    #[error("layer {0:?} is not a JSON object")]
    LayerNotAnObject(String),

    /// A value layer entry holds an array or object instead of a scalar.
    #[error("layer {layer:?} has a non-scalar value for key {key:?}")]
    NonScalarValue {
        /// The layer being constructed.
        layer: String,
        /// The offending key.
        key: String,
    },

    /// The raw JSON for a value layer could not be parsed.
    #[error("layer {layer:?} is not valid JSON: {message}")]
    MalformedLayer {
        /// The layer being constructed.
        layer: String,
        /// The underlying parse failure.
        message: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
