//! Error types for the state store.

use thiserror::Error;

/// Result type for state store operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur in state store operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// A patch document's shape conflicts with the stored value's shape.
    #[error("type mismatch in domain '{domain}': patch against a keyed document must be a JSON object")]
    TypeMismatch {
        /// Domain the patch targeted.
        domain: String,
    },

    /// Domain name would escape the data directory or is empty.
    #[error("invalid domain name: '{0}'")]
    InvalidDomainName(String),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
