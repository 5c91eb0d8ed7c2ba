//! Error types for kernel construction and configuration.

use thiserror::Error;

/// Result type for kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;

/// Errors raised while booting a kernel. Configuration problems fail
/// loudly here rather than degrading silently later.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON of the expected shape.
    #[error("malformed kernel config: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    /// State store failed to open its data directory.
    #[error(transparent)]
    State(#[from] hearth_state::StateError),

    /// Router construction or assignment loading failed.
    #[error(transparent)]
    Router(#[from] hearth_router::RouterError),
}
