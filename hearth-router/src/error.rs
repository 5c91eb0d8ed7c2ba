//! Error types for the MAC router.

use hearth_types::RoleId;
use thiserror::Error;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors that can occur building a router or loading its
/// configuration. All of these are boot-time failures; evaluation
/// itself never fails.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A router needs at least the default/general role.
    #[error("no role profiles defined")]
    NoProfiles,

    /// Two profiles declared the same role id.
    #[error("duplicate role profile: {0}")]
    DuplicateRole(RoleId),

    /// Assignment configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Assignment configuration file is not valid JSON of the
    /// expected shape. Fails the boot.
    #[error("malformed role assignment config: {0}")]
    MalformedConfig(#[from] serde_json::Error),
}
