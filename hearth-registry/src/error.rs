//! Error types for the plugin registry.

use hearth_types::PluginId;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur when mounting collaborators.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Manifest is missing or has empty required fields.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Another plugin already owns a requested domain.
    /// Registration is rejected wholesale; no domain is claimed.
    #[error("domain '{domain}' is already owned by plugin '{owner}'")]
    DomainIsolation {
        /// Domain whose ownership was requested.
        domain: String,
        /// Plugin currently holding the claim.
        owner: PluginId,
    },
}
