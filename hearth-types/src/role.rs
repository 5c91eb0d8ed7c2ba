//! Role identifiers and role→model assignment entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a content-classification role.
///
/// The role set is fixed at router construction; ids are lowercase by
/// convention ("persona", "limbic", "analyst", "developer").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    /// Creates a role ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One entry of the role→model assignment configuration.
///
/// The configuration file is an ordered list of these; order is
/// preserved because it doubles as the tie-break order for roles that
/// the profile table does not already cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignmentEntry {
    /// Role being assigned.
    pub role: RoleId,

    /// Identifier of the processing model handling this role.
    pub model: String,
}
