//! Kernel startup configuration.

use crate::KernelResult;
use hearth_types::RoleAssignmentEntry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_true() -> bool {
    true
}

/// Everything a kernel needs to boot, loaded once and passed by value.
/// There are no module-level singletons; two kernels with two configs
/// can coexist in one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Directory holding per-domain state snapshots.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Whether the tick generator should run.
    #[serde(default = "default_true")]
    pub tick_enabled: bool,

    /// Inline role→model assignments, applied first in the startup
    /// layer.
    #[serde(default)]
    pub role_assignments: Vec<RoleAssignmentEntry>,

    /// Optional external assignment file (ordered `{role, model}`
    /// list); its entries append after the inline ones and override
    /// them for roles both declare.
    #[serde(default)]
    pub role_assignments_file: Option<PathBuf>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tick_enabled: true,
            role_assignments: Vec::new(),
            role_assignments_file: None,
        }
    }
}

impl KernelConfig {
    /// Loads the configuration file. A malformed file fails the boot.
    pub fn load(path: &Path) -> KernelResult<Self> {
        let bytes = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        info!(path = %path.display(), "Kernel config loaded");
        Ok(config)
    }

    /// Collects the startup assignment layer: inline entries first,
    /// then the external file's entries. Later entries for the same
    /// role win (last write into the assignment map).
    pub fn resolve_assignments(&self) -> KernelResult<Vec<RoleAssignmentEntry>> {
        let mut entries = self.role_assignments.clone();
        if let Some(path) = &self.role_assignments_file {
            entries.extend(hearth_router::load_assignments(path)?);
        }
        Ok(entries)
    }
}
