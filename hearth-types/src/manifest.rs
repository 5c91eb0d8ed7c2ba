//! Plugin manifest types.
//!
//! A manifest is a collaborator's declaration of what it owns and what
//! it talks to: exclusive state domains, event subscriptions and
//! publications, and the API routes it wants mounted. The registry
//! validates these declarations at mount time; the route map itself is
//! opaque to the kernel (transport is a collaborator concern).

use crate::PluginId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared event traffic for a plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDeclarations {
    /// Topic patterns this plugin subscribes to (exact, `*`, or `prefix*`).
    #[serde(default)]
    pub subscribes: Vec<String>,

    /// Topics this plugin intends to publish. Informational; the bus
    /// does not enforce publish declarations.
    #[serde(default)]
    pub publishes: Vec<String>,
}

/// A collaborator's mount-time declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Unique plugin identifier.
    pub id: PluginId,

    /// Human-readable name.
    pub name: String,

    /// Plugin version string.
    pub version: String,

    /// State domains this plugin claims exclusive write ownership of.
    #[serde(default)]
    pub owned_domains: Vec<String>,

    /// Declared event subscriptions and publications.
    #[serde(default)]
    pub events: EventDeclarations,

    /// Opaque route declarations, mounted verbatim for collaborators.
    #[serde(default)]
    pub api_routes: Map<String, Value>,
}

impl PluginManifest {
    /// Creates a minimal manifest with the required fields.
    pub fn new(
        id: impl Into<PluginId>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            owned_domains: Vec::new(),
            events: EventDeclarations::default(),
            api_routes: Map::new(),
        }
    }

    /// Adds an owned domain claim.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.owned_domains.push(domain.into());
        self
    }

    /// Adds a subscription pattern.
    #[must_use]
    pub fn with_subscription(mut self, pattern: impl Into<String>) -> Self {
        self.events.subscribes.push(pattern.into());
        self
    }

    /// Adds a declared publication topic.
    #[must_use]
    pub fn with_publication(mut self, topic: impl Into<String>) -> Self {
        self.events.publishes.push(topic.into());
        self
    }
}
