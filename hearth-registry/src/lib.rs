//! Plugin registry for the Hearth kernel.
//!
//! Collaborators declare what they own and what they listen to in a
//! manifest; the registry validates the declaration, enforces exclusive
//! state-domain ownership at mount time, and mounts one bus
//! subscription per declared pattern. Ownership is the mechanism that
//! keeps two independent collaborators from silently writing into each
//! other's state: the check happens once at registration, not on every
//! access.
//!
//! Re-registering a mounted id is a hot reload: the old mount's
//! subscriptions and claims are torn down and the new manifest takes
//! their place. The registry never reads or writes state content, so a
//! reload leaves the plugin's domains exactly as they were.

mod error;

pub use error::{RegistryError, RegistryResult};

use hearth_bus::EventBus;
use hearth_types::{Event, PluginId, PluginManifest, SubscriptionId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

struct MountedPlugin {
    manifest: PluginManifest,
    subscriptions: Vec<SubscriptionId>,
}

struct RegistryInner {
    plugins: HashMap<PluginId, MountedPlugin>,
    domain_owners: HashMap<String, PluginId>,
}

/// Tracks mounted collaborators and their exclusive domain claims.
pub struct PluginRegistry {
    bus: Arc<EventBus>,
    inner: Mutex<RegistryInner>,
}

impl PluginRegistry {
    /// Creates a registry mounting subscriptions onto the given bus.
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            inner: Mutex::new(RegistryInner {
                plugins: HashMap::new(),
                domain_owners: HashMap::new(),
            }),
        }
    }

    /// Mounts a collaborator: validates the manifest, claims its
    /// domains, and subscribes `handler` to each declared pattern.
    ///
    /// All-or-nothing: if any requested domain belongs to a different
    /// plugin, nothing is claimed and nothing is subscribed. An id
    /// that is already mounted is hot-reloaded (old subscriptions and
    /// claims are released first); state content is untouched.
    pub fn register<F, Fut>(&self, manifest: PluginManifest, handler: F) -> RegistryResult<()>
    where
        F: Fn(Event) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        validate(&manifest)?;

        let mut inner = lock(&self.inner);

        for domain in &manifest.owned_domains {
            if let Some(owner) = inner.domain_owners.get(domain) {
                if *owner != manifest.id {
                    return Err(RegistryError::DomainIsolation {
                        domain: domain.clone(),
                        owner: owner.clone(),
                    });
                }
            }
        }

        let reloading = inner.plugins.contains_key(&manifest.id);
        if reloading {
            unmount(&mut inner, &self.bus, &manifest.id);
        }

        for domain in &manifest.owned_domains {
            inner
                .domain_owners
                .insert(domain.clone(), manifest.id.clone());
        }

        let subscriptions = manifest
            .events
            .subscribes
            .iter()
            .map(|pattern| self.bus.subscribe(pattern.as_str(), handler.clone()))
            .collect();

        info!(
            plugin = %manifest.id,
            domains = manifest.owned_domains.len(),
            subscriptions = manifest.events.subscribes.len(),
            reloaded = reloading,
            "Plugin mounted"
        );
        inner.plugins.insert(
            manifest.id.clone(),
            MountedPlugin {
                manifest,
                subscriptions,
            },
        );
        Ok(())
    }

    /// Unmounts a collaborator, releasing its claims and
    /// subscriptions. Idempotent.
    pub fn unregister(&self, id: &PluginId) {
        let mut inner = lock(&self.inner);
        if inner.plugins.contains_key(id) {
            unmount(&mut inner, &self.bus, id);
            info!(plugin = %id, "Plugin unmounted");
        } else {
            debug!(plugin = %id, "Unregister for unknown plugin ignored");
        }
    }

    /// Manifests of all mounted plugins, ordered by id.
    pub fn manifests(&self) -> Vec<PluginManifest> {
        let inner = lock(&self.inner);
        let mut manifests: Vec<PluginManifest> = inner
            .plugins
            .values()
            .map(|p| p.manifest.clone())
            .collect();
        manifests.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        manifests
    }

    /// Current owner of a domain, if claimed.
    pub fn domain_owner(&self, domain: &str) -> Option<PluginId> {
        lock(&self.inner).domain_owners.get(domain).cloned()
    }

    /// True if the plugin is currently mounted.
    pub fn is_mounted(&self, id: &PluginId) -> bool {
        lock(&self.inner).plugins.contains_key(id)
    }

    /// Number of mounted plugins.
    pub fn plugin_count(&self) -> usize {
        lock(&self.inner).plugins.len()
    }
}

fn validate(manifest: &PluginManifest) -> RegistryResult<()> {
    if manifest.id.is_empty() {
        return Err(RegistryError::InvalidManifest("empty id".to_string()));
    }
    if manifest.name.is_empty() {
        return Err(RegistryError::InvalidManifest("empty name".to_string()));
    }
    if manifest.version.is_empty() {
        return Err(RegistryError::InvalidManifest("empty version".to_string()));
    }
    if let Some(domain) = manifest.owned_domains.iter().find(|d| d.is_empty()) {
        return Err(RegistryError::InvalidManifest(format!(
            "empty owned domain name (plugin '{}', domain {domain:?})",
            manifest.id
        )));
    }
    Ok(())
}

fn unmount(inner: &mut RegistryInner, bus: &EventBus, id: &PluginId) {
    if let Some(mounted) = inner.plugins.remove(id) {
        for sub in mounted.subscriptions {
            bus.unsubscribe(sub);
        }
        inner.domain_owners.retain(|_, owner| owner != id);
    }
}

fn lock(mutex: &Mutex<RegistryInner>) -> MutexGuard<'_, RegistryInner> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
