//! The Hearth kernel context object.
//!
//! A [`Kernel`] owns the state store, event bus, plugin registry, and
//! MAC router, and wires them together: every
//! state mutation is announced on the bus as a `STATE_CHANGED` event,
//! and the tick generator (when started) drives the calendar topics.
//! Construction takes an explicit [`KernelConfig`]; nothing is a
//! process-wide singleton, so tests routinely run several kernels side
//! by side.

mod config;
mod error;
mod pipeline;

pub use config::KernelConfig;
pub use error::{KernelError, KernelResult};
pub use pipeline::{classify_response, decorate_request, DecoratedRequest};

use hearth_bus::{EventBus, TickGenerator, TickHandle};
use hearth_registry::PluginRegistry;
use hearth_router::{MacRouter, RoutingDecision};
use hearth_state::StateStore;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Topic published after every state mutation.
pub const STATE_CHANGED: &str = "STATE_CHANGED";
/// Source id on state change events.
pub const STATE_SOURCE: &str = "kernel.state";

/// The assembled kernel.
pub struct Kernel {
    state: Arc<StateStore>,
    bus: Arc<EventBus>,
    registry: PluginRegistry,
    router: Arc<MacRouter>,
    ticks: Mutex<Option<TickHandle>>,
}

impl Kernel {
    /// Boots a kernel from configuration: opens the state store
    /// (preloading snapshots), builds the router from the assignment
    /// layers, and wires state changes onto the bus.
    ///
    /// The tick generator is not started here — call
    /// [`Kernel::start_ticks`] from inside a tokio runtime.
    pub fn new(config: KernelConfig) -> KernelResult<Self> {
        let state = Arc::new(StateStore::open(&config.data_dir)?);
        let bus = Arc::new(EventBus::new());

        let change_bus = Arc::clone(&bus);
        state.set_change_listener(move |domain, version| {
            change_bus.publish(
                STATE_CHANGED,
                STATE_SOURCE,
                json!({ "domain": domain, "version": version }),
            );
        });

        let router = Arc::new(MacRouter::with_default_profiles(
            config.resolve_assignments()?,
        )?);
        let registry = PluginRegistry::new(Arc::clone(&bus));

        info!(data_dir = %config.data_dir.display(), "Kernel assembled");
        Ok(Self {
            state,
            bus,
            registry,
            router,
            ticks: Mutex::new(None),
        })
    }

    /// Starts the tick generator if it is not already running. Must be
    /// called inside a tokio runtime.
    pub fn start_ticks(&self) {
        let mut ticks = self.ticks.lock().unwrap_or_else(|e| e.into_inner());
        if ticks.is_none() {
            *ticks = Some(TickGenerator::new(Arc::clone(&self.bus)).spawn());
        }
    }

    /// Stops the tick generator. Idempotent.
    pub fn stop_ticks(&self) {
        if let Some(handle) = self.ticks.lock().unwrap_or_else(|e| e.into_inner()).take() {
            handle.stop();
        }
    }

    /// The shared state store.
    pub fn state(&self) -> &Arc<StateStore> {
        &self.state
    }

    /// The shared event bus.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// The plugin registry.
    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// The MAC router.
    pub fn router(&self) -> &Arc<MacRouter> {
        &self.router
    }

    /// Runs the request-decoration pipeline stage over a snapshot of
    /// the named domains, in the order given.
    pub fn decorate_request(
        &self,
        domains: &[&str],
        content: &str,
    ) -> KernelResult<DecoratedRequest> {
        let mut snapshot: Vec<(String, Value)> = Vec::with_capacity(domains.len());
        for domain in domains {
            let (value, _) = self.state.read(domain)?;
            snapshot.push(((*domain).to_string(), value));
        }
        Ok(pipeline::decorate_request(&snapshot, &self.router, content))
    }

    /// Runs the response-classification pipeline stage.
    pub fn classify_response(&self, content: &str) -> RoutingDecision {
        pipeline::classify_response(&self.router, content)
    }
}

impl Drop for Kernel {
    fn drop(&mut self) {
        self.stop_ticks();
    }
}
