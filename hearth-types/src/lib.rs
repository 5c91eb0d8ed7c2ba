//! Core type definitions for the Hearth coordination kernel.
//!
//! This crate defines the fundamental, collaborator-agnostic types used
//! throughout the kernel:
//! - Bus events and subscription identifiers
//! - Plugin manifests (domain ownership, event declarations, routes)
//! - Role identifiers and role→model assignment entries
//!
//! All domain-specific documents (avatar state, needs, world weather,
//! etc.) are opaque `serde_json::Value` payloads owned by their
//! collaborators, not modeled here.

mod event;
mod ids;
mod manifest;
mod role;

pub use event::Event;
pub use ids::{PluginId, SubscriptionId};
pub use manifest::{EventDeclarations, PluginManifest};
pub use role::{RoleAssignmentEntry, RoleId};
