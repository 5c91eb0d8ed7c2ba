//! MAC router: confidence-weighted content classification.
//!
//! Given a piece of text, the router sums keyword weights per role,
//! ranks the roles, and decides which specialized role (if any) should
//! handle the content. Scoring is a pure function of the content and
//! the fixed profile tables, so it is safe to call from any number of
//! threads without coordination. The only mutable state is the
//! role→model assignment table, which uses snapshot-and-swap: readers
//! clone an `Arc` under a briefly-held lock, writers replace the map.
//!
//! Tie-breaking is by profile declaration order, never by any map's
//! iteration order. The first declared profile is the default/general
//! role; it wins every tie it is part of and is never a delegation
//! target.

mod error;
mod profile;

pub use error::{RouterError, RouterResult};
pub use profile::{default_profiles, RoleProfile};

use hearth_types::{RoleAssignmentEntry, RoleId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Global selection threshold: the top score must strictly exceed
/// this for a specialized role to be selected over the default.
pub const SELECTION_THRESHOLD: f32 = 0.5;

/// One role's score for a piece of content, with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleScore {
    /// Role that was scored.
    pub role: RoleId,
    /// Summed weight of all matched keywords.
    pub score: f32,
    /// The keywords that matched, in table order.
    pub matched: Vec<String>,
}

/// The full outcome of routing one piece of content.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    /// Leading excerpt of the evaluated content.
    pub excerpt: String,
    /// All roles ranked by score, declaration order breaking ties.
    pub scores: Vec<RoleScore>,
    /// The role that won (or the default role).
    pub selected_role: RoleId,
    /// Model assigned to the selected role, if any.
    pub selected_model: Option<String>,
}

const EXCERPT_LEN: usize = 80;

type AssignmentMap = HashMap<RoleId, String>;

/// The router. Cheap to share behind an `Arc`.
pub struct MacRouter {
    profiles: Vec<RoleProfile>,
    /// Startup configuration layer, immutable after boot.
    configured: AssignmentMap,
    /// Runtime override layer; consulted before `configured`.
    overrides: RwLock<Arc<AssignmentMap>>,
}

impl MacRouter {
    /// Builds a router over a fixed profile list and the startup
    /// assignment configuration.
    ///
    /// The first profile is the default/general role. Fails if the
    /// profile list is empty or declares a role twice.
    pub fn new(
        profiles: Vec<RoleProfile>,
        assignments: Vec<RoleAssignmentEntry>,
    ) -> RouterResult<Self> {
        if profiles.is_empty() {
            return Err(RouterError::NoProfiles);
        }
        for (i, profile) in profiles.iter().enumerate() {
            if profiles[..i].iter().any(|p| p.id == profile.id) {
                return Err(RouterError::DuplicateRole(profile.id.clone()));
            }
        }

        let mut configured = AssignmentMap::new();
        for entry in assignments {
            configured.insert(entry.role, entry.model);
        }

        info!(
            roles = profiles.len(),
            assigned = configured.len(),
            default_role = %profiles[0].id,
            "MAC router ready"
        );
        Ok(Self {
            profiles,
            configured,
            overrides: RwLock::new(Arc::new(AssignmentMap::new())),
        })
    }

    /// Builds a router with the stock profile set.
    pub fn with_default_profiles(assignments: Vec<RoleAssignmentEntry>) -> RouterResult<Self> {
        Self::new(default_profiles(), assignments)
    }

    /// The default/general role (first declared profile).
    pub fn default_role(&self) -> &RoleId {
        &self.profiles[0].id
    }

    /// The declared profiles, in priority order.
    pub fn profiles(&self) -> &[RoleProfile] {
        &self.profiles
    }

    /// Scores every role against the content and returns the ranked
    /// list with matched-keyword provenance.
    ///
    /// Keywords are matched as literal substrings of the lowercased
    /// content. Overlapping matches all count ("feel" and "feeling"
    /// both score against "feelings"); de-duplicating them would
    /// change routing outcomes, so they stay.
    pub fn evaluate_routing_detailed(&self, content: &str) -> Vec<RoleScore> {
        let normalized = content.to_lowercase();
        let mut scores: Vec<RoleScore> = self
            .profiles
            .iter()
            .map(|profile| {
                let mut score = 0.0;
                let mut matched = Vec::new();
                for (keyword, weight) in &profile.keywords {
                    if normalized.contains(keyword.as_str()) {
                        score += weight;
                        matched.push(keyword.clone());
                    }
                }
                RoleScore {
                    role: profile.id.clone(),
                    score,
                    matched,
                }
            })
            .collect();

        // Stable sort: equal scores keep declaration order.
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scores
    }

    /// Classifies content into a role.
    ///
    /// The top-ranked role wins only if its score strictly exceeds
    /// [`SELECTION_THRESHOLD`]; otherwise the default role handles it.
    pub fn evaluate_routing(&self, content: &str) -> RoleId {
        let ranked = self.evaluate_routing_detailed(content);
        let top = &ranked[0];
        let selected = if top.score > SELECTION_THRESHOLD {
            top.role.clone()
        } else {
            self.default_role().clone()
        };
        debug!(role = %selected, top_score = top.score, "Routed content");
        selected
    }

    /// True if the content is a firm delegation signal.
    ///
    /// The top role must not be the default/general role, which never
    /// delegates regardless of score. Its score must meet the supplied
    /// threshold, or the role's own delegation threshold when none is
    /// supplied.
    pub fn should_delegate(&self, content: &str, threshold: Option<f32>) -> bool {
        let ranked = self.evaluate_routing_detailed(content);
        let top = &ranked[0];
        if top.role == *self.default_role() {
            return false;
        }
        let required = threshold.unwrap_or_else(|| {
            self.profiles
                .iter()
                .find(|p| p.id == top.role)
                .map(|p| p.delegation_threshold)
                .unwrap_or(SELECTION_THRESHOLD)
        });
        top.score >= required
    }

    /// Routes content and resolves the winning role to its model in
    /// one step.
    pub fn route(&self, content: &str) -> RoutingDecision {
        let scores = self.evaluate_routing_detailed(content);
        let top = &scores[0];
        let selected_role = if top.score > SELECTION_THRESHOLD {
            top.role.clone()
        } else {
            self.default_role().clone()
        };
        let selected_model = self.assigned_model(&selected_role);
        RoutingDecision {
            excerpt: content.chars().take(EXCERPT_LEN).collect(),
            scores,
            selected_role,
            selected_model,
        }
    }

    /// Resolves a role to its assigned model: runtime override first,
    /// then startup configuration, else unassigned.
    pub fn assigned_model(&self, role: &RoleId) -> Option<String> {
        let overrides = read_snapshot(&self.overrides);
        overrides
            .get(role)
            .or_else(|| self.configured.get(role))
            .cloned()
    }

    /// Replaces the override entry for a role. Takes effect for all
    /// subsequent lookups immediately. Overrides are session-scoped;
    /// the startup configuration file is never rewritten.
    pub fn set_role_assignment(&self, role: impl Into<RoleId>, model: impl Into<String>) {
        let role = role.into();
        let model = model.into();
        info!(role = %role, model = %model, "Role assignment override");

        let mut guard = self.overrides.write().unwrap_or_else(|e| e.into_inner());
        let mut next = AssignmentMap::clone(&guard);
        next.insert(role, model);
        *guard = Arc::new(next);
    }
}

/// Loads the startup assignment configuration: an ordered list of
/// `{role, model}` entries.
///
/// A missing file yields an empty list (every role unassigned); a file
/// that exists but does not parse is a fatal boot error.
pub fn load_assignments(path: &Path) -> RouterResult<Vec<RoleAssignmentEntry>> {
    if !path.exists() {
        debug!(path = %path.display(), "No role assignment config, starting unassigned");
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn read_snapshot(lock: &RwLock<Arc<AssignmentMap>>) -> Arc<AssignmentMap> {
    lock.read().unwrap_or_else(|e| e.into_inner()).clone()
}
