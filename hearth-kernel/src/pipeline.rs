//! Typed pipeline stages around a model exchange.
//!
//! These replace implicit host-runtime hooks with two explicit pure
//! functions: decorating an outgoing request with a state-derived
//! context block, and classifying a completed response. Both take
//! their inputs by value/reference and touch no hidden state, so they
//! compose and test like ordinary functions.

use hearth_router::{MacRouter, RoutingDecision};
use serde_json::Value;

/// An outgoing request after the decoration stage.
#[derive(Debug, Clone)]
pub struct DecoratedRequest {
    /// The original content, untouched.
    pub content: String,
    /// Rendered context block derived from the state snapshot.
    pub context_block: String,
    /// Routing decision for the content, made at decoration time so
    /// the caller can pick a downstream target.
    pub decision: RoutingDecision,
}

impl DecoratedRequest {
    /// The full text to hand to the downstream processor: context
    /// block (when non-empty) followed by the content.
    pub fn text(&self) -> String {
        if self.context_block.is_empty() {
            self.content.clone()
        } else {
            format!("{}\n\n{}", self.context_block, self.content)
        }
    }
}

/// Decorates an outgoing request with a context block rendered from a
/// state snapshot, and routes the content.
///
/// Pure function of (snapshot, content): the snapshot is whatever set
/// of domain documents the caller chose to read, in the order given.
pub fn decorate_request(
    snapshot: &[(String, Value)],
    router: &MacRouter,
    content: &str,
) -> DecoratedRequest {
    DecoratedRequest {
        content: content.to_string(),
        context_block: render_context(snapshot),
        decision: router.route(content),
    }
}

/// Classifies a completed response. Pure function of the content.
pub fn classify_response(router: &MacRouter, content: &str) -> RoutingDecision {
    router.route(content)
}

/// Renders a state snapshot as one compact line per domain.
fn render_context(snapshot: &[(String, Value)]) -> String {
    snapshot
        .iter()
        .map(|(domain, value)| format!("[{domain}] {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
