//! Topic pattern matching for subscriptions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A subscription's topic pattern.
///
/// Three forms: an exact topic, a `prefix*` form matching every topic
/// with that prefix, and the bare wildcard `*` matching everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicPattern {
    /// Matches one topic exactly.
    Exact(String),
    /// Matches any topic starting with the prefix (e.g. `TICK_*`).
    Prefix(String),
    /// Matches every topic.
    All,
}

impl TopicPattern {
    /// Parses the textual pattern form used in manifests.
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            Self::All
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Self::Prefix(prefix.to_string())
        } else {
            Self::Exact(pattern.to_string())
        }
    }

    /// True if this pattern matches the given topic.
    pub fn matches(&self, topic: &str) -> bool {
        match self {
            Self::Exact(t) => t == topic,
            Self::Prefix(p) => topic.starts_with(p.as_str()),
            Self::All => true,
        }
    }
}

impl fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(t) => write!(f, "{t}"),
            Self::Prefix(p) => write!(f, "{p}*"),
            Self::All => write!(f, "*"),
        }
    }
}

impl From<&str> for TopicPattern {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matches_only_itself() {
        let p = TopicPattern::parse("TICK_MINUTELY");
        assert!(p.matches("TICK_MINUTELY"));
        assert!(!p.matches("TICK_HOURLY"));
        assert!(!p.matches("TICK_MINUTELY_EXTRA"));
    }

    #[test]
    fn prefix_matches_by_prefix() {
        let p = TopicPattern::parse("TICK_*");
        assert!(p.matches("TICK_MINUTELY"));
        assert!(p.matches("TICK_DAILY"));
        assert!(!p.matches("STATE_CHANGED"));
    }

    #[test]
    fn wildcard_matches_everything() {
        let p = TopicPattern::parse("*");
        assert!(p.matches("anything"));
        assert!(p.matches(""));
    }

    #[test]
    fn display_roundtrip() {
        for raw in ["*", "TICK_*", "STATE_CHANGED"] {
            assert_eq!(TopicPattern::parse(raw).to_string(), raw);
        }
    }
}
