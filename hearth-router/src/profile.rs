//! Role profiles: keyword weight tables and delegation thresholds.

use hearth_types::RoleId;

/// One classification role's scoring table.
///
/// Profiles are immutable after router construction. Their position in
/// the profile list is the declared priority order used for tie-breaks;
/// the first profile is always the default/general role.
#[derive(Debug, Clone)]
pub struct RoleProfile {
    /// Role this profile scores for.
    pub id: RoleId,

    /// Keyword → weight table. Keywords are matched as literal
    /// lowercase substrings of the content.
    pub keywords: Vec<(String, f32)>,

    /// Minimum top score for this role to be a firm delegation
    /// signal, distinct from the global selection threshold.
    pub delegation_threshold: f32,
}

impl RoleProfile {
    /// Creates a profile with an empty keyword table.
    pub fn new(id: impl Into<RoleId>, delegation_threshold: f32) -> Self {
        Self {
            id: id.into(),
            keywords: Vec::new(),
            delegation_threshold,
        }
    }

    /// Adds a keyword. Keywords are stored lowercase.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>, weight: f32) -> Self {
        self.keywords.push((keyword.into().to_lowercase(), weight));
        self
    }
}

/// The stock role set: `persona` (default/general), `limbic`
/// (emotional), `analyst` (market/analytical), `developer` (technical).
pub fn default_profiles() -> Vec<RoleProfile> {
    vec![
        RoleProfile::new("persona", 1.0)
            .with_keyword("hello", 0.2)
            .with_keyword("how are you", 0.3)
            .with_keyword("tell me about", 0.2)
            .with_keyword("chat", 0.2),
        RoleProfile::new("limbic", 0.6)
            .with_keyword("feel", 0.3)
            .with_keyword("feeling", 0.2)
            .with_keyword("emotion", 0.3)
            .with_keyword("anxious", 0.4)
            .with_keyword("scared", 0.4)
            .with_keyword("afraid", 0.4)
            .with_keyword("sad", 0.4)
            .with_keyword("lonely", 0.4)
            .with_keyword("worried", 0.4)
            .with_keyword("stressed", 0.4)
            .with_keyword("angry", 0.4)
            .with_keyword("happy", 0.3)
            .with_keyword("love", 0.3)
            .with_keyword("comfort", 0.3),
        RoleProfile::new("analyst", 0.7)
            .with_keyword("analyze", 0.4)
            .with_keyword("analysis", 0.3)
            .with_keyword("market", 0.3)
            .with_keyword("trade", 0.3)
            .with_keyword("trading", 0.3)
            .with_keyword("price", 0.3)
            .with_keyword("stock", 0.3)
            .with_keyword("portfolio", 0.4)
            .with_keyword("strategy", 0.3)
            .with_keyword("forecast", 0.3)
            .with_keyword("risk", 0.3),
        RoleProfile::new("developer", 0.7)
            .with_keyword("refactor", 0.5)
            .with_keyword("function", 0.2)
            .with_keyword("bug", 0.4)
            .with_keyword("code", 0.3)
            .with_keyword("compile", 0.4)
            .with_keyword("debug", 0.4)
            .with_keyword("stack trace", 0.4)
            .with_keyword("implement", 0.3)
            .with_keyword("deploy", 0.3)
            .with_keyword("script", 0.3)
            .with_keyword("api", 0.3),
    ]
}
