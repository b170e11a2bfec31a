use glob::{Pattern, PatternError};
use serde::Deserialize;

/// Raw filter rule lists as they appear in configuration.
///
/// Entity lists accept glob patterns (e.g. `light.kitchen_*`); domain lists
/// are exact names (e.g. `sensor`). An empty config admits every entity.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub include_entities: Vec<String>,
    #[serde(default)]
    pub exclude_entities: Vec<String>,
    #[serde(default)]
    pub include_domains: Vec<String>,
    #[serde(default)]
    pub exclude_domains: Vec<String>,
}

/// Immutable include/exclude rule set over entity identifiers.
///
/// Precedence: an exclude rule (entity glob or domain) always rejects; when
/// any include rule exists, the entity must match one of them; a filter with
/// no rules includes everything. The global filter and a route's filter are
/// combined with logical AND at evaluation time.
#[derive(Clone, Debug)]
pub struct EntityFilter {
    include_entities: Vec<Pattern>,
    exclude_entities: Vec<Pattern>,
    include_domains: Vec<String>,
    exclude_domains: Vec<String>,
}

impl EntityFilter {
    /// Compile a filter from configuration. Fails on a malformed glob.
    pub fn from_config(config: &FilterConfig) -> Result<Self, PatternError> {
        Ok(Self {
            include_entities: compile_patterns(&config.include_entities)?,
            exclude_entities: compile_patterns(&config.exclude_entities)?,
            include_domains: config.include_domains.clone(),
            exclude_domains: config.exclude_domains.clone(),
        })
    }

    /// Filter with no rules; includes every entity.
    pub fn empty() -> Self {
        Self {
            include_entities: Vec::new(),
            exclude_entities: Vec::new(),
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }

    /// Whether the entity passes this filter.
    pub fn matches(&self, entity_id: &str) -> bool {
        let domain = domain_of(entity_id);

        if self.exclude_domains.iter().any(|d| d == domain) {
            return false;
        }
        if self.exclude_entities.iter().any(|p| p.matches(entity_id)) {
            return false;
        }

        let has_includes =
            !self.include_entities.is_empty() || !self.include_domains.is_empty();
        if !has_includes {
            return true;
        }

        self.include_domains.iter().any(|d| d == domain)
            || self.include_entities.iter().any(|p| p.matches(entity_id))
    }
}

fn compile_patterns(globs: &[String]) -> Result<Vec<Pattern>, PatternError> {
    globs.iter().map(|g| Pattern::new(g)).collect()
}

/// Domain part of an entity id (`light.kitchen` -> `light`).
fn domain_of(entity_id: &str) -> &str {
    entity_id.split('.').next().unwrap_or("")
}
