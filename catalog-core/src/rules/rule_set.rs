//! Ordered rule storage

use crate::error::Result;
use crate::registry::TypeRegistry;

use super::predicate::{match_all, matches_extension, matches_url_pattern, Predicate};

/// One URL-to-type rule
#[derive(Debug, Clone)]
pub struct ResolutionRule {
    /// Test applied to the URL
    pub predicate: Predicate,
    /// Type to attempt when the predicate matches
    pub type_id: String,
    /// Whether a failed attempt may fall through to the next candidate
    pub speculative: bool,
    /// Position in the rule set; lower is preferred
    pub order: usize,
}

/// Append-only, ordered list of resolution rules
///
/// Order is part of the contract: re-ordering registrations changes which
/// type a URL resolves to.
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    rules: Vec<ResolutionRule>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule and return its registration order
    ///
    /// Nothing is de-duplicated; a URL may match several rules.
    pub fn register(
        &mut self,
        predicate: Predicate,
        type_id: impl Into<String>,
        speculative: bool,
    ) -> usize {
        let order = self.rules.len();
        let type_id = type_id.into();

        if speculative && !predicate.is_catch_all() && self.has_catch_all() {
            tracing::warn!(
                rule = %predicate,
                type_id = %type_id,
                "speculative rule registered after a catch-all; it will be tried after the catch-all"
            );
        }

        self.rules.push(ResolutionRule {
            predicate,
            type_id,
            speculative,
            order,
        });
        order
    }

    /// Deterministic rule on a file extension
    pub fn register_extension(&mut self, ext: &str, type_id: impl Into<String>) -> usize {
        self.register(matches_extension(ext), type_id, false)
    }

    /// Speculative rule on a URL regex
    pub fn register_pattern(&mut self, pattern: &str, type_id: impl Into<String>) -> Result<usize> {
        Ok(self.register(matches_url_pattern(pattern)?, type_id, true))
    }

    /// Speculative catch-all
    pub fn register_fallback(&mut self, type_id: impl Into<String>) -> usize {
        self.register(match_all(), type_id, true)
    }

    /// Rules whose predicate matches `url`, in registration order
    pub fn matching<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a ResolutionRule> + 'a {
        self.rules.iter().filter(move |rule| rule.predicate.matches(url))
    }

    /// Rule targets with no factory in `registry`, each listed once
    pub fn unregistered_types(&self, registry: &TypeRegistry) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        for rule in &self.rules {
            let type_id = rule.type_id.as_str();
            if !registry.contains(type_id) && !missing.contains(&type_id) {
                missing.push(type_id);
            }
        }
        missing
    }

    /// Append every rule of `other`, keeping its relative order
    pub fn extend(&mut self, other: RuleSet) {
        for rule in other.rules {
            self.register(rule.predicate, rule.type_id, rule.speculative);
        }
    }

    pub fn rules(&self) -> &[ResolutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn has_catch_all(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.speculative && rule.predicate.is_catch_all())
    }
}
