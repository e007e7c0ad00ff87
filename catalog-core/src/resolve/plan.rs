//! Candidate planning

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rules::{ResolutionRule, RuleSet, Tier};

/// A type to attempt, and the rule that proposed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub type_id: String,
    pub rule_order: usize,
    /// Human-readable form of the matching predicate
    pub rule: String,
}

impl From<&ResolutionRule> for Candidate {
    fn from(rule: &ResolutionRule) -> Self {
        Self {
            type_id: rule.type_id.clone(),
            rule_order: rule.order,
            rule: rule.predicate.to_string(),
        }
    }
}

/// Ordered candidates for one URL
///
/// A deterministic plan holds exactly one candidate. A speculative plan
/// holds each matching type once, at the position of its first rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPlan {
    pub url: String,
    /// `None` when no rule matched
    pub tier: Option<Tier>,
    pub candidates: Vec<Candidate>,
}

impl ResolutionPlan {
    pub fn build(rules: &RuleSet, url: &str) -> Self {
        let mut deterministic = None;
        let mut speculative = Vec::new();
        let mut seen = HashSet::new();

        for rule in rules.matching(url) {
            if Tier::of(rule) == Tier::Deterministic {
                // The first deterministic match is authoritative; nothing else counts
                deterministic = Some(Candidate::from(rule));
                break;
            }
            if seen.insert(rule.type_id.as_str()) {
                speculative.push(Candidate::from(rule));
            }
        }

        let (tier, candidates) = match deterministic {
            Some(candidate) => (Some(Tier::Deterministic), vec![candidate]),
            None if speculative.is_empty() => (None, Vec::new()),
            None => (Some(Tier::Speculative), speculative),
        };

        Self {
            url: url.to_string(),
            tier,
            candidates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidate type identifiers in attempt order
    pub fn type_ids(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.type_id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rules() -> RuleSet {
        let mut rules = RuleSet::new();
        rules.register_extension("geojson", "geojson");
        rules.register_extension("json", "geojson");
        rules.register_pattern("/wms|=wms", "wms-group").unwrap();
        rules.register_pattern("/arcgis/rest/.*/MapServer(/.*)?$", "esri-mapServer-group").unwrap();
        rules.register_pattern("/arcgis/rest/", "esri-group").unwrap();
        rules.register_fallback("wms-group");
        rules.register_fallback("esri-group");
        rules
    }

    #[test]
    fn test_deterministic_match_excludes_everything_else() {
        let plan = ResolutionPlan::build(&sample_rules(), "https://example.com/wms/data.geojson");

        assert_eq!(plan.tier, Some(Tier::Deterministic));
        assert_eq!(plan.type_ids(), vec!["geojson"]);
        assert_eq!(plan.candidates[0].rule_order, 0);
        assert_eq!(plan.candidates[0].rule, "extension .geojson");
    }

    #[test]
    fn test_speculative_candidates_are_ordered_and_unique() {
        let plan = ResolutionPlan::build(
            &sample_rules(),
            "https://example.com/arcgis/rest/services/Foo/MapServer",
        );

        assert_eq!(plan.tier, Some(Tier::Speculative));
        assert_eq!(
            plan.type_ids(),
            vec!["esri-mapServer-group", "esri-group", "wms-group"]
        );
        let orders: Vec<usize> = plan.candidates.iter().map(|c| c.rule_order).collect();
        assert_eq!(orders, vec![3, 4, 5]);
    }

    #[test]
    fn test_empty_rule_set_plans_nothing() {
        let plan = ResolutionPlan::build(&RuleSet::new(), "https://example.com/anything");
        assert_eq!(plan.tier, None);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_is_deterministic() {
        let rules = sample_rules();
        let url = "https://example.com/ows?service=WMS";
        assert_eq!(ResolutionPlan::build(&rules, url), ResolutionPlan::build(&rules, url));
    }
}
