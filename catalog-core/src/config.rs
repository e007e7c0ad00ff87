//! Resolver configuration
//!
//! A host application can declare its own URL rules and registration mode
//! in JSON instead of code:
//!
//! ```json
//! {
//!   "strict_registration": false,
//!   "include_default_rules": true,
//!   "rules": [
//!     { "match": "extension", "extension": "gpkg", "type": "geopackage" },
//!     { "match": "pattern", "pattern": "/ogc/features", "type": "ogc-features" },
//!     { "match": "any", "type": "wms-group" }
//!   ]
//! }
//! ```
//!
//! Configured rules take priority over the builtin table within each kind,
//! and all catch-alls stay at the end.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builtins;
use crate::error::{CatalogError, Result};
use crate::registry::RegistrationMode;
use crate::rules::{match_all, matches_extension, matches_url_pattern, Predicate, RuleSet};

/// Top-level resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Reject duplicate type registrations and rules for unregistered types
    #[serde(default)]
    pub strict_registration: bool,

    /// Append the builtin rule table after the configured rules
    #[serde(default = "default_true")]
    pub include_default_rules: bool,

    /// Extra rules, in priority order
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

fn default_true() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strict_registration: false,
            include_default_rules: true,
            rules: Vec::new(),
        }
    }
}

/// One configured rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(flatten)]
    pub matcher: MatchSpec,

    /// Target type identifier
    #[serde(rename = "type")]
    pub type_id: String,

    /// Defaults to false for extensions and true otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speculative: Option<bool>,
}

/// How a configured rule matches URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum MatchSpec {
    Extension { extension: String },
    Pattern { pattern: String },
    Any,
}

impl RuleSpec {
    fn is_speculative(&self) -> bool {
        self.speculative
            .unwrap_or(!matches!(self.matcher, MatchSpec::Extension { .. }))
    }

    fn predicate(&self) -> Result<Predicate> {
        match &self.matcher {
            MatchSpec::Extension { extension } => {
                if extension.trim_start_matches('.').is_empty() {
                    return Err(CatalogError::InvalidRule {
                        reason: format!("empty extension for type '{}'", self.type_id),
                    });
                }
                Ok(matches_extension(extension))
            }
            MatchSpec::Pattern { pattern } => matches_url_pattern(pattern),
            MatchSpec::Any => {
                if !self.is_speculative() {
                    return Err(CatalogError::InvalidRule {
                        reason: format!(
                            "catch-all rule for type '{}' must be speculative",
                            self.type_id
                        ),
                    });
                }
                Ok(match_all())
            }
        }
    }
}

impl ResolverConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ResolverConfig =
            serde_json::from_str(json).map_err(|e| CatalogError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading resolver configuration");
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn registration_mode(&self) -> RegistrationMode {
        if self.strict_registration {
            RegistrationMode::Strict
        } else {
            RegistrationMode::Replace
        }
    }

    /// Check every rule without building the rule set
    pub fn validate(&self) -> Result<()> {
        for spec in &self.rules {
            if spec.type_id.trim().is_empty() {
                return Err(CatalogError::InvalidConfig {
                    reason: "rule with empty type".to_string(),
                });
            }
            spec.predicate()?;
        }
        Ok(())
    }

    /// Build the rule set: configured rules, then builtin rules, with every
    /// catch-all moved behind the more specific rules
    pub fn build_rule_set(&self) -> Result<RuleSet> {
        let mut specific = RuleSet::new();
        let mut fallbacks = RuleSet::new();

        for spec in &self.rules {
            let predicate = spec.predicate()?;
            if predicate.is_catch_all() {
                fallbacks.register(predicate, spec.type_id.clone(), true);
            } else {
                specific.register(predicate, spec.type_id.clone(), spec.is_speculative());
            }
        }

        if self.include_default_rules {
            builtins::register_specific_rules(&mut specific)?;
            builtins::register_fallback_rules(&mut fallbacks);
        }

        specific.extend(fallbacks);
        Ok(specific)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolutionPlan;
    use crate::rules::Tier;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::from_json("{}").unwrap();
        assert!(!config.strict_registration);
        assert!(config.include_default_rules);
        assert!(config.rules.is_empty());
        assert_eq!(config.registration_mode(), RegistrationMode::Replace);

        let rules = config.build_rule_set().unwrap();
        assert_eq!(rules.len(), builtins::default_rules().unwrap().len());
    }

    #[test]
    fn test_configured_rules_take_priority() {
        let config = ResolverConfig::from_json(
            r#"{
                "rules": [
                    { "match": "extension", "extension": "json", "type": "czml" },
                    { "match": "pattern", "pattern": "/ogc/features", "type": "ogc-features" },
                    { "match": "any", "type": "ogc-features" }
                ]
            }"#,
        )
        .unwrap();
        let rules = config.build_rule_set().unwrap();

        let plan = ResolutionPlan::build(&rules, "https://example.com/data.json");
        assert_eq!(plan.type_ids(), vec!["czml"]);

        let plan = ResolutionPlan::build(&rules, "https://example.com/ogc/features/collections");
        assert_eq!(plan.tier, Some(Tier::Speculative));
        assert_eq!(plan.type_ids()[0], "ogc-features");

        // Configured catch-all goes after the builtin patterns, before builtin catch-alls
        let plan = ResolutionPlan::build(&rules, "https://example.com/arcgis/rest/services");
        assert_eq!(plan.type_ids()[0], "esri-group");
        assert_eq!(plan.type_ids()[1], "ogc-features");
        assert_eq!(plan.type_ids()[2], "wms-group");
    }

    #[test]
    fn test_without_defaults() {
        let config = ResolverConfig::from_json(
            r#"{
                "strict_registration": true,
                "include_default_rules": false,
                "rules": [
                    { "match": "pattern", "pattern": "\\.csv$", "type": "csv", "speculative": false }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.registration_mode(), RegistrationMode::Strict);

        let rules = config.build_rule_set().unwrap();
        assert_eq!(rules.len(), 1);
        assert!(!rules.rules()[0].speculative);
    }

    #[test]
    fn test_invalid_pattern_is_invalid_rule() {
        let err = ResolverConfig::from_json(
            r#"{ "rules": [ { "match": "pattern", "pattern": "(unclosed", "type": "wms-group" } ] }"#,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RULE");
    }

    #[test]
    fn test_deterministic_catch_all_rejected() {
        let err = ResolverConfig::from_json(
            r#"{ "rules": [ { "match": "any", "type": "wms-group", "speculative": false } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("must be speculative"));
    }

    #[test]
    fn test_malformed_json_is_invalid_config() {
        let err = ResolverConfig::from_json(r#"{ "rules": [ { "match": "glob" } ] }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_file_save_and_load() {
        let path = std::env::temp_dir().join(format!("resolver-{}.json", uuid::Uuid::new_v4()));
        let config = ResolverConfig {
            strict_registration: true,
            include_default_rules: false,
            rules: vec![RuleSpec {
                matcher: MatchSpec::Pattern {
                    pattern: "/ogc/features".to_string(),
                },
                type_id: "ogc-features".to_string(),
                speculative: None,
            }],
        };

        config.save(&path).unwrap();
        let loaded = ResolverConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(loaded.strict_registration);
        assert_eq!(loaded.build_rule_set().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", uuid::Uuid::new_v4()));
        let err = ResolverConfig::from_file(&path).unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert_eq!(err.category(), crate::error::ErrorCategory::External);
    }

    #[test]
    fn test_serialization_roundtrip_keeps_shape() {
        let config = ResolverConfig {
            rules: vec![RuleSpec {
                matcher: MatchSpec::Extension {
                    extension: "gpkg".to_string(),
                },
                type_id: "geopackage".to_string(),
                speculative: None,
            }],
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""match":"extension""#));
        assert!(json.contains(r#""type":"geopackage""#));
        assert!(!json.contains("speculative\":"));

        let parsed = ResolverConfig::from_json(&json).unwrap();
        assert_eq!(parsed.rules.len(), 1);
    }
}
